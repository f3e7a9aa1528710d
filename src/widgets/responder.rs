//! Reply handle for event handlers.
//!
//! Handlers run while the engine is draining inbound frames, so they cannot
//! borrow the engine itself. They get a [`Responder`] instead: the same
//! outbound link and widget registry, lent for the duration of one call.
//!
//! # Example
//!
//! ```ignore
//! fn answer(out: &mut Responder<'_>) -> dashlink::Result<()> {
//!     out.gauge("temp")?.set_value(read_sensor())?;
//!     Ok(())
//! }
//!
//! engine.handlers_mut().on_widget_request(|request, out| {
//!     if request.widget_id == "temp" {
//!         if let Err(e) = answer(out) {
//!             tracing::warn!(error = %e, "Refresh not answered");
//!         }
//!     }
//! });
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use super::{DisplayKind, MessageSender, Widget, WidgetRegistry, widget_accessors};
use crate::error::Result;

// ============================================================================
// Responder
// ============================================================================

/// Outbound link and widget registry lent to a handler.
pub struct Responder<'a> {
    sender: &'a mut dyn MessageSender,
    registry: &'a mut WidgetRegistry,
}

impl<'a> Responder<'a> {
    /// Lends `sender` and `registry` to handlers.
    #[must_use]
    pub fn new(sender: &'a mut dyn MessageSender, registry: &'a mut WidgetRegistry) -> Self {
        Self { sender, registry }
    }

    /// Returns `true` if a client is connected.
    #[inline]
    #[must_use]
    pub fn connected(&self) -> bool {
        self.sender.connected()
    }

    /// Encodes and writes one raw command.
    ///
    /// # Errors
    ///
    /// See [`MessageSender::send_message`].
    pub fn send_message(
        &mut self,
        widget_id: &str,
        widget_type: &str,
        event: &str,
        payload: Option<&str>,
    ) -> Result<()> {
        self.sender
            .send_message(widget_id, widget_type, event, payload)
    }

    /// Returns a handle to the display widget `id` of family `K`,
    /// registering it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RegistryFull`](crate::Error::RegistryFull) if `id`
    /// is new and the family is full.
    pub fn widget<K: DisplayKind>(&mut self, id: &str) -> Result<Widget<'_, K>> {
        let entry = self.registry.acquire(K::KIND, id)?;
        Ok(Widget::new(&mut *self.sender, entry))
    }

    widget_accessors!();
}

impl fmt::Debug for Responder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Responder")
            .field("connected", &self.sender.connected())
            .field("widgets", &self.registry.len())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
