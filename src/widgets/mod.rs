//! Display widget facades.
//!
//! A display widget is a named element on the dashboard that the device
//! drives by sending commands. Each family gets a zero-sized marker type,
//! and [`Widget`] carries the family-specific command methods.
//!
//! Widget handles are short-lived: they borrow the engine for one statement
//! or block and are obtained again through the engine accessors.
//!
//! # Example
//!
//! ```ignore
//! engine.gauge("temp")?.set_range(0.0, 50.0)?.set_value(21.5)?;
//! engine.chart("history")?.add_point("indoor", 21.5)?;
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `chart` | Advanced chart and bar chart commands |
//! | `color` | RGB color helper |
//! | `led` | LED commands |
//! | `level` | Gauge, metric and level commands |
//! | `payload` | Payload object writer |
//! | `registry` | Bounded widget registry |
//! | `responder` | Reply handle lent to event handlers |
//! | `text` | Text label commands |

// ============================================================================
// Submodules
// ============================================================================

/// Chart widgets.
pub mod chart;

/// RGB colors.
pub mod color;

/// LED widget.
pub mod led;

/// Gauge, metric and level widgets.
pub mod level;

/// Payload object writer.
pub mod payload;

/// Widget registry.
pub mod registry;

/// Handler reply handle.
pub mod responder;

/// Text widget.
pub mod text;

// ============================================================================
// Re-exports
// ============================================================================

pub use chart::{BAR_COUNT, DEFAULT_SERIES, SeriesStyle};
pub use color::Color;
pub use level::{RangeDisplay, ValueDisplay};
pub use payload::PayloadWriter;
pub use registry::{MAX_WIDGET_ID_LENGTH, MAX_WIDGETS, WidgetEntry, WidgetRegistry};
pub use responder::Responder;

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::marker::PhantomData;

use crate::error::Result;

// ============================================================================
// WidgetKind
// ============================================================================

/// Display widget family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WidgetKind {
    /// `led`
    Led,
    /// `gauge`
    Gauge,
    /// `metric`
    Metric,
    /// `horizontallevel`
    HorizontalLevel,
    /// `verticallevel`
    VerticalLevel,
    /// `advancedchart`
    AdvancedChart,
    /// `barchart`
    BarChart,
    /// `text`
    Text,
}

impl WidgetKind {
    /// Every family, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Led,
        Self::Gauge,
        Self::Metric,
        Self::HorizontalLevel,
        Self::VerticalLevel,
        Self::AdvancedChart,
        Self::BarChart,
        Self::Text,
    ];

    /// Returns the wire widget type.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Led => "led",
            Self::Gauge => "gauge",
            Self::Metric => "metric",
            Self::HorizontalLevel => "horizontallevel",
            Self::VerticalLevel => "verticallevel",
            Self::AdvancedChart => "advancedchart",
            Self::BarChart => "barchart",
            Self::Text => "text",
        }
    }

    /// Parses a wire widget type.
    #[must_use]
    pub fn from_wire(widget_type: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == widget_type)
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Family Markers
// ============================================================================

/// Compile-time tag tying a marker type to its [`WidgetKind`].
pub trait DisplayKind {
    /// Family of the marker.
    const KIND: WidgetKind;
}

macro_rules! display_kind {
    ($($(#[$meta:meta])* $name:ident => $kind:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            pub struct $name;

            impl DisplayKind for $name {
                const KIND: WidgetKind = WidgetKind::$kind;
            }
        )*
    };
}

display_kind! {
    /// LED marker.
    Led => Led,
    /// Gauge marker.
    Gauge => Gauge,
    /// Metric marker.
    Metric => Metric,
    /// Horizontal level marker.
    HorizontalLevel => HorizontalLevel,
    /// Vertical level marker.
    VerticalLevel => VerticalLevel,
    /// Advanced chart marker.
    AdvancedChart => AdvancedChart,
    /// Bar chart marker.
    BarChart => BarChart,
    /// Text label marker.
    Text => Text,
}

// ============================================================================
// Accessors
// ============================================================================

/// Per-family shorthands for a type with a generic `widget::<K>(id)`.
macro_rules! widget_accessors {
    () => {
        /// Returns a LED handle.
        ///
        /// # Errors
        ///
        /// See [`widget`](Self::widget).
        pub fn led(
            &mut self,
            id: &str,
        ) -> $crate::Result<$crate::Widget<'_, $crate::widgets::Led>> {
            self.widget(id)
        }

        /// Returns a gauge handle.
        ///
        /// # Errors
        ///
        /// See [`widget`](Self::widget).
        pub fn gauge(
            &mut self,
            id: &str,
        ) -> $crate::Result<$crate::Widget<'_, $crate::widgets::Gauge>> {
            self.widget(id)
        }

        /// Returns a metric handle.
        ///
        /// # Errors
        ///
        /// See [`widget`](Self::widget).
        pub fn metric(
            &mut self,
            id: &str,
        ) -> $crate::Result<$crate::Widget<'_, $crate::widgets::Metric>> {
            self.widget(id)
        }

        /// Returns a horizontal level handle.
        ///
        /// # Errors
        ///
        /// See [`widget`](Self::widget).
        pub fn horizontal_level(
            &mut self,
            id: &str,
        ) -> $crate::Result<$crate::Widget<'_, $crate::widgets::HorizontalLevel>> {
            self.widget(id)
        }

        /// Returns a vertical level handle.
        ///
        /// # Errors
        ///
        /// See [`widget`](Self::widget).
        pub fn vertical_level(
            &mut self,
            id: &str,
        ) -> $crate::Result<$crate::Widget<'_, $crate::widgets::VerticalLevel>> {
            self.widget(id)
        }

        /// Returns an advanced chart handle.
        ///
        /// # Errors
        ///
        /// See [`widget`](Self::widget).
        pub fn chart(
            &mut self,
            id: &str,
        ) -> $crate::Result<$crate::Widget<'_, $crate::widgets::AdvancedChart>> {
            self.widget(id)
        }

        /// Returns a bar chart handle.
        ///
        /// # Errors
        ///
        /// See [`widget`](Self::widget).
        pub fn bar_chart(
            &mut self,
            id: &str,
        ) -> $crate::Result<$crate::Widget<'_, $crate::widgets::BarChart>> {
            self.widget(id)
        }

        /// Returns a text label handle.
        ///
        /// # Errors
        ///
        /// See [`widget`](Self::widget).
        pub fn text(
            &mut self,
            id: &str,
        ) -> $crate::Result<$crate::Widget<'_, $crate::widgets::Text>> {
            self.widget(id)
        }
    };
}

pub(crate) use widget_accessors;

// ============================================================================
// MessageSender
// ============================================================================

/// Outbound side of the engine as seen by widget facades.
pub trait MessageSender {
    /// Encodes and writes one command.
    ///
    /// # Errors
    ///
    /// Fails when no client is connected, the frame does not fit the
    /// outbound buffer, or the transport accepts fewer bytes than encoded.
    fn send_message(
        &mut self,
        widget_id: &str,
        widget_type: &str,
        event: &str,
        payload: Option<&str>,
    ) -> Result<()>;

    /// Returns `true` if a client is connected.
    fn connected(&self) -> bool;
}

// ============================================================================
// Widget
// ============================================================================

/// Borrowed handle to one registered display widget.
///
/// Command methods return `&mut Self` so calls can be chained with `?`.
pub struct Widget<'a, K> {
    sender: &'a mut dyn MessageSender,
    entry: &'a mut WidgetEntry,
    _kind: PhantomData<K>,
}

impl<'a, K: DisplayKind> Widget<'a, K> {
    /// Wraps a registry entry of family `K`.
    pub(crate) fn new(sender: &'a mut dyn MessageSender, entry: &'a mut WidgetEntry) -> Self {
        debug_assert_eq!(entry.kind(), K::KIND);
        Self {
            sender,
            entry,
            _kind: PhantomData,
        }
    }

    /// Returns the widget id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        self.entry.id()
    }

    /// Returns the widget family.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> WidgetKind {
        K::KIND
    }

    /// Returns `true` if a client is connected.
    #[inline]
    #[must_use]
    pub fn connected(&self) -> bool {
        self.sender.connected()
    }

    /// Sends a command with an optional payload object.
    ///
    /// # Errors
    ///
    /// See [`MessageSender::send_message`].
    pub fn send(&mut self, event: &str, payload: Option<&str>) -> Result<&mut Self> {
        self.sender
            .send_message(self.entry.id(), K::KIND.as_str(), event, payload)?;
        Ok(self)
    }

    /// Sends a command whose payload is built by `build`.
    fn send_with<F>(&mut self, event: &str, build: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut PayloadWriter),
    {
        let mut writer = PayloadWriter::new();
        build(&mut writer);
        let payload = writer.finish();
        self.send(event, Some(&payload))
    }

    pub(crate) fn entry_mut(&mut self) -> &mut WidgetEntry {
        self.entry
    }
}

impl<K: DisplayKind> fmt::Debug for Widget<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Widget")
            .field("id", &self.entry.id())
            .field("kind", &K::KIND)
            .finish()
    }
}

// ============================================================================
// Test Support
// ============================================================================


// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::testing::RecordingSender;
    use super::*;

    use crate::error::Error;

    #[test]
    fn test_kind_wire_names() {
        for kind in WidgetKind::ALL {
            assert_eq!(WidgetKind::from_wire(kind.as_str()), Some(kind));
            assert_eq!(kind.to_string(), kind.as_str());
        }
        assert_eq!(WidgetKind::from_wire("switch"), None);
    }

    #[test]
    fn test_send_uses_family_type() {
        let mut sender = RecordingSender::default();
        let mut entry = WidgetEntry::new("status", WidgetKind::Led);

        Widget::<Led>::new(&mut sender, &mut entry)
            .send("turnon", None)
            .expect("send");

        assert_eq!(
            sender.sent,
            vec![(
                "status".to_string(),
                "led".to_string(),
                "turnon".to_string(),
                None
            )]
        );
    }

    #[test]
    fn test_send_propagates_error() {
        let mut sender = RecordingSender {
            disconnected: true,
            ..Default::default()
        };
        let mut entry = WidgetEntry::new("status", WidgetKind::Led);
        let mut led = Widget::<Led>::new(&mut sender, &mut entry);

        assert!(!led.connected());
        assert!(matches!(led.send("turnon", None), Err(Error::NotConnected)));
    }
}
