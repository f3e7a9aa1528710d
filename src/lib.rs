//! dashlink - Device-side engine for line-oriented dashboard links.
//!
//! This library lets a device exchange newline-delimited JSON frames with a
//! dashboard app: it turns control interactions (buttons, sliders, switches,
//! joysticks...) into typed handler calls, and drives display widgets
//! (LEDs, gauges, charts, text) with typed commands.
//!
//! # Architecture
//!
//! ```text
//! bytes ─► LineReassembler ─► decode ─► Handlers::dispatch ─► your handler
//!
//! engine.gauge("t")?.set_value(..) ─► encode ─► Transport::write ─► bytes
//! ```
//!
//! Key design principles:
//!
//! - Single owner: the [`Engine`] holds the transport, buffers, registry and
//!   handlers; nothing is shared behind locks
//! - Cooperative: [`Engine::tick`] never blocks, call it from any loop
//! - Bounded: fixed line and encode buffers, capped payload parameters,
//!   capped widgets per family
//! - Forgiving: bad frames and unknown events are counted and dropped
//!
//! # Quick Start
//!
//! ```no_run
//! use std::net::{IpAddr, Ipv4Addr};
//!
//! use dashlink::transport::TcpServerTransport;
//! use dashlink::{DeviceConfig, Engine, Result};
//!
//! fn main() -> Result<()> {
//!     let transport = TcpServerTransport::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 3333);
//!     let mut engine = Engine::new(transport)
//!         .with_config(DeviceConfig::new().with_dashboard_id("greenhouse"));
//!
//!     // Mirror the pump switch on an LED.
//!     engine.handlers_mut().on_switch(|event, out| {
//!         let mirrored = out
//!             .led("pump_led")
//!             .and_then(|mut led| led.set_state(event.is_on, 1.0).map(|_| ()));
//!         if let Err(e) = mirrored {
//!             eprintln!("pump LED not updated: {e}");
//!         }
//!     });
//!     engine.begin()?;
//!
//!     loop {
//!         engine.tick();
//!         if engine.connected() {
//!             if let Err(e) = engine.gauge("temp")?.set_value(21.5) {
//!                 eprintln!("reading not sent: {e}");
//!             }
//!         }
//!         std::thread::sleep(std::time::Duration::from_millis(10));
//!     }
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`dispatch`] | Typed events and the handler table |
//! | [`engine`] | [`Engine`], options, device config, tokio driver |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`protocol`] | Framing, decoding and encoding |
//! | [`transport`] | [`Transport`] trait, TCP and in-memory transports |
//! | [`widgets`] | Display widget commands and registry |

// ============================================================================
// Modules
// ============================================================================

/// Typed events and handler registration.
///
/// Register closures with [`Handlers`] through [`Engine::handlers_mut`].
/// Each call also gets a [`Responder`] for answering the dashboard.
pub mod dispatch;

/// Protocol engine.
///
/// Use [`Engine::new`] with a [`Transport`] and call [`Engine::tick`].
pub mod engine;

/// Error types and result aliases.
///
/// All fallible engine operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Line protocol codec.
///
/// Framing, decoding and encoding of wire messages.
pub mod protocol;

/// Byte-stream transports.
pub mod transport;

/// Display widget facades.
pub mod widgets;

// ============================================================================
// Re-exports
// ============================================================================

// Dispatch types
pub use dispatch::{
    AdvancedButtonEvent, ButtonEventKind, DPadButton, DPadEventKind, DirectionPadEvent,
    DispatchOutcome, EmergencyButtonEvent, EmergencyEventKind, Handlers, HorizontalSliderEvent,
    JoystickEvent, JoystickEventKind, SegmentedEventKind, SegmentedSwitchEvent, SimpleButtonEvent,
    SliderEventKind, SwitchEvent, SwitchEventKind, VerticalSliderEvent, WidgetEvent, WidgetRequest,
};

// Engine types
pub use engine::{DeviceConfig, Engine, EngineOptions, EngineState, EngineStats};

// Error types
pub use error::{DecodeError, DispatchError, EncodeError, Error, FrameTooLarge, Result};

// Protocol types
pub use protocol::{DecodedMessage, OutboundCommand, PayloadPolicy};

// Transport types
pub use transport::Transport;

// Widget types
pub use widgets::{Color, MessageSender, Responder, Widget, WidgetKind};
