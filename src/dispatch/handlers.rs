//! Handler registration table.
//!
//! One optional handler per event family. Registering a handler replaces
//! any previous one for that family; an empty slot turns the event into a
//! no-op.
//!
//! Every handler also gets a [`Responder`], so it can answer a request or
//! drive display widgets while the event is being handled:
//!
//! ```ignore
//! engine.handlers_mut().on_switch(|event, out| {
//!     let mirrored = out
//!         .led("pump_led")
//!         .and_then(|mut led| led.set_state(event.is_on, 1.0).map(|_| ()));
//!     if let Err(e) = mirrored {
//!         tracing::warn!(error = %e, "LED not updated");
//!     }
//! });
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use tracing::trace;

use super::WidgetEvent;
use super::events::{
    AdvancedButtonEvent, DirectionPadEvent, EmergencyButtonEvent, HorizontalSliderEvent,
    JoystickEvent, SegmentedSwitchEvent, SimpleButtonEvent, SwitchEvent, VerticalSliderEvent,
    WidgetRequest,
};
use crate::protocol::DecodedMessage;
use crate::widgets::Responder;

// ============================================================================
// DispatchOutcome
// ============================================================================

/// Result of dispatching one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A registered handler ran.
    Handled,
    /// The event was recognized but no handler is registered.
    Unhandled,
    /// The message did not map to any event and was dropped.
    Dropped,
}

// ============================================================================
// Handlers
// ============================================================================

macro_rules! handlers {
    ($( $(#[$meta:meta])* $method:ident => $field:ident : $event:ident, )*) => {
        /// Per-family handler table.
        #[derive(Default)]
        pub struct Handlers {
            $(
                $field: Option<Box<dyn for<'e, 'r> FnMut(&$event<'e>, &mut Responder<'r>) + Send>>,
            )*
        }

        impl Handlers {
            $(
                $(#[$meta])*
                pub fn $method<F>(&mut self, handler: F) -> &mut Self
                where
                    F: for<'e, 'r> FnMut(&$event<'e>, &mut Responder<'r>) + Send + 'static,
                {
                    self.$field = Some(Box::new(handler));
                    self
                }
            )*

            /// Returns the slot names that have a handler registered.
            #[must_use]
            pub fn registered(&self) -> Vec<&'static str> {
                let mut names = Vec::new();
                $(
                    if self.$field.is_some() {
                        names.push(stringify!($field));
                    }
                )*
                names
            }

            /// Removes every registered handler.
            pub fn clear(&mut self) {
                $( self.$field = None; )*
            }
        }
    };
}

handlers! {
    /// Registers the `simplebutton` handler.
    on_simple_button => simple_button: SimpleButtonEvent,
    /// Registers the `advancedbutton` handler.
    on_advanced_button => advanced_button: AdvancedButtonEvent,
    /// Registers the `emergencybutton` handler.
    on_emergency_button => emergency_button: EmergencyButtonEvent,
    /// Registers the `horizontalslider` handler.
    on_horizontal_slider => horizontal_slider: HorizontalSliderEvent,
    /// Registers the `verticalslider` handler.
    on_vertical_slider => vertical_slider: VerticalSliderEvent,
    /// Registers the `switch` handler.
    on_switch => switch: SwitchEvent,
    /// Registers the `joystick` handler.
    on_joystick => joystick: JoystickEvent,
    /// Registers the `directionpad` handler.
    on_direction_pad => direction_pad: DirectionPadEvent,
    /// Registers the `segmentedswitch` handler.
    on_segmented_switch => segmented_switch: SegmentedSwitchEvent,
    /// Registers the handler for `request`/`refresh` on other widget types.
    on_widget_request => widget_request: WidgetRequest,
}

impl Handlers {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies `msg` and invokes at most one handler, lending it `out`.
    ///
    /// Messages that do not classify are dropped and logged at trace level.
    pub fn dispatch(&mut self, msg: &DecodedMessage, out: &mut Responder<'_>) -> DispatchOutcome {
        match WidgetEvent::classify(msg) {
            Ok(event) => self.invoke(&event, out),
            Err(e) => {
                trace!(
                    widget_id = %msg.widget_id,
                    widget_type = %msg.widget_type,
                    event = %msg.event,
                    error = %e,
                    "Event dropped"
                );
                DispatchOutcome::Dropped
            }
        }
    }

    /// Invokes the handler for an already classified event.
    pub fn invoke(&mut self, event: &WidgetEvent<'_>, out: &mut Responder<'_>) -> DispatchOutcome {
        macro_rules! call {
            ($slot:expr, $event:expr) => {
                match $slot.as_mut() {
                    Some(handler) => {
                        handler($event, &mut *out);
                        DispatchOutcome::Handled
                    }
                    None => DispatchOutcome::Unhandled,
                }
            };
        }

        let outcome = match event {
            WidgetEvent::SimpleButton(e) => call!(&mut self.simple_button, e),
            WidgetEvent::AdvancedButton(e) => call!(&mut self.advanced_button, e),
            WidgetEvent::EmergencyButton(e) => call!(&mut self.emergency_button, e),
            WidgetEvent::HorizontalSlider(e) => call!(&mut self.horizontal_slider, e),
            WidgetEvent::VerticalSlider(e) => call!(&mut self.vertical_slider, e),
            WidgetEvent::Switch(e) => call!(&mut self.switch, e),
            WidgetEvent::Joystick(e) => call!(&mut self.joystick, e),
            WidgetEvent::DirectionPad(e) => call!(&mut self.direction_pad, e),
            WidgetEvent::SegmentedSwitch(e) => call!(&mut self.segmented_switch, e),
            WidgetEvent::Request(e) => call!(&mut self.widget_request, e),
        };

        if outcome == DispatchOutcome::Unhandled {
            trace!(widget_id = event.widget_id(), "No handler registered");
        }
        outcome
    }
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field("registered", &self.registered())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;

    use crate::dispatch::SwitchEventKind;
    use crate::protocol::decode;
    use crate::widgets::WidgetRegistry;
    use crate::widgets::testing::RecordingSender;

    fn dispatch(handlers: &mut Handlers, msg: &DecodedMessage) -> DispatchOutcome {
        let mut sender = RecordingSender::default();
        let mut registry = WidgetRegistry::new();
        handlers.dispatch(msg, &mut Responder::new(&mut sender, &mut registry))
    }

    #[test]
    fn test_dispatch_invokes_registered_handler() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut handlers = Handlers::new();
        handlers.on_switch(move |event, _| {
            sink.lock().push((event.widget_id.to_string(), event.kind, event.is_on));
        });

        let msg = decode(br#"{"widgetId":"sw1","type":"switch","event":"turnon"}"#).expect("decode");
        assert_eq!(dispatch(&mut handlers, &msg), DispatchOutcome::Handled);
        assert_eq!(
            *seen.lock(),
            vec![("sw1".to_string(), SwitchEventKind::TurnOn, true)]
        );
    }

    #[test]
    fn test_unknown_event_calls_nothing() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut handlers = Handlers::new();
        handlers.on_switch(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let msg = decode(br#"{"widgetId":"sw1","type":"switch","event":"bogus"}"#).expect("decode");
        assert_eq!(dispatch(&mut handlers, &msg), DispatchOutcome::Dropped);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unregistered_slot_is_noop() {
        let mut handlers = Handlers::new();
        let msg = DecodedMessage::new("b1", "simplebutton", "press");
        assert_eq!(dispatch(&mut handlers, &msg), DispatchOutcome::Unhandled);
    }

    #[test]
    fn test_only_matching_family_runs() {
        let calls = Arc::new(AtomicUsize::new(0));
        let buttons = Arc::clone(&calls);

        let mut handlers = Handlers::new();
        handlers
            .on_simple_button(move |_, _| {
                buttons.fetch_add(1, Ordering::SeqCst);
            })
            .on_advanced_button(|_, _| panic!("wrong family"));

        let msg = DecodedMessage::new("b1", "simplebutton", "longpress");
        assert_eq!(dispatch(&mut handlers, &msg), DispatchOutcome::Handled);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_register_replaces_previous() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut handlers = Handlers::new();
        handlers.on_joystick(|_, _| panic!("replaced handler ran"));
        handlers.on_joystick(move |event, _| {
            assert!(event.is_position_changed());
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let msg = DecodedMessage::new("joy", "joystick", "positionchanged");
        dispatch(&mut handlers, &msg);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_widget_request_handler() {
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);

        let mut handlers = Handlers::new();
        handlers.on_widget_request(move |req, _| {
            *sink.lock() = Some((req.widget_id.to_string(), req.is_refresh()));
        });

        let msg = DecodedMessage::new("gauge1", "gauge", "request");
        assert_eq!(dispatch(&mut handlers, &msg), DispatchOutcome::Handled);
        assert_eq!(*seen.lock(), Some(("gauge1".to_string(), false)));
    }

    #[test]
    fn test_request_handler_replies() {
        let mut handlers = Handlers::new();
        handlers.on_widget_request(|req, out| {
            if req.is_refresh() {
                out.gauge(req.widget_id)
                    .expect("gauge")
                    .set_value(42.0)
                    .expect("reply");
            }
        });

        let mut sender = RecordingSender::default();
        let mut registry = WidgetRegistry::new();
        let msg = DecodedMessage::new("temp", "gauge", "refresh");
        let outcome = handlers.dispatch(&msg, &mut Responder::new(&mut sender, &mut registry));

        assert_eq!(outcome, DispatchOutcome::Handled);
        assert_eq!(
            sender.sent,
            vec![(
                "temp".to_string(),
                "gauge".to_string(),
                "setvalue".to_string(),
                Some(r#"{"value":42.00}"#.to_string())
            )]
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registered_and_clear() {
        let mut handlers = Handlers::new();
        handlers.on_switch(|_, _| {}).on_direction_pad(|_, _| {});
        assert_eq!(handlers.registered(), vec!["switch", "direction_pad"]);

        handlers.clear();
        assert!(handlers.registered().is_empty());
    }
}
