//! Event dispatch: decoded messages to typed handler calls.
//!
//! Dispatch runs in two steps. [`WidgetEvent::classify`] maps a
//! [`DecodedMessage`] to a typed event (or a [`DispatchError`] explaining why
//! not), and [`Handlers::dispatch`] invokes the handler registered for that
//! event's family, lending it a [`Responder`](crate::Responder) for replies.
//!
//! Unrecognized families and events are dropped without surfacing an error,
//! so firmware keeps working when the app grows new widgets.
//!
//! # Example
//!
//! ```ignore
//! let mut handlers = Handlers::new();
//! handlers.on_switch(|event, _| {
//!     if event.switched_on() {
//!         relay.close();
//!     }
//! });
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `events` | Typed event structs and kind enums |
//! | `handlers` | Handler registration table |

// ============================================================================
// Submodules
// ============================================================================

/// Typed widget events.
pub mod events;

/// Handler registration table.
pub mod handlers;

// ============================================================================
// Re-exports
// ============================================================================

pub use events::{
    AdvancedButtonEvent, ButtonEventKind, DPadButton, DPadEventKind, DirectionPadEvent,
    EmergencyButtonEvent, EmergencyEventKind, HorizontalSliderEvent, JoystickEvent,
    JoystickEventKind, SegmentedEventKind, SegmentedSwitchEvent, SimpleButtonEvent,
    SliderEventKind, SwitchEvent, SwitchEventKind, VerticalSliderEvent, WidgetRequest,
};
pub use handlers::{DispatchOutcome, Handlers};

// ============================================================================
// Imports
// ============================================================================

use crate::error::DispatchError;
use crate::protocol::DecodedMessage;

// ============================================================================
// Family
// ============================================================================

/// Control family an inbound event can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// `simplebutton`
    SimpleButton,
    /// `advancedbutton`
    AdvancedButton,
    /// `emergencybutton`
    EmergencyButton,
    /// `horizontalslider`
    HorizontalSlider,
    /// `verticalslider`
    VerticalSlider,
    /// `switch`
    Switch,
    /// `joystick`
    Joystick,
    /// `directionpad`
    DirectionPad,
    /// `segmentedswitch`
    SegmentedSwitch,
}

impl Family {
    /// Parses a wire widget type. Matching is case-sensitive.
    #[must_use]
    pub fn from_wire(widget_type: &str) -> Option<Self> {
        match widget_type {
            "simplebutton" => Some(Self::SimpleButton),
            "advancedbutton" => Some(Self::AdvancedButton),
            "emergencybutton" => Some(Self::EmergencyButton),
            "horizontalslider" => Some(Self::HorizontalSlider),
            "verticalslider" => Some(Self::VerticalSlider),
            "switch" => Some(Self::Switch),
            "joystick" => Some(Self::Joystick),
            "directionpad" => Some(Self::DirectionPad),
            "segmentedswitch" => Some(Self::SegmentedSwitch),
            _ => None,
        }
    }

    /// Returns the wire widget type.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SimpleButton => "simplebutton",
            Self::AdvancedButton => "advancedbutton",
            Self::EmergencyButton => "emergencybutton",
            Self::HorizontalSlider => "horizontalslider",
            Self::VerticalSlider => "verticalslider",
            Self::Switch => "switch",
            Self::Joystick => "joystick",
            Self::DirectionPad => "directionpad",
            Self::SegmentedSwitch => "segmentedswitch",
        }
    }
}

// ============================================================================
// WidgetEvent
// ============================================================================

/// A classified inbound event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidgetEvent<'a> {
    /// Simple button interaction.
    SimpleButton(SimpleButtonEvent<'a>),
    /// Advanced button interaction.
    AdvancedButton(AdvancedButtonEvent<'a>),
    /// Emergency button interaction.
    EmergencyButton(EmergencyButtonEvent<'a>),
    /// Horizontal slider movement.
    HorizontalSlider(HorizontalSliderEvent<'a>),
    /// Vertical slider movement.
    VerticalSlider(VerticalSliderEvent<'a>),
    /// Switch change.
    Switch(SwitchEvent<'a>),
    /// Joystick movement.
    Joystick(JoystickEvent<'a>),
    /// Direction pad button.
    DirectionPad(DirectionPadEvent<'a>),
    /// Segmented switch selection.
    SegmentedSwitch(SegmentedSwitchEvent<'a>),
    /// Refresh request for a widget of any other type.
    Request(WidgetRequest<'a>),
}

impl<'a> WidgetEvent<'a> {
    /// Maps a decoded message to a typed event.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::UnrecognizedEvent`] if the family is known but the
    ///   event name is not
    /// - [`DispatchError::UnrecognizedFamily`] if the widget type is unknown
    ///   and the event is neither `request` nor `refresh`
    pub fn classify(msg: &'a DecodedMessage) -> Result<Self, DispatchError> {
        let Some(family) = Family::from_wire(&msg.widget_type) else {
            return match msg.event.as_str() {
                "request" | "refresh" => Ok(Self::Request(WidgetRequest {
                    widget_id: &msg.widget_id,
                    widget_type: &msg.widget_type,
                    request_type: &msg.event,
                })),
                _ => Err(DispatchError::UnrecognizedFamily {
                    widget_type: msg.widget_type.clone(),
                }),
            };
        };

        let unrecognized = || DispatchError::UnrecognizedEvent {
            family: family.as_str(),
            event: msg.event.clone(),
        };
        let widget_id = msg.widget_id.as_str();
        let event = msg.event.as_str();

        let classified = match family {
            Family::SimpleButton => Self::SimpleButton(SimpleButtonEvent {
                widget_id,
                kind: ButtonEventKind::from_wire(event).ok_or_else(unrecognized)?,
                is_on: msg.param_bool("isOn", false),
            }),

            Family::AdvancedButton => Self::AdvancedButton(AdvancedButtonEvent {
                widget_id,
                kind: ButtonEventKind::from_wire(event).ok_or_else(unrecognized)?,
                is_on: msg.param_bool("isOn", false),
            }),

            Family::EmergencyButton => Self::EmergencyButton(EmergencyButtonEvent {
                widget_id,
                kind: EmergencyEventKind::from_wire(event).ok_or_else(unrecognized)?,
            }),

            Family::HorizontalSlider => Self::HorizontalSlider(HorizontalSliderEvent {
                widget_id,
                kind: SliderEventKind::from_wire(event).ok_or_else(unrecognized)?,
                value: msg.param_f32("value", 0.0),
                start_value: msg.param_f32("startValue", 0.0),
                final_value: msg.param_f32("finalValue", 0.0),
            }),

            Family::VerticalSlider => Self::VerticalSlider(VerticalSliderEvent {
                widget_id,
                kind: SliderEventKind::from_wire(event).ok_or_else(unrecognized)?,
                value: msg.param_f32("value", 0.0),
                start_value: msg.param_f32("startValue", 0.0),
                final_value: msg.param_f32("finalValue", 0.0),
            }),

            Family::Switch => {
                let kind = SwitchEventKind::from_wire(event).ok_or_else(unrecognized)?;
                let is_on = match kind {
                    SwitchEventKind::TurnOn => true,
                    SwitchEventKind::TurnOff => false,
                    SwitchEventKind::Toggle | SwitchEventKind::SetValue => {
                        msg.param_bool("isOn", false)
                    }
                };
                Self::Switch(SwitchEvent {
                    widget_id,
                    kind,
                    is_on,
                })
            }

            Family::Joystick => {
                let kind = JoystickEventKind::from_wire(event).ok_or_else(unrecognized)?;
                let (x, y) = match kind {
                    JoystickEventKind::Released => (0.0, 0.0),
                    JoystickEventKind::PositionChanged => {
                        (msg.param_f32("x", 0.0), msg.param_f32("y", 0.0))
                    }
                };
                Self::Joystick(JoystickEvent { widget_id, kind, x, y })
            }

            Family::DirectionPad => {
                let kind = DPadEventKind::from_wire(event).ok_or_else(unrecognized)?;
                let button_name = msg.param("button").unwrap_or_default();
                Self::DirectionPad(DirectionPadEvent {
                    widget_id,
                    button: DPadButton::from_wire(button_name),
                    kind,
                    button_name,
                })
            }

            Family::SegmentedSwitch => Self::SegmentedSwitch(SegmentedSwitchEvent {
                widget_id,
                kind: SegmentedEventKind::from_wire(event).ok_or_else(unrecognized)?,
                selected_index: msg.param_i32("index", -1),
                segment_id: msg.param("segmentId"),
                selected_ids: msg.param("indices"),
                count: msg.param_i32("count", 0),
            }),
        };

        Ok(classified)
    }

    /// Returns the originating widget id.
    #[must_use]
    pub fn widget_id(&self) -> &'a str {
        match self {
            Self::SimpleButton(e) => e.widget_id,
            Self::AdvancedButton(e) => e.widget_id,
            Self::EmergencyButton(e) => e.widget_id,
            Self::HorizontalSlider(e) => e.widget_id,
            Self::VerticalSlider(e) => e.widget_id,
            Self::Switch(e) => e.widget_id,
            Self::Joystick(e) => e.widget_id,
            Self::DirectionPad(e) => e.widget_id,
            Self::SegmentedSwitch(e) => e.widget_id,
            Self::Request(e) => e.widget_id,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::protocol::decode;

    fn classify_frame(frame: &str) -> (DecodedMessage, Result<(), DispatchError>) {
        let msg = decode(frame.as_bytes()).expect("decode");
        let result = WidgetEvent::classify(&msg).map(|_| ());
        (msg, result)
    }

    #[test]
    fn test_family_round_trip() {
        for family in [
            Family::SimpleButton,
            Family::AdvancedButton,
            Family::EmergencyButton,
            Family::HorizontalSlider,
            Family::VerticalSlider,
            Family::Switch,
            Family::Joystick,
            Family::DirectionPad,
            Family::SegmentedSwitch,
        ] {
            assert_eq!(Family::from_wire(family.as_str()), Some(family));
        }
        assert_eq!(Family::from_wire("Switch"), None);
    }

    #[test]
    fn test_switch_turnon_forces_on() {
        let msg = DecodedMessage::new("sw1", "switch", "turnon").with_param("isOn", "false");
        let event = WidgetEvent::classify(&msg).expect("classify");

        let WidgetEvent::Switch(sw) = event else {
            panic!("expected switch event, got {event:?}");
        };
        assert_eq!(sw.kind, SwitchEventKind::TurnOn);
        assert!(sw.is_on);
        assert_eq!(sw.widget_id, "sw1");
    }

    #[test]
    fn test_switch_toggle_without_payload_is_off() {
        let msg = DecodedMessage::new("sw1", "switch", "toggle");
        let Ok(WidgetEvent::Switch(sw)) = WidgetEvent::classify(&msg) else {
            panic!("expected switch event");
        };
        assert_eq!(sw.kind, SwitchEventKind::Toggle);
        assert!(!sw.is_on);
    }

    #[test]
    fn test_switch_setvalue_reads_payload() {
        let msg = DecodedMessage::new("sw1", "switch", "setvalue").with_param("isOn", "true");
        let Ok(WidgetEvent::Switch(sw)) = WidgetEvent::classify(&msg) else {
            panic!("expected switch event");
        };
        assert!(sw.is_on);
        assert!(sw.switched_on());
    }

    #[test]
    fn test_unknown_event_for_known_family() {
        let (_, result) = classify_frame(r#"{"widgetId":"sw1","type":"switch","event":"bogus"}"#);
        assert_eq!(
            result,
            Err(DispatchError::UnrecognizedEvent {
                family: "switch",
                event: "bogus".into()
            })
        );
    }

    #[test]
    fn test_joystick_release_zeroes_axes() {
        let msg = decode(
            br#"{"widgetId":"joy","type":"joystick","event":"released","payload":{"x":0.7,"y":-0.3}}"#,
        )
        .expect("decode");
        let Ok(WidgetEvent::Joystick(joy)) = WidgetEvent::classify(&msg) else {
            panic!("expected joystick event");
        };
        assert!(joy.is_released());
        assert_eq!((joy.x, joy.y), (0.0, 0.0));
    }

    #[test]
    fn test_joystick_position() {
        let msg = DecodedMessage::new("joy", "joystick", "positionchanged")
            .with_param("x", "0.5")
            .with_param("y", "-0.25");
        let Ok(WidgetEvent::Joystick(joy)) = WidgetEvent::classify(&msg) else {
            panic!("expected joystick event");
        };
        assert_eq!((joy.x, joy.y), (0.5, -0.25));
    }

    #[test]
    fn test_segmented_switch_fields() {
        let msg = decode(
            br#"{"widgetId":"seg","type":"segmentedswitch","event":"selectionchanged","payload":{"index":2,"indices":"0,2","count":3}}"#,
        )
        .expect("decode");
        let Ok(WidgetEvent::SegmentedSwitch(seg)) = WidgetEvent::classify(&msg) else {
            panic!("expected segmented switch event");
        };
        assert_eq!(seg.selected_index, 2);
        assert_eq!(seg.selected_ids, Some("0,2"));
        assert_eq!(seg.count, 3);
        assert_eq!(seg.segment_id, None);
    }

    #[test]
    fn test_segmented_switch_defaults() {
        let msg = DecodedMessage::new("seg", "segmentedswitch", "segmentselected");
        let Ok(WidgetEvent::SegmentedSwitch(seg)) = WidgetEvent::classify(&msg) else {
            panic!("expected segmented switch event");
        };
        assert_eq!(seg.selected_index, -1);
        assert_eq!(seg.count, 0);
    }

    #[test]
    fn test_direction_pad_unknown_button() {
        let msg = DecodedMessage::new("pad", "directionpad", "buttonpressed")
            .with_param("button", "northeast");
        let Ok(WidgetEvent::DirectionPad(pad)) = WidgetEvent::classify(&msg) else {
            panic!("expected direction pad event");
        };
        assert_eq!(pad.button, DPadButton::Unknown);
        assert_eq!(pad.button_name, "northeast");
        assert!(pad.is_press());
    }

    #[test]
    fn test_slider_fields() {
        let msg = DecodedMessage::new("s1", "verticalslider", "dragended")
            .with_param("startValue", "10")
            .with_param("finalValue", "30.5");
        let Ok(WidgetEvent::VerticalSlider(slider)) = WidgetEvent::classify(&msg) else {
            panic!("expected slider event");
        };
        assert!(slider.is_drag_ended());
        assert_eq!(slider.value, 0.0);
        assert_eq!(slider.start_value, 10.0);
        assert_eq!(slider.final_value, 30.5);
    }

    #[test]
    fn test_request_for_unknown_family() {
        let msg = DecodedMessage::new("g1", "gauge", "refresh");
        let Ok(WidgetEvent::Request(req)) = WidgetEvent::classify(&msg) else {
            panic!("expected request");
        };
        assert_eq!(req.widget_type, "gauge");
        assert!(req.is_refresh());
        assert_eq!(WidgetEvent::Request(req).widget_id(), "g1");
    }

    #[test]
    fn test_unknown_family_dropped() {
        let msg = DecodedMessage::new("x", "hologram", "spin");
        assert_eq!(
            WidgetEvent::classify(&msg),
            Err(DispatchError::UnrecognizedFamily {
                widget_type: "hologram".into()
            })
        );
    }

    #[test]
    fn test_known_family_request_is_not_generic() {
        // A known family never falls back to the generic request.
        let msg = DecodedMessage::new("sw1", "switch", "request");
        assert!(matches!(
            WidgetEvent::classify(&msg),
            Err(DispatchError::UnrecognizedEvent { .. })
        ));
    }
}
