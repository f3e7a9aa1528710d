//! Typed widget events.
//!
//! Each control family the app can send events for has one event struct.
//! Events borrow the widget id from the [`DecodedMessage`] they were built
//! from and live only for the duration of the handler call.
//!
//! # Families
//!
//! | Wire type | Event | Kinds |
//! |-----------|-------|-------|
//! | `simplebutton` | [`SimpleButtonEvent`] | press, release, longpress, toggle |
//! | `advancedbutton` | [`AdvancedButtonEvent`] | press, release, longpress, toggle |
//! | `emergencybutton` | [`EmergencyButtonEvent`] | trigger, reset |
//! | `horizontalslider` | [`HorizontalSliderEvent`] | valuechanging, valuechanged, dragstarted, dragended |
//! | `verticalslider` | [`VerticalSliderEvent`] | same as horizontal |
//! | `switch` | [`SwitchEvent`] | turnon, turnoff, toggle, setvalue |
//! | `joystick` | [`JoystickEvent`] | positionchanged, released |
//! | `directionpad` | [`DirectionPadEvent`] | buttonpressed, buttonreleased, buttonlongpressed |
//! | `segmentedswitch` | [`SegmentedSwitchEvent`] | selectionchanged, segmentselected, segmentdeselected |
//! | any other | [`WidgetRequest`] | request, refresh |
//!
//! [`DecodedMessage`]: crate::protocol::DecodedMessage

// ============================================================================
// Buttons
// ============================================================================

/// Kind of a simple or advanced button event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEventKind {
    /// Button pressed.
    Press,
    /// Button released.
    Release,
    /// Button held past the long-press delay.
    LongPress,
    /// Toggle-mode button changed state.
    Toggle,
}

impl ButtonEventKind {
    /// Parses a wire event name.
    #[must_use]
    pub fn from_wire(event: &str) -> Option<Self> {
        match event {
            "press" => Some(Self::Press),
            "release" => Some(Self::Release),
            "longpress" => Some(Self::LongPress),
            "toggle" => Some(Self::Toggle),
            _ => None,
        }
    }
}

macro_rules! button_event {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub struct $name<'a> {
            /// Originating widget.
            pub widget_id: &'a str,
            /// What happened.
            pub kind: ButtonEventKind,
            /// Toggle state reported by the app (false when absent).
            pub is_on: bool,
        }

        impl $name<'_> {
            /// Returns `true` for a press.
            #[inline]
            #[must_use]
            pub fn is_press(&self) -> bool {
                self.kind == ButtonEventKind::Press
            }

            /// Returns `true` for a release.
            #[inline]
            #[must_use]
            pub fn is_release(&self) -> bool {
                self.kind == ButtonEventKind::Release
            }

            /// Returns `true` for a long press.
            #[inline]
            #[must_use]
            pub fn is_long_press(&self) -> bool {
                self.kind == ButtonEventKind::LongPress
            }

            /// Returns `true` for a toggle.
            #[inline]
            #[must_use]
            pub fn is_toggle(&self) -> bool {
                self.kind == ButtonEventKind::Toggle
            }
        }
    };
}

button_event! {
    /// Event from a `simplebutton` widget.
    SimpleButtonEvent
}

button_event! {
    /// Event from an `advancedbutton` widget.
    AdvancedButtonEvent
}

// ============================================================================
// Emergency Button
// ============================================================================

/// Kind of an emergency button event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmergencyEventKind {
    /// Emergency stop engaged.
    Trigger,
    /// Emergency stop cleared.
    Reset,
}

impl EmergencyEventKind {
    /// Parses a wire event name.
    #[must_use]
    pub fn from_wire(event: &str) -> Option<Self> {
        match event {
            "trigger" => Some(Self::Trigger),
            "reset" => Some(Self::Reset),
            _ => None,
        }
    }
}

/// Event from an `emergencybutton` widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmergencyButtonEvent<'a> {
    /// Originating widget.
    pub widget_id: &'a str,
    /// What happened.
    pub kind: EmergencyEventKind,
}

impl EmergencyButtonEvent<'_> {
    /// Returns `true` when the stop was engaged.
    #[inline]
    #[must_use]
    pub fn is_trigger(&self) -> bool {
        self.kind == EmergencyEventKind::Trigger
    }

    /// Returns `true` when the stop was cleared.
    #[inline]
    #[must_use]
    pub fn is_reset(&self) -> bool {
        self.kind == EmergencyEventKind::Reset
    }
}

// ============================================================================
// Sliders
// ============================================================================

/// Kind of a slider event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderEventKind {
    /// Value moving during a drag.
    ValueChanging,
    /// Value committed.
    ValueChanged,
    /// Drag began.
    DragStarted,
    /// Drag finished.
    DragEnded,
}

impl SliderEventKind {
    /// Parses a wire event name.
    #[must_use]
    pub fn from_wire(event: &str) -> Option<Self> {
        match event {
            "valuechanging" => Some(Self::ValueChanging),
            "valuechanged" => Some(Self::ValueChanged),
            "dragstarted" => Some(Self::DragStarted),
            "dragended" => Some(Self::DragEnded),
            _ => None,
        }
    }
}

macro_rules! slider_event {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub struct $name<'a> {
            /// Originating widget.
            pub widget_id: &'a str,
            /// What happened.
            pub kind: SliderEventKind,
            /// Current value.
            pub value: f32,
            /// Value when the drag started.
            pub start_value: f32,
            /// Value when the drag ended.
            pub final_value: f32,
        }

        impl $name<'_> {
            /// Returns `true` while the value is moving.
            #[inline]
            #[must_use]
            pub fn is_value_changing(&self) -> bool {
                self.kind == SliderEventKind::ValueChanging
            }

            /// Returns `true` when the value was committed.
            #[inline]
            #[must_use]
            pub fn is_value_changed(&self) -> bool {
                self.kind == SliderEventKind::ValueChanged
            }

            /// Returns `true` when a drag began.
            #[inline]
            #[must_use]
            pub fn is_drag_started(&self) -> bool {
                self.kind == SliderEventKind::DragStarted
            }

            /// Returns `true` when a drag finished.
            #[inline]
            #[must_use]
            pub fn is_drag_ended(&self) -> bool {
                self.kind == SliderEventKind::DragEnded
            }
        }
    };
}

slider_event! {
    /// Event from a `horizontalslider` widget.
    HorizontalSliderEvent
}

slider_event! {
    /// Event from a `verticalslider` widget.
    VerticalSliderEvent
}

// ============================================================================
// Switch
// ============================================================================

/// Kind of a switch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchEventKind {
    /// Switched on.
    TurnOn,
    /// Switched off.
    TurnOff,
    /// Flipped.
    Toggle,
    /// State set explicitly.
    SetValue,
}

impl SwitchEventKind {
    /// Parses a wire event name.
    #[must_use]
    pub fn from_wire(event: &str) -> Option<Self> {
        match event {
            "turnon" => Some(Self::TurnOn),
            "turnoff" => Some(Self::TurnOff),
            "toggle" => Some(Self::Toggle),
            "setvalue" => Some(Self::SetValue),
            _ => None,
        }
    }
}

/// Event from a `switch` widget.
///
/// `TurnOn` and `TurnOff` always carry `is_on` true and false respectively,
/// whatever the payload said.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchEvent<'a> {
    /// Originating widget.
    pub widget_id: &'a str,
    /// What happened.
    pub kind: SwitchEventKind,
    /// Resulting switch state.
    pub is_on: bool,
}

impl SwitchEvent<'_> {
    /// Returns `true` for an explicit turn-on.
    #[inline]
    #[must_use]
    pub fn is_turn_on(&self) -> bool {
        self.kind == SwitchEventKind::TurnOn
    }

    /// Returns `true` for an explicit turn-off.
    #[inline]
    #[must_use]
    pub fn is_turn_off(&self) -> bool {
        self.kind == SwitchEventKind::TurnOff
    }

    /// Returns `true` for a toggle.
    #[inline]
    #[must_use]
    pub fn is_toggle(&self) -> bool {
        self.kind == SwitchEventKind::Toggle
    }

    /// Returns `true` for an explicit set.
    #[inline]
    #[must_use]
    pub fn is_set_value(&self) -> bool {
        self.kind == SwitchEventKind::SetValue
    }

    /// Returns `true` if the switch ended up on (turn-on, or set to on).
    #[inline]
    #[must_use]
    pub fn switched_on(&self) -> bool {
        self.is_turn_on() || (self.is_set_value() && self.is_on)
    }

    /// Returns `true` if the switch ended up off (turn-off, or set to off).
    #[inline]
    #[must_use]
    pub fn switched_off(&self) -> bool {
        self.is_turn_off() || (self.is_set_value() && !self.is_on)
    }
}

// ============================================================================
// Joystick
// ============================================================================

/// Kind of a joystick event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoystickEventKind {
    /// Stick moved.
    PositionChanged,
    /// Stick let go; position is reported as the origin.
    Released,
}

impl JoystickEventKind {
    /// Parses a wire event name.
    #[must_use]
    pub fn from_wire(event: &str) -> Option<Self> {
        match event {
            "positionchanged" => Some(Self::PositionChanged),
            "released" => Some(Self::Released),
            _ => None,
        }
    }
}

/// Event from a `joystick` widget. Axes range from -1.0 to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoystickEvent<'a> {
    /// Originating widget.
    pub widget_id: &'a str,
    /// What happened.
    pub kind: JoystickEventKind,
    /// Horizontal axis.
    pub x: f32,
    /// Vertical axis.
    pub y: f32,
}

impl JoystickEvent<'_> {
    /// Returns `true` when the stick moved.
    #[inline]
    #[must_use]
    pub fn is_position_changed(&self) -> bool {
        self.kind == JoystickEventKind::PositionChanged
    }

    /// Returns `true` when the stick was released.
    #[inline]
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.kind == JoystickEventKind::Released
    }

    /// Distance from the origin.
    #[inline]
    #[must_use]
    pub fn magnitude(&self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Direction in degrees, counter-clockwise from the positive x axis.
    #[inline]
    #[must_use]
    pub fn angle(&self) -> f32 {
        self.y.atan2(self.x).to_degrees()
    }
}

// ============================================================================
// Direction Pad
// ============================================================================

/// Button of a direction pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DPadButton {
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Center button.
    Center,
    /// Button name not recognized (or absent).
    Unknown,
}

impl DPadButton {
    /// Parses a wire button name; unknown names map to [`DPadButton::Unknown`].
    #[must_use]
    pub fn from_wire(name: &str) -> Self {
        match name {
            "up" => Self::Up,
            "down" => Self::Down,
            "left" => Self::Left,
            "right" => Self::Right,
            "center" => Self::Center,
            _ => Self::Unknown,
        }
    }
}

/// Kind of a direction pad event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DPadEventKind {
    /// Button pressed.
    Press,
    /// Button released.
    Release,
    /// Button held.
    LongPress,
}

impl DPadEventKind {
    /// Parses a wire event name.
    #[must_use]
    pub fn from_wire(event: &str) -> Option<Self> {
        match event {
            "buttonpressed" => Some(Self::Press),
            "buttonreleased" => Some(Self::Release),
            "buttonlongpressed" => Some(Self::LongPress),
            _ => None,
        }
    }
}

/// Event from a `directionpad` widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionPadEvent<'a> {
    /// Originating widget.
    pub widget_id: &'a str,
    /// Which button.
    pub button: DPadButton,
    /// What happened.
    pub kind: DPadEventKind,
    /// Button name as sent (empty when absent).
    pub button_name: &'a str,
}

impl DirectionPadEvent<'_> {
    /// Returns `true` for a press.
    #[inline]
    #[must_use]
    pub fn is_press(&self) -> bool {
        self.kind == DPadEventKind::Press
    }

    /// Returns `true` for a release.
    #[inline]
    #[must_use]
    pub fn is_release(&self) -> bool {
        self.kind == DPadEventKind::Release
    }

    /// Returns `true` for a long press.
    #[inline]
    #[must_use]
    pub fn is_long_press(&self) -> bool {
        self.kind == DPadEventKind::LongPress
    }

    /// Returns `true` for the up button.
    #[inline]
    #[must_use]
    pub fn is_up(&self) -> bool {
        self.button == DPadButton::Up
    }

    /// Returns `true` for the down button.
    #[inline]
    #[must_use]
    pub fn is_down(&self) -> bool {
        self.button == DPadButton::Down
    }

    /// Returns `true` for the left button.
    #[inline]
    #[must_use]
    pub fn is_left(&self) -> bool {
        self.button == DPadButton::Left
    }

    /// Returns `true` for the right button.
    #[inline]
    #[must_use]
    pub fn is_right(&self) -> bool {
        self.button == DPadButton::Right
    }

    /// Returns `true` for the center button.
    #[inline]
    #[must_use]
    pub fn is_center(&self) -> bool {
        self.button == DPadButton::Center
    }
}

// ============================================================================
// Segmented Switch
// ============================================================================

/// Kind of a segmented switch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentedEventKind {
    /// Selection changed (single select).
    SelectionChanged,
    /// Segment added to the selection (multi select).
    SegmentSelected,
    /// Segment removed from the selection (multi select).
    SegmentDeselected,
}

impl SegmentedEventKind {
    /// Parses a wire event name.
    #[must_use]
    pub fn from_wire(event: &str) -> Option<Self> {
        match event {
            "selectionchanged" => Some(Self::SelectionChanged),
            "segmentselected" => Some(Self::SegmentSelected),
            "segmentdeselected" => Some(Self::SegmentDeselected),
            _ => None,
        }
    }
}

/// Event from a `segmentedswitch` widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentedSwitchEvent<'a> {
    /// Originating widget.
    pub widget_id: &'a str,
    /// What happened.
    pub kind: SegmentedEventKind,
    /// Selected segment index, -1 when absent. Wire key `index`.
    pub selected_index: i32,
    /// Segment concerned by the event. Wire key `segmentId`.
    pub segment_id: Option<&'a str>,
    /// Comma separated selected indices. Wire key `indices`.
    pub selected_ids: Option<&'a str>,
    /// Number of selected segments.
    pub count: i32,
}

impl SegmentedSwitchEvent<'_> {
    /// Returns `true` for a selection change.
    #[inline]
    #[must_use]
    pub fn is_selection_changed(&self) -> bool {
        self.kind == SegmentedEventKind::SelectionChanged
    }

    /// Returns `true` when a segment was selected.
    #[inline]
    #[must_use]
    pub fn is_segment_selected(&self) -> bool {
        self.kind == SegmentedEventKind::SegmentSelected
    }

    /// Returns `true` when a segment was deselected.
    #[inline]
    #[must_use]
    pub fn is_segment_deselected(&self) -> bool {
        self.kind == SegmentedEventKind::SegmentDeselected
    }

    /// Iterates the selected indices that parse as integers.
    pub fn selected_indices(&self) -> impl Iterator<Item = i32> + '_ {
        self.selected_ids
            .unwrap_or_default()
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
    }
}

// ============================================================================
// Generic Request
// ============================================================================

/// Request from the app for a widget the device should refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetRequest<'a> {
    /// Widget being asked about.
    pub widget_id: &'a str,
    /// Widget type as sent.
    pub widget_type: &'a str,
    /// `"request"` or `"refresh"`.
    pub request_type: &'a str,
}

impl WidgetRequest<'_> {
    /// Returns `true` for a refresh.
    #[inline]
    #[must_use]
    pub fn is_refresh(&self) -> bool {
        self.request_type == "refresh"
    }
}

// ============================================================================
// Tests
// ============================================================================
