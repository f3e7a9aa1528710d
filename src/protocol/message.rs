//! Decoded message model.
//!
//! A [`DecodedMessage`] is the normalized view of one inbound frame: the
//! top-level identity fields plus the flat payload parameter list.
//!
//! # Format
//!
//! ```json
//! {
//!   "widgetId": "slider1",
//!   "type": "horizontalslider",
//!   "event": "valuechanged",
//!   "payload": { "value": 42.5 }
//! }
//! ```

// ============================================================================
// Constants
// ============================================================================

/// Maximum number of payload parameters kept per message.
pub const MAX_PARAMS: usize = 8;

// ============================================================================
// Param
// ============================================================================

/// One payload member, stored as text.
///
/// String values are unquoted; numbers, booleans and other literals keep
/// their wire spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Member key.
    pub key: String,
    /// Member value as text.
    pub value: String,
}

impl Param {
    /// Creates a new parameter.
    #[inline]
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

// ============================================================================
// DecodedMessage
// ============================================================================

/// Structured view of one inbound frame.
///
/// `widget_id`, `widget_type` and `event` are never empty on a message
/// returned by the decoder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedMessage {
    /// Dashboard the app is showing (may be empty).
    pub dashboard_id: String,
    /// Device id the app addressed (may be empty).
    pub device_id: String,
    /// Widget the event originates from.
    pub widget_id: String,
    /// Widget family name on the wire.
    pub widget_type: String,
    /// Event name on the wire.
    pub event: String,
    /// Payload parameters in document order.
    params: Vec<Param>,
    /// Payload members discarded past [`MAX_PARAMS`].
    dropped_params: usize,
}

impl DecodedMessage {
    /// Creates a message with identity fields and no parameters.
    #[must_use]
    pub fn new(
        widget_id: impl Into<String>,
        widget_type: impl Into<String>,
        event: impl Into<String>,
    ) -> Self {
        Self {
            widget_id: widget_id.into(),
            widget_type: widget_type.into(),
            event: event.into(),
            ..Default::default()
        }
    }

    /// Adds a parameter, returning `false` when the list is full.
    ///
    /// A rejected parameter is counted in [`dropped_params`](Self::dropped_params).
    pub fn push_param(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        if self.params.len() >= MAX_PARAMS {
            self.dropped_params += 1;
            return false;
        }
        self.params.push(Param::new(key, value));
        true
    }

    /// Builder form of [`push_param`](Self::push_param).
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_param(key, value);
        self
    }

    /// Returns the payload parameters.
    #[inline]
    #[must_use]
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Returns how many payload members were discarded over the cap.
    #[inline]
    #[must_use]
    pub const fn dropped_params(&self) -> usize {
        self.dropped_params
    }

    /// Returns `true` if any payload member was discarded.
    #[inline]
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        self.dropped_params > 0
    }
}

// ============================================================================
// Typed Accessors
// ============================================================================

impl DecodedMessage {
    /// Gets the first parameter value with the given key.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }

    /// Gets a float parameter, or `default` when absent or unparsable.
    #[must_use]
    pub fn param_f32(&self, key: &str, default: f32) -> f32 {
        self.param(key)
            .and_then(|v| v.trim().parse::<f32>().ok())
            .unwrap_or(default)
    }

    /// Gets an integer parameter, or `default` when absent or unparsable.
    ///
    /// Fractional values are truncated toward zero.
    #[must_use]
    pub fn param_i32(&self, key: &str, default: i32) -> i32 {
        let Some(raw) = self.param(key).map(str::trim) else {
            return default;
        };

        if let Ok(value) = raw.parse::<i32>() {
            return value;
        }

        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => value.trunc() as i32,
            _ => default,
        }
    }

    /// Gets a boolean parameter.
    ///
    /// `"true"` and `"1"` are true, any other present value is false, and an
    /// absent key yields `default`.
    #[must_use]
    pub fn param_bool(&self, key: &str, default: bool) -> bool {
        match self.param(key) {
            Some(value) => value == "true" || value == "1",
            None => default,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DecodedMessage {
        DecodedMessage::new("w1", "horizontalslider", "valuechanged")
            .with_param("value", "42.5")
            .with_param("label", "speed")
            .with_param("value", "7")
            .with_param("count", "3.9")
            .with_param("flag", "1")
            .with_param("off", "yes")
    }

    #[test]
    fn test_param_first_match_wins() {
        let msg = sample();
        assert_eq!(msg.param("value"), Some("42.5"));
        assert_eq!(msg.param("missing"), None);
    }

    #[test]
    fn test_param_f32() {
        let msg = sample();
        assert_eq!(msg.param_f32("value", 0.0), 42.5);
        assert_eq!(msg.param_f32("label", -1.0), -1.0);
        assert_eq!(msg.param_f32("missing", 3.0), 3.0);
    }

    #[test]
    fn test_param_i32_truncates_fraction() {
        let msg = sample();
        assert_eq!(msg.param_i32("count", 0), 3);
        assert_eq!(msg.param_i32("label", -1), -1);
        assert_eq!(msg.param_i32("missing", 9), 9);
    }

    #[test]
    fn test_param_bool() {
        let msg = sample();
        assert!(msg.param_bool("flag", false));
        assert!(!msg.param_bool("off", true));
        assert!(msg.param_bool("missing", true));
        assert!(!msg.param_bool("missing", false));
    }

    #[test]
    fn test_push_param_caps_at_max() {
        let mut msg = DecodedMessage::new("w", "t", "e");
        for i in 0..10 {
            msg.push_param(format!("k{i}"), i.to_string());
        }

        assert_eq!(msg.params().len(), MAX_PARAMS);
        assert_eq!(msg.dropped_params(), 2);
        assert!(msg.is_truncated());
        assert_eq!(msg.params()[7].key, "k7");
    }
}
