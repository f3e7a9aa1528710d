//! Inbound frame decoder.
//!
//! Decodes one frame into a [`DecodedMessage`] with a single forward pass
//! over the bytes. The accepted language is deliberately small: one flat
//! object whose members are strings, bare literals, flat arrays or flat
//! objects. It is not a JSON parser.
//!
//! # Grammar
//!
//! ```text
//! frame  := '{' ws [ member ( ws ',' ws member )* ] ws '}' ws
//! member := string ws ':' ws value
//! value  := string | scalar | array | object
//! object := '{' ws [ string ws ':' ws leaf ( ws ',' ws string ws ':' ws leaf )* ] ws '}'
//! array  := '[' ws [ item ( ws ',' ws item )* ] ws ']'
//! leaf   := string | scalar | array
//! item   := string | scalar
//! string := '"' { byte except '"' '\' and control } '"'
//! scalar := 1*( byte except ws ',' ':' '"' '{' '}' '[' ']' )
//! ws     := { ' ' | '\t' | '\r' | '\n' }
//! ```
//!
//! Only the object under `payload` is kept; other objects are validated and
//! skipped. Escape sequences are rejected rather than interpreted.

// ============================================================================
// Imports
// ============================================================================

use std::str;

use tracing::trace;

use crate::error::DecodeError;

use super::message::{DecodedMessage, MAX_PARAMS};

// ============================================================================
// Wire Keys
// ============================================================================

const KEY_DASHBOARD_ID: &str = "dashboardId";
const KEY_DEVICE_ID: &str = "deviceId";
const KEY_WIDGET_ID: &str = "widgetId";
const KEY_TYPE: &str = "type";
const KEY_WIDGET_TYPE: &str = "widgetType";
const KEY_EVENT: &str = "event";
const KEY_PAYLOAD: &str = "payload";

// ============================================================================
// PayloadPolicy
// ============================================================================

/// What to do when a payload has more than [`MAX_PARAMS`] members.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PayloadPolicy {
    /// Keep the first members and count the rest as dropped.
    #[default]
    Lenient,
    /// Reject the frame with [`DecodeError::PayloadCapacityExceeded`].
    Strict,
}

// ============================================================================
// Public API
// ============================================================================

/// Decodes a frame with [`PayloadPolicy::Lenient`].
///
/// # Errors
///
/// See [`decode_with`].
pub fn decode(bytes: &[u8]) -> Result<DecodedMessage, DecodeError> {
    decode_with(bytes, PayloadPolicy::Lenient)
}

/// Decodes a frame.
///
/// # Errors
///
/// - [`DecodeError::NotAMessage`] if the first byte is not `{`
/// - [`DecodeError::InvalidUtf8`] if the frame is not UTF-8
/// - [`DecodeError::Malformed`] if the frame violates the grammar
/// - [`DecodeError::MissingField`] if `widgetId`, `type`/`widgetType` or
///   `event` is absent or empty
/// - [`DecodeError::PayloadCapacityExceeded`] under [`PayloadPolicy::Strict`]
pub fn decode_with(bytes: &[u8], policy: PayloadPolicy) -> Result<DecodedMessage, DecodeError> {
    if bytes.first() != Some(&b'{') {
        return Err(DecodeError::NotAMessage);
    }

    let text = str::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)?;
    let mut scanner = Scanner::new(text);
    let mut fields = TopLevel::default();
    let mut message = DecodedMessage::default();
    let mut payload_seen = false;

    scanner.expect(b'{', "expected '{'")?;
    scanner.skip_ws();

    if !scanner.eat(b'}') {
        loop {
            scanner.skip_ws();
            let key = scanner.string()?;
            scanner.skip_ws();
            scanner.expect(b':', "expected ':' after key")?;
            scanner.skip_ws();

            if key == KEY_PAYLOAD && !payload_seen {
                payload_seen = true;
                if scanner.peek() == Some(b'{') {
                    scanner.object(|name, value| {
                        if policy == PayloadPolicy::Strict && message.params().len() >= MAX_PARAMS
                        {
                            return Err(DecodeError::PayloadCapacityExceeded { limit: MAX_PARAMS });
                        }
                        message.push_param(name, value.text());
                        Ok(())
                    })?;
                } else {
                    scanner.value()?;
                }
            } else if let Value::Str(value) = scanner.value()? {
                fields.assign(key, value);
            }

            scanner.skip_ws();
            if scanner.eat(b',') {
                continue;
            }
            scanner.expect(b'}', "expected ',' or '}'")?;
            break;
        }
    }

    scanner.skip_ws();
    if !scanner.at_end() {
        return Err(DecodeError::malformed(scanner.pos, "trailing bytes after message"));
    }

    let widget_id = non_empty(fields.widget_id).ok_or(DecodeError::missing(KEY_WIDGET_ID))?;
    let widget_type = non_empty(fields.widget_type)
        .or(non_empty(fields.widget_type_alt))
        .ok_or(DecodeError::missing(KEY_TYPE))?;
    let event = non_empty(fields.event).ok_or(DecodeError::missing(KEY_EVENT))?;

    message.widget_id = widget_id.to_string();
    message.widget_type = widget_type.to_string();
    message.event = event.to_string();
    message.dashboard_id = fields.dashboard_id.unwrap_or_default().to_string();
    message.device_id = fields.device_id.unwrap_or_default().to_string();

    trace!(
        widget_type,
        widget_id,
        event,
        params = message.params().len(),
        "Frame decoded"
    );

    Ok(message)
}

#[inline]
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

// ============================================================================
// TopLevel
// ============================================================================

/// First string occurrence of each identity key.
#[derive(Default)]
struct TopLevel<'a> {
    dashboard_id: Option<&'a str>,
    device_id: Option<&'a str>,
    widget_id: Option<&'a str>,
    widget_type: Option<&'a str>,
    widget_type_alt: Option<&'a str>,
    event: Option<&'a str>,
}

impl<'a> TopLevel<'a> {
    fn assign(&mut self, key: &str, value: &'a str) {
        let slot = match key {
            KEY_DASHBOARD_ID => &mut self.dashboard_id,
            KEY_DEVICE_ID => &mut self.device_id,
            KEY_WIDGET_ID => &mut self.widget_id,
            KEY_TYPE => &mut self.widget_type,
            KEY_WIDGET_TYPE => &mut self.widget_type_alt,
            KEY_EVENT => &mut self.event,
            _ => return,
        };
        slot.get_or_insert(value);
    }
}

// ============================================================================
// Value
// ============================================================================

/// A scanned value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Value<'a> {
    /// Quoted string, quotes removed.
    Str(&'a str),
    /// Bare literal or array, verbatim.
    Text(&'a str),
    /// Flat object (contents discarded).
    Object,
}

impl<'a> Value<'a> {
    /// Returns the textual form of a leaf value.
    #[inline]
    fn text(self) -> &'a str {
        match self {
            Self::Str(s) | Self::Text(s) => s,
            Self::Object => "",
        }
    }
}

// ============================================================================
// Scanner
// ============================================================================

/// Forward-only cursor over a frame.
struct Scanner<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    #[inline]
    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn skip_ws(&mut self) {
        while let Some(b' ' | b'\t' | b'\r' | b'\n') = self.peek() {
            self.pos += 1;
        }
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, byte: u8, reason: &'static str) -> Result<(), DecodeError> {
        if self.eat(byte) {
            Ok(())
        } else {
            Err(DecodeError::malformed(self.pos, reason))
        }
    }

    /// Scans a quoted string and returns its contents.
    fn string(&mut self) -> Result<&'a str, DecodeError> {
        self.expect(b'"', "expected '\"'")?;
        let start = self.pos;

        loop {
            match self.peek() {
                Some(b'"') => {
                    let value = &self.text[start..self.pos];
                    self.pos += 1;
                    return Ok(value);
                }
                Some(b'\\') => {
                    return Err(DecodeError::malformed(self.pos, "escape sequences unsupported"));
                }
                Some(byte) if byte < 0x20 => {
                    return Err(DecodeError::malformed(self.pos, "control character in string"));
                }
                Some(_) => self.pos += 1,
                None => return Err(DecodeError::malformed(self.pos, "unterminated string")),
            }
        }
    }

    /// Scans a bare literal such as a number, `true` or `null`.
    fn scalar(&mut self) -> Result<&'a str, DecodeError> {
        let start = self.pos;
        while let Some(byte) = self.peek() {
            if matches!(
                byte,
                b' ' | b'\t' | b'\r' | b'\n' | b',' | b':' | b'"' | b'{' | b'}' | b'[' | b']'
            ) {
                break;
            }
            self.pos += 1;
        }

        if self.pos == start {
            return Err(DecodeError::malformed(self.pos, "expected value"));
        }
        Ok(&self.text[start..self.pos])
    }

    /// Scans a flat array and returns it verbatim, brackets included.
    fn array(&mut self) -> Result<&'a str, DecodeError> {
        let start = self.pos;
        self.expect(b'[', "expected '['")?;
        self.skip_ws();

        if !self.eat(b']') {
            loop {
                self.skip_ws();
                match self.peek() {
                    Some(b'"') => {
                        self.string()?;
                    }
                    Some(b'[' | b'{') => {
                        return Err(DecodeError::malformed(self.pos, "nested value in array"));
                    }
                    _ => {
                        self.scalar()?;
                    }
                }
                self.skip_ws();
                if self.eat(b',') {
                    continue;
                }
                self.expect(b']', "expected ',' or ']'")?;
                break;
            }
        }

        Ok(&self.text[start..self.pos])
    }

    /// Scans a leaf value (anything but an object).
    fn leaf(&mut self) -> Result<Value<'a>, DecodeError> {
        match self.peek() {
            Some(b'"') => self.string().map(Value::Str),
            Some(b'[') => self.array().map(Value::Text),
            Some(b'{') => Err(DecodeError::malformed(self.pos, "nested object")),
            _ => self.scalar().map(Value::Text),
        }
    }

    /// Scans any top-level member value.
    fn value(&mut self) -> Result<Value<'a>, DecodeError> {
        if self.peek() == Some(b'{') {
            self.object(|_, _| Ok(()))?;
            return Ok(Value::Object);
        }
        self.leaf()
    }

    /// Scans a flat object, passing each member to `visit`.
    fn object<F>(&mut self, mut visit: F) -> Result<(), DecodeError>
    where
        F: FnMut(&'a str, Value<'a>) -> Result<(), DecodeError>,
    {
        self.expect(b'{', "expected '{'")?;
        self.skip_ws();

        if self.eat(b'}') {
            return Ok(());
        }

        loop {
            self.skip_ws();
            let key = self.string()?;
            self.skip_ws();
            self.expect(b':', "expected ':' after key")?;
            self.skip_ws();
            let value = self.leaf()?;
            visit(key, value)?;

            self.skip_ws();
            if self.eat(b',') {
                continue;
            }
            self.expect(b'}', "expected ',' or '}'")?;
            return Ok(());
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_str(frame: &str) -> Result<DecodedMessage, DecodeError> {
        decode(frame.as_bytes())
    }

    #[test]
    fn test_decode_minimal() {
        let msg = decode_str(r#"{"widgetId":"btn1","type":"simplebutton","event":"press"}"#)
            .expect("decode");

        assert_eq!(msg.widget_id, "btn1");
        assert_eq!(msg.widget_type, "simplebutton");
        assert_eq!(msg.event, "press");
        assert_eq!(msg.dashboard_id, "");
        assert_eq!(msg.device_id, "");
        assert!(msg.params().is_empty());
    }

    #[test]
    fn test_decode_full_with_payload() {
        let msg = decode_str(
            r#"{"dashboardId":"d1","deviceId":"dev9","widgetId":"s1","type":"horizontalslider","dir":"ui->dev","event":"valuechanged","payload": {"value": 42.5 , "label":"speed","on":true}}"#,
        )
        .expect("decode");

        assert_eq!(msg.dashboard_id, "d1");
        assert_eq!(msg.device_id, "dev9");
        assert_eq!(msg.param("value"), Some("42.5"));
        assert_eq!(msg.param("label"), Some("speed"));
        assert_eq!(msg.param("on"), Some("true"));
        assert_eq!(msg.params().len(), 3);
    }

    #[test]
    fn test_not_a_message() {
        assert_eq!(decode_str("hello"), Err(DecodeError::NotAMessage));
        assert_eq!(decode_str(" {}"), Err(DecodeError::NotAMessage));
        assert_eq!(decode(b""), Err(DecodeError::NotAMessage));
    }

    #[test]
    fn test_invalid_utf8() {
        assert_eq!(decode(b"{\xff}"), Err(DecodeError::InvalidUtf8));
    }

    #[test]
    fn test_missing_widget_id() {
        assert_eq!(
            decode_str(r#"{"type":"led","event":"turnon"}"#),
            Err(DecodeError::missing("widgetId"))
        );
    }

    #[test]
    fn test_missing_type() {
        assert_eq!(
            decode_str(r#"{"widgetId":"x","event":"turnon"}"#),
            Err(DecodeError::missing("type"))
        );
    }

    #[test]
    fn test_missing_event() {
        assert_eq!(
            decode_str(r#"{"widgetId":"x","type":"switch"}"#),
            Err(DecodeError::missing("event"))
        );
    }

    #[test]
    fn test_empty_required_field_is_missing() {
        assert_eq!(
            decode_str(r#"{"widgetId":"","type":"switch","event":"toggle"}"#),
            Err(DecodeError::missing("widgetId"))
        );
    }

    #[test]
    fn test_widget_type_fallback() {
        let msg = decode_str(r#"{"widgetId":"sw","widgetType":"switch","event":"toggle"}"#)
            .expect("decode");
        assert_eq!(msg.widget_type, "switch");

        let msg = decode_str(r#"{"widgetId":"sw","type":"","widgetType":"switch","event":"toggle"}"#)
            .expect("decode");
        assert_eq!(msg.widget_type, "switch");
    }

    #[test]
    fn test_type_preferred_over_widget_type() {
        let msg = decode_str(r#"{"widgetType":"led","widgetId":"a","type":"joystick","event":"released"}"#)
            .expect("decode");
        assert_eq!(msg.widget_type, "joystick");
    }

    #[test]
    fn test_first_occurrence_wins() {
        let msg = decode_str(r#"{"widgetId":"first","widgetId":"second","type":"t","event":"e"}"#)
            .expect("decode");
        assert_eq!(msg.widget_id, "first");
    }

    #[test]
    fn test_payload_cap_lenient() {
        let msg = decode_str(
            r#"{"widgetId":"w","type":"t","event":"e","payload":{"a":1,"b":2,"c":3,"d":4,"e":5,"f":6,"g":7,"h":8,"i":9,"j":10}}"#,
        )
        .expect("decode");

        let keys: Vec<&str> = msg.params().iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, ["a", "b", "c", "d", "e", "f", "g", "h"]);
        assert_eq!(msg.dropped_params(), 2);
    }

    #[test]
    fn test_payload_cap_strict() {
        let frame = br#"{"widgetId":"w","type":"t","event":"e","payload":{"a":1,"b":2,"c":3,"d":4,"e":5,"f":6,"g":7,"h":8,"i":9}}"#;
        assert_eq!(
            decode_with(frame, PayloadPolicy::Strict),
            Err(DecodeError::PayloadCapacityExceeded { limit: MAX_PARAMS })
        );
    }

    #[test]
    fn test_payload_array_kept_verbatim() {
        let msg = decode_str(r#"{"widgetId":"w","type":"t","event":"e","payload":{"values":[1, 2,"x"]}}"#)
            .expect("decode");
        assert_eq!(msg.param("values"), Some(r#"[1, 2,"x"]"#));
    }

    #[test]
    fn test_non_object_payload_ignored() {
        let msg = decode_str(r#"{"widgetId":"w","type":"t","event":"e","payload":null}"#)
            .expect("decode");
        assert!(msg.params().is_empty());
    }

    #[test]
    fn test_other_objects_skipped() {
        let msg = decode_str(r#"{"meta":{"v":2},"widgetId":"w","type":"t","event":"e"}"#)
            .expect("decode");
        assert_eq!(msg.widget_id, "w");
        assert!(msg.params().is_empty());
    }

    #[test]
    fn test_keys_inside_payload_do_not_leak() {
        let msg = decode_str(r#"{"payload":{"widgetId":"inner"},"widgetId":"outer","type":"t","event":"e"}"#)
            .expect("decode");
        assert_eq!(msg.widget_id, "outer");
        assert_eq!(msg.param("widgetId"), Some("inner"));
    }

    #[test]
    fn test_escape_rejected() {
        let err = decode_str(r#"{"widgetId":"a\"b","type":"t","event":"e"}"#).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { offset: 14, .. }));
    }

    #[test]
    fn test_nested_payload_rejected() {
        let err = decode_str(r#"{"widgetId":"w","type":"t","event":"e","payload":{"a":{"b":1}}}"#)
            .unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { reason: "nested object", .. }));
    }

    #[test]
    fn test_truncated_frame_rejected() {
        let err = decode_str(r#"{"widgetId":"w","type":"t","event":"e","payload":{"a":1"#)
            .unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { .. }));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let err = decode_str(r#"{"widgetId":"w","type":"t","event":"e"} x"#).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Malformed {
                reason: "trailing bytes after message",
                ..
            }
        ));
    }

    #[test]
    fn test_missing_colon_rejected() {
        let err = decode_str(r#"{"widgetId" "w"}"#).unwrap_err();
        assert_eq!(err, DecodeError::malformed(12, "expected ':' after key"));
    }

    #[test]
    fn test_utf8_values() {
        let msg = decode_str(r#"{"widgetId":"température","type":"t","event":"e","payload":{"unit":"°C"}}"#)
            .expect("decode");
        assert_eq!(msg.widget_id, "température");
        assert_eq!(msg.param("unit"), Some("°C"));
    }
}
