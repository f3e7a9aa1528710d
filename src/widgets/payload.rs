//! Payload object writer.
//!
//! Builds the flat `{"key":value,...}` fragments carried by widget commands.
//!
//! | Value | Output |
//! |-------|--------|
//! | `f32` | two decimals, `null` when not finite |
//! | `i32` | decimal |
//! | `bool` | `true` / `false` |
//! | `&str` | JSON string, escaped |
//! | [`Color`] | `"#RRGGBB"` |

// ============================================================================
// Imports
// ============================================================================

use super::Color;

// ============================================================================
// PayloadWriter
// ============================================================================

/// Incremental writer for one flat payload object.
#[derive(Debug, Clone)]
pub struct PayloadWriter {
    buf: String,
    members: usize,
}

impl Default for PayloadWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PayloadWriter {
    /// Creates an empty object.
    #[must_use]
    pub fn new() -> Self {
        let mut buf = String::with_capacity(64);
        buf.push('{');
        Self { buf, members: 0 }
    }

    /// Returns the number of members written.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.members
    }

    /// Returns `true` if no member was written.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.members == 0
    }

    /// Writes the key and separator of the next member.
    fn key(&mut self, key: &str) -> &mut String {
        if self.members > 0 {
            self.buf.push(',');
        }
        self.members += 1;
        push_json_string(&mut self.buf, key);
        self.buf.push(':');
        &mut self.buf
    }

    /// Adds a float with two decimals.
    pub fn float(&mut self, key: &str, value: f32) -> &mut Self {
        let buf = self.key(key);
        push_float(buf, value);
        self
    }

    /// Adds an integer.
    pub fn int(&mut self, key: &str, value: i32) -> &mut Self {
        let buf = self.key(key);
        buf.push_str(&value.to_string());
        self
    }

    /// Adds a boolean.
    pub fn bool(&mut self, key: &str, value: bool) -> &mut Self {
        let buf = self.key(key);
        buf.push_str(if value { "true" } else { "false" });
        self
    }

    /// Adds an escaped string.
    pub fn str(&mut self, key: &str, value: &str) -> &mut Self {
        let buf = self.key(key);
        push_json_string(buf, value);
        self
    }

    /// Adds a `#RRGGBB` color string.
    pub fn color(&mut self, key: &str, value: Color) -> &mut Self {
        let buf = self.key(key);
        buf.push('"');
        buf.push_str(&value.to_hex());
        buf.push('"');
        self
    }

    /// Adds an array of floats with two decimals each.
    pub fn floats(&mut self, key: &str, values: &[f32]) -> &mut Self {
        let buf = self.key(key);
        buf.push('[');
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                buf.push(',');
            }
            push_float(buf, *value);
        }
        buf.push(']');
        self
    }

    /// Closes the object and returns it.
    #[must_use]
    pub fn finish(mut self) -> String {
        self.buf.push('}');
        self.buf
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn push_float(buf: &mut String, value: f32) {
    if value.is_finite() {
        buf.push_str(&format!("{value:.2}"));
    } else {
        buf.push_str("null");
    }
}

fn push_json_string(buf: &mut String, value: &str) {
    // Serializing a str cannot fail.
    match serde_json::to_string(value) {
        Ok(quoted) => buf.push_str(&quoted),
        Err(_) => buf.push_str("\"\""),
    }
}

// ============================================================================
// Tests
// ============================================================================
