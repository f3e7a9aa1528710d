//! Outbound frame encoder.
//!
//! Formats one device-to-app message into a caller-owned fixed-size buffer.
//! The buffer never grows: a message that does not fit is rejected.
//!
//! # Format
//!
//! ```text
//! {"dashboardId":"d","deviceId":"v","widgetId":"w","type":"t","dir":"dev->ui","event":"e","payload":{...}}\n
//! ```
//!
//! The `payload` member is present only when a non-empty fragment is given.
//! The fragment is spliced verbatim; producing valid syntax is the caller's
//! job.

// ============================================================================
// Imports
// ============================================================================

use std::io::{Cursor, Write};

use crate::error::EncodeError;

// ============================================================================
// Constants
// ============================================================================

/// Default outbound buffer capacity in bytes, terminator included.
pub const TX_BUFFER_SIZE: usize = 256;

/// Direction marker for device-to-app traffic.
pub const DIRECTION_DEVICE_TO_UI: &str = "dev->ui";

// ============================================================================
// OutboundCommand
// ============================================================================

/// Fields of one outbound message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutboundCommand<'a> {
    /// Dashboard id from the device config.
    pub dashboard_id: &'a str,
    /// Device id from the device config.
    pub device_id: &'a str,
    /// Target widget id.
    pub widget_id: &'a str,
    /// Target widget type.
    pub widget_type: &'a str,
    /// Command name.
    pub event: &'a str,
    /// Optional payload object fragment.
    pub payload: Option<&'a str>,
}

impl<'a> OutboundCommand<'a> {
    /// Creates a command without identity or payload.
    #[inline]
    #[must_use]
    pub const fn new(widget_id: &'a str, widget_type: &'a str, event: &'a str) -> Self {
        Self {
            dashboard_id: "",
            device_id: "",
            widget_id,
            widget_type,
            event,
            payload: None,
        }
    }

    /// Sets the dashboard and device ids.
    #[inline]
    #[must_use]
    pub const fn with_identity(mut self, dashboard_id: &'a str, device_id: &'a str) -> Self {
        self.dashboard_id = dashboard_id;
        self.device_id = device_id;
        self
    }

    /// Sets the payload fragment.
    #[inline]
    #[must_use]
    pub const fn with_payload(mut self, payload: Option<&'a str>) -> Self {
        self.payload = payload;
        self
    }

    /// Checks identity strings for bytes that would break the frame.
    fn validate(&self) -> Result<(), EncodeError> {
        let fields = [
            ("dashboardId", self.dashboard_id),
            ("deviceId", self.device_id),
            ("widgetId", self.widget_id),
            ("type", self.widget_type),
            ("event", self.event),
        ];

        for (field, value) in fields {
            if !is_frame_safe(value) {
                return Err(EncodeError::InvalidField { field });
            }
        }
        Ok(())
    }

    /// Returns the exact encoded length, terminator included.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        // Fixed punctuation and key names of the envelope plus "\n".
        const ENVELOPE: usize = r#"{"dashboardId":"","deviceId":"","widgetId":"","type":"","dir":"","event":""}"#
            .len()
            + DIRECTION_DEVICE_TO_UI.len()
            + 1;
        const PAYLOAD_KEY: usize = r#","payload":"#.len();

        let payload = match self.payload {
            Some(p) if !p.is_empty() => PAYLOAD_KEY + p.len(),
            _ => 0,
        };

        ENVELOPE
            + self.dashboard_id.len()
            + self.device_id.len()
            + self.widget_id.len()
            + self.widget_type.len()
            + self.event.len()
            + payload
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Encodes `command` into `buf`, newline included.
///
/// Returns the number of bytes written.
///
/// # Errors
///
/// - [`EncodeError::InvalidField`] if an identity string contains a quote,
///   backslash or control character
/// - [`EncodeError::BufferTooSmall`] if the frame does not fit `buf`
pub fn encode(buf: &mut [u8], command: &OutboundCommand<'_>) -> Result<usize, EncodeError> {
    command.validate()?;

    let needed = command.encoded_len();
    if needed > buf.len() {
        return Err(EncodeError::BufferTooSmall {
            needed,
            capacity: buf.len(),
        });
    }

    let mut cursor = Cursor::new(buf);
    let written = write_frame(&mut cursor, command);
    let position = cursor.position() as usize;

    match written {
        Ok(()) => Ok(position),
        Err(_) => Err(EncodeError::BufferTooSmall {
            needed,
            capacity: cursor.get_ref().len(),
        }),
    }
}

/// Encodes `command` into a new vector, newline included.
///
/// # Errors
///
/// Returns [`EncodeError::InvalidField`] for identity strings that would
/// break the frame.
pub fn encode_to_vec(command: &OutboundCommand<'_>) -> Result<Vec<u8>, EncodeError> {
    let mut out = vec![0; command.encoded_len()];
    let len = encode(&mut out, command)?;
    out.truncate(len);
    Ok(out)
}

/// Returns `true` if `value` can sit between quotes without escaping.
pub(crate) fn is_frame_safe(value: &str) -> bool {
    !value.bytes().any(|b| b == b'"' || b == b'\\' || b < 0x20)
}

fn write_frame<W: Write>(out: &mut W, command: &OutboundCommand<'_>) -> std::io::Result<()> {
    write!(
        out,
        r#"{{"dashboardId":"{}","deviceId":"{}","widgetId":"{}","type":"{}","dir":"{}","event":"{}""#,
        command.dashboard_id,
        command.device_id,
        command.widget_id,
        command.widget_type,
        DIRECTION_DEVICE_TO_UI,
        command.event,
    )?;

    if let Some(payload) = command.payload.filter(|p| !p.is_empty()) {
        write!(out, r#","payload":{payload}"#)?;
    }

    out.write_all(b"}\n")
}

// ============================================================================
// Tests
// ============================================================================
