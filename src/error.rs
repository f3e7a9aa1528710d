//! Error types for dashlink.
//!
//! This module defines every error type used throughout the crate.
//!
//! # Usage
//!
//! All fallible engine operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use dashlink::{Engine, Result};
//!
//! fn blink(engine: &mut Engine<impl Transport>) -> Result<()> {
//!     engine.led("status")?.turn_on()?;
//!     Ok(())
//! }
//! ```
//!
//! Codec and dispatch stages have their own narrower error types so callers
//! can match on them without going through [`Error`].
//!
//! # Error Categories
//!
//! | Category | Type / Variants |
//! |----------|-----------------|
//! | Lifecycle | [`Error::TransportBegin`], [`Error::NotReady`], [`Error::InvalidConfig`] |
//! | Link | [`Error::NotConnected`], [`Error::ShortWrite`] |
//! | Registry | [`Error::RegistryFull`] |
//! | Framing | [`FrameTooLarge`] |
//! | Decode | [`DecodeError`] |
//! | Encode | [`EncodeError`] |
//! | Dispatch | [`DispatchError`] |
//! | External | [`Error::Io`], [`Error::Json`] |

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::result::Result as StdResult;

use thiserror::Error;

use crate::widgets::WidgetKind;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Lifecycle Errors
    // ========================================================================
    /// Transport bring-up failed.
    ///
    /// Returned by [`Engine::begin`](crate::Engine::begin). The engine stays
    /// uninitialized and does not retry on its own.
    #[error("Transport failed to start: {message}")]
    TransportBegin {
        /// Description of the failure.
        message: String,
    },

    /// Operation requires a started engine.
    #[error("Engine not started")]
    NotReady,

    /// Device identity cannot be stamped on frames.
    ///
    /// Returned by [`DeviceConfig::validate`](crate::DeviceConfig::validate)
    /// and by [`Engine::begin`](crate::Engine::begin) before the transport
    /// is touched.
    #[error("Invalid config field {field}: {reason}")]
    InvalidConfig {
        /// JSON name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },

    // ========================================================================
    // Link Errors
    // ========================================================================
    /// No client is connected; outbound messages are never buffered.
    #[error("No client connected")]
    NotConnected,

    /// Transport accepted fewer bytes than the encoded frame.
    #[error("Short write: {written} of {expected} bytes")]
    ShortWrite {
        /// Bytes accepted by the transport.
        written: usize,
        /// Bytes in the encoded frame.
        expected: usize,
    },

    // ========================================================================
    // Registry Errors
    // ========================================================================
    /// Widget family is at capacity.
    #[error("Widget registry full: {kind} already holds {capacity} widgets")]
    RegistryFull {
        /// Family that overflowed.
        kind: WidgetKind,
        /// Per-family capacity.
        capacity: usize,
    },

    // ========================================================================
    // Codec Errors
    // ========================================================================
    /// Outbound message could not be encoded.
    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Inbound frame could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON error (configuration loading).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a transport begin error.
    #[inline]
    pub fn transport_begin(message: impl Into<String>) -> Self {
        Self::TransportBegin {
            message: message.into(),
        }
    }

    /// Creates an invalid config error.
    #[inline]
    pub fn invalid_config(field: &'static str, reason: &'static str) -> Self {
        Self::InvalidConfig { field, reason }
    }

    /// Creates a short write error.
    #[inline]
    pub fn short_write(written: usize, expected: usize) -> Self {
        Self::ShortWrite { written, expected }
    }

    /// Creates a registry full error.
    #[inline]
    pub fn registry_full(kind: WidgetKind, capacity: usize) -> Self {
        Self::RegistryFull { kind, capacity }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this error concerns the client link.
    #[inline]
    #[must_use]
    pub fn is_link_error(&self) -> bool {
        matches!(
            self,
            Self::NotConnected | Self::ShortWrite { .. } | Self::Io(_)
        )
    }

    /// Returns `true` if the caller may retry the operation.
    ///
    /// A too-large frame is retryable with a shorter payload; a dropped
    /// client may come back on a later tick.
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotConnected
                | Self::ShortWrite { .. }
                | Self::Encode(EncodeError::BufferTooSmall { .. })
                | Self::Decode(_)
        )
    }
}

// ============================================================================
// FrameTooLarge
// ============================================================================

/// A line exceeded the reassembler capacity and was truncated.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Frame exceeded {capacity} bytes, {dropped} bytes dropped")]
pub struct FrameTooLarge {
    /// Line buffer capacity.
    pub capacity: usize,
    /// Bytes discarded before the terminator arrived.
    pub dropped: usize,
}

// ============================================================================
// DecodeError
// ============================================================================

/// Inbound frame decode failure.
///
/// Every variant is recoverable: the frame is dropped and the loop continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Frame does not start with `{`.
    #[error("Not a message")]
    NotAMessage,

    /// Frame is not valid UTF-8.
    #[error("Frame is not valid UTF-8")]
    InvalidUtf8,

    /// Frame violates the message grammar.
    #[error("Malformed frame at byte {offset}: {reason}")]
    Malformed {
        /// Byte offset where scanning stopped.
        offset: usize,
        /// What was expected.
        reason: &'static str,
    },

    /// A required top-level field is absent or empty.
    #[error("Missing field: {field}")]
    MissingField {
        /// Wire name of the field.
        field: &'static str,
    },

    /// Payload carried more members than the parameter list holds.
    ///
    /// Only produced under [`PayloadPolicy::Strict`](crate::protocol::PayloadPolicy).
    #[error("Payload exceeds {limit} parameters")]
    PayloadCapacityExceeded {
        /// Parameter capacity.
        limit: usize,
    },
}

impl DecodeError {
    /// Creates a malformed frame error.
    #[inline]
    pub fn malformed(offset: usize, reason: &'static str) -> Self {
        Self::Malformed { offset, reason }
    }

    /// Creates a missing field error.
    #[inline]
    pub fn missing(field: &'static str) -> Self {
        Self::MissingField { field }
    }
}

// ============================================================================
// EncodeError
// ============================================================================

/// Outbound encode failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Formatted frame plus terminator does not fit the output buffer.
    #[error("Encoded frame needs {needed} bytes, buffer holds {capacity}")]
    BufferTooSmall {
        /// Bytes required including the newline terminator.
        needed: usize,
        /// Output buffer size.
        capacity: usize,
    },

    /// Identity string would break the wire format.
    #[error("Field {field} contains a quote, backslash or control character")]
    InvalidField {
        /// Wire name of the offending field.
        field: &'static str,
    },
}

// ============================================================================
// DispatchError
// ============================================================================

/// Reasons a decoded message produced no typed event.
///
/// These are dropped silently by the engine so that newer app versions can
/// send events this firmware does not know yet.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Widget type is not a known family and the event is not a request.
    #[error("Unrecognized widget family: {widget_type}")]
    UnrecognizedFamily {
        /// Wire widget type.
        widget_type: String,
    },

    /// Family is known but the event name is not.
    #[error("Unrecognized event {event} for {family}")]
    UnrecognizedEvent {
        /// Wire family name.
        family: &'static str,
        /// Wire event name.
        event: String,
    },
}

// ============================================================================
// Tests
// ============================================================================
