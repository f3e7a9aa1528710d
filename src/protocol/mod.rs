//! Line protocol: framing, decoding and encoding.
//!
//! This module defines the wire format exchanged between the device (Rust)
//! and the dashboard app.
//!
//! # Protocol Overview
//!
//! One UTF-8 message per line, newline terminated.
//!
//! | Message | Direction | Purpose |
//! |---------|-----------|---------|
//! | Command | Device → App | Update a display widget (`"dir":"dev->ui"`) |
//! | Event | App → Device | Report a control interaction |
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `frame` | Newline reassembly over a fixed-size buffer |
//! | `decode` | Inbound frame to [`DecodedMessage`] |
//! | `encode` | [`OutboundCommand`] to bytes |
//! | `message` | Decoded message model and typed accessors |

// ============================================================================
// Submodules
// ============================================================================

/// Inbound frame decoder.
pub mod decode;

/// Outbound frame encoder.
pub mod encode;

/// Newline frame reassembly.
pub mod frame;

/// Decoded message model.
pub mod message;

// ============================================================================
// Re-exports
// ============================================================================

pub use decode::{PayloadPolicy, decode, decode_with};
pub use encode::{OutboundCommand, TX_BUFFER_SIZE, encode, encode_to_vec};
pub use frame::{LineReassembler, RX_BUFFER_SIZE, RawFrame};
pub use message::{DecodedMessage, MAX_PARAMS, Param};
