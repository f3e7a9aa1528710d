//! Newline frame reassembly.
//!
//! The transport delivers arbitrary byte chunks. [`LineReassembler`] collects
//! them into a fixed-size line buffer and emits one [`RawFrame`] per `\n`.
//!
//! # Rules
//!
//! - A `\r` immediately before `\n` is stripped; any other `\r` is data.
//! - Empty lines produce no frame.
//! - When the buffer is full, further bytes of the current line are dropped
//!   and counted. The bytes that fit are still emitted on `\n`.
//! - Output does not depend on how the stream is split into chunks.

// ============================================================================
// Imports
// ============================================================================

use crate::error::FrameTooLarge;

// ============================================================================
// Constants
// ============================================================================

/// Default line buffer capacity in bytes.
pub const RX_BUFFER_SIZE: usize = 512;

// ============================================================================
// RawFrame
// ============================================================================

/// One complete line, terminator removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFrame<'a> {
    bytes: &'a [u8],
    capacity: usize,
    dropped: usize,
}

impl<'a> RawFrame<'a> {
    /// Returns the frame contents.
    #[inline]
    #[must_use]
    pub const fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Returns the number of bytes lost to overflow.
    #[inline]
    #[must_use]
    pub const fn dropped(&self) -> usize {
        self.dropped
    }

    /// Returns `true` if bytes were lost to overflow.
    #[inline]
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        self.dropped > 0
    }

    /// Checks that no bytes were lost to overflow.
    ///
    /// # Errors
    ///
    /// Returns [`FrameTooLarge`] if the line did not fit the buffer.
    pub const fn ensure_complete(&self) -> Result<(), FrameTooLarge> {
        if self.dropped > 0 {
            return Err(FrameTooLarge {
                capacity: self.capacity,
                dropped: self.dropped,
            });
        }
        Ok(())
    }
}

// ============================================================================
// LineReassembler
// ============================================================================

/// Bounded newline reassembler.
///
/// Holds no state beyond the current line, so it can be driven repeatedly
/// from a polling loop.
pub struct LineReassembler<const N: usize = RX_BUFFER_SIZE> {
    buffer: [u8; N],
    len: usize,
    dropped: usize,
    /// A `\r` was seen and not yet committed to the buffer.
    pending_cr: bool,
}

impl<const N: usize> Default for LineReassembler<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> LineReassembler<N> {
    /// Creates an empty reassembler.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: [0; N],
            len: 0,
            dropped: 0,
            pending_cr: false,
        }
    }

    /// Returns the line buffer capacity.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Returns the number of bytes buffered for the current line.
    #[inline]
    #[must_use]
    pub const fn pending(&self) -> usize {
        self.len + self.pending_cr as usize
    }

    /// Discards any partial line.
    pub fn reset(&mut self) {
        self.len = 0;
        self.dropped = 0;
        self.pending_cr = false;
    }

    /// Feeds a chunk, calling `sink` once per completed frame.
    pub fn push<F>(&mut self, bytes: &[u8], mut sink: F)
    where
        F: FnMut(RawFrame<'_>),
    {
        for &byte in bytes {
            match byte {
                b'\n' => {
                    self.pending_cr = false;
                    if self.len > 0 {
                        sink(RawFrame {
                            bytes: &self.buffer[..self.len],
                            capacity: N,
                            dropped: self.dropped,
                        });
                    }
                    self.len = 0;
                    self.dropped = 0;
                }
                b'\r' => {
                    if self.pending_cr {
                        self.store(b'\r');
                    }
                    self.pending_cr = true;
                }
                _ => {
                    if self.pending_cr {
                        self.pending_cr = false;
                        self.store(b'\r');
                    }
                    self.store(byte);
                }
            }
        }
    }

    /// Appends one byte or counts it as dropped.
    #[inline]
    fn store(&mut self, byte: u8) {
        if self.len < N {
            self.buffer[self.len] = byte;
            self.len += 1;
        } else {
            self.dropped += 1;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
