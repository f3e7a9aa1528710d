//! Byte-stream transport layer.
//!
//! The engine talks to the dashboard app through a [`Transport`]: a polled,
//! non-blocking byte pipe with at most one client at a time.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  Engine (Rust)  │                              │  Dashboard app  │
//! │                 │        newline frames        │                 │
//! │  Transport      │◄────────────────────────────►│  Client         │
//! │                 │      TCP / in-memory         │                 │
//! └─────────────────┘                              └─────────────────┘
//! ```
//!
//! # Lifecycle
//!
//! 1. [`Transport::begin`] - Bring the link up (bind, start access point...)
//! 2. [`Transport::poll`] - Service the link once per engine tick
//! 3. [`Transport::available`] / [`Transport::read`] - Drain inbound bytes
//! 4. [`Transport::write`] - Send one encoded frame
//!
//! No method blocks. A transport that loses its client reports
//! `connected() == false` until a new client arrives. Every new client
//! bumps [`Transport::session`], so bytes from different clients are never
//! joined into one line.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `memory` | In-process transport with a scriptable peer |
//! | `tcp` | Single-client non-blocking TCP server |

// ============================================================================
// Submodules
// ============================================================================

/// In-process transport.
pub mod memory;

/// TCP server transport.
pub mod tcp;

// ============================================================================
// Re-exports
// ============================================================================

pub use memory::{MemoryPeer, MemoryTransport};
pub use tcp::TcpServerTransport;

// ============================================================================
// Imports
// ============================================================================

use crate::error::Result;

// ============================================================================
// Transport
// ============================================================================

/// Polled byte pipe to the dashboard app.
pub trait Transport {
    /// Brings the link up.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TransportBegin`](crate::Error::TransportBegin) if the
    /// link cannot be started.
    fn begin(&mut self) -> Result<()>;

    /// Services the link: accepts clients, notices disconnects.
    fn poll(&mut self);

    /// Returns `true` while a client is connected.
    fn connected(&self) -> bool;

    /// Returns the current client session number.
    ///
    /// Bumped every time a client attaches, including when a new client
    /// replaces the current one without `connected()` ever going false.
    fn session(&self) -> u64;

    /// Returns how many bytes can be read without blocking.
    fn available(&mut self) -> usize;

    /// Reads up to `buf.len()` bytes. `Ok(0)` means nothing is pending.
    ///
    /// # Errors
    ///
    /// Returns an error if the link failed; the client is dropped.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Writes `buf`, returning how many bytes were accepted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConnected`](crate::Error::NotConnected) without a
    /// client, or an error if the link failed.
    fn write(&mut self, buf: &[u8]) -> Result<usize>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn begin(&mut self) -> Result<()> {
        (**self).begin()
    }

    fn poll(&mut self) {
        (**self).poll();
    }

    fn connected(&self) -> bool {
        (**self).connected()
    }

    fn session(&self) -> u64 {
        (**self).session()
    }

    fn available(&mut self) -> usize {
        (**self).available()
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read(buf)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        (**self).write(buf)
    }
}
