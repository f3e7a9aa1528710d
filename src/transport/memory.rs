//! In-process transport.
//!
//! [`MemoryTransport::pair`] returns the engine side and a [`MemoryPeer`]
//! that plays the dashboard app. Both share one buffer set behind a
//! [`parking_lot::Mutex`], so the peer may live on another thread.
//!
//! # Example
//!
//! ```ignore
//! let (transport, peer) = MemoryTransport::pair();
//! let mut engine = Engine::new(transport);
//! engine.begin()?;
//!
//! peer.connect();
//! peer.send_line(r#"{"widgetId":"sw1","type":"switch","event":"turnon"}"#);
//! engine.tick();
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use super::Transport;
use crate::error::{Error, Result};

// ============================================================================
// Shared State
// ============================================================================

#[derive(Debug, Default)]
struct Shared {
    started: bool,
    connected: bool,
    session: u64,
    /// App to device.
    inbound: VecDeque<u8>,
    /// Device to app.
    outbound: Vec<u8>,
    begin_error: Option<String>,
    write_limit: Option<usize>,
}

// ============================================================================
// MemoryTransport
// ============================================================================

/// Engine side of an in-process link.
#[derive(Debug)]
pub struct MemoryTransport {
    shared: Arc<Mutex<Shared>>,
}

impl MemoryTransport {
    /// Creates a connected pair of transport and peer.
    #[must_use]
    pub fn pair() -> (Self, MemoryPeer) {
        let shared = Arc::new(Mutex::new(Shared::default()));
        (
            Self {
                shared: Arc::clone(&shared),
            },
            MemoryPeer { shared },
        )
    }
}

impl Transport for MemoryTransport {
    fn begin(&mut self) -> Result<()> {
        let mut shared = self.shared.lock();
        if let Some(message) = &shared.begin_error {
            return Err(Error::transport_begin(message.clone()));
        }
        shared.started = true;
        debug!("Memory transport started");
        Ok(())
    }

    fn poll(&mut self) {}

    fn connected(&self) -> bool {
        self.shared.lock().connected
    }

    fn session(&self) -> u64 {
        self.shared.lock().session
    }

    fn available(&mut self) -> usize {
        let shared = self.shared.lock();
        if shared.connected {
            shared.inbound.len()
        } else {
            0
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut shared = self.shared.lock();
        if !shared.connected {
            return Ok(0);
        }

        let n = buf.len().min(shared.inbound.len());
        for (slot, byte) in buf.iter_mut().zip(shared.inbound.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let mut shared = self.shared.lock();
        if !shared.connected {
            return Err(Error::NotConnected);
        }

        let n = shared.write_limit.map_or(buf.len(), |limit| limit.min(buf.len()));
        shared.outbound.extend_from_slice(&buf[..n]);
        Ok(n)
    }
}

// ============================================================================
// MemoryPeer
// ============================================================================

/// App side of an in-process link.
#[derive(Debug, Clone)]
pub struct MemoryPeer {
    shared: Arc<Mutex<Shared>>,
}

impl MemoryPeer {
    /// Attaches the client. Each attach starts a new session; calling it
    /// while attached changes nothing.
    pub fn connect(&self) {
        let mut shared = self.shared.lock();
        if !shared.connected {
            shared.connected = true;
            shared.session += 1;
        }
    }

    /// Detaches the client, discarding bytes the engine has not read.
    pub fn disconnect(&self) {
        let mut shared = self.shared.lock();
        shared.connected = false;
        shared.inbound.clear();
    }

    /// Returns `true` while the client is attached.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.shared.lock().connected
    }

    /// Returns `true` once the engine has started the transport.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.shared.lock().started
    }

    /// Queues raw bytes for the engine.
    pub fn send(&self, bytes: &[u8]) {
        self.shared.lock().inbound.extend(bytes);
    }

    /// Queues one line plus `\n` for the engine.
    pub fn send_line(&self, line: &str) {
        let mut shared = self.shared.lock();
        shared.inbound.extend(line.as_bytes());
        shared.inbound.push_back(b'\n');
    }

    /// Takes everything the engine wrote so far.
    #[must_use]
    pub fn take_written(&self) -> Vec<u8> {
        std::mem::take(&mut self.shared.lock().outbound)
    }

    /// Takes everything the engine wrote so far, split into lines.
    ///
    /// A trailing partial line is dropped.
    #[must_use]
    pub fn take_lines(&self) -> Vec<String> {
        let written = self.take_written();
        let mut lines: Vec<String> = String::from_utf8_lossy(&written)
            .split_terminator('\n')
            .map(str::to_string)
            .collect();
        if !written.ends_with(b"\n") {
            lines.pop();
        }
        lines
    }

    /// Makes every later `begin()` fail with `message`.
    pub fn fail_begin(&self, message: impl Into<String>) {
        self.shared.lock().begin_error = Some(message.into());
    }

    /// Caps how many bytes each `write()` accepts. `None` removes the cap.
    pub fn set_write_limit(&self, limit: Option<usize>) {
        self.shared.lock().write_limit = limit;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_requires_client() {
        let (mut transport, peer) = MemoryTransport::pair();
        peer.send(b"abc");

        assert_eq!(transport.available(), 0);
        peer.connect();
        assert_eq!(transport.available(), 3);

        let mut buf = [0u8; 2];
        assert_eq!(transport.read(&mut buf).expect("read"), 2);
        assert_eq!(&buf, b"ab");
        assert_eq!(transport.available(), 1);
    }

    #[test]
    fn test_disconnect_discards_unread() {
        let (mut transport, peer) = MemoryTransport::pair();
        peer.connect();
        peer.send(b"partial");
        peer.disconnect();
        peer.connect();

        assert_eq!(transport.available(), 0);
    }

    #[test]
    fn test_connect_starts_new_session() {
        let (transport, peer) = MemoryTransport::pair();
        assert_eq!(transport.session(), 0);

        peer.connect();
        peer.connect();
        assert_eq!(transport.session(), 1);

        peer.disconnect();
        assert_eq!(transport.session(), 1);
        peer.connect();
        assert_eq!(transport.session(), 2);
    }

    #[test]
    fn test_write_without_client() {
        let (mut transport, _peer) = MemoryTransport::pair();
        assert!(matches!(transport.write(b"x\n"), Err(Error::NotConnected)));
    }

    #[test]
    fn test_write_limit() {
        let (mut transport, peer) = MemoryTransport::pair();
        peer.connect();
        peer.set_write_limit(Some(4));

        assert_eq!(transport.write(b"abcdef").expect("write"), 4);
        assert_eq!(peer.take_written(), b"abcd".to_vec());
    }

    #[test]
    fn test_take_lines_drops_partial() {
        let (mut transport, peer) = MemoryTransport::pair();
        peer.connect();
        transport.write(b"one\ntwo\nthr").expect("write");

        assert_eq!(peer.take_lines(), vec!["one", "two"]);
        assert!(peer.take_written().is_empty());
    }

    #[test]
    fn test_begin_failure() {
        let (mut transport, peer) = MemoryTransport::pair();
        peer.fail_begin("radio off");

        let err = transport.begin().unwrap_err();
        assert!(matches!(err, Error::TransportBegin { ref message } if message == "radio off"));
        assert!(!peer.is_started());
    }
}
