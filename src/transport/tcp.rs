//! TCP server transport.
//!
//! Listens on one address and serves a single client. Sockets are
//! non-blocking, so every call returns immediately.
//!
//! # Connection Flow
//!
//! 1. [`begin`](Transport::begin) binds the listener
//! 2. The app connects; the next [`poll`](Transport::poll) accepts it
//! 3. A newer client replaces the current one
//! 4. Peer close is noticed on the next `available()` or `read()`

// ============================================================================
// Imports
// ============================================================================

use std::io::{ErrorKind, Read, Write};
use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpListener, TcpStream};

use tracing::{debug, info, warn};

use super::Transport;
use crate::error::{Error, Result};
use crate::protocol::RX_BUFFER_SIZE;

// ============================================================================
// Constants
// ============================================================================

/// Default listening port.
pub const DEFAULT_PORT: u16 = 3333;

// ============================================================================
// TcpServerTransport
// ============================================================================

/// Single-client TCP server.
///
/// # Example
///
/// ```ignore
/// use std::net::{IpAddr, Ipv4Addr};
/// use dashlink::transport::TcpServerTransport;
///
/// let transport = TcpServerTransport::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 3333);
/// let mut engine = Engine::new(transport);
/// engine.begin()?;
/// ```
#[derive(Debug)]
pub struct TcpServerTransport {
    /// Requested bind address.
    addr: SocketAddr,
    listener: Option<TcpListener>,
    client: Option<Client>,
    /// Accepted clients so far.
    session: u64,
}

#[derive(Debug)]
struct Client {
    stream: TcpStream,
    peer: SocketAddr,
}

impl TcpServerTransport {
    /// Creates a transport that will bind `ip:port` on `begin()`.
    ///
    /// Use port 0 to let the OS pick one; see [`local_addr`](Self::local_addr).
    #[must_use]
    pub fn new(ip: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::new(ip, port),
            listener: None,
            client: None,
            session: 0,
        }
    }

    /// Creates a transport on `127.0.0.1` with an OS-assigned port.
    #[must_use]
    pub fn localhost() -> Self {
        Self::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
    }

    /// Returns the bound address once started.
    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref()?.local_addr().ok()
    }

    /// Returns the connected client's address.
    #[inline]
    #[must_use]
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.client.as_ref().map(|c| c.peer)
    }

    fn drop_client(&mut self, reason: &str) {
        if let Some(client) = self.client.take() {
            info!(peer = %client.peer, reason, "Client disconnected");
        }
    }
}

impl Transport for TcpServerTransport {
    fn begin(&mut self) -> Result<()> {
        if self.listener.is_some() {
            return Ok(());
        }

        let listener = TcpListener::bind(self.addr)
            .map_err(|e| Error::transport_begin(format!("bind {}: {e}", self.addr)))?;
        listener
            .set_nonblocking(true)
            .map_err(|e| Error::transport_begin(format!("set_nonblocking: {e}")))?;

        if let Ok(addr) = listener.local_addr() {
            info!(%addr, "TCP transport listening");
        }
        self.listener = Some(listener);
        Ok(())
    }

    fn poll(&mut self) {
        let Some(listener) = &self.listener else {
            return;
        };

        match listener.accept() {
            Ok((stream, peer)) => {
                if let Err(e) = stream.set_nonblocking(true) {
                    warn!(%peer, error = %e, "Rejecting client");
                    return;
                }
                if let Err(e) = stream.set_nodelay(true) {
                    warn!(%peer, error = %e, "Failed to disable Nagle");
                }

                if let Some(old) = self.client.replace(Client { stream, peer }) {
                    debug!(old = %old.peer, new = %peer, "Client replaced");
                }
                self.session += 1;
                info!(%peer, session = self.session, "Client connected");
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => {}
            Err(e) => warn!(error = %e, "Accept failed"),
        }
    }

    fn connected(&self) -> bool {
        self.client.is_some()
    }

    fn session(&self) -> u64 {
        self.session
    }

    fn available(&mut self) -> usize {
        let Some(client) = &self.client else {
            return 0;
        };

        let mut scratch = [0u8; RX_BUFFER_SIZE];
        match client.stream.peek(&mut scratch) {
            Ok(0) => {
                self.drop_client("eof");
                0
            }
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::WouldBlock => 0,
            Err(e) => {
                debug!(error = %e, "Peek failed");
                self.drop_client("error");
                0
            }
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let Some(client) = &mut self.client else {
            return Ok(0);
        };
        if buf.is_empty() {
            return Ok(0);
        }

        match client.stream.read(buf) {
            Ok(0) => {
                self.drop_client("eof");
                Ok(0)
            }
            Ok(n) => Ok(n),
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => Ok(0),
            Err(e) => {
                self.drop_client("error");
                Err(e.into())
            }
        }
    }

    /// Writes the whole frame or none of it.
    ///
    /// A full send buffer before the first byte returns `Ok(0)` and keeps the
    /// client. Once part of a frame is on the wire the rest must follow, so
    /// a stall mid-frame drops the client and returns the partial count.
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let Some(client) = &mut self.client else {
            return Err(Error::NotConnected);
        };

        let mut written = 0;
        while written < buf.len() {
            match client.stream.write(&buf[written..]) {
                Ok(0) => break,
                Ok(n) => written += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                Err(e) => {
                    self.drop_client("error");
                    return Err(e.into());
                }
            }
        }

        if written > 0 && written < buf.len() {
            warn!(written, expected = buf.len(), "Frame cut short");
            self.drop_client("partial write");
        }
        Ok(written)
    }
}

// ============================================================================
// Tests
// ============================================================================
