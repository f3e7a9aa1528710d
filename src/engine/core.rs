//! Engine implementation.
//!
//! The engine owns the transport, the inbound line buffer, the widget
//! registry and the handler table. Nothing is shared: the application
//! drives it by calling [`Engine::tick`] from its loop.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use tracing::{debug, info, trace, warn};

use super::config::DeviceConfig;
use super::options::{EngineOptions, READ_CHUNK_SIZE};
use super::stats::EngineStats;
use crate::dispatch::{DispatchOutcome, Handlers};
use crate::error::{Error, Result};
use crate::protocol::{
    LineReassembler, OutboundCommand, PayloadPolicy, RawFrame, TX_BUFFER_SIZE, decode_with, encode,
};
use crate::transport::Transport;
use crate::widgets::{
    DisplayKind, MessageSender, Responder, Widget, WidgetRegistry, widget_accessors,
};

// ============================================================================
// EngineState
// ============================================================================

/// Engine lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Created; [`Engine::begin`] not yet successful.
    Uninitialized,
    /// Transport is up; ticks process traffic.
    Ready,
}

// ============================================================================
// Link
// ============================================================================

/// Outbound half of the engine: transport, identity and encode buffer.
///
/// Kept apart from the registry so a widget handle can borrow both.
struct Link<T> {
    transport: T,
    config: DeviceConfig,
    state: EngineState,
    tx: [u8; TX_BUFFER_SIZE],
    stats: EngineStats,
}

impl<T: Transport> Link<T> {
    fn send(
        &mut self,
        widget_id: &str,
        widget_type: &str,
        event: &str,
        payload: Option<&str>,
    ) -> Result<()> {
        if self.state != EngineState::Ready {
            return Err(Error::NotReady);
        }
        if !self.transport.connected() {
            return Err(Error::NotConnected);
        }

        let command = OutboundCommand::new(widget_id, widget_type, event)
            .with_identity(&self.config.dashboard_id, &self.config.device_id)
            .with_payload(payload);
        let len = encode(&mut self.tx, &command)?;

        let written = self.transport.write(&self.tx[..len])?;
        if written < len {
            return Err(Error::short_write(written, len));
        }

        trace!(widget_id, widget_type, event, len, "Message sent");
        Ok(())
    }
}

impl<T: Transport> MessageSender for Link<T> {
    fn send_message(
        &mut self,
        widget_id: &str,
        widget_type: &str,
        event: &str,
        payload: Option<&str>,
    ) -> Result<()> {
        let result = self.send(widget_id, widget_type, event, payload);
        match &result {
            Ok(()) => self.stats.messages_sent = self.stats.messages_sent.wrapping_add(1),
            Err(e) => {
                self.stats.send_failures = self.stats.send_failures.wrapping_add(1);
                debug!(widget_id, event, error = %e, "Send failed");
            }
        }
        result
    }

    fn connected(&self) -> bool {
        self.transport.connected()
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Protocol engine bound to one transport.
///
/// # Example
///
/// ```ignore
/// use dashlink::{Engine, transport::MemoryTransport};
///
/// let (transport, peer) = MemoryTransport::pair();
/// let mut engine = Engine::new(transport);
/// engine.handlers_mut().on_switch(|event, _| println!("switch {}", event.is_on));
/// engine.begin()?;
///
/// loop {
///     engine.tick();
///     engine.gauge("temp")?.set_value(read_sensor())?;
/// }
/// ```
pub struct Engine<T: Transport> {
    link: Link<T>,
    registry: WidgetRegistry,
    handlers: Handlers,
    reassembler: LineReassembler,
    options: EngineOptions,
    was_connected: bool,
    /// Transport session the reassembler's bytes belong to.
    session: u64,
}

impl<T: Transport> fmt::Debug for Engine<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("state", &self.link.state)
            .field("connected", &self.was_connected)
            .field("session", &self.session)
            .field("widgets", &self.registry.len())
            .field("handlers", &self.handlers)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Engine - Construction
// ============================================================================

impl<T: Transport> Engine<T> {
    /// Creates an engine with default options and a fresh device identity.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self::with_options(transport, EngineOptions::default())
    }

    /// Creates an engine with custom options.
    #[must_use]
    pub fn with_options(transport: T, options: EngineOptions) -> Self {
        Self {
            link: Link {
                transport,
                config: DeviceConfig::default(),
                state: EngineState::Uninitialized,
                tx: [0; TX_BUFFER_SIZE],
                stats: EngineStats::default(),
            },
            registry: WidgetRegistry::with_capacity(options.max_widgets),
            handlers: Handlers::new(),
            reassembler: LineReassembler::new(),
            options,
            was_connected: false,
            session: 0,
        }
    }

    /// Replaces the device identity.
    #[must_use]
    pub fn with_config(mut self, config: DeviceConfig) -> Self {
        self.link.config = config;
        self
    }
}

// ============================================================================
// Engine - Accessors
// ============================================================================

impl<T: Transport> Engine<T> {
    /// Returns the lifecycle state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> EngineState {
        self.link.state
    }

    /// Returns `true` once [`begin`](Self::begin) has succeeded.
    #[inline]
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.link.state == EngineState::Ready
    }

    /// Returns `true` if a client is connected.
    #[inline]
    #[must_use]
    pub fn connected(&self) -> bool {
        self.link.transport.connected()
    }

    /// Returns the device identity.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &DeviceConfig {
        &self.link.config
    }

    /// Returns the device identity for editing. Changes apply to the next send.
    #[inline]
    pub fn config_mut(&mut self) -> &mut DeviceConfig {
        &mut self.link.config
    }

    /// Returns the options the engine was built with.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Returns the handler table.
    #[inline]
    #[must_use]
    pub fn handlers(&self) -> &Handlers {
        &self.handlers
    }

    /// Returns the handler table for registration.
    #[inline]
    pub fn handlers_mut(&mut self) -> &mut Handlers {
        &mut self.handlers
    }

    /// Returns the widget registry.
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    /// Returns the transport.
    #[inline]
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.link.transport
    }

    /// Returns the transport mutably.
    #[inline]
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.link.transport
    }

    /// Returns a snapshot of the counters.
    #[inline]
    #[must_use]
    pub fn stats(&self) -> EngineStats {
        self.link.stats
    }
}

// ============================================================================
// Engine - Lifecycle
// ============================================================================

impl<T: Transport> Engine<T> {
    /// Checks the device identity and starts the transport.
    ///
    /// Does nothing if the engine is already ready. On failure the engine
    /// stays uninitialized and may be started again later.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConfig`] if an id cannot be stamped on frames; the
    ///   transport is not touched
    /// - [`Error::TransportBegin`] if the transport cannot start
    pub fn begin(&mut self) -> Result<()> {
        if self.is_ready() {
            return Ok(());
        }

        if let Err(e) = self.link.config.validate() {
            warn!(error = %e, "Device config rejected");
            return Err(e);
        }

        match self.link.transport.begin() {
            Ok(()) => {
                self.link.state = EngineState::Ready;
                info!(
                    dashboard_id = %self.link.config.dashboard_id,
                    device_id = %self.link.config.device_id,
                    "Engine ready"
                );
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Transport failed to start");
                Err(match e {
                    Error::TransportBegin { .. } => e,
                    other => Error::transport_begin(other.to_string()),
                })
            }
        }
    }

    /// Runs one iteration: services the transport and handles every
    /// complete inbound frame.
    ///
    /// A partial line never outlives its client: the line buffer is cleared
    /// whenever the connection drops or a new session starts, even if both
    /// happened since the last tick.
    ///
    /// Does nothing before [`begin`](Self::begin) succeeds. Never blocks.
    pub fn tick(&mut self) {
        if !self.is_ready() {
            return;
        }

        self.link.transport.poll();

        let connected = self.link.transport.connected();
        let session = self.link.transport.session();
        if connected != self.was_connected || session != self.session {
            match (self.was_connected, connected) {
                (_, false) => info!("Client disconnected"),
                (false, true) => info!(session, "Client connected"),
                (true, true) => info!(session, "Client replaced"),
            }
            if self.reassembler.pending() > 0 {
                debug!(discarded = self.reassembler.pending(), "Partial line discarded");
            }
            self.reassembler.reset();
            self.was_connected = connected;
            self.session = session;
        }

        let Self {
            link,
            registry,
            handlers,
            reassembler,
            options,
            ..
        } = self;
        let policy = options.payload_policy;
        let mut chunk = [0u8; READ_CHUNK_SIZE];

        while link.transport.available() > 0 {
            let n = match link.transport.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) => {
                    warn!(error = %e, "Transport read failed");
                    break;
                }
            };

            reassembler.push(&chunk[..n], |frame| {
                process_frame(frame, policy, handlers, link, registry);
            });
        }
    }
}

/// Decodes and dispatches one inbound frame. The handler may reply through
/// `link` and `registry`.
fn process_frame<T: Transport>(
    frame: RawFrame<'_>,
    policy: PayloadPolicy,
    handlers: &mut Handlers,
    link: &mut Link<T>,
    registry: &mut WidgetRegistry,
) {
    let stats = &mut link.stats;
    stats.frames = stats.frames.wrapping_add(1);

    if let Err(e) = frame.ensure_complete() {
        stats.oversize_frames = stats.oversize_frames.wrapping_add(1);
        warn!(error = %e, "Inbound frame truncated");
    }

    let msg = match decode_with(frame.bytes(), policy) {
        Ok(msg) => msg,
        Err(e) => {
            stats.decode_errors = stats.decode_errors.wrapping_add(1);
            debug!(error = %e, len = frame.bytes().len(), "Frame dropped");
            return;
        }
    };

    if msg.is_truncated() {
        stats.payload_truncations = stats.payload_truncations.wrapping_add(1);
        debug!(
            widget_id = %msg.widget_id,
            dropped = msg.dropped_params(),
            "Payload truncated"
        );
    }

    let outcome = handlers.dispatch(&msg, &mut Responder::new(&mut *link, registry));

    let stats = &mut link.stats;
    match outcome {
        DispatchOutcome::Handled => {
            stats.dispatched_events = stats.dispatched_events.wrapping_add(1);
            stats.handled_events = stats.handled_events.wrapping_add(1);
        }
        DispatchOutcome::Unhandled => {
            stats.dispatched_events = stats.dispatched_events.wrapping_add(1);
        }
        DispatchOutcome::Dropped => {
            stats.dropped_events = stats.dropped_events.wrapping_add(1);
        }
    }
}

// ============================================================================
// Engine - Outbound
// ============================================================================

impl<T: Transport> Engine<T> {
    /// Encodes and writes one command.
    ///
    /// Nothing is buffered: a message that cannot be sent now is lost.
    ///
    /// # Errors
    ///
    /// - [`Error::NotReady`] before [`begin`](Self::begin)
    /// - [`Error::NotConnected`] without a client
    /// - [`Error::Encode`] if the frame does not fit the outbound buffer
    /// - [`Error::ShortWrite`] if the transport accepts fewer bytes
    pub fn send_message(
        &mut self,
        widget_id: &str,
        widget_type: &str,
        event: &str,
        payload: Option<&str>,
    ) -> Result<()> {
        self.link.send_message(widget_id, widget_type, event, payload)
    }

    /// Returns a handle to the display widget `id` of family `K`,
    /// registering it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RegistryFull`] if `id` is new and the family is full.
    pub fn widget<K: DisplayKind>(&mut self, id: &str) -> Result<Widget<'_, K>> {
        let entry = self.registry.acquire(K::KIND, id)?;
        Ok(Widget::new(&mut self.link, entry))
    }

    widget_accessors!();
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;

    use std::time::Duration;

    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpStream as AsyncTcpStream;

    use crate::error::EncodeError;
    use crate::protocol::decode;
    use crate::transport::{MemoryPeer, MemoryTransport, TcpServerTransport};
    use crate::widgets::WidgetKind;

    fn started() -> (Engine<MemoryTransport>, MemoryPeer) {
        let (transport, peer) = MemoryTransport::pair();
        let config = DeviceConfig::new()
            .with_dashboard_id("dash")
            .with_device_id("dev1");
        let mut engine = Engine::new(transport).with_config(config);
        engine.begin().expect("begin");
        (engine, peer)
    }

    fn count_switches(engine: &mut Engine<MemoryTransport>) -> Arc<Mutex<Vec<(String, bool)>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        engine.handlers_mut().on_switch(move |event, _| {
            sink.lock().push((event.widget_id.to_string(), event.is_on));
        });
        seen
    }

    #[test]
    fn test_begin_failure_keeps_uninitialized() {
        let (transport, peer) = MemoryTransport::pair();
        peer.fail_begin("no radio");
        let mut engine = Engine::new(transport);

        assert!(matches!(engine.begin(), Err(Error::TransportBegin { .. })));
        assert_eq!(engine.state(), EngineState::Uninitialized);

        // Ticking an uninitialized engine does nothing.
        peer.connect();
        peer.send_line(r#"{"widgetId":"sw1","type":"switch","event":"turnon"}"#);
        engine.tick();
        assert_eq!(engine.stats().frames, 0);
    }

    #[test]
    fn test_begin_is_idempotent() {
        let (mut engine, _peer) = started();
        assert!(engine.is_ready());
        assert!(engine.begin().is_ok());
    }

    #[test]
    fn test_tick_dispatches_frames() {
        let (mut engine, peer) = started();
        let seen = count_switches(&mut engine);

        peer.connect();
        peer.send(b"{\"widgetId\":\"sw1\",\"type\":\"switch\",\"event\":\"turnon\"}\r\n");
        peer.send_line(r#"{"widgetId":"sw2","type":"switch","event":"toggle","payload":{"isOn":true}}"#);
        engine.tick();

        assert_eq!(
            *seen.lock(),
            vec![("sw1".to_string(), true), ("sw2".to_string(), true)]
        );
        let stats = engine.stats();
        assert_eq!(stats.frames, 2);
        assert_eq!(stats.handled_events, 2);
    }

    #[test]
    fn test_frame_split_across_ticks() {
        let (mut engine, peer) = started();
        let seen = count_switches(&mut engine);
        peer.connect();

        peer.send(br#"{"widgetId":"sw1","type":"sw"#);
        engine.tick();
        assert!(seen.lock().is_empty());

        peer.send(b"itch\",\"event\":\"turnoff\"}\n");
        engine.tick();
        assert_eq!(*seen.lock(), vec![("sw1".to_string(), false)]);
    }

    #[test]
    fn test_reconnect_discards_partial_line() {
        let (mut engine, peer) = started();
        let seen = count_switches(&mut engine);

        peer.connect();
        engine.tick();
        peer.send(br#"{"widgetId":"stale","type":"switch","#);
        engine.tick();

        peer.disconnect();
        engine.tick();
        peer.connect();
        peer.send_line(r#"{"widgetId":"fresh","type":"switch","event":"turnon"}"#);
        engine.tick();

        assert_eq!(*seen.lock(), vec![("fresh".to_string(), true)]);
        assert_eq!(engine.stats().decode_errors, 0);
    }

    #[test]
    fn test_reconnect_between_ticks_discards_partial_line() {
        let (mut engine, peer) = started();
        let seen = count_switches(&mut engine);

        peer.connect();
        peer.send(br#"{"widgetId":"stale","type":"switch","#);
        engine.tick();
        assert_eq!(engine.reassembler.pending(), 36);

        // No tick sees the client gone.
        peer.disconnect();
        peer.connect();
        peer.send_line(r#"{"widgetId":"fresh","type":"switch","event":"turnon"}"#);
        engine.tick();

        assert_eq!(*seen.lock(), vec![("fresh".to_string(), true)]);
        assert_eq!(engine.stats().decode_errors, 0);
    }

    #[tokio::test]
    async fn test_replaced_tcp_client_starts_clean() {
        let config = DeviceConfig::new()
            .with_dashboard_id("dash")
            .with_device_id("dev1");
        let mut engine = Engine::new(TcpServerTransport::localhost()).with_config(config);
        engine.begin().expect("begin");
        let addr = engine.transport().local_addr().expect("bound");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        engine.handlers_mut().on_switch(move |event, _| {
            sink.lock().push(event.widget_id.to_string());
        });

        let mut first = AsyncTcpStream::connect(addr).await.expect("connect");
        first
            .write_all(br#"{"widgetId":"stale","type":"switch","#)
            .await
            .expect("write");
        for _ in 0..200 {
            engine.tick();
            if engine.reassembler.pending() > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(engine.reassembler.pending() > 0);

        let mut second = AsyncTcpStream::connect(addr).await.expect("connect");
        second
            .write_all(b"{\"widgetId\":\"fresh\",\"type\":\"switch\",\"event\":\"turnon\"}\n")
            .await
            .expect("write");
        for _ in 0..200 {
            engine.tick();
            if !seen.lock().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert_eq!(*seen.lock(), vec!["fresh".to_string()]);
        assert_eq!(engine.stats().decode_errors, 0);
        assert_eq!(engine.transport().session(), 2);
        drop(first);
    }

    #[test]
    fn test_request_handler_reply_reaches_peer() {
        let (mut engine, peer) = started();
        engine.handlers_mut().on_widget_request(|request, out| {
            out.text(request.widget_id)
                .expect("text")
                .set_text("online")
                .expect("reply");
        });
        peer.connect();

        peer.send_line(r#"{"widgetId":"status","type":"text","event":"refresh"}"#);
        engine.tick();

        let lines = peer.take_lines();
        assert_eq!(lines.len(), 1);
        let reply = decode(lines[0].as_bytes()).expect("decode");
        assert_eq!(reply.dashboard_id, "dash");
        assert_eq!(reply.widget_id, "status");
        assert_eq!(reply.widget_type, "text");
        assert_eq!(reply.param("text"), Some("online"));

        let stats = engine.stats();
        assert_eq!(stats.handled_events, 1);
        assert_eq!(stats.messages_sent, 1);
        assert!(engine.registry().get(WidgetKind::Text, "status").is_some());
    }

    #[test]
    fn test_control_event_drives_display() {
        let (mut engine, peer) = started();
        engine.handlers_mut().on_switch(|event, out| {
            out.led("pump_led")
                .expect("led")
                .set_state(event.is_on, 1.0)
                .expect("mirror");
        });
        peer.connect();

        peer.send_line(r#"{"widgetId":"pump","type":"switch","event":"turnon"}"#);
        engine.tick();

        // Brightness first, then the switch-on.
        let lines = peer.take_lines();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.contains(r#""widgetId":"pump_led","type":"led""#)));
        assert!(lines[1].contains(r#""event":"turnon""#));
    }

    #[test]
    fn test_begin_rejects_unsendable_config() {
        let (transport, peer) = MemoryTransport::pair();
        let config = DeviceConfig::new().with_dashboard_id("my \"dash\"");
        let mut engine = Engine::new(transport).with_config(config);

        assert!(matches!(
            engine.begin(),
            Err(Error::InvalidConfig {
                field: "dashboardId",
                ..
            })
        ));
        assert_eq!(engine.state(), EngineState::Uninitialized);
        assert!(!peer.is_started());

        engine.config_mut().dashboard_id = "dash".into();
        assert!(engine.begin().is_ok());
    }

    #[test]
    fn test_bad_frames_counted_not_fatal() {
        let (mut engine, peer) = started();
        let seen = count_switches(&mut engine);
        peer.connect();

        peer.send_line("hello");
        peer.send_line(r#"{"type":"switch","event":"turnon"}"#);
        peer.send_line(r#"{"widgetId":"sw1","type":"switch","event":"bogus"}"#);
        peer.send_line(r#"{"widgetId":"sw1","type":"switch","event":"turnon"}"#);
        engine.tick();

        assert_eq!(seen.lock().len(), 1);
        let stats = engine.stats();
        assert_eq!(stats.frames, 4);
        assert_eq!(stats.decode_errors, 2);
        assert_eq!(stats.dropped_events, 1);
        assert_eq!(stats.dispatched_events, 1);
    }

    #[test]
    fn test_oversize_frame_counted() {
        let (mut engine, peer) = started();
        peer.connect();

        let huge = format!(
            r#"{{"widgetId":"t","type":"text","event":"x","payload":{{"text":"{}"}}}}"#,
            "a".repeat(600)
        );
        peer.send_line(&huge);
        engine.tick();

        let stats = engine.stats();
        assert_eq!(stats.frames, 1);
        assert_eq!(stats.oversize_frames, 1);
        assert_eq!(stats.decode_errors, 1);
    }

    #[test]
    fn test_lenient_payload_truncation_counted() {
        let (mut engine, peer) = started();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        engine.handlers_mut().on_joystick(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        peer.connect();

        peer.send_line(
            r#"{"widgetId":"j","type":"joystick","event":"positionchanged","payload":{"a":1,"b":2,"c":3,"d":4,"e":5,"f":6,"g":7,"h":8,"x":0.5,"y":0.5}}"#,
        );
        engine.tick();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(engine.stats().payload_truncations, 1);
    }

    #[test]
    fn test_strict_payload_rejects_frame() {
        let (transport, peer) = MemoryTransport::pair();
        let mut engine =
            Engine::with_options(transport, EngineOptions::new().with_strict_payload());
        engine.begin().expect("begin");
        peer.connect();

        peer.send_line(
            r#"{"widgetId":"j","type":"joystick","event":"released","payload":{"a":1,"b":2,"c":3,"d":4,"e":5,"f":6,"g":7,"h":8,"i":9}}"#,
        );
        engine.tick();
        assert_eq!(engine.stats().decode_errors, 1);
    }

    #[test]
    fn test_send_without_client() {
        let (mut engine, _peer) = started();
        assert!(matches!(
            engine.send_message("led1", "led", "turnon", None),
            Err(Error::NotConnected)
        ));
        assert_eq!(engine.stats().send_failures, 1);
    }

    #[test]
    fn test_send_before_begin() {
        let (transport, peer) = MemoryTransport::pair();
        peer.connect();
        let mut engine = Engine::new(transport);
        assert!(matches!(
            engine.send_message("led1", "led", "turnon", None),
            Err(Error::NotReady)
        ));
    }

    #[test]
    fn test_send_writes_identity() {
        let (mut engine, peer) = started();
        peer.connect();

        engine
            .send_message("led1", "led", "setbrightness", Some(r#"{"brightness":0.50}"#))
            .expect("send");

        let lines = peer.take_lines();
        assert_eq!(lines.len(), 1);
        let msg = decode(lines[0].as_bytes()).expect("decode");
        assert_eq!(msg.dashboard_id, "dash");
        assert_eq!(msg.device_id, "dev1");
        assert_eq!(msg.widget_id, "led1");
        assert_eq!(msg.param("brightness"), Some("0.50"));
        assert_eq!(engine.stats().messages_sent, 1);
    }

    #[test]
    fn test_oversize_send_rejected() {
        let (mut engine, peer) = started();
        peer.connect();

        let long = format!(r#"{{"text":"{}"}}"#, "x".repeat(TX_BUFFER_SIZE));
        assert!(matches!(
            engine.send_message("t1", "text", "settext", Some(&long)),
            Err(Error::Encode(EncodeError::BufferTooSmall { .. }))
        ));
        assert!(peer.take_written().is_empty());
    }

    #[test]
    fn test_short_write_reported() {
        let (mut engine, peer) = started();
        peer.connect();
        peer.set_write_limit(Some(10));

        assert!(matches!(
            engine.send_message("led1", "led", "turnon", None),
            Err(Error::ShortWrite { written: 10, .. })
        ));
    }

    #[test]
    fn test_widget_accessors_send_typed_commands() {
        let (mut engine, peer) = started();
        peer.connect();

        engine.led("status").expect("led").turn_on().expect("send");
        engine
            .gauge("temp")
            .expect("gauge")
            .set_value(21.5)
            .expect("send");
        engine.chart("hist").expect("chart").add_value(1.0).expect("send");
        engine.chart("hist").expect("chart").add_value(2.0).expect("send");

        let lines = peer.take_lines();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains(r#""type":"led""#));
        assert!(lines[1].contains(r#""payload":{"value":21.50}"#));
        assert!(lines[3].contains(r#""x":1"#));
        assert_eq!(engine.registry().len(), 3);
    }

    #[test]
    fn test_registry_capacity_from_options() {
        let (transport, _peer) = MemoryTransport::pair();
        let mut engine = Engine::with_options(transport, EngineOptions::new().with_max_widgets(1));

        assert!(engine.text("a").is_ok());
        assert!(matches!(
            engine.text("b"),
            Err(Error::RegistryFull {
                kind: WidgetKind::Text,
                capacity: 1
            })
        ));
        assert!(engine.text("a").is_ok());
    }

    #[test]
    fn test_config_change_applies_to_next_send() {
        let (mut engine, peer) = started();
        peer.connect();

        engine.config_mut().dashboard_id = "other".into();
        engine.send_message("m", "metric", "setvalue", None).expect("send");

        let lines = peer.take_lines();
        assert!(lines[0].starts_with(r#"{"dashboardId":"other""#));
    }
}
