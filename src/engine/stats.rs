//! Engine counters.

/// Running totals since the engine was created.
///
/// Counters never reset and wrap on overflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Complete frames taken from the reassembler.
    pub frames: u64,
    /// Frames that overflowed the line buffer and were truncated.
    pub oversize_frames: u64,
    /// Frames rejected by the decoder.
    pub decode_errors: u64,
    /// Decoded messages that lost payload members over the cap.
    pub payload_truncations: u64,
    /// Messages that did not map to any event.
    pub dropped_events: u64,
    /// Messages classified into an event (with or without a handler).
    pub dispatched_events: u64,
    /// Messages that ran a registered handler.
    pub handled_events: u64,
    /// Frames fully written to the transport.
    pub messages_sent: u64,
    /// Sends that failed for any reason.
    pub send_failures: u64,
}
