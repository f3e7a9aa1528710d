//! Async tick driver.
//!
//! Applications that already run a tokio runtime can hand the engine to
//! [`run`] instead of writing their own loop. The driver awaits a
//! [`tokio::time::interval`] between ticks and never spawns tasks, so the
//! engine stays on the caller's task.

// ============================================================================
// Imports
// ============================================================================

use std::future::Future;
use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

use super::core::Engine;
use crate::error::Result;
use crate::transport::Transport;

// ============================================================================
// Constants
// ============================================================================

/// Default time between ticks.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(10);

/// Shortest accepted tick period.
const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);

// ============================================================================
// Public API
// ============================================================================

/// Starts the engine if needed, then ticks it every `period` until
/// `shutdown` resolves.
///
/// Periods under one millisecond are raised to one millisecond.
///
/// # Errors
///
/// Returns [`Error::TransportBegin`](crate::Error::TransportBegin) if the
/// engine was not started and the transport fails to start.
///
/// # Example
///
/// ```ignore
/// let (transport, _peer) = MemoryTransport::pair();
/// let mut engine = Engine::new(transport);
/// run(&mut engine, DEFAULT_TICK_PERIOD, tokio::signal::ctrl_c().map(|_| ())).await?;
/// ```
pub async fn run<T, F>(engine: &mut Engine<T>, period: Duration, shutdown: F) -> Result<()>
where
    T: Transport,
    F: Future<Output = ()>,
{
    engine.begin()?;

    let period = period.max(MIN_TICK_PERIOD);
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    debug!(?period, "Tick driver started");
    let mut ticks: u64 = 0;

    loop {
        tokio::select! {
            () = &mut shutdown => break,
            _ = ticker.tick() => {
                engine.tick();
                ticks = ticks.wrapping_add(1);
            }
        }
    }

    info!(ticks, "Tick driver stopped");
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
