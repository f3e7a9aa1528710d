//! Protocol engine.
//!
//! The [`Engine`] ties a transport to the codec, the handler table and the
//! widget registry.
//!
//! # Lifecycle
//!
//! ```text
//! Engine::new ──► Uninitialized ──begin()──► Ready ──tick()──► Ready
//!                      │                       ▲
//!                      └── begin() fails ──────┘ (retry allowed)
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `config` | Device identity ([`DeviceConfig`]) |
//! | `core` | [`Engine`] and its tick loop |
//! | `driver` | Optional tokio tick driver |
//! | `options` | Runtime options ([`EngineOptions`]) |
//! | `stats` | Counters ([`EngineStats`]) |

// ============================================================================
// Submodules
// ============================================================================

/// Device identity.
pub mod config;

/// Engine and tick loop.
pub mod core;

/// Async tick driver.
pub mod driver;

/// Runtime options.
pub mod options;

/// Engine counters.
pub mod stats;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::DeviceConfig;
pub use self::core::{Engine, EngineState};
pub use driver::{DEFAULT_TICK_PERIOD, run};
pub use options::{EngineOptions, READ_CHUNK_SIZE};
pub use stats::EngineStats;
