//! Engine runtime options.
//!
//! # Example
//!
//! ```ignore
//! use dashlink::{EngineOptions, protocol::PayloadPolicy};
//!
//! let options = EngineOptions::new()
//!     .with_max_widgets(32)
//!     .with_payload_policy(PayloadPolicy::Strict);
//! ```

// ============================================================================
// Imports
// ============================================================================

use crate::protocol::PayloadPolicy;
use crate::widgets::MAX_WIDGETS;

// ============================================================================
// Constants
// ============================================================================

/// Bytes pulled from the transport per read call.
pub const READ_CHUNK_SIZE: usize = 64;

// ============================================================================
// EngineOptions
// ============================================================================

/// Engine tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Widgets allowed per display family.
    pub max_widgets: usize,

    /// What to do with payloads over the parameter cap.
    pub payload_policy: PayloadPolicy,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl EngineOptions {
    /// Creates options with default settings.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_widgets: MAX_WIDGETS,
            payload_policy: PayloadPolicy::Lenient,
        }
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl EngineOptions {
    /// Sets the per-family widget capacity.
    #[inline]
    #[must_use]
    pub const fn with_max_widgets(mut self, max_widgets: usize) -> Self {
        self.max_widgets = max_widgets;
        self
    }

    /// Sets the payload cap policy.
    #[inline]
    #[must_use]
    pub const fn with_payload_policy(mut self, policy: PayloadPolicy) -> Self {
        self.payload_policy = policy;
        self
    }

    /// Rejects messages whose payload exceeds the parameter cap.
    #[inline]
    #[must_use]
    pub const fn with_strict_payload(self) -> Self {
        self.with_payload_policy(PayloadPolicy::Strict)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = EngineOptions::default();
        assert_eq!(options.max_widgets, 16);
        assert_eq!(options.payload_policy, PayloadPolicy::Lenient);
    }

    #[test]
    fn test_builder_chain() {
        let options = EngineOptions::new().with_max_widgets(4).with_strict_payload();
        assert_eq!(options.max_widgets, 4);
        assert_eq!(options.payload_policy, PayloadPolicy::Strict);
    }
}
