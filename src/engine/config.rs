//! Device identity configuration.
//!
//! Every outbound frame carries the dashboard id and device id from the
//! engine's [`DeviceConfig`]. The config can be built in code or loaded
//! from JSON.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "dashboardId": "greenhouse",
//!   "deviceId": "esp32_A1B2C3D4",
//!   "deviceName": "Greenhouse Controller"
//! }
//! ```
//!
//! Missing keys take their defaults. Every field is cut to
//! [`MAX_ID_LENGTH`] bytes, and ids that would break a frame are rejected
//! when loading and again by [`Engine::begin`](crate::Engine::begin).

// ============================================================================
// Imports
// ============================================================================

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::protocol::encode::is_frame_safe;
use crate::widgets::registry::truncate_id;

// ============================================================================
// Constants
// ============================================================================

/// Dashboard id used until one is configured.
pub const DEFAULT_DASHBOARD_ID: &str = "default";

/// Device name used until one is configured.
pub const DEFAULT_DEVICE_NAME: &str = "Dashlink Device";

/// Longest id or name kept, in bytes.
pub const MAX_ID_LENGTH: usize = crate::widgets::MAX_WIDGET_ID_LENGTH;

// ============================================================================
// DeviceConfig
// ============================================================================

/// Identity stamped on outbound frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceConfig {
    /// Dashboard the device belongs to.
    pub dashboard_id: String,

    /// Unique device id.
    pub device_id: String,

    /// Human-readable device name.
    pub device_name: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            dashboard_id: DEFAULT_DASHBOARD_ID.to_string(),
            device_id: generate_device_id(),
            device_name: DEFAULT_DEVICE_NAME.to_string(),
        }
    }
}

/// Generates `device_XXXXXXXX` from a random UUID.
fn generate_device_id() -> String {
    let (head, ..) = Uuid::new_v4().as_fields();
    format!("device_{head:08X}")
}

// ============================================================================
// Constructors
// ============================================================================

impl DeviceConfig {
    /// Creates a config with defaults and a fresh device id.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a config from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the text is not a valid config object, or
    /// Returns [`Error::InvalidConfig`] if an id cannot be sent.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(json)?;
        config.truncate_fields();
        config.validate()?;
        Ok(config)
    }

    /// Loads a config from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, otherwise as
    /// [`from_json`](Self::from_json).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Serializes the config as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

// ============================================================================
// Validation
// ============================================================================

impl DeviceConfig {
    /// Checks that both ids can be stamped on outbound frames.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if an id is empty, longer than
    /// [`MAX_ID_LENGTH`], or contains a quote, backslash or control character.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("dashboardId", &self.dashboard_id),
            ("deviceId", &self.device_id),
        ] {
            if value.is_empty() {
                return Err(Error::invalid_config(field, "empty"));
            }
            if value.len() > MAX_ID_LENGTH {
                return Err(Error::invalid_config(field, "too long"));
            }
            if !is_frame_safe(value) {
                return Err(Error::invalid_config(
                    field,
                    "quote, backslash or control character",
                ));
            }
        }
        Ok(())
    }

    fn truncate_fields(&mut self) {
        for field in [
            &mut self.dashboard_id,
            &mut self.device_id,
            &mut self.device_name,
        ] {
            let len = truncate_id(field).len();
            field.truncate(len);
        }
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl DeviceConfig {
    /// Sets the dashboard id, cut to [`MAX_ID_LENGTH`] bytes.
    #[inline]
    #[must_use]
    pub fn with_dashboard_id(mut self, id: impl Into<String>) -> Self {
        self.dashboard_id = id.into();
        self.truncate_fields();
        self
    }

    /// Sets the device id, cut to [`MAX_ID_LENGTH`] bytes.
    #[inline]
    #[must_use]
    pub fn with_device_id(mut self, id: impl Into<String>) -> Self {
        self.device_id = id.into();
        self.truncate_fields();
        self
    }

    /// Sets the device name.
    #[inline]
    #[must_use]
    pub fn with_device_name(mut self, name: impl Into<String>) -> Self {
        self.device_name = name.into();
        self.truncate_fields();
        self
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
        let config = DeviceConfig::new();
        assert_eq!(config.dashboard_id, "default");
        assert_eq!(config.device_name, "Dashlink Device");

        let hex = config.device_id.strip_prefix("device_").expect("prefix");
        assert_eq!(hex.len(), 8);
        assert!(hex.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_device_id_generated_once() {
        let config = DeviceConfig::new();
        let copy = config.clone();
        assert_eq!(config.device_id, copy.device_id);
    }

    #[test]
    fn test_builder() {
        let config = DeviceConfig::new()
            .with_dashboard_id("greenhouse")
            .with_device_id("esp32_01")
            .with_device_name("Greenhouse");
        assert_eq!(config.dashboard_id, "greenhouse");
        assert_eq!(config.device_id, "esp32_01");
        assert_eq!(config.device_name, "Greenhouse");
    }

    #[test]
    fn test_from_json_partial() {
        let config = DeviceConfig::from_json(r#"{"dashboardId":"lab"}"#).expect("parse");
        assert_eq!(config.dashboard_id, "lab");
        assert!(config.device_id.starts_with("device_"));
        assert_eq!(config.device_name, DEFAULT_DEVICE_NAME);
    }

    #[test]
    fn test_json_round_trip_keys() {
        let config = DeviceConfig::new().with_device_id("abc");
        let json = config.to_json().expect("serialize");
        assert!(json.contains(r#""deviceId":"abc""#));
        assert_eq!(DeviceConfig::from_json(&json).expect("parse"), config);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(
            DeviceConfig::from_json("[1,2]"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_builder_truncates_ids() {
        let config = DeviceConfig::new()
            .with_dashboard_id("d".repeat(40))
            .with_device_id("é".repeat(20))
            .with_device_name("n".repeat(32));

        assert_eq!(config.dashboard_id.len(), MAX_ID_LENGTH);
        // Cut on a char boundary: 15 two-byte chars.
        assert_eq!(config.device_id, "é".repeat(15));
        assert_eq!(config.device_name.len(), MAX_ID_LENGTH);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unsendable_ids() {
        let quoted = DeviceConfig::new().with_dashboard_id("my\"dash");
        assert!(matches!(
            quoted.validate(),
            Err(Error::InvalidConfig { field: "dashboardId", .. })
        ));

        let empty = DeviceConfig::new().with_device_id("");
        assert!(matches!(
            empty.validate(),
            Err(Error::InvalidConfig { field: "deviceId", reason: "empty" })
        ));

        let mut edited = DeviceConfig::new();
        edited.device_id = "x".repeat(MAX_ID_LENGTH + 1);
        assert!(matches!(
            edited.validate(),
            Err(Error::InvalidConfig { reason: "too long", .. })
        ));
    }

    #[test]
    fn test_from_json_truncates_and_validates() {
        let long = format!(r#"{{"dashboardId":"{}"}}"#, "a".repeat(50));
        let config = DeviceConfig::from_json(&long).expect("parse");
        assert_eq!(config.dashboard_id.len(), MAX_ID_LENGTH);

        assert!(matches!(
            DeviceConfig::from_json(r#"{"deviceId":"tab\there"}"#),
            Err(Error::InvalidConfig { field: "deviceId", .. })
        ));
    }

    #[test]
    fn test_from_missing_file() {
        assert!(matches!(
            DeviceConfig::from_file("/nonexistent/dashlink.json"),
            Err(Error::Io(_))
        ));
    }
}
