//! Configuration file support for l2switchd
//!
//! Loads and validates l2switchd configuration from TOML files.
//! Default location: /etc/l2switchd/l2switchd.toml

use crate::error::{L2SwitchError, Result};
use sdn_channel::DEFAULT_PRIORITY;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Default configuration file location.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/l2switchd/l2switchd.toml";

/// Flow rule installation parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Idle timeout handed to the switch, in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u16,

    /// Hard timeout handed to the switch, in seconds (0 = none)
    #[serde(default = "default_hard_timeout")]
    pub hard_timeout_secs: u16,

    /// Priority of learned forwarding rules
    #[serde(default = "default_priority")]
    pub priority: u16,
}

/// Session lifecycle parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Keep learned MACs and blocked ports of a switch across a reconnect
    #[serde(default)]
    pub retain_state_on_reconnect: bool,
}

/// Logging parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive (RUST_LOG takes precedence)
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Complete l2switchd configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct L2SwitchConfig {
    #[serde(default)]
    pub flow: FlowConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_idle_timeout() -> u16 {
    20
}

fn default_hard_timeout() -> u16 {
    40
}

fn default_priority() -> u16 {
    DEFAULT_PRIORITY
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout(),
            hard_timeout_secs: default_hard_timeout(),
            priority: default_priority(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl L2SwitchConfig {
    /// Load configuration from file, falling back to defaults if file not found
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        match fs::read_to_string(path) {
            Ok(content) => {
                let config: Self = toml::from_str(&content).map_err(|e| {
                    L2SwitchError::config(format!(
                        "Failed to parse config file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                config.validate()?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "Config file not found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(L2SwitchError::Io(e)),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.flow.idle_timeout_secs == 0 {
            return Err(L2SwitchError::config("flow.idle_timeout_secs must be > 0"));
        }

        if self.flow.hard_timeout_secs != 0
            && self.flow.idle_timeout_secs > self.flow.hard_timeout_secs
        {
            return Err(L2SwitchError::config(
                "flow.idle_timeout_secs must not exceed flow.hard_timeout_secs",
            ));
        }

        if self.logging.level.trim().is_empty() {
            return Err(L2SwitchError::config("logging.level must not be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = L2SwitchConfig::default();
        assert_eq!(config.flow.idle_timeout_secs, 20);
        assert_eq!(config.flow.hard_timeout_secs, 40);
        assert_eq!(config.flow.priority, 0x8000);
        assert!(!config.session.retain_state_on_reconnect);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_deserialization_partial() {
        let toml_str = r#"
[flow]
idle_timeout_secs = 10

[session]
retain_state_on_reconnect = true
"#;
        let config: L2SwitchConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.flow.idle_timeout_secs, 10);
        // Unspecified values should use defaults
        assert_eq!(config.flow.hard_timeout_secs, 40);
        assert!(config.session.retain_state_on_reconnect);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_validate_zero_idle_timeout() {
        let mut config = L2SwitchConfig::default();
        config.flow.idle_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_idle_exceeds_hard() {
        let mut config = L2SwitchConfig::default();
        config.flow.idle_timeout_secs = 60;
        assert!(config.validate().is_err());

        // No hard timeout means any idle timeout is acceptable.
        config.flow.hard_timeout_secs = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_nonexistent_file_defaults() {
        let config = L2SwitchConfig::load_or_default("/nonexistent/l2switchd.toml").unwrap();
        assert_eq!(config, L2SwitchConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[flow]\nhard_timeout_secs = 120\n[logging]\nlevel = \"debug\"").unwrap();

        let config = L2SwitchConfig::load_or_default(file.path()).unwrap();
        assert_eq!(config.flow.hard_timeout_secs, 120);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[flow]\nidle_timeout_secs = \"soon\"").unwrap();

        let err = L2SwitchConfig::load_or_default(file.path()).unwrap_err();
        assert!(matches!(err, L2SwitchError::Config(_)));
    }
}
