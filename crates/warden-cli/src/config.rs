//! CLI configuration file
//!
//! ```toml
//! [timelock]
//! default_delay_secs = 31536000
//!
//! [storage]
//! state_path = "state.json"
//! audit_path = "audit.jsonl"
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Relative storage paths resolve against the directory holding the config
//! file, so the default `.warden/config.toml` keeps everything under `.warden/`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use warden_core::{load_toml, ConfigDefaults, ConfigValidation, TimelockDefaults, WardenError, WardenResult};

/// Default location of the config file.
pub const DEFAULT_CONFIG_PATH: &str = ".warden/config.toml";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Where state and audit records live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct StorageConfig {
    pub state_path: PathBuf,
    pub audit_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from("state.json"),
            audit_path: PathBuf::from("audit.jsonl"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LoggingConfig {
    /// Default filter level; `RUST_LOG` takes precedence when set.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct CliConfig {
    pub timelock: TimelockDefaults,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

impl ConfigDefaults for CliConfig {
    fn defaults() -> Self {
        Self::default()
    }
}

impl ConfigValidation for CliConfig {
    fn validate(&self) -> WardenResult<()> {
        self.timelock.validate()?;

        if self.storage.state_path.as_os_str().is_empty() {
            return Err(WardenError::invalid("storage.state_path must not be empty"));
        }
        if self.storage.audit_path.as_os_str().is_empty() {
            return Err(WardenError::invalid("storage.audit_path must not be empty"));
        }
        if self.storage.state_path == self.storage.audit_path {
            return Err(WardenError::invalid(
                "storage.state_path and storage.audit_path must differ",
            ));
        }

        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(WardenError::invalid(format!(
                "logging.level must be one of {LOG_LEVELS:?}, got {:?}",
                self.logging.level
            )));
        }
        Ok(())
    }
}

impl CliConfig {
    /// Load from `path` and resolve storage paths against its directory.
    pub fn load(path: &Path) -> WardenResult<Self> {
        let mut config: Self = load_toml(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.storage.state_path = base.join(&config.storage.state_path);
        config.storage.audit_path = base.join(&config.storage.audit_path);
        Ok(config)
    }
}
