//! Core configuration traits

use serde::de::DeserializeOwned;
use std::path::Path;

use crate::{WardenError, WardenResult};

/// Trait for configuration defaults
pub trait ConfigDefaults {
    /// Get default values for this configuration
    fn defaults() -> Self;
}

/// Trait for configuration validation
pub trait ConfigValidation {
    /// Validate this configuration
    fn validate(&self) -> WardenResult<()>;
}

/// Load and validate a TOML configuration file.
///
/// A missing file yields the defaults, so a fresh checkout runs without any
/// configuration on disk.
pub fn load_toml<T>(path: &Path) -> WardenResult<T>
where
    T: DeserializeOwned + ConfigDefaults + ConfigValidation,
{
    if !path.exists() {
        tracing::debug!(path = %path.display(), "config file absent, using defaults");
        return Ok(T::defaults());
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        WardenError::storage(format!(
            "Failed to read config file {}: {e}",
            path.display()
        ))
    })?;

    let config: T = toml::from_str(&content).map_err(|e| {
        WardenError::invalid(format!(
            "Failed to parse config file {}: {e}",
            path.display()
        ))
    })?;

    config.validate()?;
    Ok(config)
}
