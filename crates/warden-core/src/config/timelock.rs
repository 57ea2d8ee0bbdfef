//! Timelock bootstrap defaults

use serde::{Deserialize, Serialize};

use super::{ConfigDefaults, ConfigValidation};
use crate::{TimelockDelay, WardenResult, DEFAULT_TIMELOCK_DELAY};

/// Values installed when a controller is created.
///
/// The candidate is always the null principal at creation; only the delay is
/// configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct TimelockDefaults {
    /// Delay in seconds applied until the owner configures one.
    pub default_delay_secs: u64,
}

impl TimelockDefaults {
    /// The default delay as a typed value
    pub fn default_delay(&self) -> TimelockDelay {
        TimelockDelay::from_secs(self.default_delay_secs)
    }
}

impl Default for TimelockDefaults {
    fn default() -> Self {
        Self {
            default_delay_secs: DEFAULT_TIMELOCK_DELAY.as_secs(),
        }
    }
}

impl ConfigDefaults for TimelockDefaults {
    fn defaults() -> Self {
        Self::default()
    }
}

impl ConfigValidation for TimelockDefaults {
    // Any delay is accepted, including zero.
    fn validate(&self) -> WardenResult<()> {
        Ok(())
    }
}
