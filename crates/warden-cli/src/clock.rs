//! Clock selection for the CLI

use async_trait::async_trait;
use warden_core::{PhysicalTimeEffects, SystemClock, TimeError, Timestamp};

/// Wall clock, or a pinned reading from `--at` for scripted runs.
#[derive(Debug, Clone, Copy)]
pub enum HostClock {
    System(SystemClock),
    Fixed(Timestamp),
}

impl HostClock {
    pub fn from_override(at: Option<u64>) -> Self {
        match at {
            Some(secs) => Self::Fixed(Timestamp::from_secs(secs)),
            None => Self::System(SystemClock::new()),
        }
    }
}

#[async_trait]
impl PhysicalTimeEffects for HostClock {
    async fn physical_time(&self) -> Result<Timestamp, TimeError> {
        match self {
            Self::System(clock) => clock.physical_time().await,
            Self::Fixed(at) => Ok(*at),
        }
    }
}
