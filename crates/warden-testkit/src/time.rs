//! Controllable time sources for deterministic testing

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use warden_core::{PhysicalTimeEffects, TimeError, Timestamp, ONE_DAY_SECS};

/// Clock that only moves when a test moves it.
///
/// Clones share the same reading, so a test can keep one handle while the
/// service under test owns another.
#[derive(Debug, Clone)]
pub struct ControllableClock {
    current: Arc<Mutex<Timestamp>>,
}

impl ControllableClock {
    /// Create a clock reading `initial`
    pub fn new(initial: Timestamp) -> Self {
        Self {
            current: Arc::new(Mutex::new(initial)),
        }
    }

    /// Create a clock reading `secs` since the epoch
    pub fn at_secs(secs: u64) -> Self {
        Self::new(Timestamp::from_secs(secs))
    }

    /// Current reading
    pub fn now(&self) -> Timestamp {
        *self.current.lock()
    }

    /// Set absolute time
    pub fn set(&self, timestamp: Timestamp) {
        *self.current.lock() = timestamp;
    }

    /// Advance time by the given number of seconds
    pub fn advance_secs(&self, secs: u64) {
        let mut current = self.current.lock();
        *current = Timestamp::from_secs(current.as_secs().saturating_add(secs));
    }

    /// Advance time by whole days
    pub fn advance_days(&self, days: u64) {
        self.advance_secs(days.saturating_mul(ONE_DAY_SECS));
    }
}

#[async_trait]
impl PhysicalTimeEffects for ControllableClock {
    async fn physical_time(&self) -> Result<Timestamp, TimeError> {
        Ok(self.now())
    }
}

/// Clock that always fails, for exercising host-error paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingClock;

#[async_trait]
impl PhysicalTimeEffects for FailingClock {
    async fn physical_time(&self) -> Result<Timestamp, TimeError> {
        Err(TimeError::ServiceUnavailable {
            reason: "clock disabled for test".to_string(),
        })
    }
}
