//! Timestamps and timelock delays.
//!
//! Both are whole seconds. The host clock is read once per operation and handed
//! to the protocol as a `Timestamp`, so nothing below ever compares two clock
//! readings taken at different points of the same call.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Seconds in one day.
pub const ONE_DAY_SECS: u64 = 24 * 60 * 60;

/// Delay installed when a controller is first created.
pub const DEFAULT_TIMELOCK_DELAY: TimelockDelay = TimelockDelay::from_days(365);

/// Unix timestamp in seconds.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Zero timestamp, rendered for an idle unlock request.
    pub const ZERO: Timestamp = Timestamp(0);

    /// Create from Unix seconds
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Unix seconds
    pub const fn as_secs(&self) -> u64 {
        self.0
    }

    /// Add a delay, clamping at `u64::MAX` instead of wrapping.
    pub fn saturating_add(self, delay: TimelockDelay) -> Self {
        Self(self.0.saturating_add(delay.0))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// Minimum waiting period between initiating and completing an unlock.
///
/// No bounds are enforced: zero is a valid delay and means the candidate may
/// complete in the same second it initiates.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TimelockDelay(pub u64);

impl TimelockDelay {
    /// Create from seconds
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Create from whole days
    pub const fn from_days(days: u64) -> Self {
        Self(days * ONE_DAY_SECS)
    }

    /// Delay in seconds
    pub const fn as_secs(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimelockDelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 != 0 && self.0 % ONE_DAY_SECS == 0 {
            write!(f, "{}d", self.0 / ONE_DAY_SECS)
        } else {
            write!(f, "{}s", self.0)
        }
    }
}
