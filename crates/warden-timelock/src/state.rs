//! Durable controller state.
//!
//! Three elements, all owned by the controller: the current owner, the timelock
//! configuration, and the single pending-request slot. Nothing outside the
//! controller mutates them; callers see them through [`TimelockView`] and the
//! [`RoleSnapshot`] the access guard reads.

use serde::{Deserialize, Serialize};
use warden_core::{PrincipalId, TimelockDefaults, TimelockDelay, Timestamp};
use warden_guards::RoleSnapshot;

/// Pre-authorized successor and the minimum wait before it may claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelockConfig {
    pub candidate: PrincipalId,
    pub delay: TimelockDelay,
}

impl TimelockConfig {
    /// Earliest time a request raised at `requested_at` may complete.
    pub fn ready_at(&self, requested_at: Timestamp) -> Timestamp {
        requested_at.saturating_add(self.delay)
    }

    /// `now >= requested_at + delay`; the boundary second itself is ready.
    pub fn is_ready(&self, requested_at: Timestamp, now: Timestamp) -> bool {
        now >= self.ready_at(requested_at)
    }
}

/// The single pending-request slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UnlockRequest {
    #[default]
    Idle,
    Pending { requested_at: Timestamp },
}

impl UnlockRequest {
    pub fn requested_at(&self) -> Option<Timestamp> {
        match self {
            Self::Idle => None,
            Self::Pending { requested_at } => Some(*requested_at),
        }
    }

    /// Requested time, or zero when idle.
    pub fn requested_at_or_zero(&self) -> Timestamp {
        self.requested_at().unwrap_or(Timestamp::ZERO)
    }
}

/// Everything the controller persists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipState {
    pub owner: PrincipalId,
    pub timelock: TimelockConfig,
    pub request: UnlockRequest,
}

impl OwnershipState {
    /// Bootstrap state: `initializer` owns, the null principal is the
    /// candidate, the default delay applies, and nothing is pending.
    pub fn new(initializer: PrincipalId, defaults: &TimelockDefaults) -> Self {
        Self {
            owner: initializer,
            timelock: TimelockConfig {
                candidate: PrincipalId::NULL,
                delay: defaults.default_delay(),
            },
            request: UnlockRequest::Idle,
        }
    }

    /// The `getOwnerTimelock` tuple.
    pub fn view(&self) -> TimelockView {
        TimelockView {
            candidate: self.timelock.candidate,
            delay: self.timelock.delay,
            requested_at: self.request.requested_at_or_zero(),
        }
    }
}

impl RoleSnapshot for OwnershipState {
    fn owner(&self) -> PrincipalId {
        self.owner
    }

    fn candidate(&self) -> PrincipalId {
        self.timelock.candidate
    }
}

/// Read-only `(candidate, delay, requested_at)` view; `requested_at` is zero
/// when no request is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelockView {
    pub candidate: PrincipalId,
    pub delay: TimelockDelay,
    pub requested_at: Timestamp,
}

impl TimelockView {
    pub fn into_tuple(self) -> (PrincipalId, TimelockDelay, Timestamp) {
        (self.candidate, self.delay, self.requested_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::DEFAULT_TIMELOCK_DELAY;

    #[test]
    fn bootstrap_state() {
        let owner = PrincipalId::from_label("a");
        let state = OwnershipState::new(owner, &TimelockDefaults::default());
        assert_eq!(state.owner, owner);
        assert_eq!(
            state.view().into_tuple(),
            (PrincipalId::NULL, DEFAULT_TIMELOCK_DELAY, Timestamp::ZERO)
        );
    }

    #[test]
    fn readiness_boundary_is_inclusive() {
        let config = TimelockConfig {
            candidate: PrincipalId::from_label("b"),
            delay: TimelockDelay::from_secs(100),
        };
        let requested_at = Timestamp::from_secs(1_000);
        assert!(!config.is_ready(requested_at, Timestamp::from_secs(1_099)));
        assert!(config.is_ready(requested_at, Timestamp::from_secs(1_100)));
        assert!(config.is_ready(requested_at, Timestamp::from_secs(1_101)));
    }

    #[test]
    fn readiness_saturates_instead_of_wrapping() {
        let config = TimelockConfig {
            candidate: PrincipalId::from_label("b"),
            delay: TimelockDelay::from_secs(u64::MAX),
        };
        assert!(!config.is_ready(Timestamp::from_secs(5), Timestamp::from_secs(u64::MAX - 1)));
    }

    #[test]
    fn request_serializes_with_status_tag() {
        let pending = UnlockRequest::Pending {
            requested_at: Timestamp::from_secs(42),
        };
        let json = serde_json::to_value(pending).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["requested_at"], 42);
        assert_eq!(
            serde_json::to_value(UnlockRequest::Idle).unwrap()["status"],
            "idle"
        );
    }
}
