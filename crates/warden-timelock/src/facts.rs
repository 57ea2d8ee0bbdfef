//! Audit facts emitted by committed transitions.
//!
//! Facts are the only history the controller leaves behind. A consumer that
//! replays them in sequence order (see [`crate::history`]) can reconstruct
//! every ownership change and every pending-request lifecycle.

use serde::{Deserialize, Serialize};
use warden_core::{PrincipalId, TimelockDelay};

/// Timelock domain facts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum TimelockFact {
    /// Owner replaced the candidate and delay; any pending request is void.
    TimelockConfigured {
        candidate: PrincipalId,
        delay: TimelockDelay,
    },

    /// Candidate started (or restarted) the waiting period.
    TimelockInitiated { candidate: PrincipalId },

    /// Owner cleared the pending-request slot.
    TimelockCanceled,

    /// Role moved from `previous_owner` to `new_owner`.
    ///
    /// The first record of every log carries the null principal as
    /// `previous_owner` and the initializer as `new_owner`.
    OwnershipTransferred {
        previous_owner: PrincipalId,
        new_owner: PrincipalId,
    },
}

impl TimelockFact {
    /// Fact recorded when a controller is created.
    pub fn genesis(initializer: PrincipalId) -> Self {
        Self::OwnershipTransferred {
            previous_owner: PrincipalId::NULL,
            new_owner: initializer,
        }
    }

    /// Stable event name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::TimelockConfigured { .. } => "TimelockConfigured",
            Self::TimelockInitiated { .. } => "TimelockInitiated",
            Self::TimelockCanceled => "TimelockCanceled",
            Self::OwnershipTransferred { .. } => "OwnershipTransferred",
        }
    }
}

impl std::fmt::Display for TimelockFact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TimelockConfigured { candidate, delay } => {
                write!(f, "TimelockConfigured({candidate}, {delay})")
            }
            Self::TimelockInitiated { candidate } => write!(f, "TimelockInitiated({candidate})"),
            Self::TimelockCanceled => write!(f, "TimelockCanceled()"),
            Self::OwnershipTransferred {
                previous_owner,
                new_owner,
            } => write!(f, "OwnershipTransferred({previous_owner}, {new_owner})"),
        }
    }
}
