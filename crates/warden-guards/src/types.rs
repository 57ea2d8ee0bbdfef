//! Guard decision vocabulary.

use serde::{Deserialize, Serialize};
use warden_core::PrincipalId;

use crate::Operation;

/// Read-only view of who currently holds each role.
pub trait RoleSnapshot {
    /// Current owner.
    fn owner(&self) -> PrincipalId;

    /// Candidate named in the current timelock configuration.
    fn candidate(&self) -> PrincipalId;
}

/// Structured guard violation reasons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuardViolation {
    /// Operation is restricted to the owner.
    RestrictedToOwner {
        operation: Operation,
        caller: PrincipalId,
    },
    /// Caller is not the configured candidate.
    AddressDenied {
        operation: Operation,
        caller: PrincipalId,
    },
}

impl GuardViolation {
    /// Operation that was denied.
    pub fn operation(&self) -> Operation {
        match self {
            Self::RestrictedToOwner { operation, .. } | Self::AddressDenied { operation, .. } => {
                *operation
            }
        }
    }

    /// Caller that was denied.
    pub fn caller(&self) -> PrincipalId {
        match self {
            Self::RestrictedToOwner { caller, .. } | Self::AddressDenied { caller, .. } => *caller,
        }
    }
}

impl std::fmt::Display for GuardViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GuardViolation::RestrictedToOwner { operation, caller } => {
                write!(f, "{operation}: restricted to owner (caller {caller})")
            }
            GuardViolation::AddressDenied { operation, caller } => {
                write!(f, "{operation}: address denied (caller {caller})")
            }
        }
    }
}

/// Decision from guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuardDecision {
    /// Operation is allowed.
    Allow,
    /// Operation is denied with a reason.
    Deny { reason: GuardViolation },
}

impl GuardDecision {
    /// Create a deny decision with a reason.
    pub fn deny(reason: GuardViolation) -> Self {
        Self::Deny { reason }
    }

    /// Returns the denial reason, if denied.
    pub fn denial_reason(&self) -> Option<&GuardViolation> {
        match self {
            Self::Allow => None,
            Self::Deny { reason } => Some(reason),
        }
    }

    /// Convert into a `Result`, for use with `?`.
    pub fn into_result(self) -> Result<(), GuardViolation> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny { reason } => Err(reason),
        }
    }
}
