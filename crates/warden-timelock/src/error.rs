//! Timelock protocol errors.
//!
//! Every variant aborts the triggering call with no state change and no audit
//! record. The four protocol variants render as fixed reason strings so callers
//! and tests can assert on the cause.

use serde::{Deserialize, Serialize};
use warden_core::{AuditError, PrincipalId, TimeError, Timestamp, WardenError};
use warden_guards::{GuardViolation, Operation};

/// Broad classification of a rejected call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Caller does not hold the role the operation requires
    Authorization,
    /// Operation requires a pending request and none exists
    ProtocolState,
    /// The delay has not elapsed yet
    Timing,
    /// Clock, audit log or state store failure
    Host,
}

/// Errors returned by timelock operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimelockError {
    #[error("restricted to owner")]
    NotAuthorized {
        operation: Operation,
        caller: PrincipalId,
    },

    #[error("Address denied")]
    AddressDenied {
        operation: Operation,
        caller: PrincipalId,
    },

    #[error("Not initialized")]
    NotInitialized,

    #[error("Not yet")]
    TooEarly { ready_at: Timestamp, now: Timestamp },

    #[error("Clock error: {0}")]
    Clock(#[from] TimeError),

    #[error("Audit log error: {0}")]
    Audit(#[from] AuditError),

    #[error("State store error: {0}")]
    Store(#[from] WardenError),
}

impl TimelockError {
    /// Stable human-readable reason.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NotAuthorized { .. } => "restricted to owner",
            Self::AddressDenied { .. } => "Address denied",
            Self::NotInitialized => "Not initialized",
            Self::TooEarly { .. } => "Not yet",
            Self::Clock(_) => "Clock unavailable",
            Self::Audit(_) => "Audit log unavailable",
            Self::Store(_) => "State store unavailable",
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotAuthorized { .. } => "NOT_AUTHORIZED",
            Self::AddressDenied { .. } => "ADDRESS_DENIED",
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::TooEarly { .. } => "TOO_EARLY",
            Self::Clock(_) => "CLOCK",
            Self::Audit(_) => "AUDIT",
            Self::Store(_) => "STORE",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotAuthorized { .. } | Self::AddressDenied { .. } => {
                ErrorCategory::Authorization
            }
            Self::NotInitialized => ErrorCategory::ProtocolState,
            Self::TooEarly { .. } => ErrorCategory::Timing,
            Self::Clock(_) | Self::Audit(_) | Self::Store(_) => ErrorCategory::Host,
        }
    }
}

impl From<GuardViolation> for TimelockError {
    fn from(violation: GuardViolation) -> Self {
        match violation {
            GuardViolation::RestrictedToOwner { operation, caller } => {
                Self::NotAuthorized { operation, caller }
            }
            GuardViolation::AddressDenied { operation, caller } => {
                Self::AddressDenied { operation, caller }
            }
        }
    }
}

/// Result type for timelock operations
pub type TimelockResult<T> = std::result::Result<T, TimelockError>;
