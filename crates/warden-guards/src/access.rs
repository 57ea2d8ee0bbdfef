//! Access Guard
//!
//! Evaluates "who is calling" against "who is authorized" for one operation.
//! The guard never touches protocol state; it only reads a `RoleSnapshot`, so
//! a denial can never leave a partial write behind.

use tracing::debug;
use warden_core::PrincipalId;

use crate::{AuthorizationTable, GuardDecision, GuardViolation, Operation, Role, RoleSnapshot};

/// Guard that resolves the authorization table against current role holders.
#[derive(Debug, Clone, Default)]
pub struct AccessGuard {
    table: AuthorizationTable,
}

impl AccessGuard {
    /// Decide whether `caller` may run `operation`.
    pub fn evaluate<S>(&self, operation: Operation, caller: PrincipalId, snapshot: &S) -> GuardDecision
    where
        S: RoleSnapshot + ?Sized,
    {
        let decision = match self.table.required_role(operation) {
            Role::Anyone => GuardDecision::Allow,
            Role::Owner if caller == snapshot.owner() => GuardDecision::Allow,
            Role::Owner => {
                GuardDecision::deny(GuardViolation::RestrictedToOwner { operation, caller })
            }
            // The null principal is a placeholder, never a claimant.
            Role::Candidate if !caller.is_null() && caller == snapshot.candidate() => {
                GuardDecision::Allow
            }
            Role::Candidate => {
                GuardDecision::deny(GuardViolation::AddressDenied { operation, caller })
            }
        };

        if let Some(reason) = decision.denial_reason() {
            debug!(%operation, %caller, %reason, "access guard denied call");
        }
        decision
    }
}
