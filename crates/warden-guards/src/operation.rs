//! Operations and the roles that may invoke them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Every externally callable controller operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Operation {
    /// Read the current owner
    Owner,
    /// Read `(candidate, delay, requested_at)`
    GetOwnerTimelock,
    /// Replace candidate and delay, resetting any pending request
    SetOwnerTimelock,
    /// Start the waiting period
    InitOwnerUnlock,
    /// Claim ownership once the delay has elapsed
    CompleteOwnerUnlock,
    /// Abort a pending request
    CancelOwnerUnlock,
}

impl Operation {
    /// All operations, in declaration order.
    pub const ALL: [Operation; 6] = [
        Operation::Owner,
        Operation::GetOwnerTimelock,
        Operation::SetOwnerTimelock,
        Operation::InitOwnerUnlock,
        Operation::CompleteOwnerUnlock,
        Operation::CancelOwnerUnlock,
    ];

    /// Stable external method name.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Owner => "owner",
            Operation::GetOwnerTimelock => "getOwnerTimelock",
            Operation::SetOwnerTimelock => "setOwnerTimelock",
            Operation::InitOwnerUnlock => "initOwnerUnlock",
            Operation::CompleteOwnerUnlock => "completeOwnerUnlock",
            Operation::CancelOwnerUnlock => "cancelOwnerUnlock",
        }
    }

    /// Returns `true` for pure accessors.
    pub fn is_read_only(&self) -> bool {
        matches!(self, Operation::Owner | Operation::GetOwnerTimelock)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Role a caller must hold to run an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// No restriction
    Anyone,
    /// The current owner
    Owner,
    /// The candidate named in the current timelock configuration
    Candidate,
}

/// Operation → required role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationTable {
    entries: BTreeMap<Operation, Role>,
}

impl AuthorizationTable {
    /// Role required for `operation`.
    ///
    /// An operation missing from the table requires the owner.
    pub fn required_role(&self, operation: Operation) -> Role {
        self.entries
            .get(&operation)
            .copied()
            .unwrap_or(Role::Owner)
    }
}

impl Default for AuthorizationTable {
    fn default() -> Self {
        let entries = Operation::ALL
            .iter()
            .map(|op| {
                let role = match op {
                    op if op.is_read_only() => Role::Anyone,
                    Operation::SetOwnerTimelock | Operation::CancelOwnerUnlock => Role::Owner,
                    _ => Role::Candidate,
                };
                (*op, role)
            })
            .collect();
        Self { entries }
    }
}
