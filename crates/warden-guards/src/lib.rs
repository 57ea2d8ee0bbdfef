#![forbid(unsafe_code)]
//! # Warden Guards - Access Guard
//!
//! Decides whether the calling principal may run an operation, before the
//! timelock state machine sees the call. Authorization is table driven: each
//! operation names the role it requires, and the guard resolves that role
//! against a read-only snapshot of who currently holds it.
//!
//! ```text
//! caller ──► AccessGuard ──► Timelock Protocol ──► Audit Log
//!            ^^^^^^^^^^^
//!            (this crate)
//! ```

pub mod access;
pub mod operation;
pub mod types;

pub use access::AccessGuard;
pub use operation::{AuthorizationTable, Operation, Role};
pub use types::{GuardDecision, GuardViolation, RoleSnapshot};
