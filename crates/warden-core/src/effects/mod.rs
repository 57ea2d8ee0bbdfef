//! Effect interfaces supplied by the host environment.
//!
//! # Effect Classification
//!
//! - **Category**: Infrastructure Effect
//! - **Implementation**: `SystemClock` here, file-backed audit log in
//!   `warden-timelock`, deterministic doubles in `warden-testkit`
//! - **Usage**: The timelock service reads the clock once per operation and
//!   appends the facts each committed operation produced.

mod audit;
mod time;

pub use audit::{AuditEffects, AuditError, AuditRecord};
pub use time::{PhysicalTimeEffects, SystemClock, TimeError};
