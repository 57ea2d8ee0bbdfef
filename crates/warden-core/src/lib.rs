//! # Warden Core - Foundation Layer
//!
//! Foundation types and effect interfaces shared by every Warden crate.
//! Nothing in here knows about the timelock protocol itself; it only defines
//! the vocabulary the protocol is written in.
//!
//! ## What Belongs Here
//!
//! - Principal identifiers and the null principal sentinel
//! - Timestamps and timelock delays (whole seconds)
//! - The unified `WardenError` used for host-level failures
//! - Effect traits the host environment supplies (clock, audit log)
//! - Configuration traits and the timelock bootstrap defaults
//!
//! ## What Does NOT Belong Here
//!
//! - Authorization decisions (belong in `warden-guards`)
//! - Protocol state and transitions (belong in `warden-timelock`)
//! - Test doubles for the effect traits (belong in `warden-testkit`)

#![forbid(unsafe_code)]

/// Configuration traits and timelock defaults
pub mod config;

/// Host-supplied effect interfaces
pub mod effects;

/// Unified error handling
pub mod errors;

/// Principal identifiers
pub mod identifiers;

/// Timestamps and delays
pub mod time;

pub use config::{load_toml, ConfigDefaults, ConfigValidation, TimelockDefaults};
pub use effects::{
    AuditEffects, AuditError, AuditRecord, PhysicalTimeEffects, SystemClock, TimeError,
};
pub use errors::{WardenError, WardenResult};
pub use identifiers::PrincipalId;
pub use time::{TimelockDelay, Timestamp, DEFAULT_TIMELOCK_DELAY, ONE_DAY_SECS};
