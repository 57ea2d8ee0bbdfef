//! # Warden Testkit
//!
//! Deterministic stand-ins for the host environment: a clock tests can move by
//! hand, an audit log that lives in memory, and a fixture that wires both into
//! a `TimelockService` with three well-known principals.

#![forbid(unsafe_code)]

pub mod audit;
pub mod fixtures;
pub mod strategies;
pub mod time;

pub use audit::InMemoryAuditLog;
pub use fixtures::{init_test_tracing, principal, TimelockFixture, FIXTURE_EPOCH};
pub use time::{ControllableClock, FailingClock};
