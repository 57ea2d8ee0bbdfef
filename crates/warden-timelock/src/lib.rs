//! # Warden Timelock - Ownership Transfer Protocol
//!
//! A guard around a single exclusive owner role. The owner pre-authorizes a
//! candidate and a delay; the candidate starts the clock, waits out the delay,
//! and then claims the role. The owner can cancel at any point before the
//! claim, and any reconfiguration invalidates the pending request.
//!
//! ## Layout
//!
//! - [`state`]: the three durable state elements (owner, config, request)
//! - [`controller`]: the synchronous state machine, one transaction per call
//! - [`facts`]: audit log payloads emitted by committed transitions
//! - [`service`]: async host binding over a clock, a state store and a log
//! - [`store`] / [`audit_log`]: durable implementations of those collaborators
//! - [`history`]: replays the audit log into ownership and request history
//!
//! ## Design Principles
//!
//! - Every call passes the access guard before the state machine runs
//! - The clock is read once per call, by the host, before the transition
//! - A rejected call changes nothing and records nothing

#![forbid(unsafe_code)]

pub mod audit_log;
pub mod controller;
pub mod error;
pub mod facts;
pub mod history;
pub mod service;
pub mod state;
pub mod store;

pub use audit_log::JsonlAuditLog;
pub use controller::{OperationContext, OwnershipTimelockController, TimelockCommand};
pub use error::{ErrorCategory, TimelockError, TimelockResult};
pub use facts::TimelockFact;
pub use history::{OwnershipChange, OwnershipHistory, RequestLifecycle, RequestOutcome};
pub use service::TimelockService;
pub use state::{OwnershipState, TimelockConfig, TimelockView, UnlockRequest};
pub use store::{JsonFileStateStore, MemoryStateStore, StateStore};
