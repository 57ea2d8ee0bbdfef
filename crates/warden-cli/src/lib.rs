//! # Warden CLI
//!
//! Operator tooling around one file-backed ownership timelock. The binary in
//! `main.rs` parses arguments and installs logging; everything it runs lives
//! here so it can be driven from tests.

#![forbid(unsafe_code)]

pub mod clock;
pub mod commands;
pub mod config;

pub use clock::HostClock;
pub use commands::{CliService, Workspace};
pub use config::{CliConfig, LoggingConfig, StorageConfig};
