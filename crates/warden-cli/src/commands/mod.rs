//! Subcommand handlers
//!
//! Each handler returns the text to print. Protocol rejections propagate as
//! `TimelockError` inside the `anyhow::Error` so `main` can report the stable
//! reason and exit non-zero.

pub mod history;
pub mod principal;
pub mod timelock;

use std::fmt::Write as _;
use warden_core::{AuditRecord, PrincipalId};
use warden_timelock::{JsonFileStateStore, JsonlAuditLog, TimelockFact, TimelockService};

use crate::{CliConfig, HostClock};

/// Service over the configured files.
pub type CliService = TimelockService<JsonFileStateStore, HostClock, JsonlAuditLog<TimelockFact>>;

/// Loaded configuration plus the service it describes.
pub struct Workspace {
    config: CliConfig,
    service: CliService,
}

impl Workspace {
    pub fn open(config: CliConfig, clock: HostClock) -> Self {
        let service = TimelockService::new(
            JsonFileStateStore::new(&config.storage.state_path),
            clock,
            JsonlAuditLog::new(&config.storage.audit_path),
        );
        Self { config, service }
    }

    pub fn config(&self) -> &CliConfig {
        &self.config
    }

    pub fn service(&self) -> &CliService {
        &self.service
    }
}

/// One line per committed record.
pub(crate) fn render_records(records: &[AuditRecord<TimelockFact>]) -> String {
    let mut out = String::new();
    for record in records {
        let _ = writeln!(
            out,
            "#{} @{} {}",
            record.sequence, record.recorded_at, record.fact
        );
    }
    out
}

pub(crate) fn render_principal(principal: PrincipalId) -> String {
    if principal.is_null() {
        format!("{principal} (null)")
    } else {
        principal.to_string()
    }
}
