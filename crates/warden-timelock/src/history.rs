//! Ownership history rebuilt from the audit log.
//!
//! The controller only keeps current state. Indexers and operator tooling get
//! the past by folding the audit records, in sequence order, through
//! [`OwnershipHistory::apply`].

use serde::{Deserialize, Serialize};
use warden_core::{AuditRecord, PrincipalId, TimelockDelay, Timestamp};

use crate::TimelockFact;

/// One change of the owner role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipChange {
    pub sequence: u64,
    pub at: Timestamp,
    pub previous_owner: PrincipalId,
    pub new_owner: PrincipalId,
}

/// How a pending request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RequestOutcome {
    /// Still waiting.
    Pending,
    /// The candidate claimed ownership.
    Completed { sequence: u64, at: Timestamp },
    /// The owner canceled.
    Canceled { sequence: u64, at: Timestamp },
    /// The owner reconfigured the timelock.
    Superseded { sequence: u64, at: Timestamp },
    /// The candidate initiated again, restarting the clock.
    Reinitiated { sequence: u64, at: Timestamp },
}

/// Lifecycle of one initiated request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestLifecycle {
    pub candidate: PrincipalId,
    /// Delay in force when initiated; `None` if the log never recorded a
    /// configuration before this request.
    pub delay: Option<TimelockDelay>,
    pub initiated_sequence: u64,
    pub initiated_at: Timestamp,
    pub outcome: RequestOutcome,
}

impl RequestLifecycle {
    /// Earliest completion time, when the delay is known.
    pub fn ready_at(&self) -> Option<Timestamp> {
        self.delay.map(|delay| self.initiated_at.saturating_add(delay))
    }
}

/// Folded view of a timelock audit log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipHistory {
    pub ownership_changes: Vec<OwnershipChange>,
    pub requests: Vec<RequestLifecycle>,
    /// Last configured candidate and delay.
    pub configuration: Option<(PrincipalId, TimelockDelay)>,
    /// Number of records folded so far.
    pub records_applied: u64,
}

impl OwnershipHistory {
    /// Fold every record in order.
    pub fn from_records(records: &[AuditRecord<TimelockFact>]) -> Self {
        let mut history = Self::default();
        for record in records {
            history.apply(record);
        }
        history
    }

    /// Fold one record.
    pub fn apply(&mut self, record: &AuditRecord<TimelockFact>) {
        let (sequence, at) = (record.sequence, record.recorded_at);
        match &record.fact {
            TimelockFact::TimelockConfigured { candidate, delay } => {
                self.close_pending(RequestOutcome::Superseded { sequence, at });
                self.configuration = Some((*candidate, *delay));
            }
            TimelockFact::TimelockInitiated { candidate } => {
                self.close_pending(RequestOutcome::Reinitiated { sequence, at });
                self.requests.push(RequestLifecycle {
                    candidate: *candidate,
                    delay: self.configuration.map(|(_, delay)| delay),
                    initiated_sequence: sequence,
                    initiated_at: at,
                    outcome: RequestOutcome::Pending,
                });
            }
            TimelockFact::TimelockCanceled => {
                self.close_pending(RequestOutcome::Canceled { sequence, at });
            }
            TimelockFact::OwnershipTransferred {
                previous_owner,
                new_owner,
            } => {
                self.close_pending(RequestOutcome::Completed { sequence, at });
                self.ownership_changes.push(OwnershipChange {
                    sequence,
                    at,
                    previous_owner: *previous_owner,
                    new_owner: *new_owner,
                });
            }
        }
        self.records_applied += 1;
    }

    /// Owner after the last recorded transfer.
    pub fn current_owner(&self) -> Option<PrincipalId> {
        self.ownership_changes.last().map(|change| change.new_owner)
    }

    /// The request still waiting, if any.
    pub fn pending_request(&self) -> Option<&RequestLifecycle> {
        self.requests
            .last()
            .filter(|request| request.outcome == RequestOutcome::Pending)
    }

    fn close_pending(&mut self, outcome: RequestOutcome) {
        if let Some(request) = self
            .requests
            .last_mut()
            .filter(|request| request.outcome == RequestOutcome::Pending)
        {
            request.outcome = outcome;
        }
    }
}
