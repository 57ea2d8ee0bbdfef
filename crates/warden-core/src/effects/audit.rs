//! Append-only audit log effect.
//!
//! The log is the only history Warden keeps. State stores hold the current
//! snapshot; everything an indexer needs to replay ownership changes and
//! pending-request lifecycles is appended here, in commit order.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// Error type for audit log operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum AuditError {
    #[error("Audit log unavailable: {reason}")]
    Unavailable { reason: String },
    #[error("Audit record could not be encoded: {reason}")]
    Encoding { reason: String },
    #[error("Audit log is corrupt at line {line}: {reason}")]
    Corrupt { line: usize, reason: String },
}

/// One committed entry of the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord<F> {
    /// Position in the log; strictly increasing from zero.
    pub sequence: u64,
    /// Clock reading of the operation that produced the fact.
    pub recorded_at: Timestamp,
    /// The recorded fact.
    pub fact: F,
}

/// Append-only, totally ordered log of facts.
///
/// `append_all` must be all-or-nothing: either every fact of the batch is
/// recorded with consecutive sequence numbers, or none is.
#[async_trait]
pub trait AuditEffects<F>: Send + Sync
where
    F: Clone + Send + Sync + 'static,
{
    /// Append the facts of one committed operation.
    async fn append_all(
        &self,
        recorded_at: Timestamp,
        facts: Vec<F>,
    ) -> Result<Vec<AuditRecord<F>>, AuditError>;

    /// Every record in sequence order.
    async fn records(&self) -> Result<Vec<AuditRecord<F>>, AuditError>;
}

/// Blanket implementation for Arc<T> where T: AuditEffects
#[async_trait]
impl<F, T> AuditEffects<F> for std::sync::Arc<T>
where
    F: Clone + Send + Sync + 'static,
    T: AuditEffects<F> + ?Sized,
{
    async fn append_all(
        &self,
        recorded_at: Timestamp,
        facts: Vec<F>,
    ) -> Result<Vec<AuditRecord<F>>, AuditError> {
        (**self).append_all(recorded_at, facts).await
    }

    async fn records(&self) -> Result<Vec<AuditRecord<F>>, AuditError> {
        (**self).records().await
    }
}
