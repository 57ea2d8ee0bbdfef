//! In-memory audit log

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use warden_core::{AuditEffects, AuditError, AuditRecord, Timestamp};

/// Audit log held in memory, shared between clones.
#[derive(Debug)]
pub struct InMemoryAuditLog<F> {
    records: Arc<Mutex<Vec<AuditRecord<F>>>>,
    fail_appends: Arc<AtomicBool>,
}

impl<F> Clone for InMemoryAuditLog<F> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
            fail_appends: Arc::clone(&self.fail_appends),
        }
    }
}

impl<F> Default for InMemoryAuditLog<F> {
    fn default() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            fail_appends: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl<F: Clone> InMemoryAuditLog<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every record so far.
    pub fn snapshot(&self) -> Vec<AuditRecord<F>> {
        self.records.lock().clone()
    }

    /// Facts only, in sequence order.
    pub fn facts(&self) -> Vec<F> {
        self.records
            .lock()
            .iter()
            .map(|record| record.fact.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Make every subsequent append fail until switched back.
    pub fn set_fail_appends(&self, fail: bool) {
        self.fail_appends.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl<F> AuditEffects<F> for InMemoryAuditLog<F>
where
    F: Clone + Send + Sync + 'static,
{
    async fn append_all(
        &self,
        recorded_at: Timestamp,
        facts: Vec<F>,
    ) -> Result<Vec<AuditRecord<F>>, AuditError> {
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(AuditError::Unavailable {
                reason: "appends disabled for test".to_string(),
            });
        }

        let mut records = self.records.lock();
        let next_sequence = records.len() as u64;
        let appended: Vec<_> = facts
            .into_iter()
            .zip(next_sequence..)
            .map(|(fact, sequence)| AuditRecord {
                sequence,
                recorded_at,
                fact,
            })
            .collect();
        records.extend(appended.iter().cloned());
        Ok(appended)
    }

    async fn records(&self) -> Result<Vec<AuditRecord<F>>, AuditError> {
        Ok(self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sequences_are_consecutive() {
        let log = InMemoryAuditLog::<u8>::new();
        log.append_all(Timestamp::from_secs(1), vec![10, 11])
            .await
            .unwrap();
        let appended = log
            .append_all(Timestamp::from_secs(2), vec![12])
            .await
            .unwrap();
        assert_eq!(appended[0].sequence, 2);
        assert_eq!(log.facts(), vec![10, 11, 12]);
    }

    #[tokio::test]
    async fn failing_appends_record_nothing() {
        let log = InMemoryAuditLog::<u8>::new();
        log.set_fail_appends(true);
        assert!(log
            .append_all(Timestamp::from_secs(1), vec![1])
            .await
            .is_err());
        assert!(log.is_empty());
    }
}
