//! File-backed audit log, one JSON record per line.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::warn;
use warden_core::{AuditEffects, AuditError, AuditRecord, Timestamp};

/// Append-only JSON Lines log.
///
/// One writer per file. The file is scanned once, on the first append, to find
/// the next sequence number; after that the number is kept in memory. A batch
/// is written with a single `write_all`. An unterminated final line that does
/// not parse is the remains of an interrupted write: reads skip it and the next
/// append truncates it away. One that parses is kept and given its newline.
#[derive(Debug)]
pub struct JsonlAuditLog<F> {
    path: PathBuf,
    /// Next sequence number; `None` until the file has been scanned.
    next_sequence: Mutex<Option<u64>>,
    _fact: PhantomData<fn() -> F>,
}

impl<F> JsonlAuditLog<F> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            next_sequence: Mutex::new(None),
            _fact: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn unavailable(e: std::io::Error) -> AuditError {
    AuditError::Unavailable {
        reason: e.to_string(),
    }
}

/// What follows the last newline in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tail {
    /// Nothing, or whitespace only
    Clean,
    /// A whole record missing only its newline
    Unterminated,
    /// A fragment of an interrupted write, starting at this byte offset
    Torn(usize),
}

struct Scan<F> {
    records: Vec<AuditRecord<F>>,
    tail: Tail,
}

impl<F> JsonlAuditLog<F>
where
    F: DeserializeOwned,
{
    async fn read_content(&self) -> Result<String, AuditError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(unavailable(e)),
        }
    }

    fn scan(&self, content: &str) -> Result<Scan<F>, AuditError> {
        let complete_len = content.rfind('\n').map_or(0, |idx| idx + 1);
        let (complete, rest) = content.split_at(complete_len);

        let mut records: Vec<AuditRecord<F>> = complete
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| {
                serde_json::from_str(line).map_err(|e| AuditError::Corrupt {
                    line: idx + 1,
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let tail = if rest.trim().is_empty() {
            Tail::Clean
        } else if let Ok(record) = serde_json::from_str(rest) {
            records.push(record);
            Tail::Unterminated
        } else {
            warn!(
                path = %self.path.display(),
                bytes = rest.len(),
                "ignoring unterminated final audit line"
            );
            Tail::Torn(complete_len)
        };

        Ok(Scan { records, tail })
    }

    async fn read_all(&self) -> Result<Vec<AuditRecord<F>>, AuditError> {
        let content = self.read_content().await?;
        Ok(self.scan(&content)?.records)
    }

    /// Find the next sequence number and leave the file ending on a newline.
    async fn prepare_for_append(&self) -> Result<u64, AuditError> {
        let content = self.read_content().await?;
        let scan = self.scan(&content)?;

        match scan.tail {
            Tail::Clean => {}
            Tail::Unterminated => {
                let mut file = tokio::fs::OpenOptions::new()
                    .append(true)
                    .open(&self.path)
                    .await
                    .map_err(unavailable)?;
                file.write_all(b"\n").await.map_err(unavailable)?;
                file.flush().await.map_err(unavailable)?;
            }
            Tail::Torn(keep) => {
                let file = tokio::fs::OpenOptions::new()
                    .write(true)
                    .open(&self.path)
                    .await
                    .map_err(unavailable)?;
                file.set_len(keep as u64).await.map_err(unavailable)?;
                warn!(
                    path = %self.path.display(),
                    dropped_bytes = content.len() - keep,
                    "truncated torn final audit line"
                );
            }
        }

        Ok(scan
            .records
            .last()
            .map_or(0, |record| record.sequence + 1))
    }
}

#[async_trait]
impl<F> AuditEffects<F> for JsonlAuditLog<F>
where
    F: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn append_all(
        &self,
        recorded_at: Timestamp,
        facts: Vec<F>,
    ) -> Result<Vec<AuditRecord<F>>, AuditError> {
        if facts.is_empty() {
            return Ok(Vec::new());
        }

        let mut cached = self.next_sequence.lock().await;
        let next_sequence = match *cached {
            Some(next) => next,
            None => self.prepare_for_append().await?,
        };

        let records: Vec<AuditRecord<F>> = facts
            .into_iter()
            .zip(next_sequence..)
            .map(|(fact, sequence)| AuditRecord {
                sequence,
                recorded_at,
                fact,
            })
            .collect();

        let mut batch = String::new();
        for record in &records {
            let line = serde_json::to_string(record).map_err(|e| AuditError::Encoding {
                reason: e.to_string(),
            })?;
            batch.push_str(&line);
            batch.push('\n');
        }

        // A failed write may leave a partial line; rescan before the next one.
        *cached = None;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(unavailable)?;
            }
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(unavailable)?;
        file.write_all(batch.as_bytes()).await.map_err(unavailable)?;
        file.flush().await.map_err(unavailable)?;

        *cached = Some(next_sequence + records.len() as u64);
        Ok(records)
    }

    async fn records(&self) -> Result<Vec<AuditRecord<F>>, AuditError> {
        self.read_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TimelockFact;
    use warden_core::PrincipalId;

    #[tokio::test]
    async fn sequences_continue_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let b = PrincipalId::from_label("b");

        let log = JsonlAuditLog::<TimelockFact>::new(&path);
        log.append_all(
            Timestamp::from_secs(1),
            vec![TimelockFact::genesis(PrincipalId::from_label("a"))],
        )
        .await
        .unwrap();

        let reopened = JsonlAuditLog::<TimelockFact>::new(&path);
        let appended = reopened
            .append_all(
                Timestamp::from_secs(2),
                vec![
                    TimelockFact::TimelockInitiated { candidate: b },
                    TimelockFact::TimelockCanceled,
                ],
            )
            .await
            .unwrap();
        assert_eq!(
            appended.iter().map(|r| r.sequence).collect::<Vec<_>>(),
            vec![1, 2]
        );

        let all = reopened.records().await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[2].fact, TimelockFact::TimelockCanceled);
        assert_eq!(all[2].recorded_at, Timestamp::from_secs(2));
    }

    #[tokio::test]
    async fn empty_batch_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let log = JsonlAuditLog::<TimelockFact>::new(&path);
        assert!(log
            .append_all(Timestamp::from_secs(1), Vec::new())
            .await
            .unwrap()
            .is_empty());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn torn_tail_is_skipped_then_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let log = JsonlAuditLog::<TimelockFact>::new(&path);
        log.append_all(Timestamp::from_secs(1), vec![TimelockFact::TimelockCanceled])
            .await
            .unwrap();

        let mut content = std::fs::read_to_string(&path).unwrap();
        content.push_str("{\"sequence\":1,\"recorded_at\":2,\"fa");
        std::fs::write(&path, &content).unwrap();

        let reopened = JsonlAuditLog::<TimelockFact>::new(&path);
        assert_eq!(reopened.records().await.unwrap().len(), 1);

        let appended = reopened
            .append_all(Timestamp::from_secs(3), vec![TimelockFact::TimelockCanceled])
            .await
            .unwrap();
        assert_eq!(appended[0].sequence, 1);

        let all = reopened.records().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].recorded_at, Timestamp::from_secs(3));
        assert!(std::fs::read_to_string(&path).unwrap().ends_with('\n'));
    }

    #[tokio::test]
    async fn whole_record_missing_newline_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let log = JsonlAuditLog::<TimelockFact>::new(&path);
        log.append_all(Timestamp::from_secs(1), vec![TimelockFact::TimelockCanceled])
            .await
            .unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        std::fs::write(&path, content.trim_end()).unwrap();

        let reopened = JsonlAuditLog::<TimelockFact>::new(&path);
        let appended = reopened
            .append_all(Timestamp::from_secs(2), vec![TimelockFact::TimelockCanceled])
            .await
            .unwrap();
        assert_eq!(appended[0].sequence, 1);
        assert_eq!(reopened.records().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn sequence_is_cached_after_first_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let log = JsonlAuditLog::<TimelockFact>::new(&path);
        for _ in 0..3 {
            log.append_all(Timestamp::from_secs(1), vec![TimelockFact::TimelockCanceled])
                .await
                .unwrap();
        }
        assert_eq!(*log.next_sequence.lock().await, Some(3));
    }

    #[tokio::test]
    async fn corrupt_line_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        std::fs::write(&path, "garbage\n").unwrap();

        let err = JsonlAuditLog::<TimelockFact>::new(&path)
            .records()
            .await
            .unwrap_err();
        assert!(matches!(err, AuditError::Corrupt { line: 1, .. }));
    }
}
