//! Durable keyed state for the controller.
//!
//! A store holds at most one [`OwnershipState`]. `None` means the controller
//! has not been initialized yet.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use warden_core::{WardenError, WardenResult};

use crate::OwnershipState;

const STATE_FORMAT_VERSION: u32 = 1;

/// Persistence for the controller's single state slot.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the current state, `None` if never saved.
    async fn load(&self) -> WardenResult<Option<OwnershipState>>;

    /// Replace the current state.
    async fn save(&self, state: &OwnershipState) -> WardenResult<()>;

    /// Empty the slot, as if nothing had ever been saved.
    async fn clear(&self) -> WardenResult<()>;
}

/// Blanket implementation for Arc<T> where T: StateStore
#[async_trait]
impl<T: StateStore + ?Sized> StateStore for std::sync::Arc<T> {
    async fn load(&self) -> WardenResult<Option<OwnershipState>> {
        (**self).load().await
    }

    async fn save(&self, state: &OwnershipState) -> WardenResult<()> {
        (**self).save(state).await
    }

    async fn clear(&self) -> WardenResult<()> {
        (**self).clear().await
    }
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    slot: Mutex<Option<OwnershipState>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn load(&self) -> WardenResult<Option<OwnershipState>> {
        Ok(self.slot.lock().clone())
    }

    async fn save(&self, state: &OwnershipState) -> WardenResult<()> {
        *self.slot.lock() = Some(state.clone());
        Ok(())
    }

    async fn clear(&self) -> WardenResult<()> {
        *self.slot.lock() = None;
        Ok(())
    }
}

/// On-disk envelope; the version guards against reading a future layout.
#[derive(Debug, Serialize, Deserialize)]
struct StateFile {
    version: u32,
    state: OwnershipState,
}

/// JSON file store with write-to-temp-then-rename replacement.
#[derive(Debug, Clone)]
pub struct JsonFileStateStore {
    path: PathBuf,
}

impl JsonFileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl StateStore for JsonFileStateStore {
    async fn load(&self) -> WardenResult<Option<OwnershipState>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let file: StateFile = serde_json::from_slice(&bytes)?;
        if file.version != STATE_FORMAT_VERSION {
            return Err(WardenError::invalid(format!(
                "Unsupported state file version {} in {}",
                file.version,
                self.path.display()
            )));
        }
        Ok(Some(file.state))
    }

    async fn save(&self, state: &OwnershipState) -> WardenResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let file = StateFile {
            version: STATE_FORMAT_VERSION,
            state: state.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&file)?;

        let temp = self.temp_path();
        tokio::fs::write(&temp, &bytes).await?;
        tokio::fs::rename(&temp, &self.path).await?;
        debug!(path = %self.path.display(), "state saved");
        Ok(())
    }

    async fn clear(&self) -> WardenResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
