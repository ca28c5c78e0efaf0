//! Save dispatch and sync-status tracking.
//!
//! Every save runs as its own task. Nothing is queued, coalesced or retried:
//! the status reflects whichever save completed last.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cliqa_core::store::StorageKey;
use serde::Serialize;
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinSet;

use crate::bridge::PersistenceBridge;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Online,
    Syncing,
    Offline,
}

pub struct SyncTracker {
    status: Arc<watch::Sender<SyncStatus>>,
    tasks: Mutex<JoinSet<()>>,
    runtime: Handle,
}

impl SyncTracker {
    /// Saves are spawned onto `runtime`.
    pub fn new(initial: SyncStatus, runtime: Handle) -> Self {
        let (status, _) = watch::channel(initial);
        Self {
            status: Arc::new(status),
            tasks: Mutex::new(JoinSet::new()),
            runtime,
        }
    }

    pub fn status(&self) -> SyncStatus {
        *self.status.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SyncStatus> {
        self.status.subscribe()
    }

    pub fn set(&self, status: SyncStatus) {
        self.status.send_replace(status);
    }

    fn tasks(&self) -> MutexGuard<'_, JoinSet<()>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fire a save of `data` under `key` without waiting for it.
    pub fn dispatch(&self, bridge: Arc<dyn PersistenceBridge>, key: StorageKey, data: Value) {
        self.set(SyncStatus::Syncing);
        let status = Arc::clone(&self.status);

        let mut tasks = self.tasks();
        while tasks.try_join_next().is_some() {}
        tasks.spawn_on(
            async move {
                match bridge.save(key.as_str(), &data).await {
                    Ok(()) => {
                        tracing::debug!(key = %key, "Save completed");
                        status.send_replace(SyncStatus::Online);
                    }
                    Err(err) => {
                        tracing::warn!(key = %key, error = %err, "Save failed, marking offline");
                        status.send_replace(SyncStatus::Offline);
                    }
                }
            },
            &self.runtime,
        );
    }

    /// Wait for every save fired so far.
    pub async fn flush(&self) {
        let mut pending = std::mem::take(&mut *self.tasks());
        while let Some(result) = pending.join_next().await {
            if let Err(err) = result {
                tracing::error!(error = %err, "Save task aborted");
            }
        }
    }
}
