use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("A job is already scheduled with id {0}")]
    DuplicateId(String),
}

/// One-shot scheduler running tasks at a trigger time on the tokio runtime.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    pending: Arc<DashMap<String, JoinHandle<()>>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue `task` to run at `run_date` and return immediately.
    ///
    /// A run date in the past runs the task as soon as possible.
    pub fn add_job<F>(&self, id: impl Into<String>, run_date: DateTime<Utc>, task: F) -> Result<(), SchedulerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let id = id.into();
        let entry = match self.pending.entry(id.clone()) {
            Entry::Occupied(_) => return Err(SchedulerError::DuplicateId(id)),
            Entry::Vacant(entry) => entry,
        };

        let (registered_tx, registered_rx) = oneshot::channel::<()>();
        let pending = self.pending.clone();
        let task_id = id.clone();
        let handle = tokio::spawn(async move {
            let delay = (run_date - Utc::now()).to_std().unwrap_or_default();
            tokio::time::sleep(delay).await;
            debug!(id = %task_id, "running scheduled job");
            task.await;
            // The handle must be registered before it can be removed.
            let _ = registered_rx.await;
            pending.remove(&task_id);
        });
        entry.insert(handle);
        let _ = registered_tx.send(());
        info!(%id, %run_date, "scheduled job");
        Ok(())
    }

    /// Number of scheduled runs that have not finished yet.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.pending.contains_key(id)
    }

    /// Abort every pending run.
    pub fn shutdown(&self) {
        let ids: Vec<String> = self.pending.iter().map(|entry| entry.key().clone()).collect();
        for id in ids {
            if let Some((_, handle)) = self.pending.remove(&id) {
                handle.abort();
            }
        }
        info!("scheduler shut down");
    }
}
