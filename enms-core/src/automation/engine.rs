use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{info, warn};

use crate::database::{Database, DatabaseError};
use crate::models::{Device, Job};

/// Format of the run timestamps used as keys of `Job::logs`.
pub const RUNTIME_FORMAT: &str = "%Y-%m-%d-%H:%M:%S%.6f";

#[derive(Debug, Error)]
pub enum JobError {
    #[error("Job already running: {0}")]
    AlreadyRunning(String),
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error("Job {job} failed: {message}")]
    Execution { job: String, message: String },
}

pub type JobResult<T> = Result<T, JobError>;

/// Result of one run of a job, on one device or without target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobOutcome {
    pub success: bool,
    pub result: Value,
}

/// Executes the work of a job.
#[async_trait]
pub trait JobRunner: Send + Sync {
    async fn run(&self, job: &Job, device: Option<&Device>, payload: &Value) -> JobResult<JobOutcome>;
}

/// Runner acknowledging every run without touching the devices.
#[derive(Debug, Clone, Default)]
pub struct LoggingRunner;

#[async_trait]
impl JobRunner for LoggingRunner {
    async fn run(&self, job: &Job, device: Option<&Device>, payload: &Value) -> JobResult<JobOutcome> {
        let device = device.map(|device| device.name.as_str());
        info!(job = %job.name, ?device, "running job");
        Ok(JobOutcome {
            success: true,
            result: json!({ "payload": payload }),
        })
    }
}

/// Clears `is_running` when the run it guards is dropped, panics included.
struct RunningGuard<'a> {
    database: &'a Database,
    job: &'a str,
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        let _ = self.database.update_job(self.job, |stored| stored.is_running = false);
    }
}

/// Runs jobs against their targets and records the results.
#[derive(Clone)]
pub struct JobEngine {
    database: Database,
    runner: Arc<dyn JobRunner>,
}

impl JobEngine {
    pub fn new(database: Database, runner: Arc<dyn JobRunner>) -> Self {
        Self { database, runner }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Devices targeted by a job when a run does not name any.
    pub fn default_targets(&self, job: &Job) -> JobResult<Vec<Device>> {
        let mut targets: BTreeMap<u64, Device> = BTreeMap::new();
        for name in &job.devices {
            let device = self.database.device(name)?;
            targets.insert(device.id, device);
        }
        for name in &job.pools {
            let pool = self.database.pool(name)?;
            for device in self.database.pool_devices(&pool)? {
                targets.insert(device.id, device);
            }
        }
        Ok(targets.into_values().collect())
    }

    /// Run a job and return its results with the run timestamp.
    pub async fn try_run(&self, job: &Job, targets: Vec<Device>, payload: Value) -> JobResult<(Value, String)> {
        let started = self.database.update_job(&job.name, |stored| {
            if stored.is_running {
                false
            } else {
                stored.is_running = true;
                true
            }
        })?;
        if !started {
            warn!(job = %job.name, "job already running");
            return Err(JobError::AlreadyRunning(job.name.clone()));
        }
        let _running = RunningGuard {
            database: &self.database,
            job: &job.name,
        };

        let targets = if targets.is_empty() {
            self.default_targets(job)?
        } else {
            targets
        };
        let payload = if payload.is_null() { job.payload.clone() } else { payload };

        info!(job = %job.name, targets = targets.len(), "starting job run");
        let results = if targets.is_empty() {
            let outcome = self.outcome(job, None, &payload).await;
            json!({ "success": outcome.success, "result": outcome.result })
        } else {
            let outcomes = join_all(
                targets
                    .iter()
                    .map(|device| self.outcome(job, Some(device), &payload)),
            )
            .await;
            let success = outcomes.iter().all(|outcome| outcome.success);
            let devices: serde_json::Map<String, Value> = targets
                .iter()
                .zip(outcomes)
                .map(|(device, outcome)| {
                    (
                        device.name.clone(),
                        json!({ "success": outcome.success, "result": outcome.result }),
                    )
                })
                .collect();
            json!({ "success": success, "devices": devices })
        };

        let now = Utc::now();
        let runtime = now.format(RUNTIME_FORMAT).to_string();
        self.database.update_job(&job.name, |stored| {
            stored.is_running = false;
            stored.last_run = Some(now);
            stored.logs.insert(runtime.clone(), results.clone());
        })?;
        info!(job = %job.name, %runtime, success = %results["success"], "job run finished");
        Ok((results, runtime))
    }

    async fn outcome(&self, job: &Job, device: Option<&Device>, payload: &Value) -> JobOutcome {
        match self.runner.run(job, device, payload).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(job = %job.name, error = %e, "job run failed");
                JobOutcome {
                    success: false,
                    result: Value::String(e.to_string()),
                }
            }
        }
    }

    /// Entry point for runs triggered by the scheduler.
    pub async fn scheduler_job(&self, job_id: u64, device_ids: Vec<u64>, payload: Value) -> JobResult<Value> {
        let job = self.database.job_by_id(job_id)?;
        let targets = device_ids
            .into_iter()
            .map(|id| self.database.device_by_id(id))
            .collect::<Result<Vec<_>, _>>()?;
        let (results, _) = self.try_run(&job, targets, payload).await?;
        Ok(results)
    }
}
