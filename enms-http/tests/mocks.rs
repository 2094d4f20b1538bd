//! Job runners for testing

use std::sync::Arc;

use async_trait::async_trait;
use enms_core::{
    automation::{JobError, JobOutcome, JobResult, JobRunner},
    models::{Device, Job},
};
use serde_json::{Value, json};
use tokio::sync::Notify;

/// Runner holding every run until it is released
#[derive(Default)]
pub struct GateRunner {
    pub release: Notify,
}

impl GateRunner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl JobRunner for GateRunner {
    async fn run(&self, _job: &Job, _device: Option<&Device>, payload: &Value) -> JobResult<JobOutcome> {
        self.release.notified().await;
        Ok(JobOutcome {
            success: true,
            result: json!({ "payload": payload }),
        })
    }
}

/// Runner failing on the device named `r2`
pub struct FlakyRunner;

#[async_trait]
impl JobRunner for FlakyRunner {
    async fn run(&self, job: &Job, device: Option<&Device>, _payload: &Value) -> JobResult<JobOutcome> {
        match device {
            Some(device) if device.name == "r2" => Err(JobError::Execution {
                job: job.name.clone(),
                message: "connection refused".to_string(),
            }),
            _ => Ok(JobOutcome {
                success: true,
                result: json!("ok"),
            }),
        }
    }
}
