use std::collections::BTreeMap;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::RunJobRequest;
use crate::server::AppState;
use axum::{extract::State, response::Json};
use chrono::Utc;
use enms_core::{
    Database, DatabaseResult,
    models::{Device, Instance},
};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

/// Devices targeted by a run request, deduplicated by id
///
/// Named devices, devices found by IP address and the members of the named
/// pools are all targeted.
pub fn resolve_targets(database: &Database, request: &RunJobRequest) -> DatabaseResult<Vec<Device>> {
    let mut targets: BTreeMap<u64, Device> = BTreeMap::new();
    for name in &request.devices {
        let device = database.device(name)?;
        targets.insert(device.id, device);
    }
    for ip_address in &request.ip_addresses {
        let device = database.device_by_ip(ip_address)?;
        targets.insert(device.id, device);
    }
    for name in &request.pools {
        let pool = database.pool(name)?;
        for device in database.pool_devices(&pool)? {
            targets.insert(device.id, device);
        }
    }
    Ok(targets.into_values().collect())
}

/// Run job
///
/// Runs a job on its targets. In async mode the run is scheduled and the job
/// is returned at once, otherwise the results of the run are returned.
/// Requires authentication.
#[utoipa::path(
    post,
    path = "/rest/run_job",
    request_body = RunJobRequest,
    responses(
        (status = 200, description = "Job results, or the scheduled job in async mode"),
        (status = 403, description = "Unauthorized access"),
        (status = 404, description = "Job or target not found"),
        (status = 409, description = "Job already running")
    )
)]
#[axum::debug_handler]
pub async fn run_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<RunJobRequest>,
) -> Result<Json<Value>, AppError> {
    let (job, targets) = state
        .database
        .job(&request.name)
        .and_then(|job| resolve_targets(&state.database, &request).map(|targets| (job, targets)))
        .map_err(|e| {
            info!("REST API run_job endpoint failed ({})", e);
            e
        })?;
    info!(
        job = %job.name,
        user = %auth.user().name,
        targets = targets.len(),
        is_async = request.is_async,
        "run_job requested"
    );

    if !request.is_async {
        let (results, _) = state.engine.try_run(&job, targets, request.payload).await?;
        return Ok(Json(results));
    }

    let engine = state.engine.clone();
    let job_id = job.id;
    let job_name = job.name.clone();
    let device_ids: Vec<u64> = targets.iter().map(|device| device.id).collect();
    let payload = request.payload;
    state
        .scheduler
        .add_job(Uuid::new_v4().to_string(), Utc::now(), async move {
            if let Err(e) = engine.scheduler_job(job_id, device_ids, payload).await {
                warn!(job = %job_name, "Scheduled run failed: {}", e);
            }
        })?;

    Ok(Json(Instance::Job(job).serialized()))
}
