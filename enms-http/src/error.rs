//! Error handling for enms-http
//!
//! Errors of the core crate are mapped to an HTTP status and a JSON body of
//! the form `{"error": "..."}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use enms_core::{
    DatabaseError,
    admin::MigrationError,
    automation::{JobError, SchedulerError},
    forms::FormError,
    inventory::TopologyError,
};
use serde_json::json;

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Database error
    Database(DatabaseError),

    /// Job execution error
    Job(JobError),

    /// Form postprocessing error
    Form(FormError),

    /// Migration error
    Migration(MigrationError),

    /// Topology import/export error
    Topology(TopologyError),

    /// Scheduler error
    Scheduler(SchedulerError),

    /// Resource not found
    NotFound(String),

    /// Malformed request
    BadRequest(String),
}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        Self::Database(err)
    }
}

impl From<JobError> for AppError {
    fn from(err: JobError) -> Self {
        Self::Job(err)
    }
}

impl From<FormError> for AppError {
    fn from(err: FormError) -> Self {
        Self::Form(err)
    }
}

impl From<MigrationError> for AppError {
    fn from(err: MigrationError) -> Self {
        Self::Migration(err)
    }
}

impl From<TopologyError> for AppError {
    fn from(err: TopologyError) -> Self {
        Self::Topology(err)
    }
}

impl From<SchedulerError> for AppError {
    fn from(err: SchedulerError) -> Self {
        Self::Scheduler(err)
    }
}

impl PartialEq<StatusCode> for AppError {
    fn eq(&self, status_code: &StatusCode) -> bool {
        let (error_status, _) = self.status_and_message();
        &error_status == status_code
    }
}

fn database_status(err: &DatabaseError) -> StatusCode {
    match err {
        DatabaseError::NotFound { .. } => StatusCode::NOT_FOUND,
        DatabaseError::UnknownClass(_)
        | DatabaseError::MissingName(_)
        | DatabaseError::Invalid { .. } => StatusCode::BAD_REQUEST,
    }
}

impl AppError {
    /// Get the status code and error message for this error
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::Database(err) => (database_status(err), err.to_string()),
            Self::Job(JobError::Database(err)) => (database_status(err), err.to_string()),
            Self::Job(err @ JobError::AlreadyRunning(_)) => (StatusCode::CONFLICT, err.to_string()),
            Self::Job(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            Self::Form(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Self::Migration(MigrationError::Database(err)) => (database_status(err), err.to_string()),
            Self::Migration(err @ (MigrationError::Json { .. } | MigrationError::InvalidName(_))) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Migration(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            Self::Topology(TopologyError::Database(err)) => (database_status(err), err.to_string()),
            Self::Topology(
                err @ (TopologyError::Parse(_) | TopologyError::Criteria { .. } | TopologyError::InvalidName(_)),
            ) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Topology(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            Self::Scheduler(err) => (StatusCode::CONFLICT, err.to_string()),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = self.status_and_message();

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
