use crate::handlers::{
    delete_instance, get_configuration, get_instance, is_alive, migrate, run_job, topology,
    update_from_form, update_instance,
};
use crate::server::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Create the REST routes with state
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/is_alive", get(is_alive))
        .route("/run_job", post(run_job))
        .route("/instance/{cls}", post(update_instance))
        .route(
            "/instance/{cls}/{name}",
            get(get_instance).delete(delete_instance),
        )
        .route("/update/{cls}", post(update_from_form))
        .route("/configuration/{name}", get(get_configuration))
        .route("/migrate/{direction}", post(migrate))
        .route("/topology/{direction}", post(topology))
}
