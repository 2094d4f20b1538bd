use crate::handlers::{admin, automation, configuration, heartbeat, instance, topology};
use crate::models::{HeartbeatResponse, RunJobRequest};

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "eNMS REST API"),
    paths(
        heartbeat::is_alive,
        automation::run_job,
        instance::get_instance,
        instance::delete_instance,
        instance::update_instance,
        instance::update_from_form,
        configuration::get_configuration,
        admin::migrate,
        topology::topology
    ),
    components(schemas(HeartbeatResponse, RunJobRequest))
)]
pub struct ApiDoc;
