pub mod admin;
pub mod automation;
pub mod configuration;
pub mod heartbeat;
pub mod instance;
pub mod test_helpers;
pub mod topology;

// Re-export all handlers for easier imports
pub use admin::*;
pub use automation::*;
pub use configuration::*;
pub use heartbeat::*;
pub use instance::*;
pub use topology::*;

use crate::error::AppError;

/// Error for a direction segment other than `import` or `export`
pub(crate) fn unknown_direction(direction: &str) -> AppError {
    AppError::BadRequest(format!(
        "Unknown direction {}, expected import or export",
        direction
    ))
}
