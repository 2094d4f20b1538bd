pub mod migration;

pub use migration::{MigrationError, MigrationRequest, migrate_export, migrate_import};
