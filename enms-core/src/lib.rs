//! # eNMS core
//!
//! Building blocks of the eNMS network automation REST API:
//!
//! - Form registry and form postprocessing ([`forms`])
//! - Inventory and automation models ([`models`]) stored in the in-memory
//!   [`database`]
//! - Job execution and scheduling ([`automation`])
//! - Migration ([`admin`]) and topology ([`inventory`]) import/export
//! - Configuration ([`config`])

pub mod admin;
pub mod automation;
pub mod config;
pub mod database;
pub mod forms;
pub mod inventory;
pub mod models;

pub use database::{Database, DatabaseError, DatabaseResult};
