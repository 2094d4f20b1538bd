//! Job execution and one-shot scheduling

pub mod engine;
pub mod scheduler;

pub use engine::{JobEngine, JobError, JobOutcome, JobResult, JobRunner, LoggingRunner};
pub use scheduler::{Scheduler, SchedulerError};
