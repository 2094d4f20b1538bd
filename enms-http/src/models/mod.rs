pub mod automation;
pub mod heartbeat;

// Re-export all models for easier imports
pub use automation::*;
pub use heartbeat::*;
