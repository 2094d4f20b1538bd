pub mod credentials;
pub mod extractor;
pub mod middleware;
pub mod store;

// Re-export for easier imports
pub use credentials::*;
pub use extractor::*;
pub use middleware::*;
pub use store::*;
