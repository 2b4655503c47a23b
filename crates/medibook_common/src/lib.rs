// --- File: crates/medibook_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Error handling
pub mod features; // Runtime feature flag handling
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities
pub mod models; // Data structures shared by the feature crates
pub mod services; // Service abstractions

// Re-export error types and utilities for easier access
pub use error::{config_error, MedibookError};

// Re-export HTTP utilities for easier access
pub use http::client::create_client;

// Re-export logging utilities for easier access
pub use logging::{init, log_result};

pub use features::is_feature_enabled;
