// --- File: crates/planify_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Error handling
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities

// Re-export error types and utilities for easier access
pub use error::{
    external_service_error, not_found, unauthorized, validation_error,
    HttpStatusCode, PlanifyError,
};

// Re-export HTTP utilities for easier access
pub use http::client::{create_client, HTTP_CLIENT};

// Re-export logging utilities for easier access
pub use logging::{init, init_with_level, log_result};

// This crate provides functionality shared by the planning crates:
// the base error type and its HTTP mapping, the pooled HTTP client and tracing setup.
