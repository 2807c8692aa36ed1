// --- File: crates/datebook_common/src/lib.rs ---

pub mod error; // Error handling
pub mod http; // HTTP error responses
pub mod logging; // Logging utilities
pub mod services; // Calendar provider abstraction

// Re-export error types and utilities for easier access
pub use error::{
    config_error, external_service_error, unavailable, validation_error, Context,
    DatebookError, HttpStatusCode,
};

pub use http::{IntoHttpResponse, GENERIC_SERVER_ERROR};

pub use logging::{init, init_from_str, init_with_level, log_result};
