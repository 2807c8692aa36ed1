// --- File: crates/datebook_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type for everything that ends up as an HTTP response.
///
/// Crates keep their own error enums and implement `From<TheirError>` for
/// `DatebookError` at the boundary.
#[derive(Error, Debug)]
pub enum DatebookError {
    /// Error occurred while parsing request data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Request failed validation. The message is shown to the caller as is.
    #[error("{0}")]
    ValidationError(String),

    /// Error occurred during an external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// The requested functionality is switched off
    #[error("Service unavailable: {0}")]
    UnavailableError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for DatebookError {
    fn status_code(&self) -> u16 {
        match self {
            DatebookError::ParseError(_) => 400,
            DatebookError::ConfigError(_) => 500,
            DatebookError::ValidationError(_) => 400,
            DatebookError::ExternalServiceError { .. } => 500,
            DatebookError::UnavailableError(_) => 503,
            DatebookError::InternalError(_) => 500,
        }
    }
}

/// A trait for adding context to errors.
pub trait Context<T, E> {
    /// Adds context to an error.
    fn context<C>(self, context: C) -> Result<T, DatebookError>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E: std::error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, DatebookError>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|error| DatebookError::InternalError(format!("{}: {}", context, error)))
    }
}

impl From<std::io::Error> for DatebookError {
    fn from(err: std::io::Error) -> Self {
        DatebookError::InternalError(err.to_string())
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> DatebookError {
    DatebookError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> DatebookError {
    DatebookError::ValidationError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> DatebookError {
    DatebookError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn unavailable<T: fmt::Display>(message: T) -> DatebookError {
    DatebookError::UnavailableError(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(validation_error("x").status_code(), 400);
        assert_eq!(DatebookError::ParseError("x".into()).status_code(), 400);
        assert_eq!(config_error("x").status_code(), 500);
        assert_eq!(external_service_error("calendar", "x").status_code(), 500);
        assert_eq!(unavailable("x").status_code(), 503);
    }

    #[test]
    fn test_context_wraps_as_internal() {
        let result: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::AddrInUse,
            "address in use",
        ));
        let err = result.context("Failed to bind 127.0.0.1:3000").unwrap_err();
        assert!(matches!(err, DatebookError::InternalError(_)));
        assert_eq!(
            err.to_string(),
            "Internal error: Failed to bind 127.0.0.1:3000: address in use"
        );
    }
}
