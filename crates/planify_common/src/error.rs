use std::fmt;
use thiserror::Error;

/// The base error type for all Planify errors.
///
/// Each crate keeps its own error enum and converts into this one at the
/// HTTP boundary by implementing `From<CrateError> for PlanifyError`.
#[derive(Error, Debug)]
pub enum PlanifyError {
    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The caller is not authenticated
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// The caller is authenticated but lacks the required role
    #[error("Forbidden: {0}")]
    ForbiddenError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// Error occurred due to rate limiting
    #[error("Rate limited: {0}")]
    RateLimitError(String),

    /// The requested feature is switched off in the configuration
    #[error("Service unavailable: {0}")]
    UnavailableError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for PlanifyError {
    fn status_code(&self) -> u16 {
        match self {
            PlanifyError::ConfigError(_) => 500,
            PlanifyError::AuthError(_) => 401,
            PlanifyError::ForbiddenError(_) => 403,
            PlanifyError::ValidationError(_) => 400,
            PlanifyError::ExternalServiceError { .. } => 502,
            PlanifyError::NotFoundError(_) => 404,
            PlanifyError::RateLimitError(_) => 429,
            PlanifyError::UnavailableError(_) => 503,
        }
    }
}

// Utility functions for error handling
pub fn validation_error<T: fmt::Display>(message: T) -> PlanifyError {
    PlanifyError::ValidationError(message.to_string())
}

pub fn unauthorized<T: fmt::Display>(message: T) -> PlanifyError {
    PlanifyError::AuthError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> PlanifyError {
    PlanifyError::NotFoundError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> PlanifyError {
    PlanifyError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_error_kind() {
        assert_eq!(validation_error("bad day").status_code(), 400);
        assert_eq!(unauthorized("no token").status_code(), 401);
        assert_eq!(
            PlanifyError::ForbiddenError("not admin".into()).status_code(),
            403
        );
        assert_eq!(
            external_service_error("planning-api", "boom").status_code(),
            502
        );
        assert_eq!(
            PlanifyError::UnavailableError("off".into()).status_code(),
            503
        );
    }

    #[test]
    fn test_external_service_error_message() {
        let err = external_service_error("planning-api", "timeout");
        assert_eq!(
            err.to_string(),
            "External service error: planning-api - timeout"
        );
    }
}
