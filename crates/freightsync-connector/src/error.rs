//! Adapter error type with code-based classification.
//!
//! External systems report failures in wildly different shapes; adapters
//! normalize them to an [`AdapterError`] carrying a machine-readable
//! string code. The retry policy classifies errors by that code alone,
//! so classification stays uniform across providers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Well-known error codes shared between adapters and the sync engine.
pub mod codes {
    /// Generic network failure (DNS, connect, broken pipe).
    pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
    /// The external call exceeded its deadline.
    pub const TIMEOUT: &str = "TIMEOUT";
    /// The external system asked us to slow down.
    pub const RATE_LIMITED: &str = "RATE_LIMITED";
    /// Generic upstream 5xx failure.
    pub const SERVER_ERROR: &str = "SERVER_ERROR";
    /// The access token was rejected as expired.
    pub const TOKEN_EXPIRED: &str = "TOKEN_EXPIRED";
    /// The external system rejected the credentials outright.
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    /// The access token failed validation upstream.
    pub const INVALID_TOKEN: &str = "INVALID_TOKEN";
    /// Exchanging the refresh token for a new access token failed.
    pub const TOKEN_REFRESH_FAILED: &str = "TOKEN_REFRESH_FAILED";
    /// The adapter does not implement the requested capability.
    pub const NOT_SUPPORTED: &str = "NOT_SUPPORTED";
    /// The payload was rejected by upstream validation.
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
}

/// Error returned by an integration adapter call.
///
/// `code` drives retry classification (see [`crate::retry`]); `message`
/// is the human-readable detail from the external system, surfaced
/// verbatim into sync-log error entries.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct AdapterError {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable description of the failure.
    pub message: String,
}

impl AdapterError {
    /// Create an error with an explicit code.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(codes::NETWORK_ERROR, message)
    }

    /// Create a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(codes::TIMEOUT, message)
    }

    /// Create a rate-limited error.
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(codes::RATE_LIMITED, message)
    }

    /// Create an upstream server error.
    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(codes::SERVER_ERROR, message)
    }

    /// Create a token-expired error.
    pub fn token_expired(message: impl Into<String>) -> Self {
        Self::new(codes::TOKEN_EXPIRED, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(codes::VALIDATION_ERROR, message)
    }

    /// Create a capability-missing error.
    pub fn not_supported(message: impl Into<String>) -> Self {
        Self::new(codes::NOT_SUPPORTED, message)
    }

    /// Create an error from a bare HTTP status code (e.g. "503").
    pub fn http_status(status: u16, message: impl Into<String>) -> Self {
        Self::new(status.to_string(), message)
    }

    /// Check if this error is transient and the operation should be retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        crate::retry::is_retryable_code(&self.code)
    }

    /// Check if this error signals an expired or rejected access token.
    #[must_use]
    pub fn is_token_expired(&self) -> bool {
        crate::retry::is_token_expired_code(&self.code)
    }
}

/// Result type for adapter operations.
pub type AdapterResult<T> = Result<T, AdapterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_codes() {
        assert_eq!(AdapterError::network("x").code, codes::NETWORK_ERROR);
        assert_eq!(AdapterError::timeout("x").code, codes::TIMEOUT);
        assert_eq!(AdapterError::rate_limited("x").code, codes::RATE_LIMITED);
        assert_eq!(AdapterError::server_error("x").code, codes::SERVER_ERROR);
        assert_eq!(AdapterError::token_expired("x").code, codes::TOKEN_EXPIRED);
        assert_eq!(AdapterError::validation("x").code, codes::VALIDATION_ERROR);
        assert_eq!(AdapterError::not_supported("x").code, codes::NOT_SUPPORTED);
    }

    #[test]
    fn test_http_status_code() {
        let err = AdapterError::http_status(503, "service unavailable");
        assert_eq!(err.code, "503");
        assert!(err.is_retryable());
    }

    #[test]
    fn test_display() {
        let err = AdapterError::network("connection reset by peer");
        assert_eq!(err.to_string(), "NETWORK_ERROR: connection reset by peer");
    }

    #[test]
    fn test_classification_helpers() {
        assert!(AdapterError::network("x").is_retryable());
        assert!(!AdapterError::network("x").is_token_expired());
        assert!(AdapterError::token_expired("x").is_token_expired());
        assert!(!AdapterError::token_expired("x").is_retryable());
        assert!(!AdapterError::validation("x").is_retryable());
    }

    #[test]
    fn test_serde_roundtrip() {
        let err = AdapterError::rate_limited("too many requests");
        let json = serde_json::to_string(&err).unwrap();
        let parsed: AdapterError = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, err);
    }
}
