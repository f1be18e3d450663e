//! Engine error types and synthetic error codes.

use thiserror::Error;

/// Code recorded for a mapping whose loader failed during full sync.
pub const MAPPING_ERROR: &str = "MAPPING_ERROR";

/// Code recorded when a failed record result carried no code of its own.
pub const UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";

/// Errors raised by the engine's injected data access.
///
/// Adapter failures never surface here; they are captured as data in
/// record results and context errors. This type exists for the loaders
/// the orchestration layer injects.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A caller-supplied loader failed.
    #[error("loader failed: {message}")]
    Loader {
        /// What the loader reported.
        message: String,
        /// Underlying cause, when available.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl SyncError {
    /// Create a loader error.
    pub fn loader(message: impl Into<String>) -> Self {
        SyncError::Loader {
            message: message.into(),
            source: None,
        }
    }

    /// Create a loader error with an underlying cause.
    pub fn loader_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        SyncError::Loader {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
