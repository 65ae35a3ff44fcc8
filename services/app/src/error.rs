//! services/app/src/error.rs
//!
//! Defines the primary error type for the application.

use crate::config::ConfigError;
use study_aid_core::ports::PortError;

/// The primary error type for the `app` service.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("{0}")]
    Port(#[from] PortError),

    /// Represents a standard Input/Output error (e.g., reading an upload).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Represents a failed interactive prompt.
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// A catch-all for any other unexpected errors.
    #[error("{0}")]
    Internal(String),
}
