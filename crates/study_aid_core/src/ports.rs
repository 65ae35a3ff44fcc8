//! crates/study_aid_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, keeping the core
//! independent of the HTTP client, the local storage backend, the AI provider
//! and the document parsers.

use async_trait::async_trait;

use crate::domain::UploadedFile;
use crate::quiz::QuizQuestion;
use crate::remote::{ApiRequest, ApiResponse};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PortError {
    /// The remote side could not be reached (connection, DNS, TLS, ...).
    #[error("Remote service unavailable: {0}")]
    RemoteUnavailable(String),
    /// The remote side answered with a non-2xx status.
    #[error("{message}")]
    RemoteRejected { status: u16, message: String },
    /// A response arrived but did not have the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("Unsupported file type: {0}")]
    UnsupportedInput(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Local storage error: {0}")]
    Storage(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Sends one request to the remote resource API.
///
/// Implementations report transport failures as `RemoteUnavailable` and return every
/// response that arrived, whatever its status; interpreting the status is up to the caller.
#[async_trait]
pub trait RemoteTransport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> PortResult<ApiResponse>;
}

/// A durable key-value string store (the browser's local storage in spirit).
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> PortResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> PortResult<()>;
    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> PortResult<()>;
}

/// The AI completion collaborator.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Summarizes a document using the `##` / `###` / `*` authoring convention.
    async fn generate_summary(&self, text: &str) -> PortResult<String>;

    /// Generates a multiple-choice quiz. Never returns an empty list.
    async fn generate_quiz(
        &self,
        summary_content: &str,
        original_content: &str,
    ) -> PortResult<Vec<QuizQuestion>>;

    /// Answers a question using only the given notes.
    async fn answer_from_notes(
        &self,
        question: &str,
        summary_content: &str,
        original_content: &str,
    ) -> PortResult<String>;

    /// General conversation without notes.
    async fn chat(&self, question: &str) -> PortResult<String>;
}

/// Pulls the text out of an uploaded document.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract_text(&self, file: &UploadedFile) -> PortResult<String>;
}
