//! crates/study_aid_core/src/domain.rs
//!
//! Defines the core data structures for the application.
//! These structs double as the JSON contract with the remote resource API,
//! which speaks camelCase, so they carry serde derives.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::ports::{PortError, PortResult};

/// Partition key used for every per-user resource when nobody is logged in.
pub const ANONYMOUS_PARTITION: &str = "anonymous";

/// The identity of a logged-in user. The email doubles as the partition key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
}

/// The client-held session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user: Option<User>,
    pub auth_token: Option<String>,
    /// Set by the "remember me" choice; governs writes to durable storage.
    pub persist_to_local_storage: bool,
}

/// Where the session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    LoggedIn { persisted: bool },
}

impl Session {
    pub fn state(&self) -> SessionState {
        match self.user {
            Some(_) => SessionState::LoggedIn {
                persisted: self.persist_to_local_storage,
            },
            None => SessionState::LoggedOut,
        }
    }
}

/// A generated summary of one uploaded document. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub original_content: String,
    #[serde(alias = "content")]
    pub summary_content: String,
    pub created_at: DateTime<Utc>,
}

impl Summary {
    pub fn new(title: impl Into<String>, original_content: impl Into<String>, summary_content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            original_content: original_content.into(),
            summary_content: summary_content.into(),
            created_at: Utc::now(),
        }
    }
}

/// One entry of the study schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyTask {
    #[serde(alias = "_id")]
    pub id: String,
    /// Weak reference; the summary may no longer exist.
    pub summary_id: String,
    pub summary_title: String,
    pub hours: f64,
    #[serde(default)]
    pub is_completed: bool,
}

impl StudyTask {
    /// Creates an open task for `summary`. `hours` must be a positive number.
    pub fn new(summary: &Summary, hours: f64) -> PortResult<Self> {
        if !hours.is_finite() || hours <= 0.0 {
            return Err(PortError::InvalidInput(format!(
                "study hours must be greater than zero, got {}",
                hours
            )));
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            summary_id: summary.id.clone(),
            summary_title: summary.title.clone(),
            hours,
            is_completed: false,
        })
    }
}

/// The outcome of one quiz submission. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizHistoryEntry {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(alias = "topic", default, deserialize_with = "null_as_default")]
    pub summary_title: String,
    pub score: u32,
    #[serde(alias = "total")]
    pub total_questions: u32,
    pub percentage: u32,
    pub created_at: DateTime<Utc>,
}

impl QuizHistoryEntry {
    /// Builds an entry for a finished attempt, deriving the rounded percentage.
    pub fn from_attempt(summary_title: impl Into<String>, score: u32, total_questions: u32) -> PortResult<Self> {
        if total_questions == 0 {
            return Err(PortError::InvalidInput(
                "a quiz result needs at least one question".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            summary_title: summary_title.into(),
            score,
            total_questions,
            percentage: percentage(score, total_questions),
            created_at: Utc::now(),
        })
    }
}

/// `round(score / total * 100)`, with halves rounded away from zero.
pub fn percentage(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(score) / f64::from(total) * 100.0).round() as u32
}

/// Metadata of the source document sent along with a saved summary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentMeta {
    pub filename: Option<String>,
    pub mimetype: Option<String>,
    pub size: Option<u64>,
    pub text: String,
}

/// What the remote service stored for a saved summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedArtifact {
    pub document_id: String,
    pub note_id: String,
    pub title: Option<String>,
    pub summary_text: String,
}

/// The document formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Pdf,
    Spreadsheet,
    SlideDeck,
}

impl DocumentKind {
    const ALL: [DocumentKind; 4] = [
        DocumentKind::PlainText,
        DocumentKind::Pdf,
        DocumentKind::Spreadsheet,
        DocumentKind::SlideDeck,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            DocumentKind::PlainText => ".txt",
            DocumentKind::Pdf => ".pdf",
            DocumentKind::Spreadsheet => ".xlsx",
            DocumentKind::SlideDeck => ".pptx",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            DocumentKind::PlainText => "text/plain",
            DocumentKind::Pdf => "application/pdf",
            DocumentKind::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            DocumentKind::SlideDeck => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
        }
    }

    /// Classifies a file. A matching content type or a matching extension is enough.
    pub fn classify(file_name: &str, content_type: Option<&str>) -> Option<Self> {
        let lower_name = file_name.to_lowercase();
        Self::ALL.into_iter().find(|kind| {
            content_type == Some(kind.content_type()) || lower_name.ends_with(kind.extension())
        })
    }
}

/// A file handed to the extractor.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn kind(&self) -> Option<DocumentKind> {
        DocumentKind::classify(&self.file_name, self.content_type.as_deref())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
