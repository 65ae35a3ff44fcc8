pub mod domain;
pub mod formatter;
pub mod ports;
pub mod quiz;
pub mod remote;
pub mod session;
pub mod stats;
pub mod store;

pub use domain::{
    DocumentKind, DocumentMeta, QuizHistoryEntry, SavedArtifact, Session, SessionState,
    StudyTask, Summary, UploadedFile, User, ANONYMOUS_PARTITION,
};
pub use formatter::{format_content, InlineSpan, RenderNode};
pub use ports::{
    CompletionService, DocumentExtractor, KeyValueStore, PortError, PortResult, RemoteTransport,
};
pub use quiz::QuizQuestion;
pub use store::{ClientSessionStore, StudyData};
