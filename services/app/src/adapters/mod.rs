pub mod completion;
pub mod extract;
pub mod http;
pub mod local_storage;

pub use completion::OpenAiCompletionAdapter;
pub use extract::FileExtractor;
pub use http::ReqwestTransport;
pub use local_storage::JsonFileStorage;
