//! services/app/src/state.rs
//!
//! Defines the state shared by every command, built once at startup.

use std::sync::Arc;

use async_openai::{config::OpenAIConfig, Client};
use study_aid_core::{
    ports::{CompletionService, DocumentExtractor, KeyValueStore, RemoteTransport},
    store::ClientSessionStore,
};
use tracing::info;

use crate::{
    adapters::{FileExtractor, JsonFileStorage, OpenAiCompletionAdapter, ReqwestTransport},
    config::Config,
    error::AppError,
};

//=========================================================================================
// AppState
//=========================================================================================

pub struct AppState {
    pub config: Arc<Config>,
    pub store: ClientSessionStore,
    pub extractor: Arc<dyn DocumentExtractor>,
    /// Absent when no AI key is configured; only the AI commands need it.
    completion: Option<Arc<dyn CompletionService>>,
}

impl AppState {
    /// Wires the production adapters from `config` and restores any persisted session.
    pub fn from_config(config: Arc<Config>) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("study-aid/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Internal(format!("Could not build HTTP client: {}", e)))?;
        let transport: Arc<dyn RemoteTransport> =
            Arc::new(ReqwestTransport::new(http, config.api_base_url.clone()));
        let storage: Arc<dyn KeyValueStore> = Arc::new(JsonFileStorage::open(&config.storage_path));
        info!(
            "Using {} with local storage at {}.",
            config.api_base_url,
            config.storage_path.display()
        );

        let completion = config.ai_api_key.as_ref().map(|key| {
            let openai_config = OpenAIConfig::new()
                .with_api_key(key)
                .with_api_base(&config.ai_api_base);
            Arc::new(OpenAiCompletionAdapter::new(
                Client::with_config(openai_config),
                config.ai_model.clone(),
            )) as Arc<dyn CompletionService>
        });

        Ok(Self::from_parts(
            config,
            transport,
            storage,
            Arc::new(FileExtractor::new()),
            completion,
        ))
    }

    /// Builds the state from already constructed adapters.
    pub fn from_parts(
        config: Arc<Config>,
        transport: Arc<dyn RemoteTransport>,
        storage: Arc<dyn KeyValueStore>,
        extractor: Arc<dyn DocumentExtractor>,
        completion: Option<Arc<dyn CompletionService>>,
    ) -> Self {
        Self {
            config,
            store: ClientSessionStore::new(transport, storage),
            extractor,
            completion,
        }
    }

    pub fn completion(&self) -> Result<Arc<dyn CompletionService>, AppError> {
        self.completion.clone().ok_or_else(|| {
            AppError::Internal(
                "No AI key configured. Set GEMINI_API_KEY (or GOOGLE_API_KEY).".to_string(),
            )
        })
    }

    /// The partition key for per-user resources right now.
    pub fn user_key(&self) -> String {
        self.store.partition_key().to_string()
    }
}
