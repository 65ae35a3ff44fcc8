//! services/app/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the remote resource API, without a trailing slash.
    pub api_base_url: String,
    /// The JSON file standing in for the browser's local storage.
    pub storage_path: PathBuf,
    pub log_level: Level,
    pub ai_api_key: Option<String>,
    pub ai_api_base: String,
    pub ai_model: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // --- Remote API ---
        let api_base_url = var("API_BASE_URL")
            .unwrap_or_else(|| "http://localhost:4000/api".to_string())
            .trim_end_matches('/')
            .to_string();
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue(
                "API_BASE_URL".to_string(),
                format!("'{}' is not an http(s) URL", api_base_url),
            ));
        }

        // --- Local Storage ---
        let storage_path = match var("STORAGE_PATH") {
            Some(path) => PathBuf::from(path),
            None => dirs::data_dir()
                .ok_or_else(|| ConfigError::MissingVar("STORAGE_PATH".to_string()))?
                .join("study-aid")
                .join("local_storage.json"),
        };

        let log_level_str = var("RUST_LOG").unwrap_or_else(|| "WARN".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- AI Provider (key is optional until an AI command runs) ---
        let ai_api_key = var("GEMINI_API_KEY").or_else(|| var("GOOGLE_API_KEY"));
        let ai_api_base = var("AI_API_BASE").unwrap_or_else(|| {
            "https://generativelanguage.googleapis.com/v1beta/openai".to_string()
        });
        let ai_model = var("AI_MODEL").unwrap_or_else(|| "gemini-2.5-flash".to_string());

        Ok(Self {
            api_base_url,
            storage_path,
            log_level,
            ai_api_key,
            ai_api_base,
            ai_model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_apply() {
        let config = Config::from_lookup(lookup(&[("STORAGE_PATH", "/tmp/ls.json")])).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:4000/api");
        assert_eq!(config.log_level, Level::WARN);
        assert_eq!(config.ai_model, "gemini-2.5-flash");
        assert!(config.ai_api_key.is_none());
    }

    #[test]
    fn google_key_is_a_fallback() {
        let config = Config::from_lookup(lookup(&[
            ("STORAGE_PATH", "/tmp/ls.json"),
            ("GOOGLE_API_KEY", "g-key"),
        ]))
        .unwrap();
        assert_eq!(config.ai_api_key.as_deref(), Some("g-key"));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = Config::from_lookup(lookup(&[
            ("STORAGE_PATH", "/tmp/ls.json"),
            ("API_BASE_URL", "https://study.example.com/api/"),
        ]))
        .unwrap();
        assert_eq!(config.api_base_url, "https://study.example.com/api");
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("STORAGE_PATH", "/tmp/ls.json"),
            ("RUST_LOG", "chatty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(name, _) if name == "RUST_LOG"));

        let err = Config::from_lookup(lookup(&[
            ("STORAGE_PATH", "/tmp/ls.json"),
            ("API_BASE_URL", "localhost:4000"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(name, _) if name == "API_BASE_URL"));
    }
}
