//! Application configuration.
//!
//! Loaded from an optional TOML file with serde defaults, then overridden by
//! CLI flags and the token environment variable. The inference section is
//! handed to the pipeline at construction; there is no module-level state.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Environment variable holding the inference API token.
pub const TOKEN_ENV_VAR: &str = "CARDFORGE_API_TOKEN";

/// Well-known endpoint roles in [`InferenceConfig::endpoints`].
pub mod roles {
    /// Per-chunk question generation model
    pub const QA_GENERATION: &str = "qa_generation";
    /// Summarization model, also the second fallback configuration
    pub const TEXT_ANALYSIS: &str = "text_analysis";
    /// Instruction model used for the prompted fallback configuration
    pub const PROMPTED_GENERATION: &str = "prompted_generation";
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// SQLite database file; defaults under the platform data directory
    pub database_path: Option<PathBuf>,
    /// Remote inference settings
    pub inference: InferenceConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".to_string(),
            database_path: None,
            inference: InferenceConfig::default(),
        }
    }
}

/// Remote inference settings passed into the pipeline
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Whether remote enhancement runs at all
    pub enabled: bool,
    /// Bearer token; the environment variable wins over the file
    pub api_token: Option<String>,
    /// Endpoint role → URL (see [`roles`])
    pub endpoints: HashMap<String, String>,
    /// Per-call timeout in seconds
    pub request_timeout_secs: u64,
    /// Attempts per call while the model reports it is still loading
    pub max_retries: u32,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        let endpoints = HashMap::from([
            (
                roles::QA_GENERATION.to_string(),
                "https://api-inference.huggingface.co/models/valhalla/t5-small-qa-qg-hl"
                    .to_string(),
            ),
            (
                roles::TEXT_ANALYSIS.to_string(),
                "https://api-inference.huggingface.co/models/facebook/bart-large-cnn".to_string(),
            ),
            (
                roles::PROMPTED_GENERATION.to_string(),
                "https://api-inference.huggingface.co/models/google/flan-t5-base".to_string(),
            ),
        ]);

        Self {
            enabled: true,
            api_token: None,
            endpoints,
            request_timeout_secs: 30,
            max_retries: 3,
        }
    }
}

impl InferenceConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn endpoint(&self, role: &str) -> Option<&str> {
        self.endpoints.get(role).map(String::as_str)
    }
}

impl AppConfig {
    /// Load configuration.
    ///
    /// An explicit path must be readable. Without one, the default location
    /// is tried and silently skipped when absent.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                toml::from_str(&content)?
            }
            None => match Self::default_config_path() {
                Some(path) if path.exists() => {
                    let content = std::fs::read_to_string(&path)?;
                    toml::from_str(&content)?
                }
                _ => Self::default(),
            },
        };

        if let Ok(token) = std::env::var(TOKEN_ENV_VAR) {
            if !token.is_empty() {
                config.inference.api_token = Some(token);
            }
        }

        Ok(config)
    }

    /// Resolve the database path, falling back to the platform data dir.
    pub fn database_path(&self) -> PathBuf {
        match &self.database_path {
            Some(path) => path.clone(),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("cardforge")
                .join("flashcards.db3"),
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cardforge").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.bind_addr, "127.0.0.1:5000");
        assert!(config.inference.enabled);
        assert_eq!(config.inference.max_retries, 3);
        assert_eq!(config.inference.request_timeout_secs, 30);
        assert!(config.inference.endpoint(roles::QA_GENERATION).is_some());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            bind_addr = "0.0.0.0:8080"

            [inference]
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert!(!config.inference.enabled);
        // Untouched fields keep their defaults
        assert_eq!(config.inference.max_retries, 3);
        assert!(config.inference.endpoint(roles::TEXT_ANALYSIS).is_some());
    }

    #[test]
    fn test_endpoint_override() {
        let config: AppConfig = toml::from_str(
            r#"
            [inference.endpoints]
            qa_generation = "http://localhost:9000/model"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.inference.endpoint(roles::QA_GENERATION),
            Some("http://localhost:9000/model")
        );
        // The endpoints table is replaced wholesale when present
        assert!(config.inference.endpoint(roles::TEXT_ANALYSIS).is_none());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "bind_addr = \"127.0.0.1:7000\"\n").unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:7000");
    }

    #[test]
    fn test_load_missing_explicit_file_errors() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/config.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
