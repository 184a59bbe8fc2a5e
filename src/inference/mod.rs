//! Remote inference client for card enhancement.
//!
//! The remote service is strictly optional: every public capability returns a
//! list of cards, possibly empty, and swallows all transport and protocol
//! failures after logging them. Only the internal call layer deals in errors.

pub mod parser;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::config::{roles, InferenceConfig};
use crate::flashcards::Flashcard;

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model still loading after {0} attempts")]
    ModelLoading(u32),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("no endpoint configured for role: {0}")]
    MissingEndpoint(String),
}

type Result<T> = std::result::Result<T, InferenceError>;

/// Inputs are truncated to this many characters before being sent.
pub const MAX_INPUT_CHARS: usize = 1000;

/// At most this many chunks are enhanced per pipeline invocation.
pub const MAX_ENHANCED_CHUNKS: usize = 5;

/// Prompted fallback generation sees this much of the text.
const PROMPTED_INPUT_CHARS: usize = 500;

/// Summarization fallback sees this much of the text.
const SUMMARY_INPUT_CHARS: usize = 800;

/// Remote generation capability as seen by the pipeline.
///
/// Implementations never fail; unavailable backends simply produce no cards.
#[async_trait]
pub trait RemoteEnhancer: Send + Sync {
    /// Generate additional cards from prepared text chunks.
    async fn enhance_chunks(&self, chunks: &[String]) -> Vec<Flashcard>;

    /// Last-resort remote generation over the raw text, trying each
    /// configured model in turn and stopping at the first that yields cards.
    async fn generate_fallback(&self, text: &str) -> Vec<Flashcard>;
}

/// HTTP client for a Hugging-Face-style text inference API.
pub struct InferenceClient {
    http: reqwest::Client,
    config: InferenceConfig,
    backoff_base: Duration,
}

impl InferenceClient {
    pub fn new(config: &InferenceConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http,
            config: config.clone(),
            backoff_base: Duration::from_secs(1),
        })
    }

    /// Shrink the retry backoff; only useful in tests.
    #[cfg(test)]
    fn with_backoff_base(mut self, backoff_base: Duration) -> Self {
        self.backoff_base = backoff_base;
        self
    }

    /// One model call with bounded retries.
    ///
    /// HTTP 503 means the model is still warming up and is the only retried
    /// status; every other failure is terminal for this call.
    async fn call_model(&self, url: &str, input: &str) -> Result<Value> {
        let payload = serde_json::json!({ "inputs": truncate_chars(input, MAX_INPUT_CHARS) });

        for attempt in 0..self.config.max_retries {
            let mut request = self.http.post(url).json(&payload);
            if let Some(token) = &self.config.api_token {
                request = request.bearer_auth(token);
            }

            let response = request.send().await?;

            match response.status() {
                StatusCode::OK => return Ok(response.json().await?),
                StatusCode::SERVICE_UNAVAILABLE => {
                    log::warn!(
                        "model loading, attempt {}/{}",
                        attempt + 1,
                        self.config.max_retries
                    );
                    if attempt + 1 < self.config.max_retries {
                        tokio::time::sleep(self.backoff_base * 2u32.pow(attempt)).await;
                    }
                }
                status => {
                    let message = response.text().await.unwrap_or_default();
                    return Err(InferenceError::Api {
                        status: status.as_u16(),
                        message,
                    });
                }
            }
        }

        Err(InferenceError::ModelLoading(self.config.max_retries))
    }

    fn endpoint(&self, role: &str) -> Result<&str> {
        self.config
            .endpoint(role)
            .ok_or_else(|| InferenceError::MissingEndpoint(role.to_string()))
    }

    /// The fallback configuration ladder: a prompted instruction model, then
    /// a plain summarization model.
    fn fallback_inputs(&self, text: &str) -> Vec<(&'static str, String)> {
        vec![
            (
                roles::PROMPTED_GENERATION,
                format!(
                    "Generate 5 study questions and answers from this text: {}",
                    truncate_chars(text, PROMPTED_INPUT_CHARS)
                ),
            ),
            (
                roles::TEXT_ANALYSIS,
                truncate_chars(text, SUMMARY_INPUT_CHARS).to_string(),
            ),
        ]
    }
}

#[async_trait]
impl RemoteEnhancer for InferenceClient {
    async fn enhance_chunks(&self, chunks: &[String]) -> Vec<Flashcard> {
        let url = match self.endpoint(roles::QA_GENERATION) {
            Ok(url) => url.to_string(),
            Err(e) => {
                log::warn!("enhancement skipped: {}", e);
                return Vec::new();
            }
        };

        let mut cards = Vec::new();

        for chunk in chunks.iter().take(MAX_ENHANCED_CHUNKS) {
            match self.call_model(&url, chunk).await {
                Ok(value) => cards.extend(parser::parse_response(&value)),
                Err(e) => log::warn!("enhancement call failed: {}", e),
            }
        }

        cards
    }

    async fn generate_fallback(&self, text: &str) -> Vec<Flashcard> {
        for (role, input) in self.fallback_inputs(text) {
            let url = match self.endpoint(role) {
                Ok(url) => url.to_string(),
                Err(e) => {
                    log::warn!("fallback model skipped: {}", e);
                    continue;
                }
            };

            match self.call_model(&url, &input).await {
                Ok(value) => {
                    let cards = parser::parse_response(&value);
                    if !cards.is_empty() {
                        return cards;
                    }
                }
                Err(e) => log::warn!("fallback call to {} failed: {}", role, e),
            }
        }

        Vec::new()
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
