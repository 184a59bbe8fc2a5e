//! HTTP API for flashcard generation and review.
//!
//! Six routes over a shared state: generation is pipeline-only, the rest are
//! thin wrappers around the SQLite store. All error responses carry a JSON
//! `{"error": ...}` body; storage detail stays in the server log.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::flashcards::{Flashcard, FlashcardStore, SaveOutcome, SavedFlashcard, StoreError};
use crate::generation::{FlashcardPipeline, GenerationError};

/// The generation endpoint returns at most this many cards.
pub const API_CARD_CAP: usize = 12;

/// Server state shared across requests.
pub struct AppState {
    pub store: Mutex<FlashcardStore>,
    pub pipeline: FlashcardPipeline,
}

/// API error taxonomy mapped onto HTTP statuses.
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound("Flashcard not found".to_string()),
            other => {
                log::error!("storage error: {}", other);
                ApiError::Internal("Internal server error".to_string())
            }
        }
    }
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::InputTooShort => ApiError::BadRequest(
                "Please provide more substantial content to generate flashcards".to_string(),
            ),
        }
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/generate_flashcards", post(generate_flashcards))
        .route("/get_flashcards", get(get_flashcards))
        .route("/save_flashcard", post(save_flashcard))
        .route("/delete_flashcard/{id}", delete(delete_flashcard))
        .route("/clear_all_flashcards", delete(clear_all_flashcards))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Deserialize)]
pub struct GenerateRequest {
    /// Raw study text; `notes` is accepted as an alias and wins when both
    /// are present
    text: Option<String>,
    notes: Option<String>,
}

async fn generate_flashcards(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<Vec<Flashcard>>, ApiError> {
    let text = request.notes.or(request.text).unwrap_or_default();
    log::info!("generating flashcards for {} characters of text", text.len());

    let mut cards = state.pipeline.generate(&text).await?;
    cards.truncate(API_CARD_CAP);

    log::info!("generated {} flashcards", cards.len());
    Ok(Json(cards))
}

async fn get_flashcards(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SavedFlashcard>>, ApiError> {
    let store = lock_store(&state)?;
    let cards = store.list()?;

    log::info!("retrieved {} flashcards from the store", cards.len());
    Ok(Json(cards))
}

#[derive(Deserialize)]
pub struct SaveRequest {
    question: Option<String>,
    answer: Option<String>,
}

async fn save_flashcard(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SaveRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let question = request.question.unwrap_or_default().trim().to_string();
    let answer = request.answer.unwrap_or_default().trim().to_string();

    if question.is_empty() || answer.is_empty() {
        return Err(ApiError::BadRequest(
            "Question and answer are required".to_string(),
        ));
    }

    let store = lock_store(&state)?;
    match store.save(&question, &answer)? {
        SaveOutcome::Duplicate => Ok(Json(json!({
            "message": "This flashcard already exists!"
        }))),
        SaveOutcome::Saved(card) => {
            log::info!("saved flashcard {}: {:.50}", card.id, card.question);
            Ok(Json(json!({ "message": "Flashcard saved successfully!" })))
        }
    }
}

async fn delete_flashcard(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let store = lock_store(&state)?;
    store.delete(id)?;

    log::info!("deleted flashcard {}", id);
    Ok(Json(json!({ "message": "Flashcard deleted successfully!" })))
}

async fn clear_all_flashcards(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let store = lock_store(&state)?;
    let deleted = store.clear()?;

    log::info!("cleared {} flashcards", deleted);
    Ok(Json(json!({
        "message": format!("Deleted {} flashcards successfully!", deleted),
        "deletedCount": deleted,
    })))
}

async fn health(State(state): State<Arc<AppState>>) -> Response {
    let probe = lock_store(&state).and_then(|store| store.probe().map_err(ApiError::from));

    match probe {
        Ok(()) => Json(json!({
            "status": "healthy",
            "database": "connected",
            "timestamp": Utc::now().to_rfc3339(),
        }))
        .into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "status": "unhealthy",
                "database": "disconnected",
                "timestamp": Utc::now().to_rfc3339(),
            })),
        )
            .into_response(),
    }
}

fn lock_store(state: &AppState) -> Result<std::sync::MutexGuard<'_, FlashcardStore>, ApiError> {
    state.store.lock().map_err(|e| {
        log::error!("failed to acquire store lock: {}", e);
        ApiError::Internal("Internal server error".to_string())
    })
}
