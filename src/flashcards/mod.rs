//! Flashcard models and persistence.

mod models;
mod storage;

pub use models::{CardKind, Flashcard, SavedFlashcard};
pub use storage::{FlashcardStore, SaveOutcome, StoreError};
