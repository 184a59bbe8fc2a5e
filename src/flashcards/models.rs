//! Data models for flashcards

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a flashcard was generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    /// "What is X?" built from an extracted definition
    Definition,
    /// Term asked back from its definition
    ReverseDefinition,
    /// Generic card from an extracted fact
    Fact,
    /// Cause/effect pair split from a fact
    CauseEffect,
    /// Card from a bulleted or numbered list item
    ListItem,
    /// Section-level fallback comprehension card
    Comprehension,
    /// Summary card for the whole text
    Summary,
    /// Overview card from the opening of the text
    Overview,
    /// Q/A pair parsed out of remote model output
    AiGenerated,
    /// Summary card parsed out of remote model output
    AiSummary,
    /// Placeholder or untagged card
    General,
}

impl Default for CardKind {
    fn default() -> Self {
        Self::General
    }
}

/// A question/answer pair produced by the generation pipeline.
///
/// Cards are value objects; they have no identity until persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
    #[serde(rename = "type", default)]
    pub kind: CardKind,
}

impl Flashcard {
    pub fn new(question: String, answer: String, kind: CardKind) -> Self {
        Self {
            question,
            answer,
            kind,
        }
    }
}

/// A flashcard persisted in the store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFlashcard {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
