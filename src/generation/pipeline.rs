//! Generation pipeline orchestration.
//!
//! Tiers, in order: rule-based synthesis over extracted concepts, optional
//! remote enhancement, a remote fallback ladder when too few cards came out,
//! and a purely local section-based fallback as the last resort. Every tier
//! degrades silently; the only error a caller can see is input validation.

use std::sync::Arc;

use thiserror::Error;

use crate::flashcards::{CardKind, Flashcard};
use crate::inference::RemoteEnhancer;

use super::chunker;
use super::concepts::ConceptExtractor;
use super::postprocess;
use super::synthesizer;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("text too short to generate flashcards from")]
    InputTooShort,
}

/// Inputs under this many trimmed characters are rejected outright.
pub const MIN_INPUT_CHARS: usize = 20;

/// Hard cap on cards per pipeline run.
pub const MAX_PIPELINE_CARDS: usize = 15;

/// Below this card count the remote fallback ladder is consulted.
const REMOTE_FALLBACK_THRESHOLD: usize = 3;

/// Below this card count everything is discarded for the basic fallback.
const BASIC_FALLBACK_THRESHOLD: usize = 2;

/// Sections shorter than this contribute no fallback card.
const MIN_SECTION_CHARS: usize = 50;

/// At most this many sections become fallback comprehension cards.
const MAX_FALLBACK_SECTIONS: usize = 5;

/// Fallback answers are previewed to this many characters.
const SECTION_PREVIEW_CHARS: usize = 150;

/// Texts longer than this also get an overview card.
const OVERVIEW_MIN_TEXT_CHARS: usize = 100;

/// The overview card quotes this much of the opening.
const OVERVIEW_PREVIEW_CHARS: usize = 200;

/// Turns raw study text into a bounded list of flashcards.
pub struct FlashcardPipeline {
    extractor: ConceptExtractor,
    enhancer: Option<Arc<dyn RemoteEnhancer>>,
}

impl FlashcardPipeline {
    pub fn new(enhancer: Option<Arc<dyn RemoteEnhancer>>) -> Self {
        Self {
            extractor: ConceptExtractor::new(),
            enhancer,
        }
    }

    /// Run the full pipeline over one text.
    ///
    /// Always produces at least one card for valid input; only too-short
    /// input is an error.
    pub async fn generate(&self, text: &str) -> Result<Vec<Flashcard>, GenerationError> {
        let text = text.trim();
        if text.chars().count() < MIN_INPUT_CHARS {
            return Err(GenerationError::InputTooShort);
        }

        let chunks = chunker::chunk_text(text);
        if chunks.is_empty() {
            // Nothing substantial enough to mine; the placeholder bypasses
            // the rest of the pipeline
            return Ok(vec![unprocessable_card()]);
        }

        let concepts = self.extractor.extract(text);
        let mut cards = synthesizer::synthesize_cards(&concepts);
        log::info!(
            "rule-based synthesis: {} concepts -> {} cards",
            concepts.len(),
            cards.len()
        );

        if let Some(enhancer) = &self.enhancer {
            cards.extend(enhancer.enhance_chunks(&chunks).await);
        }

        if cards.len() < REMOTE_FALLBACK_THRESHOLD {
            if let Some(enhancer) = &self.enhancer {
                log::info!("only {} cards so far, trying remote fallback", cards.len());
                cards.extend(enhancer.generate_fallback(text).await);
            }
        }

        if cards.len() < BASIC_FALLBACK_THRESHOLD {
            log::info!("falling back to section-based cards");
            cards = basic_fallback_cards(text);
        }

        let mut cards = postprocess::postprocess(cards);
        cards.truncate(MAX_PIPELINE_CARDS);

        if cards.is_empty() {
            cards.push(exhausted_card());
        }

        Ok(cards)
    }
}

/// Independent last-resort generator: one comprehension card per substantial
/// blank-line-delimited section, plus an overview card for longer texts.
fn basic_fallback_cards(text: &str) -> Vec<Flashcard> {
    let mut cards = Vec::new();

    let sections = text
        .split("\n\n")
        .map(str::trim)
        .filter(|section| section.chars().count() > MIN_SECTION_CHARS)
        .take(MAX_FALLBACK_SECTIONS);

    for (index, section) in sections.enumerate() {
        cards.push(Flashcard::new(
            format!("What does section {} discuss?", index + 1),
            preview(section, SECTION_PREVIEW_CHARS),
            CardKind::Comprehension,
        ));
    }

    if text.chars().count() > OVERVIEW_MIN_TEXT_CHARS {
        cards.push(Flashcard::new(
            "What is the main topic of this content?".to_string(),
            preview(text.trim(), OVERVIEW_PREVIEW_CHARS),
            CardKind::Overview,
        ));
    }

    cards
}

/// Truncate with an ellipsis marker when the text overflows.
fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", truncate_chars(text, max_chars).trim_end())
    } else {
        text.to_string()
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn unprocessable_card() -> Flashcard {
    Flashcard::new(
        "Unable to process the provided text".to_string(),
        "Please provide more structured content with clear concepts, definitions, or facts."
            .to_string(),
        CardKind::General,
    )
}

fn exhausted_card() -> Flashcard {
    Flashcard::new(
        "Unable to generate flashcards from this content".to_string(),
        "Please try providing more structured text with clear concepts, definitions, or key facts."
            .to_string(),
        CardKind::General,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct StubEnhancer {
        enhanced: Vec<Flashcard>,
        fallback: Vec<Flashcard>,
    }

    #[async_trait]
    impl RemoteEnhancer for StubEnhancer {
        async fn enhance_chunks(&self, _chunks: &[String]) -> Vec<Flashcard> {
            self.enhanced.clone()
        }

        async fn generate_fallback(&self, _text: &str) -> Vec<Flashcard> {
            self.fallback.clone()
        }
    }

    fn offline_pipeline() -> FlashcardPipeline {
        FlashcardPipeline::new(None)
    }

    #[tokio::test]
    async fn test_short_input_is_rejected() {
        let err = offline_pipeline().generate("way too short").await.unwrap_err();
        assert!(matches!(err, GenerationError::InputTooShort));
    }

    #[tokio::test]
    async fn test_definition_text_produces_definition_cards() {
        let cards = offline_pipeline()
            .generate("Photosynthesis is the process by which plants convert light into energy.")
            .await
            .unwrap();

        assert!(cards
            .iter()
            .any(|c| c.kind == CardKind::Definition && c.question == "What is Photosynthesis?"));
    }

    #[tokio::test]
    async fn test_flagged_fact_survives_to_output() {
        let cards = offline_pipeline()
            .generate("Important: always back up your data before an upgrade.")
            .await
            .unwrap();

        assert!(cards.iter().any(|c| c.kind == CardKind::Fact
            && c.answer.contains("back up your data before an upgrade")));
    }

    #[tokio::test]
    async fn test_output_is_capped() {
        // Dozens of distinct definitions, each yielding two cards
        let text = (0..40)
            .map(|i| {
                format!(
                    "Concept{} is the idea number {} in this very long enumeration.",
                    i, i
                )
            })
            .collect::<Vec<_>>()
            .join(" ");

        let cards = offline_pipeline().generate(&text).await.unwrap();
        assert!(cards.len() <= MAX_PIPELINE_CARDS);
    }

    #[tokio::test]
    async fn test_unmineable_text_falls_back_to_sections() {
        // No definitions, lists, flags or causal markers anywhere
        let text = "The quick brown fox jumped over the lazy sleeping dog near the river bank.\n\n\
                    Later that afternoon the weather turned and heavy rain soaked the entire valley floor.";

        let cards = offline_pipeline().generate(text).await.unwrap();
        assert!(!cards.is_empty());
        assert!(cards
            .iter()
            .all(|c| matches!(c.kind, CardKind::Comprehension | CardKind::Overview)));
    }

    #[tokio::test]
    async fn test_enhancer_cards_are_included() {
        let enhancer = StubEnhancer {
            enhanced: vec![Flashcard::new(
                "What did the remote model contribute here?".to_string(),
                "An extra card from the inference service".to_string(),
                CardKind::AiGenerated,
            )],
            fallback: Vec::new(),
        };

        let pipeline = FlashcardPipeline::new(Some(Arc::new(enhancer)));
        let cards = pipeline
            .generate("Photosynthesis is the process by which plants convert light into energy.")
            .await
            .unwrap();

        assert!(cards.iter().any(|c| c.kind == CardKind::AiGenerated));
    }

    #[tokio::test]
    async fn test_remote_fallback_runs_when_rule_based_underproduces() {
        let enhancer = StubEnhancer {
            enhanced: Vec::new(),
            fallback: vec![
                Flashcard::new(
                    "What was the first remote fallback question?".to_string(),
                    "The first answer from the fallback ladder".to_string(),
                    CardKind::AiGenerated,
                ),
                Flashcard::new(
                    "What was the second remote fallback question?".to_string(),
                    "The second answer from the fallback ladder".to_string(),
                    CardKind::AiGenerated,
                ),
            ],
        };

        let pipeline = FlashcardPipeline::new(Some(Arc::new(enhancer)));
        // Unmineable prose: zero rule-based cards, so the ladder runs
        let cards = pipeline
            .generate("The quick brown fox jumped over the lazy sleeping dog near the river bank.")
            .await
            .unwrap();

        assert_eq!(
            cards
                .iter()
                .filter(|c| c.kind == CardKind::AiGenerated)
                .count(),
            2
        );
    }

    #[tokio::test]
    async fn test_fallback_answers_are_previewed() {
        let section = "sentence ".repeat(40);
        let cards = offline_pipeline().generate(&section).await.unwrap();

        for card in &cards {
            assert!(card.answer.chars().count() <= 210);
        }
    }
}
