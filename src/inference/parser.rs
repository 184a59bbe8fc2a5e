//! Defensive parsing of remote inference responses.
//!
//! The inference service returns whatever shape the selected model produces;
//! nothing here assumes a schema. Unrecognized shapes parse to an empty list.

use regex::Regex;
use serde_json::Value;

use crate::flashcards::{CardKind, Flashcard};

/// Q/A pairs with either side at or below this length are rejected.
const MIN_PAIR_CHARS: usize = 10;

/// Extract flashcards from an arbitrary inference response.
pub fn parse_response(value: &Value) -> Vec<Flashcard> {
    let items: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(_) => vec![value],
        _ => return Vec::new(),
    };

    let mut cards = Vec::new();

    for item in items {
        if let Some(generated) = item.get("generated_text").and_then(|v| v.as_str()) {
            cards.extend(parse_generated_text(generated));
        } else if let Some(summary) = item.get("summary_text").and_then(|v| v.as_str()) {
            cards.push(Flashcard::new(
                "What is the main summary of this content?".to_string(),
                summary.trim().to_string(),
                CardKind::AiSummary,
            ));
        }
    }

    cards
}

/// Try the known Q/A text layouts against generated model output.
///
/// All patterns are applied; duplicate extractions are cleaned up by the
/// post-processor downstream.
fn parse_generated_text(generated: &str) -> Vec<Flashcard> {
    let patterns = [
        // "Question: ...? Answer: ..." labels
        Regex::new(r"(?im)(?:Question|Q):\s*([^?\n]+\?)\s*(?:Answer|A):\s*([^\n]+)")
            .expect("Invalid regex"),
        // Numbered question lines followed by an unnumbered answer
        Regex::new(r"(?m)(\d+\.\s*[^?\n]+\?)\s*([^\d\n]+)").expect("Invalid regex"),
        // Bare "sentence ending in ?" followed by following text
        Regex::new(r"(?m)([^?\n]+\?)\s*([^?\n]+)").expect("Invalid regex"),
    ];

    let mut cards = Vec::new();

    for pattern in &patterns {
        for caps in pattern.captures_iter(generated) {
            let question = caps[1].trim();
            let answer = caps[2].trim();

            if question.chars().count() > MIN_PAIR_CHARS
                && answer.chars().count() > MIN_PAIR_CHARS
            {
                cards.push(Flashcard::new(
                    question.to_string(),
                    answer.to_string(),
                    CardKind::AiGenerated,
                ));
            }
        }
    }

    cards
}
