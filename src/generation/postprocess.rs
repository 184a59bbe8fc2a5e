//! Deduplication, quality filtering and formatting of generated cards.
//!
//! Runs after every generation tier. Idempotent: feeding its own output back
//! in yields the same cards.

use regex::Regex;

use crate::flashcards::Flashcard;

/// Cards with a question or answer shorter than this are dropped.
const MIN_FIELD_CHARS: usize = 10;

/// Answers longer than this are trimmed to their first two sentences.
const MAX_ANSWER_CHARS: usize = 200;

/// Normalize a question for duplicate detection: case-folded with all
/// punctuation stripped.
pub fn normalize_question(question: &str) -> String {
    let non_word = Regex::new(r"[^\w\s]").expect("Invalid regex");
    non_word.replace_all(&question.to_lowercase(), "").into_owned()
}

/// Deduplicate, filter and reformat cards. Order is preserved; the first
/// occurrence of a duplicated question wins.
pub fn postprocess(cards: Vec<Flashcard>) -> Vec<Flashcard> {
    let label_prefix = Regex::new(r"(?i)^(?:Answer:|A:)\s*").expect("Invalid regex");
    let whitespace_run = Regex::new(r"\s+").expect("Invalid regex");

    let mut seen_questions = std::collections::HashSet::new();
    let mut processed = Vec::new();

    for card in cards {
        if !seen_questions.insert(normalize_question(&card.question)) {
            continue;
        }

        let question = card.question.trim();
        let answer = card.answer.trim();

        if question.chars().count() < MIN_FIELD_CHARS || answer.chars().count() < MIN_FIELD_CHARS {
            continue;
        }

        let mut question = question.to_string();
        if !question.ends_with('?') {
            question.push('?');
        }
        let question = capitalize_first(&question);

        let answer = label_prefix.replace(answer, "");
        let answer = whitespace_run.replace_all(&answer, " ");
        let answer = capitalize_first(&answer);
        let answer = shorten_answer(answer);

        processed.push(Flashcard::new(question, answer, card.kind));
    }

    processed
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Keep long answers readable: first two sentence-terminated segments with a
/// closing period.
fn shorten_answer(answer: String) -> String {
    if answer.chars().count() <= MAX_ANSWER_CHARS {
        return answer;
    }

    let mut short = answer
        .split(". ")
        .take(2)
        .collect::<Vec<_>>()
        .join(". ");
    if !short.ends_with('.') {
        short.push('.');
    }
    short
}
