//! Text chunking for the generation pipeline.
//!
//! Splits raw study text into bounded, sentence-aligned chunks suitable as
//! inference-service inputs.

/// Maximum characters per chunk.
pub const MAX_CHUNK_CHARS: usize = 200;

/// Paragraphs shorter than this are skipped entirely.
const MIN_PARAGRAPH_CHARS: usize = 20;

/// Split raw text into ordered chunks.
///
/// Paragraphs are taken line by line, internal whitespace collapsed, and
/// anything under the length floor dropped. Retained paragraphs are split on
/// sentence terminators and sentences are greedily packed into chunks of at
/// most [`MAX_CHUNK_CHARS`] characters. Degenerate input yields an empty list.
pub fn chunk_text(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();

    for paragraph in text.split('\n') {
        let paragraph = collapse_whitespace(paragraph);
        if paragraph.chars().count() < MIN_PARAGRAPH_CHARS {
            continue;
        }

        // Accumulated sentences for the current chunk, joined but not yet
        // closed with the trailing period.
        let mut current = String::new();

        for sentence in paragraph.split(['.', '!', '?']) {
            let sentence = sentence.trim();
            if sentence.is_empty() {
                continue;
            }

            if current.is_empty() {
                current = fit_sentence(sentence);
            } else if chunk_len(&current, sentence) <= MAX_CHUNK_CHARS {
                current.push_str(". ");
                current.push_str(sentence);
            } else {
                chunks.push(close_chunk(current));
                current = fit_sentence(sentence);
            }
        }

        if !current.is_empty() {
            chunks.push(close_chunk(current));
        }
    }

    chunks
}

/// Length of `current` extended by one more sentence and the closing period.
fn chunk_len(current: &str, sentence: &str) -> usize {
    current.chars().count() + ". ".len() + sentence.chars().count() + 1
}

/// Start a new chunk from a sentence, truncating it if it alone would
/// overflow the chunk bound.
fn fit_sentence(sentence: &str) -> String {
    if sentence.chars().count() + 1 > MAX_CHUNK_CHARS {
        truncate_chars(sentence, MAX_CHUNK_CHARS - 1).trim_end().to_string()
    } else {
        sentence.to_string()
    }
}

fn close_chunk(mut chunk: String) -> String {
    chunk.push('.');
    chunk
}

/// Collapse internal whitespace runs to single spaces.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate on a character boundary.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_no_chunks() {
        assert!(chunk_text("").is_empty());
        assert!(chunk_text("   \n\n   ").is_empty());
    }

    #[test]
    fn test_short_paragraphs_are_dropped() {
        let text = "Too short.\nThis paragraph is long enough to be kept for chunking.";
        let chunks = chunk_text(text);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].contains("long enough"));
    }

    #[test]
    fn test_chunks_respect_length_bound() {
        let text = "This is a sentence about biology. ".repeat(40);
        for chunk in chunk_text(&text) {
            assert!(!chunk.is_empty());
            assert!(chunk.chars().count() <= MAX_CHUNK_CHARS, "chunk too long: {}", chunk);
        }
    }

    #[test]
    fn test_oversized_single_sentence_is_truncated() {
        let text = "word ".repeat(100);
        let chunks = chunk_text(&text);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].chars().count() <= MAX_CHUNK_CHARS);
    }

    #[test]
    fn test_chunk_order_follows_source_order() {
        let text = "First sentence about alpha topics here. Second sentence about beta topics here.\n\
                    Third sentence about gamma topics in the next paragraph of the text.";
        let chunks = chunk_text(text);
        let joined = chunks.join(" ");
        let alpha = joined.find("alpha").unwrap();
        let beta = joined.find("beta").unwrap();
        let gamma = joined.find("gamma").unwrap();
        assert!(alpha < beta && beta < gamma);
    }

    #[test]
    fn test_whitespace_runs_are_collapsed() {
        let text = "Plenty   of\textra    whitespace inside this single paragraph of text.";
        let chunks = chunk_text(text);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].contains("Plenty of extra whitespace"));
    }

    #[test]
    fn test_terminator_runs_do_not_produce_empty_sentences() {
        let text = "Is this really a question?!? Yes!! It absolutely is a question...";
        for chunk in chunk_text(text) {
            assert!(!chunk.trim().is_empty());
        }
    }
}
