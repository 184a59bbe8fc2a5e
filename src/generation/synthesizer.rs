//! Question synthesis from extracted concepts.
//!
//! Each concept type has a fixed question template; output order follows
//! concept order.

use regex::Regex;

use crate::flashcards::{CardKind, Flashcard};

use super::concepts::Concept;

/// Definitions at or above this length get no reverse card.
const REVERSE_CARD_MAX_CHARS: usize = 100;

/// Turn extracted concepts into question/answer cards.
pub fn synthesize_cards(concepts: &[Concept]) -> Vec<Flashcard> {
    let causal_marker =
        Regex::new(r"(?i)\s+(?:causes?|results?\s+in|leads?\s+to)\s+").expect("Invalid regex");

    let mut cards = Vec::new();

    for concept in concepts {
        match concept {
            Concept::Definition { term, content } => {
                cards.push(Flashcard::new(
                    format!("What is {}?", term),
                    content.clone(),
                    CardKind::Definition,
                ));

                // Reverse card only for definitions short enough to read as a
                // question
                if content.chars().count() < REVERSE_CARD_MAX_CHARS {
                    cards.push(Flashcard::new(
                        format!("What term is defined as: '{}'?", content),
                        term.clone(),
                        CardKind::ReverseDefinition,
                    ));
                }
            }

            Concept::Fact { content } => {
                if causal_marker.is_match(content) {
                    // A clean split has exactly one marker; anything else is
                    // ambiguous and skipped rather than guessed at.
                    let parts: Vec<&str> = causal_marker.split(content).collect();
                    if let [cause, effect] = parts[..] {
                        let cause = cause.trim();
                        let effect = effect.trim();
                        cards.push(Flashcard::new(
                            format!("What causes {}?", effect),
                            cause.to_string(),
                            CardKind::CauseEffect,
                        ));
                        cards.push(Flashcard::new(
                            format!("What is the result of {}?", cause),
                            effect.to_string(),
                            CardKind::CauseEffect,
                        ));
                    }
                } else {
                    cards.push(Flashcard::new(
                        "What should you know about this topic?".to_string(),
                        content.clone(),
                        CardKind::Fact,
                    ));
                }
            }

            Concept::ListItem { content } => {
                cards.push(Flashcard::new(
                    "What is one important point to remember?".to_string(),
                    content.clone(),
                    CardKind::ListItem,
                ));
            }
        }
    }

    cards
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_definition_yields_forward_and_reverse_cards() {
        let concepts = vec![Concept::Definition {
            term: "Osmosis".to_string(),
            content: "the movement of water across a membrane".to_string(),
        }];

        let cards = synthesize_cards(&concepts);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].question, "What is Osmosis?");
        assert_eq!(cards[0].kind, CardKind::Definition);
        assert_eq!(
            cards[1].question,
            "What term is defined as: 'the movement of water across a membrane'?"
        );
        assert_eq!(cards[1].answer, "Osmosis");
        assert_eq!(cards[1].kind, CardKind::ReverseDefinition);
    }

    #[test]
    fn test_long_definition_yields_single_card() {
        let concepts = vec![Concept::Definition {
            term: "Entropy".to_string(),
            content: "x".repeat(120),
        }];

        let cards = synthesize_cards(&concepts);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].kind, CardKind::Definition);
    }

    #[test]
    fn test_causal_fact_splits_into_two_cards() {
        let concepts = vec![Concept::Fact {
            content: "Deforestation leads to widespread soil erosion".to_string(),
        }];

        let cards = synthesize_cards(&concepts);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].question, "What causes widespread soil erosion?");
        assert_eq!(cards[0].answer, "Deforestation");
        assert_eq!(cards[1].question, "What is the result of Deforestation?");
        assert_eq!(cards[1].answer, "widespread soil erosion");
        assert!(cards.iter().all(|c| c.kind == CardKind::CauseEffect));
    }

    #[test]
    fn test_fact_with_repeated_markers_is_skipped() {
        let concepts = vec![Concept::Fact {
            content: "Heat causes expansion causes stress in the material".to_string(),
        }];

        assert!(synthesize_cards(&concepts).is_empty());
    }

    #[test]
    fn test_plain_fact_yields_generic_card() {
        let concepts = vec![Concept::Fact {
            content: "water boils at one hundred degrees at sea level".to_string(),
        }];

        let cards = synthesize_cards(&concepts);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].question, "What should you know about this topic?");
        assert_eq!(cards[0].kind, CardKind::Fact);
    }

    #[test]
    fn test_list_item_yields_generic_card() {
        let concepts = vec![Concept::ListItem {
            content: "review your notes within a day of taking them".to_string(),
        }];

        let cards = synthesize_cards(&concepts);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].question, "What is one important point to remember?");
        assert_eq!(cards[0].kind, CardKind::ListItem);
    }

    #[test]
    fn test_output_order_follows_concept_order() {
        let concepts = vec![
            Concept::ListItem {
                content: "first point in the ordered list of items".to_string(),
            },
            Concept::Fact {
                content: "a standalone fact that stands entirely on its own".to_string(),
            },
        ];

        let cards = synthesize_cards(&concepts);
        assert_eq!(cards[0].kind, CardKind::ListItem);
        assert_eq!(cards[1].kind, CardKind::Fact);
    }
}
