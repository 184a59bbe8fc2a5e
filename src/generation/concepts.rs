//! Heuristic concept extraction.
//!
//! A set of independent pattern matchers scans the raw text for definitions,
//! list items, and facts. Matchers are deliberately not mutually exclusive:
//! the same span may surface as both a definition and a fact, and downstream
//! deduplication deals with the overlap.

use regex::Regex;

/// A unit of meaning mined from the source text
#[derive(Debug, Clone, PartialEq)]
pub enum Concept {
    /// "term means content" style statement
    Definition { term: String, content: String },
    /// A flagged or causal statement
    Fact { content: String },
    /// A bulleted or numbered list entry
    ListItem { content: String },
}

/// A single pattern rule family.
///
/// Each matcher scans the whole text and returns every concept its patterns
/// recognize, in first-match order.
pub trait ConceptMatcher: Send + Sync {
    fn scan(&self, text: &str) -> Vec<Concept>;
}

/// Matches "X is/means/refers to Y", "X: Y" and "Definition: X – Y" forms.
pub struct DefinitionMatcher {
    patterns: Vec<Regex>,
}

/// Terms this short are almost always noise ("a", "it", ...).
const MIN_TERM_CHARS: usize = 2;
const MIN_DEFINITION_CHARS: usize = 10;

impl DefinitionMatcher {
    pub fn new() -> Self {
        Self {
            patterns: vec![
                Regex::new(
                    r"(?i)(\w+(?:\s+\w+)*)\s+(?:is|are|means?|refers?\s+to|defined?\s+as)\s+([^.!?]+)",
                )
                .expect("Invalid regex"),
                Regex::new(r"(?i)(\w+(?:\s+\w+)*):\s*([^.!?\n]+)").expect("Invalid regex"),
                Regex::new(r"(?i)Definition:\s*(\w+(?:\s+\w+)*)\s*[-–]\s*([^.!?]+)")
                    .expect("Invalid regex"),
            ],
        }
    }
}

impl Default for DefinitionMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ConceptMatcher for DefinitionMatcher {
    fn scan(&self, text: &str) -> Vec<Concept> {
        let mut concepts = Vec::new();

        for pattern in &self.patterns {
            for caps in pattern.captures_iter(text) {
                let term = caps[1].trim();
                let content = caps[2].trim();
                if term.chars().count() > MIN_TERM_CHARS
                    && content.chars().count() > MIN_DEFINITION_CHARS
                {
                    concepts.push(Concept::Definition {
                        term: term.to_string(),
                        content: content.to_string(),
                    });
                }
            }
        }

        concepts
    }
}

/// Matches bulleted/numbered lines and "Steps:/Process:/Stages:" blocks.
pub struct ListMatcher {
    patterns: Vec<Regex>,
}

const MIN_LIST_ITEM_CHARS: usize = 15;

impl ListMatcher {
    pub fn new() -> Self {
        Self {
            patterns: vec![
                Regex::new(r"(?im)(?:^|\n)\s*(?:\d+\.|\*|-|•)\s*([^.\n]+(?:\.[^.\n]*)*)")
                    .expect("Invalid regex"),
                Regex::new(r"(?i)(?:Steps?|Processes?|Stages?):\s*\n((?:\s*(?:\d+\.|\*|-)\s*[^\n]+\n?)+)")
                    .expect("Invalid regex"),
            ],
        }
    }
}

impl Default for ListMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ConceptMatcher for ListMatcher {
    fn scan(&self, text: &str) -> Vec<Concept> {
        let mut concepts = Vec::new();

        for pattern in &self.patterns {
            for caps in pattern.captures_iter(text) {
                let item = caps[1].trim();
                if item.chars().count() > MIN_LIST_ITEM_CHARS {
                    concepts.push(Concept::ListItem {
                        content: item.to_string(),
                    });
                }
            }
        }

        concepts
    }
}

/// Matches flagged statements, citations, and causal claims.
pub struct FactMatcher {
    patterns: Vec<Regex>,
}

const MIN_FACT_CHARS: usize = 20;

impl FactMatcher {
    pub fn new() -> Self {
        Self {
            patterns: vec![
                Regex::new(r"(?i)(?:Important|Key|Note|Remember):\s*([^.!?\n]+)")
                    .expect("Invalid regex"),
                Regex::new(r"(?i)(?:According to|Research shows|Studies indicate)\s+([^.!?]+)")
                    .expect("Invalid regex"),
                Regex::new(r"(?i)(\w+(?:\s+\w+)*)\s+(?:causes?|results?\s+in|leads?\s+to)\s+([^.!?]+)")
                    .expect("Invalid regex"),
            ],
        }
    }
}

impl Default for FactMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ConceptMatcher for FactMatcher {
    fn scan(&self, text: &str) -> Vec<Concept> {
        let mut concepts = Vec::new();

        for pattern in &self.patterns {
            for caps in pattern.captures_iter(text) {
                // Causal patterns keep the whole matched statement, marker
                // included, so the synthesizer can re-split on it.
                let fact = match caps.get(2) {
                    Some(_) => caps[0].trim().to_string(),
                    None => caps[1].trim().to_string(),
                };

                if fact.chars().count() > MIN_FACT_CHARS {
                    concepts.push(Concept::Fact { content: fact });
                }
            }
        }

        concepts
    }
}

/// Runs an ordered list of matchers over the text and concatenates their
/// findings.
pub struct ConceptExtractor {
    matchers: Vec<Box<dyn ConceptMatcher>>,
}

impl ConceptExtractor {
    pub fn new() -> Self {
        Self::with_matchers(vec![
            Box::new(DefinitionMatcher::new()),
            Box::new(ListMatcher::new()),
            Box::new(FactMatcher::new()),
        ])
    }

    pub fn with_matchers(matchers: Vec<Box<dyn ConceptMatcher>>) -> Self {
        Self { matchers }
    }

    pub fn extract(&self, text: &str) -> Vec<Concept> {
        self.matchers
            .iter()
            .flat_map(|matcher| matcher.scan(text))
            .collect()
    }
}

impl Default for ConceptExtractor {
    fn default() -> Self {
        Self::new()
    }
}
