//! Text-to-flashcard generation pipeline.

pub mod chunker;
pub mod concepts;
pub mod pipeline;
pub mod postprocess;
pub mod synthesizer;

pub use pipeline::{FlashcardPipeline, GenerationError};
