//! cardforge — turns free-form study text into question/answer flashcards,
//! persists them, and serves a small CRUD API.

pub mod config;
pub mod flashcards;
pub mod generation;
pub mod inference;
pub mod server;
