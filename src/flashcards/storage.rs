//! SQLite-backed storage for saved flashcards.
//!
//! One table, integer primary keys. A normalized copy of the question
//! (`question_key`) carries a UNIQUE constraint so that two concurrent saves
//! of the same question cannot both insert.

use std::path::PathBuf;

use chrono::Utc;
use rusqlite::{params, Connection};
use thiserror::Error;

use crate::generation::postprocess::normalize_question;

use super::models::SavedFlashcard;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Flashcard not found: {0}")]
    NotFound(i64),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Outcome of a save attempt
#[derive(Debug)]
pub enum SaveOutcome {
    /// The card was inserted
    Saved(SavedFlashcard),
    /// A card with the same normalized question already exists
    Duplicate,
}

/// Storage manager for persisted flashcards
pub struct FlashcardStore {
    conn: Connection,
}

impl FlashcardStore {
    /// Open (or create) the store at the given path.
    pub fn new(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&db_path)?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS flashcards (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                question TEXT NOT NULL,
                answer TEXT NOT NULL,
                question_key TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_flashcards_created_at
                ON flashcards(created_at);
            "#,
        )?;

        Ok(Self { conn })
    }

    /// Save a flashcard unless its normalized question is already present.
    pub fn save(&self, question: &str, answer: &str) -> Result<SaveOutcome> {
        let key = normalize_question(question);
        let now = Utc::now();

        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO flashcards (question, answer, question_key, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![question, answer, key, now, now],
        )?;

        if changed == 0 {
            return Ok(SaveOutcome::Duplicate);
        }

        Ok(SaveOutcome::Saved(SavedFlashcard {
            id: self.conn.last_insert_rowid(),
            question: question.to_string(),
            answer: answer.to_string(),
            created_at: now,
            updated_at: now,
        }))
    }

    /// List all saved flashcards, newest first.
    pub fn list(&self) -> Result<Vec<SavedFlashcard>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, question, answer, created_at, updated_at
             FROM flashcards
             ORDER BY created_at DESC, id DESC",
        )?;

        let cards = stmt
            .query_map([], |row| {
                Ok(SavedFlashcard {
                    id: row.get(0)?,
                    question: row.get(1)?,
                    answer: row.get(2)?,
                    created_at: row.get(3)?,
                    updated_at: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(cards)
    }

    /// Delete a flashcard by id.
    pub fn delete(&self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM flashcards WHERE id = ?1", params![id])?;

        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }

    /// Delete every flashcard and return how many were removed.
    pub fn clear(&self) -> Result<usize> {
        let deleted = self.conn.execute("DELETE FROM flashcards", [])?;
        Ok(deleted)
    }

    /// Cheap connectivity probe for health checks.
    pub fn probe(&self) -> Result<()> {
        self.conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
    }
}
