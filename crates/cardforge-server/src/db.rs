//! SQLite persistence for saved flashcards.
//!
//! Cards are stored per user; generation itself never touches the
//! database. Connections come from an r2d2 pool so concurrent requests
//! don't serialize on a single handle.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cardforge_core::model::Flashcard;

/// A flashcard as persisted for a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFlashcard {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    /// Open (creating if needed) the database at `path` and apply the
    /// schema.
    pub fn open(path: &str) -> Result<Self> {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create database directory for {path}"))?;
            }
        }
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::new(manager).context("failed to create connection pool")?;
        let db = Self { pool };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS flashcards (
                id TEXT PRIMARY KEY,
                question TEXT NOT NULL,
                answer TEXT NOT NULL,
                user_id TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_flashcards_user_id ON flashcards(user_id)",
            [],
        )?;
        Ok(())
    }

    /// Persist a batch of cards for a user, returning the stored records.
    pub fn save_flashcards(
        &self,
        user_id: &str,
        cards: &[Flashcard],
    ) -> Result<Vec<StoredFlashcard>> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;
        let now = Utc::now();
        let mut stored = Vec::with_capacity(cards.len());

        for card in cards {
            let record = StoredFlashcard {
                id: Uuid::new_v4().to_string(),
                question: card.question.clone(),
                answer: card.answer.clone(),
                user_id: user_id.to_string(),
                created_at: now,
            };
            tx.execute(
                "INSERT INTO flashcards (id, question, answer, user_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![
                    record.id,
                    record.question,
                    record.answer,
                    record.user_id,
                    now.to_rfc3339(),
                ],
            )?;
            stored.push(record);
        }

        tx.commit()?;
        Ok(stored)
    }

    /// List a user's saved cards, oldest first.
    pub fn list_flashcards(&self, user_id: &str) -> Result<Vec<StoredFlashcard>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, question, answer, user_id, created_at
             FROM flashcards WHERE user_id = ?1 ORDER BY created_at, id",
        )?;
        let rows = stmt.query_map([user_id], |row| {
            let created_raw: String = row.get(4)?;
            let created_at = DateTime::parse_from_rfc3339(&created_raw)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        4,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?;
            Ok(StoredFlashcard {
                id: row.get(0)?,
                question: row.get(1)?,
                answer: row.get(2)?,
                user_id: row.get(3)?,
                created_at,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::open(path.to_str().unwrap()).unwrap();
        (dir, db)
    }

    fn card(question: &str, answer: &str) -> Flashcard {
        Flashcard {
            question: question.to_string(),
            answer: answer.to_string(),
        }
    }

    #[test]
    fn save_and_list_roundtrip() {
        let (_dir, db) = test_db();
        let cards = vec![
            card("Who is Marie Curie?", "a physicist"),
            card("What is radium?", "an element"),
        ];

        let stored = db.save_flashcards("user-1", &cards).unwrap();
        assert_eq!(stored.len(), 2);

        let listed = db.list_flashcards("user-1").unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].question, "Who is Marie Curie?");
        assert_eq!(listed[0].user_id, "user-1");
    }

    #[test]
    fn users_are_isolated() {
        let (_dir, db) = test_db();
        db.save_flashcards("alice", &[card("Q?", "answer one")])
            .unwrap();
        db.save_flashcards("bob", &[card("Q?", "answer two")])
            .unwrap();

        let alice = db.list_flashcards("alice").unwrap();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].answer, "answer one");
        assert!(db.list_flashcards("carol").unwrap().is_empty());
    }

    #[test]
    fn reopen_preserves_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("persist.db");
        {
            let db = Database::open(path.to_str().unwrap()).unwrap();
            db.save_flashcards("user-1", &[card("Q?", "answer")])
                .unwrap();
        }
        let db = Database::open(path.to_str().unwrap()).unwrap();
        assert_eq!(db.list_flashcards("user-1").unwrap().len(), 1);
    }

    #[test]
    fn stored_card_serializes_camel_case() {
        let (_dir, db) = test_db();
        let stored = db
            .save_flashcards("user-1", &[card("Q?", "answer")])
            .unwrap();
        let json = serde_json::to_value(&stored[0]).unwrap();
        assert!(json.get("userId").is_some());
        assert!(json.get("createdAt").is_some());
    }
}
