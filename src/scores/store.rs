//! Module `store`
//!
//! SQLite-backed leaderboard. One table, `scores(name TEXT, score INTEGER)`;
//! an upsert only writes when the new score strictly beats the stored one.

use log::info;
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::Mutex;

use crate::error::ScoreStoreError;

pub struct ScoreStore {
    conn: Mutex<Connection>,
}

impl ScoreStore {
    /// Opens (or creates) the leaderboard database at `path`. The rusqlite
    /// special path `":memory:"` yields a throwaway store for tests.
    pub fn open(path: &str) -> Result<Self, ScoreStoreError> {
        let conn = Connection::open(path)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS scores (
                name TEXT NOT NULL,
                score INTEGER
            )",
            [],
        )?;
        info!("Leaderboard database ready at {}", path);
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Records `score` for `name` if it is a new entry or a strict
    /// improvement. Returns true iff the stored score changed.
    pub fn upsert_score(&self, name: &str, score: i64) -> Result<bool, ScoreStoreError> {
        let conn = self.conn.lock().unwrap();
        let current: Option<i64> = conn
            .query_row(
                "SELECT score FROM scores WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;

        match current {
            Some(current) if score > current => {
                conn.execute(
                    "UPDATE scores SET score = ?1 WHERE name = ?2",
                    params![score, name],
                )?;
                info!("Updated score for {} to {}", name, score);
                Ok(true)
            }
            Some(_) => Ok(false),
            None => {
                conn.execute(
                    "INSERT INTO scores (name, score) VALUES (?1, ?2)",
                    params![name, score],
                )?;
                info!("Inserted new score for {}: {}", name, score);
                Ok(true)
            }
        }
    }

    /// Snapshot of the leaderboard, best score first. May be empty.
    pub fn get_scores(&self) -> Result<Vec<(String, i64)>, ScoreStoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT name, score FROM scores ORDER BY score DESC")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }
}
