//! Keyed session snapshots stored as JSON documents.

use crate::db::db::Db;
use crate::libs::messages::Message;
use crate::libs::persistence::SnapshotStore;
use crate::libs::session::Snapshot;
use crate::msg_warning;
use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};

const SCHEMA_SNAPSHOTS: &str = "CREATE TABLE IF NOT EXISTS snapshots (
    key TEXT NOT NULL PRIMARY KEY,
    body TEXT NOT NULL,
    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);";
const UPSERT: &str = "INSERT INTO snapshots (key, body, updated_at) VALUES (?1, ?2, CURRENT_TIMESTAMP)
    ON CONFLICT(key) DO UPDATE SET body = excluded.body, updated_at = excluded.updated_at";
const SELECT_BY_KEY: &str = "SELECT body FROM snapshots WHERE key = ?1";
const DELETE_BY_KEY: &str = "DELETE FROM snapshots WHERE key = ?1";

pub struct Snapshots {
    conn: Connection,
}

impl Snapshots {
    pub fn new() -> Result<Self> {
        let db = Db::new()?;
        Self::with_connection(db.conn)
    }

    pub fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(SCHEMA_SNAPSHOTS, [])?;
        Ok(Snapshots { conn })
    }

    /// Raw stored document, without decoding.
    pub fn fetch_body(&self, key: &str) -> Result<Option<String>> {
        let body = self
            .conn
            .query_row(SELECT_BY_KEY, params![key], |row| row.get::<_, String>(0))
            .optional()?;
        Ok(body)
    }

    pub fn insert_body(&mut self, key: &str, body: &str) -> Result<()> {
        self.conn.execute(UPSERT, params![key, body])?;
        Ok(())
    }
}

impl SnapshotStore for Snapshots {
    fn save(&mut self, key: &str, snapshot: &Snapshot) -> Result<()> {
        let body = serde_json::to_string(snapshot)?;
        self.insert_body(key, &body)
    }

    fn load(&mut self, key: &str) -> Result<Option<Snapshot>> {
        let Some(body) = self.fetch_body(key)? else {
            return Ok(None);
        };
        match serde_json::from_str::<Snapshot>(&body) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                msg_warning!(Message::SnapshotMalformed(e.to_string()));
                Ok(None)
            }
        }
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.conn.execute(DELETE_BY_KEY, params![key])?;
        Ok(())
    }
}
