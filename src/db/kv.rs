//! `KeyValueStore` on top of the `kv_store` table.

use crate::errors::AppResult;
use crate::store::KeyValueStore;
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, params};

pub struct SqliteStore<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueStore for SqliteStore<'_> {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv_store WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> AppResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Local::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> AppResult<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1", [key])?;
        Ok(())
    }
}
