// Copyright (c) 2026 Ledgest Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Durable seen-fingerprint store, the dedup oracle across ingestion runs.
//!
//! Backed by SQLite in WAL mode. A fingerprint, once recorded, is never
//! removed or overwritten; marking an existing key is a no-op. The store is
//! opened per ingestion run and released when the `SeenStore` drops.

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, params};
use std::fs;
use std::path::Path;

pub struct SeenStore {
    conn: Connection,
}

impl SeenStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Create state dir {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Open seen store at {}", path.display()))?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        // journal_mode returns the resulting mode as a row
        conn.query_row("PRAGMA journal_mode=WAL", [], |_| Ok(()))?;
        conn.execute_batch(
            r#"
        CREATE TABLE IF NOT EXISTS seen_transactions(
            fingerprint TEXT PRIMARY KEY,
            source TEXT,
            first_seen TEXT NOT NULL
        );
        "#,
        )?;
        Ok(Self { conn })
    }

    pub fn is_seen(&self, fingerprint: &str) -> Result<bool> {
        let mut stmt = self
            .conn
            .prepare("SELECT 1 FROM seen_transactions WHERE fingerprint=?1")?;
        Ok(stmt.exists(params![fingerprint])?)
    }

    /// Insert-if-absent; marking the same fingerprint twice is a no-op.
    pub fn mark_seen(&self, fingerprint: &str, source: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT OR IGNORE INTO seen_transactions(fingerprint, source, first_seen) \
             VALUES (?1,?2,?3)",
            params![fingerprint, source, now],
        )?;
        Ok(())
    }

    pub fn count(&self) -> Result<i64> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM seen_transactions", [], |r| r.get(0))?;
        Ok(n)
    }
}
