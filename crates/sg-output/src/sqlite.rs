//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! three tables: `send_log`, `receive_log` and `flow_summary`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{FlowSummaryRow, OutputResult, ReceiveLogRow, SendLogRow};

/// Writes delivery logs to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS send_log (
                 time_secs     REAL    NOT NULL,
                 sender        INTEGER NOT NULL,
                 x             REAL    NOT NULL,
                 y             REAL    NOT NULL,
                 dest          INTEGER NOT NULL,
                 dest_x        REAL    NOT NULL,
                 dest_y        REAL    NOT NULL,
                 hop_count     INTEGER NOT NULL,
                 kind          TEXT    NOT NULL,
                 candidates    TEXT    NOT NULL,
                 best_priority REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS receive_log (
                 time_secs REAL    NOT NULL,
                 receiver  INTEGER NOT NULL,
                 x         REAL    NOT NULL,
                 y         REAL    NOT NULL,
                 sender    INTEGER NOT NULL,
                 sender_x  REAL    NOT NULL,
                 sender_y  REAL    NOT NULL,
                 hop_count INTEGER NOT NULL,
                 kind      TEXT    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS flow_summary (
                 source      INTEGER NOT NULL,
                 destination INTEGER NOT NULL,
                 start_secs  REAL    NOT NULL,
                 delivered   INTEGER NOT NULL,
                 finish_secs REAL,
                 delay_secs  REAL,
                 hop_count   INTEGER
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_sends(&mut self, rows: &[SendLogRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO send_log \
                 (time_secs, sender, x, y, dest, dest_x, dest_y, hop_count, kind, candidates, \
                  best_priority) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.time_secs,
                    row.sender,
                    row.x,
                    row.y,
                    row.dest,
                    row.dest_x,
                    row.dest_y,
                    row.hop_count,
                    row.kind,
                    row.candidates,
                    row.best_priority,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_receives(&mut self, rows: &[ReceiveLogRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO receive_log \
                 (time_secs, receiver, x, y, sender, sender_x, sender_y, hop_count, kind) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.time_secs,
                    row.receiver,
                    row.x,
                    row.y,
                    row.sender,
                    row.sender_x,
                    row.sender_y,
                    row.hop_count,
                    row.kind,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_flows(&mut self, rows: &[FlowSummaryRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO flow_summary \
                 (source, destination, start_secs, delivered, finish_secs, delay_secs, hop_count) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.source,
                    row.destination,
                    row.start_secs,
                    row.delivered as i64,
                    row.finish_secs,
                    row.delay_secs,
                    row.hop_count,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
