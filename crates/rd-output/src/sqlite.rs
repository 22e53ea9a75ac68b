//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! three tables: `responder_snapshots`, `cycle_summaries` and `resolutions`.
//! Sentinel ids are stored as `NULL`.

use std::path::Path;

use rusqlite::Connection;

use crate::row::NONE_ID;
use crate::writer::OutputWriter;
use crate::{CycleSummaryRow, OutputResult, ResolutionRow, ResponderSnapshotRow};

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS responder_snapshots (
                 cycle        INTEGER NOT NULL,
                 responder_id INTEGER NOT NULL,
                 location     INTEGER NOT NULL,
                 behavior     TEXT    NOT NULL,
                 incident_id  INTEGER,
                 target       INTEGER,
                 on_scene     INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS cycle_summaries (
                 cycle       INTEGER PRIMARY KEY,
                 admitted    INTEGER NOT NULL,
                 dropped     INTEGER NOT NULL,
                 resolved    INTEGER NOT NULL,
                 reconciled  INTEGER NOT NULL,
                 moved       INTEGER NOT NULL,
                 active      INTEGER NOT NULL,
                 backlogged  INTEGER NOT NULL,
                 available   INTEGER NOT NULL,
                 unavailable INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS resolutions (
                 incident_id     INTEGER PRIMARY KEY,
                 kind            INTEGER NOT NULL,
                 location        INTEGER NOT NULL,
                 admitted        INTEGER NOT NULL,
                 resolved        INTEGER NOT NULL,
                 original_need   INTEGER NOT NULL,
                 response_time   INTEGER NOT NULL,
                 resolution_time INTEGER NOT NULL,
                 responders      INTEGER NOT NULL,
                 severity        REAL,
                 success         INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

fn nullable(id: u32) -> Option<u32> {
    (id != NONE_ID).then_some(id)
}

impl OutputWriter for SqliteWriter {
    fn write_snapshots(&mut self, rows: &[ResponderSnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO responder_snapshots \
                 (cycle, responder_id, location, behavior, incident_id, target, on_scene) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.cycle,
                    row.responder_id,
                    row.location,
                    row.behavior,
                    nullable(row.incident_id),
                    nullable(row.target),
                    row.on_scene as i64,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_cycle_summary(&mut self, row: &CycleSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO cycle_summaries \
             (cycle, admitted, dropped, resolved, reconciled, moved, active, backlogged, available, unavailable) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                row.cycle,
                row.admitted,
                row.dropped,
                row.resolved,
                row.reconciled,
                row.moved,
                row.active,
                row.backlogged,
                row.available,
                row.unavailable,
            ],
        )?;
        Ok(())
    }

    fn write_resolution(&mut self, row: &ResolutionRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO resolutions \
             (incident_id, kind, location, admitted, resolved, original_need, \
              response_time, resolution_time, responders, severity, success) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            rusqlite::params![
                row.incident_id,
                row.kind,
                row.location,
                row.admitted,
                row.resolved,
                row.original_need,
                row.response_time,
                row.resolution_time,
                row.responders,
                row.severity,
                row.success as i64,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
