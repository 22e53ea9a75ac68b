//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `responder_snapshots.csv`
//! - `cycle_summaries.csv`
//! - `resolutions.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::row::NONE_ID;
use crate::writer::OutputWriter;
use crate::{CycleSummaryRow, OutputResult, ResolutionRow, ResponderSnapshotRow};

pub const SNAPSHOT_HEADER: [&str; 7] =
    ["cycle", "responder_id", "location", "behavior", "incident_id", "target", "on_scene"];

pub const SUMMARY_HEADER: [&str; 10] = [
    "cycle", "admitted", "dropped", "resolved", "reconciled",
    "moved", "active", "backlogged", "available", "unavailable",
];

pub const RESOLUTION_HEADER: [&str; 11] = [
    "incident_id", "kind", "location", "admitted", "resolved", "original_need",
    "response_time", "resolution_time", "responders", "severity", "success",
];

/// Writes simulation output to three CSV files.
pub struct CsvWriter {
    snapshots:   Writer<File>,
    summaries:   Writer<File>,
    resolutions: Writer<File>,
    finished:    bool,
}

impl CsvWriter {
    /// Open (or create) the three CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut snapshots = Writer::from_path(dir.join("responder_snapshots.csv"))?;
        snapshots.write_record(SNAPSHOT_HEADER)?;

        let mut summaries = Writer::from_path(dir.join("cycle_summaries.csv"))?;
        summaries.write_record(SUMMARY_HEADER)?;

        let mut resolutions = Writer::from_path(dir.join("resolutions.csv"))?;
        resolutions.write_record(RESOLUTION_HEADER)?;

        Ok(Self {
            snapshots,
            summaries,
            resolutions,
            finished: false,
        })
    }
}

/// Empty cell for the sentinel id.
fn id_cell(id: u32) -> String {
    if id == NONE_ID { String::new() } else { id.to_string() }
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[ResponderSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.cycle.to_string(),
                row.responder_id.to_string(),
                row.location.to_string(),
                row.behavior.to_string(),
                id_cell(row.incident_id),
                id_cell(row.target),
                (row.on_scene as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_cycle_summary(&mut self, row: &CycleSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.cycle.to_string(),
            row.admitted.to_string(),
            row.dropped.to_string(),
            row.resolved.to_string(),
            row.reconciled.to_string(),
            row.moved.to_string(),
            row.active.to_string(),
            row.backlogged.to_string(),
            row.available.to_string(),
            row.unavailable.to_string(),
        ])?;
        Ok(())
    }

    fn write_resolution(&mut self, row: &ResolutionRow) -> OutputResult<()> {
        self.resolutions.write_record(&[
            row.incident_id.to_string(),
            row.kind.to_string(),
            row.location.to_string(),
            row.admitted.to_string(),
            row.resolved.to_string(),
            row.original_need.to_string(),
            row.response_time.to_string(),
            row.resolution_time.to_string(),
            row.responders.to_string(),
            row.severity.map(|s| s.to_string()).unwrap_or_default(),
            (row.success as u8).to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.summaries.flush()?;
        self.resolutions.flush()?;
        Ok(())
    }
}
