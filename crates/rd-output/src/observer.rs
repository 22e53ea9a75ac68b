//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use log::warn;

use rd_agent::Responder;
use rd_core::Cycle;
use rd_dispatch::Resolution;
use rd_sim::{CycleSummary, SimObserver};

use crate::row::{CycleSummaryRow, ResolutionRow, ResponderSnapshotRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes responder snapshots, cycle summaries and
/// resolutions to any [`OutputWriter`] backend (CSV, SQLite).
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                warn!("output writer failed: {e}");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_resolution(&mut self, resolution: &Resolution) {
        let result = self.writer.write_resolution(&ResolutionRow::from(resolution));
        self.store_err(result);
    }

    fn on_cycle_end(&mut self, summary: &CycleSummary) {
        let result = self.writer.write_cycle_summary(&CycleSummaryRow::from(summary));
        self.store_err(result);
    }

    fn on_snapshot(&mut self, cycle: Cycle, responders: &[Responder]) {
        let rows: Vec<ResponderSnapshotRow> = responders
            .iter()
            .map(|r| ResponderSnapshotRow::new(cycle, r))
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_cycle: Cycle) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
