//! The `OutputWriter` trait implemented by all backend writers.

use crate::{CycleSummaryRow, OutputResult, ResolutionRow, ResponderSnapshotRow};

/// Trait implemented by the CSV and SQLite writers.
///
/// All methods are infallible from the observer's perspective: errors are
/// stored internally and retrieved with
/// [`SimOutputObserver::take_error`](crate::SimOutputObserver::take_error).
pub trait OutputWriter {
    /// Write a batch of responder snapshots.
    fn write_snapshots(&mut self, rows: &[ResponderSnapshotRow]) -> OutputResult<()>;

    /// Write one cycle summary row.
    fn write_cycle_summary(&mut self, row: &CycleSummaryRow) -> OutputResult<()>;

    /// Write one incident resolution row.
    fn write_resolution(&mut self, row: &ResolutionRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
