//! CSV schedule loader.
//!
//! # CSV format
//!
//! One row per arrival.  Rows need not be sorted; the loader sorts stably by
//! cycle, so rows sharing a cycle keep their file order.
//!
//! ```csv
//! cycle,kind
//! 0,1
//! 0,3
//! 4,5
//! ```
//!
//! `kind` is the numeric incident type, `1..=5`.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use rd_core::{Cycle, IncidentKind};

use crate::{ArrivalSchedule, ScheduleError, ScheduledArrival};

#[derive(Deserialize)]
struct ArrivalRecord {
    cycle: u64,
    kind:  u32,
}

/// Load an [`ArrivalSchedule`] from a CSV file.
pub fn load_schedule_csv(path: &Path) -> Result<ArrivalSchedule, ScheduleError> {
    let file = std::fs::File::open(path).map_err(ScheduleError::Io)?;
    load_schedule_reader(file)
}

/// Like [`load_schedule_csv`] but accepts any `Read` source.
pub fn load_schedule_reader<R: Read>(reader: R) -> Result<ArrivalSchedule, ScheduleError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut arrivals = Vec::new();

    for (line, result) in csv_reader.deserialize::<ArrivalRecord>().enumerate() {
        let row = result.map_err(|e| ScheduleError::Parse(e.to_string()))?;
        let kind = IncidentKind::from_type(row.kind).map_err(|e| {
            ScheduleError::Parse(format!("row {}: {e}", line + 1))
        })?;
        arrivals.push(ScheduledArrival { cycle: Cycle(row.cycle), kind });
    }

    Ok(ArrivalSchedule::new(arrivals))
}
