//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `positions.csv`
//! - `tick_summaries.csv`

use std::fs::{self, File};
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{OutputResult, PositionRow, TickSummaryRow};

pub const POSITIONS_FILE: &str = "positions.csv";
pub const SUMMARIES_FILE: &str = "tick_summaries.csv";

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    positions: Writer<File>,
    summaries: Writer<File>,
}

impl CsvWriter {
    /// Create `dir` if needed, open both files, and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        fs::create_dir_all(dir)?;

        let mut positions = Writer::from_path(dir.join(POSITIONS_FILE))?;
        positions.write_record(["entity_id", "tick", "lat", "lng", "moving"])?;

        let mut summaries = Writer::from_path(dir.join(SUMMARIES_FILE))?;
        summaries.write_record(["tick", "sim_time_ms", "stepped", "failed", "finished", "orphaned"])?;

        log::debug!("writing CSV output to {}", dir.display());
        Ok(Self { positions, summaries })
    }
}

impl OutputWriter for CsvWriter {
    fn write_positions(&mut self, rows: &[PositionRow]) -> OutputResult<()> {
        for row in rows {
            self.positions.write_record(&[
                row.entity_id.to_string(),
                row.tick.to_string(),
                row.lat.to_string(),
                row.lng.to_string(),
                (row.moving as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.sim_time_ms.to_string(),
            row.stepped.to_string(),
            row.failed.to_string(),
            row.finished.to_string(),
            row.orphaned.to_string(),
        ])?;
        Ok(())
    }

    /// Flushes both files.  Rows written after a `finish` are flushed by the
    /// next one, so one writer can serve several runs.
    fn finish(&mut self) -> OutputResult<()> {
        self.positions.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
