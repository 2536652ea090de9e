//! The `OutputWriter` trait implemented by all backend writers.

use crate::{OutputResult, PositionRow, TickSummaryRow};

/// A sink for simulation output.
///
/// Errors are returned here; [`SimOutputObserver`][crate::SimOutputObserver]
/// stores them for [`take_error`][crate::SimOutputObserver::take_error]
/// because observer hooks have no return value.
pub trait OutputWriter {
    /// Write a batch of entity positions.
    fn write_positions(&mut self, rows: &[PositionRow]) -> OutputResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush everything written so far.
    ///
    /// Idempotent, and may be called once per run: rows written after a
    /// `finish` are flushed by the next call.
    fn finish(&mut self) -> OutputResult<()>;
}
