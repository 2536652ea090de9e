//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use std::time::Duration;

use uav_core::{EngineConfig, Tick};
use uav_engine::{EngineObserver, TickReport};
use uav_fleet::{EntitySnapshot, SimObserver};

use crate::row::{PositionRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes entity positions and tick summaries to any
/// [`OutputWriter`].
///
/// Errors from the writer are stored internally because observer methods
/// have no return value.  After a run returns, check with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    time_step:  Duration,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// Create an observer backed by `writer`, using `config` to convert
    /// ticks to simulated time.
    pub fn new(writer: W, config: &EngineConfig) -> Self {
        Self { writer, time_step: config.time_step(), last_error: None }
    }

    /// Take the first stored write error, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Simulated milliseconds at the end of `tick`.
    fn sim_time_ms(&self, tick: Tick) -> u64 {
        let ms = self.time_step.as_millis().saturating_mul(u128::from(tick.0) + 1);
        u64::try_from(ms).unwrap_or(u64::MAX)
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                log::error!("output write failed: {e}");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> EngineObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, tick: Tick, report: &TickReport) {
        let row = TickSummaryRow::from_report(report, self.sim_time_ms(tick));
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_snapshot(&mut self, tick: Tick, snapshots: &[EntitySnapshot]) {
        let rows: Vec<PositionRow> = snapshots
            .iter()
            .map(|s| PositionRow::from_snapshot(tick.0, s))
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_positions(&rows);
            self.store_err(result);
        }
    }

    fn on_run_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
