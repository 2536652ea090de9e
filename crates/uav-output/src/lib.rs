//! `uav-output` — simulation output writers for the rust_uav engine.
//!
//! | Backend     | Files created                              |
//! |-------------|--------------------------------------------|
//! | CSV         | `positions.csv`, `tick_summaries.csv`      |
//!
//! Writers implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `uav_fleet::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use uav_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer, sim.engine.config());
//! sim.run_until_idle(max_ticks, &mut obs);
//! if let Some(e) = obs.take_error() { log::error!("output error: {e}"); }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{PositionRow, TickSummaryRow};
pub use writer::OutputWriter;
