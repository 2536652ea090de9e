//! Engine configuration.
//!
//! Typically loaded from a TOML file by the application and passed to
//! `uav_engine::Engine::new`.  Every field has a default, so an empty file
//! (or an absent `[engine]` table in a larger application file) is valid:
//!
//! ```toml
//! tick_interval_ms        = 20   # wall-clock pacing of the tick timer
//! time_step_ms            = 20   # simulated time per tick (defaults to tick_interval_ms)
//! snapshot_interval_ticks = 1    # how often position snapshots are reported
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

const DEFAULT_TICK_INTERVAL_MS: u64 = 20;

/// Tick-loop configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Real milliseconds between two ticks when the loop is paced.
    pub tick_interval_ms: u64,

    /// Simulated milliseconds each tick advances every task by.  `None`
    /// means "same as `tick_interval_ms`" (real-time simulation).
    pub time_step_ms: Option<u64>,

    /// Report position snapshots every N ticks.  0 disables snapshots.
    pub snapshot_interval_ticks: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms:        DEFAULT_TICK_INTERVAL_MS,
            time_step_ms:            None,
            snapshot_interval_ticks: 1,
        }
    }
}

impl EngineConfig {
    /// A config ticking every `tick_interval_ms` with a matching time step.
    pub fn with_interval_ms(tick_interval_ms: u64) -> Self {
        Self { tick_interval_ms, ..Self::default() }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> CoreResult<Self> {
        let config: EngineConfig = toml::from_str(s).map_err(|e| CoreError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Serialise back to TOML.
    pub fn to_toml_string(&self) -> CoreResult<String> {
        toml::to_string(self).map_err(|e| CoreError::Parse(e.to_string()))
    }

    /// Reject intervals that would stall the loop.
    pub fn validate(&self) -> CoreResult<()> {
        if self.tick_interval_ms == 0 {
            return Err(CoreError::Config("tick_interval_ms must be positive".into()));
        }
        if self.time_step_ms == Some(0) {
            return Err(CoreError::Config("time_step_ms must be positive".into()));
        }
        Ok(())
    }

    /// Wall-clock spacing between ticks.
    #[inline]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Simulated time per tick.
    #[inline]
    pub fn time_step(&self) -> Duration {
        Duration::from_millis(self.time_step_ms.unwrap_or(self.tick_interval_ms))
    }
}
