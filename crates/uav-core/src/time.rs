//! Simulation time model.
//!
//! # Design
//!
//! Time is represented as a monotonically increasing `Tick` counter.  Each
//! tick advances simulated time by a fixed `time_step`, independent of how
//! much wall-clock time actually passed:
//!
//!   sim_time = tick * time_step
//!
//! The step is a `Duration` (integer nanoseconds), so elapsed-time sums are
//! exact and "has this motion run its full duration?" never suffers from
//! floating-point drift.

use std::fmt;
use std::time::Duration;

/// Smallest accepted per-tick time step.  A zero step would never let a
/// motion finish.
pub const MIN_TIME_STEP: Duration = Duration::from_micros(1);

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tracks the current tick and converts it to simulated time.
#[derive(Clone, Debug)]
pub struct SimClock {
    /// Simulated time one tick represents.
    pub time_step: Duration,
    /// The current tick, advanced by `SimClock::advance()`.
    pub current_tick: Tick,
}

impl SimClock {
    /// Create a clock at tick 0.  `time_step` is raised to [`MIN_TIME_STEP`].
    pub fn new(time_step: Duration) -> Self {
        Self {
            time_step: time_step.max(MIN_TIME_STEP),
            current_tick: Tick::ZERO,
        }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Simulated time elapsed since tick 0.  Saturates instead of overflowing.
    pub fn elapsed(&self) -> Duration {
        let ticks = u32::try_from(self.current_tick.0).unwrap_or(u32::MAX);
        self.time_step.saturating_mul(ticks)
    }

    /// Elapsed simulated time in whole milliseconds.
    #[inline]
    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed().as_millis()
    }

    /// How many ticks cover `span`? (rounds up: a motion of that length is
    /// finished after this many ticks)
    pub fn ticks_for(&self, span: Duration) -> u64 {
        let step = self.time_step.as_nanos();
        let total = span.as_nanos();
        u64::try_from(total.div_ceil(step)).unwrap_or(u64::MAX)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} ms)", self.current_tick, self.elapsed_ms())
    }
}
