//! `MotionTask` — single-leg constant-velocity mover.

use std::time::Duration;

use uav_core::{LatLng, Leg, MIN_TIME_STEP, clamp_duration};

use crate::task::fire_on_done;
use crate::{OnDone, PositionHandle, PositionLink, Task, TaskError, TaskResult};

/// Moves one position linearly from where it is at construction to `target`
/// over `duration`, one `time_step` per tick.
///
/// The displacement per tick is computed once.  When elapsed time reaches the
/// duration the position is set to `target` exactly, so arrival is
/// bit-for-bit regardless of step granularity.
pub struct MotionTask {
    position:   PositionLink,
    start:      LatLng,
    target:     LatLng,
    duration:   Duration,
    time_step:  Duration,
    elapsed:    Duration,
    /// `(d_lat, d_lng)` added per tick.
    step_delta: (f64, f64),
    done:       bool,
    on_done:    Option<OnDone>,
}

impl MotionTask {
    /// Bind a motion to `handle`, starting from its current position.
    ///
    /// `duration` is raised to `uav_core::MIN_DURATION` and `time_step` to
    /// `uav_core::MIN_TIME_STEP`; neither is ever an error.
    pub fn new(handle: &PositionHandle, target: LatLng, duration: Duration, time_step: Duration) -> Self {
        Self::from_link(handle.link(), target, duration, time_step)
    }

    /// Motion towards `leg`'s target over its (clamped) duration.
    pub fn from_leg(handle: &PositionHandle, leg: &Leg, time_step: Duration) -> Self {
        Self::new(handle, leg.target(), leg.duration(), time_step)
    }

    /// Attach a completion callback.
    pub fn on_done(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.on_done = Some(Box::new(callback));
        self
    }

    pub(crate) fn from_link(
        position:  PositionLink,
        target:    LatLng,
        duration:  Duration,
        time_step: Duration,
    ) -> Self {
        let duration  = clamp_duration(duration);
        let time_step = time_step.max(MIN_TIME_STEP);
        // An orphaned link has nothing to move; treat it as already at target.
        let start = position.get().unwrap_or(target);

        let (d_lat, d_lng) = start.delta_to(target);
        let fraction = time_step.as_secs_f64() / duration.as_secs_f64();

        Self {
            position,
            start,
            target,
            duration,
            time_step,
            elapsed: Duration::ZERO,
            step_delta: (d_lat * fraction, d_lng * fraction),
            done: false,
            on_done: None,
        }
    }

    #[inline]
    pub fn start(&self) -> LatLng {
        self.start
    }

    #[inline]
    pub fn target(&self) -> LatLng {
        self.target
    }

    /// Effective (clamped) duration.
    #[inline]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Velocity in coordinate units per simulated second.
    pub fn velocity(&self) -> (f64, f64) {
        let per_sec = 1.0 / self.time_step.as_secs_f64();
        (self.step_delta.0 * per_sec, self.step_delta.1 * per_sec)
    }

    /// Fraction of the duration elapsed, in `[0.0, 1.0]`.
    pub fn progress(&self) -> f64 {
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }
}

impl Task for MotionTask {
    fn advance(&mut self) -> TaskResult<()> {
        if self.done {
            return Ok(());
        }
        let Some(current) = self.position.get() else {
            return Ok(());
        };

        self.elapsed = self.elapsed.saturating_add(self.time_step);
        if self.elapsed >= self.duration {
            self.position.set(self.target);
            self.done = true;
            fire_on_done(&mut self.on_done, "motion");
            return Ok(());
        }

        // Intermediate writes must stay finite; time still runs so the
        // final snap always happens.
        let next = current.offset(self.step_delta.0, self.step_delta.1);
        if !next.is_finite() {
            return Err(TaskError::NonFinitePosition { lat: next.lat, lng: next.lng });
        }
        self.position.set(next);
        Ok(())
    }

    fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn is_live(&self) -> bool {
        self.position.is_live()
    }
}
