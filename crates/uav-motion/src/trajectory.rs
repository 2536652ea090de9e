//! `TrajectoryTask` — runs a list of legs strictly in order.

use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use uav_core::Leg;

use crate::task::fire_on_done;
use crate::{MotionTask, OnDone, PositionHandle, PositionLink, Task, TaskResult, panic_message};

/// Called with the index of each leg as it is reached.
pub type OnLeg = Box<dyn FnMut(usize) + 'static>;

/// Where a [`TrajectoryTask`] is in its leg sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TrajectoryPhase {
    /// No tick has run yet.
    NotStarted,
    /// Delegating ticks to the inner motion for leg `i`.
    RunningLeg(usize),
    /// Every leg reached.  Terminal.
    AllComplete,
}

/// Sequential composite of single-leg motions for one position.
///
/// Owns at most one inner [`MotionTask`] at a time, rebuilt per leg from the
/// position the previous leg ended at.  An empty leg list completes on the
/// first tick.
///
/// A rejected or panicking inner step is logged here and does not reach the
/// scheduler; the leg keeps running on the next tick.
pub struct TrajectoryTask {
    position:  PositionLink,
    legs:      Vec<Leg>,
    time_step: Duration,
    phase:     TrajectoryPhase,
    current:   Option<MotionTask>,
    on_leg:    Option<OnLeg>,
    on_done:   Option<OnDone>,
}

impl TrajectoryTask {
    pub fn new(handle: &PositionHandle, legs: Vec<Leg>, time_step: Duration) -> Self {
        Self {
            position: handle.link(),
            legs,
            time_step,
            phase: TrajectoryPhase::NotStarted,
            current: None,
            on_leg: None,
            on_done: None,
        }
    }

    /// Attach a callback fired once after the last leg is reached.
    pub fn on_done(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.on_done = Some(Box::new(callback));
        self
    }

    /// Attach a callback fired after every leg, including the last, with
    /// that leg's index.  Runs before the completion callback.
    pub fn on_leg(mut self, callback: impl FnMut(usize) + 'static) -> Self {
        self.on_leg = Some(Box::new(callback));
        self
    }

    #[inline]
    pub fn phase(&self) -> TrajectoryPhase {
        self.phase
    }

    #[inline]
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Index of the leg currently being flown.
    pub fn current_leg(&self) -> Option<usize> {
        match self.phase {
            TrajectoryPhase::RunningLeg(i) => Some(i),
            _ => None,
        }
    }

    fn begin_leg(&mut self, index: usize) {
        let leg = &self.legs[index];
        self.current = Some(MotionTask::from_link(
            self.position.clone(),
            leg.target(),
            leg.duration(),
            self.time_step,
        ));
        self.phase = TrajectoryPhase::RunningLeg(index);
        log::trace!("trajectory leg {index} towards {}", leg.target());
    }

    fn leg_reached(&mut self, index: usize) {
        let Some(callback) = self.on_leg.as_mut() else {
            return;
        };
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| callback(index))) {
            log::error!("trajectory leg callback panicked: {}", panic_message(payload.as_ref()));
        }
    }

    fn complete(&mut self) {
        self.current = None;
        self.phase = TrajectoryPhase::AllComplete;
        fire_on_done(&mut self.on_done, "trajectory");
    }
}

impl Task for TrajectoryTask {
    fn advance(&mut self) -> TaskResult<()> {
        let index = match self.phase {
            TrajectoryPhase::AllComplete => return Ok(()),
            TrajectoryPhase::NotStarted if self.legs.is_empty() => {
                self.complete();
                return Ok(());
            }
            TrajectoryPhase::NotStarted => {
                self.begin_leg(0);
                0
            }
            TrajectoryPhase::RunningLeg(i) => i,
        };

        let Some(inner) = self.current.as_mut() else {
            return Ok(());
        };
        if !step_leg(inner, index) || !inner.is_finished() {
            return Ok(());
        }

        // Re-snap to the leg's exact target before chaining.
        self.position.set(self.legs[index].target());
        self.leg_reached(index);

        let next = index + 1;
        if next < self.legs.len() {
            self.begin_leg(next);
        } else {
            self.complete();
        }
        Ok(())
    }

    fn is_finished(&self) -> bool {
        self.phase == TrajectoryPhase::AllComplete
    }

    fn is_live(&self) -> bool {
        self.position.is_live()
    }
}

/// Step the inner task of leg `index`, containing errors and panics.
/// Returns `false` if the step failed.
pub(crate) fn step_leg<T: Task>(inner: &mut T, index: usize) -> bool {
    match panic::catch_unwind(AssertUnwindSafe(|| inner.advance())) {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            log::warn!("trajectory leg {index}: {e}");
            false
        }
        Err(payload) => {
            log::error!("trajectory leg {index} panicked: {}", panic_message(payload.as_ref()));
            false
        }
    }
}
