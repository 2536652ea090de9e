//! The `Task` contract and the closed set of task variants.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::{MotionTask, TaskResult, TrajectoryTask};

/// Completion callback.  Runs at most once, synchronously, during the tick
/// that detects completion.
pub type OnDone = Box<dyn FnOnce() + 'static>;

/// One unit of work advanced once per tick.
///
/// The scheduler only ever calls these three methods; it does not know which
/// concrete variant it is stepping.
pub trait Task {
    /// Perform exactly one discrete step.
    ///
    /// An `Err` means the step's position write was rejected; the
    /// scheduler logs it and calls `advance` again next tick.
    fn advance(&mut self) -> TaskResult<()>;

    /// `true` once the goal is reached.  Never reverts to `false`.
    fn is_finished(&self) -> bool;

    /// `false` once the entity this task moves no longer exists.  Dead tasks
    /// are dropped without firing their completion callback.
    fn is_live(&self) -> bool {
        true
    }
}

/// Every task the engine schedules.
pub enum TaskKind {
    Motion(MotionTask),
    Trajectory(TrajectoryTask),
}

impl Task for TaskKind {
    fn advance(&mut self) -> TaskResult<()> {
        match self {
            TaskKind::Motion(t) => t.advance(),
            TaskKind::Trajectory(t) => t.advance(),
        }
    }

    fn is_finished(&self) -> bool {
        match self {
            TaskKind::Motion(t) => t.is_finished(),
            TaskKind::Trajectory(t) => t.is_finished(),
        }
    }

    fn is_live(&self) -> bool {
        match self {
            TaskKind::Motion(t) => t.is_live(),
            TaskKind::Trajectory(t) => t.is_live(),
        }
    }
}

impl From<MotionTask> for TaskKind {
    fn from(task: MotionTask) -> Self {
        TaskKind::Motion(task)
    }
}

impl From<TrajectoryTask> for TaskKind {
    fn from(task: TrajectoryTask) -> Self {
        TaskKind::Trajectory(task)
    }
}

// ── Callback plumbing ─────────────────────────────────────────────────────────

/// Take and run the callback in `slot`, if any.  A panicking callback is
/// logged and swallowed.
pub(crate) fn fire_on_done(slot: &mut Option<OnDone>, who: &str) {
    let Some(callback) = slot.take() else {
        return;
    };
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(callback)) {
        log::error!("{who} completion callback panicked: {}", panic_message(payload.as_ref()));
    }
}

/// Best-effort text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}
