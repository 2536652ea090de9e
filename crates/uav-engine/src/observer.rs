//! Observer hooks and the per-tick report.

use uav_core::{TaskId, Tick};
use uav_motion::TaskError;

/// What happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    pub tick:     Tick,
    /// `false` when the engine was stopped and the tick did nothing.
    pub ran:      bool,
    /// Tasks whose `advance` was called.
    pub stepped:  usize,
    /// Steps that returned an error or panicked.
    pub failed:   usize,
    /// Tasks reclaimed because they finished.
    pub finished: usize,
    /// Tasks reclaimed because their entity no longer exists.
    pub orphaned: usize,
    /// Active tasks left after reclaiming.
    pub active:   usize,
}

/// Callbacks invoked by [`Engine::tick_with`][crate::Engine::tick_with].
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
pub trait EngineObserver {
    /// Called at the start of each running tick, before any task is stepped.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called for every step that failed.  The task stays active.
    fn on_task_failed(&mut self, _tick: Tick, _task: TaskId, _error: &TaskError) {}

    /// Called once per task, in the tick it is reclaimed as finished.
    fn on_task_finished(&mut self, _tick: Tick, _task: TaskId) {}

    /// Called at the end of each running tick.
    fn on_tick_end(&mut self, _tick: Tick, _report: &TickReport) {}
}

/// An [`EngineObserver`] that does nothing.
pub struct NoopObserver;

impl EngineObserver for NoopObserver {}
