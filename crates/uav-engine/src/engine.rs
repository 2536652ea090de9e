//! The `Engine` struct and its tick loop.

use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::time::Duration;

use uav_core::{EngineConfig, SimClock, TaskId, Tick};
use uav_motion::{Task, TaskError, TaskKind, TaskResult, panic_message};

use crate::handle::Shared;
use crate::{EngineHandle, EngineObserver, EngineResult, NoopObserver, TickReport, Ticker};

/// The task scheduler.
///
/// Holds the active task set and steps every task once per tick.  A failing
/// task never aborts the tick or affects its siblings; finished tasks are
/// dropped at the end of the tick they finish in.
///
/// The task type defaults to the closed [`TaskKind`] set; any [`Task`] type
/// may be used instead.
pub struct Engine<T: Task = TaskKind> {
    config:   EngineConfig,

    /// Tick counter and simulated-time mapping.
    clock:    SimClock,

    /// Tasks stepped every tick, in submission order.
    active:   Vec<(TaskId, T)>,

    /// Tasks finished since the last [`take_finished`][Self::take_finished].
    finished: Vec<TaskId>,

    /// Running flag, id counter, and inbox shared with [`EngineHandle`]s.
    shared:   Rc<Shared<T>>,
}

impl Engine<TaskKind> {
    /// Create a stopped engine for the built-in task variants.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        Self::for_task_type(config)
    }
}

impl<T: Task> Engine<T> {
    /// Create a stopped engine scheduling tasks of type `T`.
    pub fn for_task_type(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            clock:    SimClock::new(config.time_step()),
            config,
            active:   Vec::new(),
            finished: Vec::new(),
            shared:   Rc::new(Shared::new()),
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// The tick the next call to [`tick`][Self::tick] will run.
    #[inline]
    pub fn now(&self) -> Tick {
        self.clock.current_tick
    }

    /// Simulated time per tick.  Tasks should be built with this step.
    #[inline]
    pub fn time_step(&self) -> Duration {
        self.clock.time_step
    }

    /// A handle for submitting from callbacks or other owners.
    pub fn handle(&self) -> EngineHandle<T> {
        EngineHandle { shared: Rc::clone(&self.shared) }
    }

    /// Tasks currently in the active set.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Tasks queued through handles, not yet active.
    pub fn queued_count(&self) -> usize {
        self.shared.inbox.borrow().len()
    }

    /// `true` when there is nothing left to step.
    pub fn is_idle(&self) -> bool {
        self.active.is_empty() && self.queued_count() == 0
    }

    // ── Control surface ───────────────────────────────────────────────────

    /// Begin (or resume) ticking.  Idempotent.
    pub fn start(&mut self) {
        if !self.shared.running.replace(true) {
            log::debug!("engine started at {}", self.clock);
        }
    }

    /// Halt future ticks.  Active tasks keep their state and continue from
    /// where they left off after [`start`][Self::start].  Idempotent.
    pub fn stop(&mut self) {
        if self.shared.running.replace(false) {
            log::debug!("engine stopped at {}", self.clock);
        }
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.get()
    }

    /// Add `task` to the active set.  It is first stepped on the next tick.
    pub fn submit(&mut self, task: impl Into<T>) -> TaskId {
        let id = self.shared.allocate_id();
        self.active.push((id, task.into()));
        log::debug!("{id} submitted at {}", self.clock.current_tick);
        id
    }

    /// Ids of tasks that finished since the previous call.  Each id is
    /// returned exactly once.
    pub fn take_finished(&mut self) -> Vec<TaskId> {
        mem::take(&mut self.finished)
    }

    // ── Tick processing ───────────────────────────────────────────────────

    /// Run one tick without observer callbacks.
    pub fn tick(&mut self) -> TickReport {
        self.tick_with(&mut NoopObserver)
    }

    /// Run one tick.  Does nothing while stopped.
    pub fn tick_with<O: EngineObserver>(&mut self, observer: &mut O) -> TickReport {
        let now = self.clock.current_tick;
        if !self.is_running() {
            return TickReport { tick: now, active: self.active.len(), ..TickReport::default() };
        }
        observer.on_tick_start(now);

        // ── Inbox ─────────────────────────────────────────────────────────
        let queued = mem::take(&mut *self.shared.inbox.borrow_mut());
        self.active.extend(queued);

        let mut report = TickReport { tick: now, ran: true, ..TickReport::default() };

        // ── Step ──────────────────────────────────────────────────────────
        for (id, task) in self.active.iter_mut() {
            report.stepped += 1;
            if let Err(e) = step_contained(task) {
                report.failed += 1;
                match &e {
                    TaskError::Panicked(_) => log::error!("{id} at {now}: {e}"),
                    _ => log::warn!("{id} at {now}: {e}"),
                }
                observer.on_task_failed(now, *id, &e);
            }
        }

        // ── Reclaim ───────────────────────────────────────────────────────
        let finished = &mut self.finished;
        self.active.retain(|(id, task)| {
            if task.is_finished() {
                report.finished += 1;
                finished.push(*id);
                observer.on_task_finished(now, *id);
                false
            } else if !task.is_live() {
                report.orphaned += 1;
                log::debug!("{id} dropped at {now}: target entity no longer exists");
                false
            } else {
                true
            }
        });
        report.active = self.active.len();

        log::trace!(
            "{now}: stepped {} failed {} finished {} active {}",
            report.stepped, report.failed, report.finished, report.active
        );
        self.clock.advance();
        observer.on_tick_end(now, &report);
        report
    }

    /// Run exactly `n` ticks back to back (no pacing).
    ///
    /// Useful for tests and batch stepping.  Ticks are no-ops while stopped.
    pub fn run_ticks<O: EngineObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.tick_with(observer);
        }
    }

    /// Tick back to back until idle, stopped, or `max_ticks` ran.  Returns
    /// the number of ticks run.
    pub fn run_until_idle<O: EngineObserver>(&mut self, max_ticks: u64, observer: &mut O) -> u64 {
        let mut ran = 0;
        while ran < max_ticks && self.is_running() && !self.is_idle() {
            self.tick_with(observer);
            ran += 1;
        }
        ran
    }

    /// Tick once per configured interval of wall-clock time until idle,
    /// stopped (e.g. through an [`EngineHandle`]), or `max_ticks` ran.
    /// Returns the number of ticks run.
    pub fn run_paced<O: EngineObserver>(&mut self, max_ticks: Option<u64>, observer: &mut O) -> u64 {
        let mut ticker = Ticker::new(self.config.tick_interval());
        let mut ran = 0;
        while self.is_running() && !self.is_idle() && max_ticks.is_none_or(|max| ran < max) {
            ticker.wait();
            self.tick_with(observer);
            ran += 1;
        }
        ran
    }
}

/// Step `task` once, converting a panic into [`TaskError::Panicked`].
fn step_contained<T: Task>(task: &mut T) -> TaskResult<()> {
    panic::catch_unwind(AssertUnwindSafe(|| task.advance()))
        .unwrap_or_else(|payload| Err(TaskError::Panicked(panic_message(payload.as_ref()))))
}
