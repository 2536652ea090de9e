//! `EngineHandle` — submit and lifecycle access from outside `&mut Engine`.
//!
//! Completion callbacks run while the engine is mid-tick, so they cannot hold
//! `&mut Engine`.  A cloned handle lets them queue follow-up tasks (or stop
//! the loop) anyway: submissions land in an inbox drained at the start of the
//! next tick.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use uav_core::TaskId;
use uav_motion::{Task, TaskKind};

/// State shared between an [`Engine`][crate::Engine] and its handles.
pub(crate) struct Shared<T> {
    pub(crate) running: Cell<bool>,
    next_id:            Cell<TaskId>,
    pub(crate) inbox:   RefCell<Vec<(TaskId, T)>>,
}

impl<T> Shared<T> {
    pub(crate) fn new() -> Self {
        Self {
            running: Cell::new(false),
            next_id: Cell::new(TaskId(0)),
            inbox:   RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn allocate_id(&self) -> TaskId {
        let id = self.next_id.get();
        self.next_id.set(id.next());
        id
    }
}

/// Cheap, clonable access to an engine's inbox and running flag.
pub struct EngineHandle<T: Task = TaskKind> {
    pub(crate) shared: Rc<Shared<T>>,
}

impl<T: Task> Clone for EngineHandle<T> {
    fn clone(&self) -> Self {
        Self { shared: Rc::clone(&self.shared) }
    }
}

impl<T: Task> EngineHandle<T> {
    /// Queue `task` for the next tick and return its id.
    pub fn submit(&self, task: impl Into<T>) -> TaskId {
        let id = self.shared.allocate_id();
        self.shared.inbox.borrow_mut().push((id, task.into()));
        log::debug!("{id} queued for next tick");
        id
    }

    /// Resume ticking.  Idempotent.
    pub fn start(&self) {
        self.shared.running.set(true);
    }

    /// Halt future ticks.  In-flight task state is kept.  Idempotent.
    pub fn stop(&self) {
        self.shared.running.set(false);
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.get()
    }

    /// Tasks waiting in the inbox.
    pub fn queued(&self) -> usize {
        self.shared.inbox.borrow().len()
    }
}
