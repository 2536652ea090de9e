//! Shared position cells.
//!
//! The collaborator that owns an entity holds a [`PositionHandle`]; a task
//! bound to that entity holds only a [`PositionLink`].  Once every handle is
//! dropped the link goes dead: the task stops writing and the scheduler
//! reclaims it instead of mutating a position nobody can observe.
//!
//! Both types are single-threaded (`Rc<Cell<_>>`).  All writes happen inside
//! a tick and all reads between ticks, so no locking is needed.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use uav_core::LatLng;

/// Owning handle to an entity's live position.
#[derive(Clone, Debug)]
pub struct PositionHandle(Rc<Cell<LatLng>>);

impl PositionHandle {
    pub fn new(position: LatLng) -> Self {
        Self(Rc::new(Cell::new(position)))
    }

    /// Copy of the current position.
    #[inline]
    pub fn get(&self) -> LatLng {
        self.0.get()
    }

    /// Overwrite the position (e.g. when a user edits the start point).
    #[inline]
    pub fn set(&self, position: LatLng) {
        self.0.set(position);
    }

    /// A non-owning link for a task to write through.
    pub fn link(&self) -> PositionLink {
        PositionLink(Rc::downgrade(&self.0))
    }
}

/// Task-side link to a position.  Does not keep the entity alive.
#[derive(Clone, Debug)]
pub struct PositionLink(Weak<Cell<LatLng>>);

impl PositionLink {
    /// Current position, or `None` if the owning entity is gone.
    #[inline]
    pub fn get(&self) -> Option<LatLng> {
        self.0.upgrade().map(|cell| cell.get())
    }

    /// Write `position`.  Returns `false` (and writes nothing) if orphaned.
    #[inline]
    pub fn set(&self, position: LatLng) -> bool {
        match self.0.upgrade() {
            Some(cell) => {
                cell.set(position);
                true
            }
            None => false,
        }
    }

    /// `true` while at least one [`PositionHandle`] is alive.
    #[inline]
    pub fn is_live(&self) -> bool {
        self.0.strong_count() > 0
    }
}
