//! Per-entity state and its read-only and patch views.

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use uav_core::{EntityId, LatLng, Leg};
use uav_motion::PositionHandle;

/// One moving entity as the store sees it.
///
/// `position` is the live value tasks write to; `start_position` is where
/// the next flight begins and is only updated between flights.
#[derive(Debug)]
pub struct Entity {
    pub id:                 EntityId,
    pub name:               String,
    pub start_position:     LatLng,
    pub(crate) position:    PositionHandle,
    /// Pending single-flight destination.
    pub target:             Option<LatLng>,
    /// Duration of the single flight, in milliseconds.  `0` means unset.
    pub flight_duration_ms: f64,
    /// Pending multi-leg route.  Preferred over `target` when non-empty.
    pub trajectory:         Vec<Leg>,
    /// Leg currently flown, written by the trajectory task as legs are reached.
    pub(crate) leg_index:   Rc<Cell<Option<usize>>>,
    pub moving:             bool,
}

impl Entity {
    pub(crate) fn new(id: EntityId, name: String, position: LatLng) -> Self {
        Self {
            id,
            name,
            start_position: position,
            position: PositionHandle::new(position),
            target: None,
            flight_duration_ms: 0.0,
            trajectory: Vec::new(),
            leg_index: Rc::new(Cell::new(None)),
            moving: false,
        }
    }

    /// The live position, as last written by a task.
    #[inline]
    pub fn position(&self) -> LatLng {
        self.position.get()
    }

    /// Index of the trajectory leg being flown, if any.
    #[inline]
    pub fn leg_index(&self) -> Option<usize> {
        self.leg_index.get()
    }

    /// `true` when a flight can be started from the stored state.
    pub fn has_flight(&self) -> bool {
        !self.trajectory.is_empty() || (self.target.is_some() && self.flight_duration_ms > 0.0)
    }

    pub fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            id:        self.id,
            name:      self.name.clone(),
            position:  self.position(),
            target:    self.target,
            legs:      self.trajectory.len(),
            leg_index: self.leg_index(),
            moving:    self.moving,
        }
    }
}

/// Per-frame copy of an entity for display or output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id:        EntityId,
    pub name:      String,
    pub position:  LatLng,
    pub target:    Option<LatLng>,
    pub legs:      usize,
    pub leg_index: Option<usize>,
    pub moving:    bool,
}

/// Patch applied by [`Fleet::update`][crate::Fleet::update].
///
/// Every `Some` field replaces the stored value.  `target: Some(None)`
/// clears the target.
#[derive(Debug, Clone, Default)]
pub struct EntityUpdate {
    pub id:                 EntityId,
    pub name:               Option<String>,
    pub start_position:     Option<LatLng>,
    pub target:             Option<Option<LatLng>>,
    pub flight_duration_ms: Option<f64>,
    pub trajectory:         Option<Vec<Leg>>,
}

impl EntityUpdate {
    pub fn new(id: EntityId) -> Self {
        Self { id, ..Self::default() }
    }

    /// `true` if the patch touches anything a running flight depends on.
    pub(crate) fn touches_flight(&self) -> bool {
        self.start_position.is_some()
            || self.target.is_some()
            || self.flight_duration_ms.is_some()
            || self.trajectory.is_some()
    }
}
