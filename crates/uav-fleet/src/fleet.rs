//! `Fleet` — the entity store and its flight bookkeeping.

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::time::Duration;

use uav_core::{EntityId, LatLng, Leg, TaskId, clamp_duration_ms};
use uav_engine::Engine;
use uav_motion::{MotionTask, TrajectoryTask};

use crate::{Entity, EntitySnapshot, EntityUpdate, FleetError, FleetResult};

/// What kind of task an in-flight entity is running.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FlightKind {
    /// A single [`MotionTask`] towards `target`.
    Single { target: LatLng },
    /// A [`TrajectoryTask`] ending at `last`.
    Trajectory { last: LatLng },
}

/// Canonical per-entity state, keyed by [`EntityId`].
///
/// Entities iterate in id order, so snapshots and launches are
/// deterministic.  Ids are never reused.
#[derive(Debug, Default)]
pub struct Fleet {
    entities: BTreeMap<EntityId, Entity>,
    next_id:  u32,
    /// Every task this fleet submitted that has not been applied yet.
    flights:  HashMap<TaskId, (EntityId, FlightKind)>,
}

impl Fleet {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Store ─────────────────────────────────────────────────────────────

    /// Add an entity named `"UAV n"`, where `n` counts from 1.
    pub fn add_entity(&mut self, position: LatLng) -> EntityId {
        let name = format!("UAV {}", self.next_id + 1);
        self.add_named_entity(name, position)
    }

    pub fn add_named_entity(&mut self, name: impl Into<String>, position: LatLng) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        let entity = Entity::new(id, name.into(), position);
        log::debug!("{id} added as {:?} at {position}", entity.name);
        self.entities.insert(id, entity);
        id
    }

    /// Remove an entity and hand it back.  A flight in progress is
    /// abandoned: once the returned `Entity` is dropped its task loses its
    /// position and the engine drops it without reporting completion.
    pub fn remove_entity(&mut self, id: EntityId) -> FleetResult<Entity> {
        let entity = self.entities.remove(&id).ok_or(FleetError::EntityNotFound(id))?;
        self.flights.retain(|_, (owner, _)| *owner != id);
        log::debug!("{id} removed (moving: {})", entity.moving);
        Ok(entity)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    fn get_mut(&mut self, id: EntityId) -> FleetResult<&mut Entity> {
        self.entities.get_mut(&id).ok_or(FleetError::EntityNotFound(id))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Apply a patch.  A new `start_position` also moves the live position.
    ///
    /// A moving entity accepts only a rename; anything touching its flight
    /// fails with [`FleetError::AlreadyMoving`].
    pub fn update(&mut self, update: EntityUpdate) -> FleetResult<()> {
        let entity = self.get_mut(update.id)?;
        if entity.moving && update.touches_flight() {
            return Err(FleetError::AlreadyMoving(update.id));
        }

        if let Some(name) = update.name {
            entity.name = name;
        }
        if let Some(start) = update.start_position {
            entity.start_position = start;
            entity.position.set(start);
        }
        if let Some(target) = update.target {
            entity.target = target;
        }
        if let Some(duration_ms) = update.flight_duration_ms {
            entity.flight_duration_ms = duration_ms;
        }
        if let Some(trajectory) = update.trajectory {
            entity.trajectory = trajectory;
        }
        Ok(())
    }

    /// Append a leg to an idle entity's trajectory.
    pub fn push_leg(&mut self, id: EntityId, leg: Leg) -> FleetResult<()> {
        let entity = self.get_mut(id)?;
        if entity.moving {
            return Err(FleetError::AlreadyMoving(id));
        }
        entity.trajectory.push(leg);
        Ok(())
    }

    pub fn clear_trajectory(&mut self, id: EntityId) -> FleetResult<()> {
        let entity = self.get_mut(id)?;
        if entity.moving {
            return Err(FleetError::AlreadyMoving(id));
        }
        entity.trajectory.clear();
        Ok(())
    }

    // ── Launching ─────────────────────────────────────────────────────────

    /// Submit a task for one idle entity.
    ///
    /// A non-empty trajectory wins over a single target.  A target only
    /// flies with a positive duration.
    pub fn start_flight(&mut self, id: EntityId, engine: &mut Engine) -> FleetResult<TaskId> {
        let step = engine.time_step();
        let entity = self.get_mut(id)?;
        if entity.moving {
            return Err(FleetError::AlreadyMoving(id));
        }

        let (task_id, kind) = if let Some(last) = entity.trajectory.last() {
            let kind = FlightKind::Trajectory { last: last.target() };
            (engine.submit(trajectory_task(entity, entity.trajectory.clone(), step)), kind)
        } else {
            match entity.target {
                Some(target) if entity.flight_duration_ms > 0.0 => {
                    let duration = clamp_duration_ms(entity.flight_duration_ms);
                    let task = MotionTask::new(&entity.position, target, duration, step);
                    (engine.submit(task), FlightKind::Single { target })
                }
                _ => return Err(FleetError::NothingToFly(id)),
            }
        };

        entity.moving = true;
        log::debug!("{id} launched as {task_id}: {kind:?}");
        self.flights.insert(task_id, (id, kind));
        Ok(task_id)
    }

    /// Set a single-flight target and launch it, ignoring any stored
    /// trajectory.  A non-positive duration flies in the minimum duration.
    pub fn fly_to(
        &mut self,
        id:          EntityId,
        target:      LatLng,
        duration_ms: f64,
        engine:      &mut Engine,
    ) -> FleetResult<TaskId> {
        let entity = self.get_mut(id)?;
        if entity.moving {
            return Err(FleetError::AlreadyMoving(id));
        }
        entity.target = Some(target);
        entity.flight_duration_ms = duration_ms;

        let task = MotionTask::new(&entity.position, target, clamp_duration_ms(duration_ms), engine.time_step());
        let task_id = engine.submit(task);
        entity.moving = true;
        log::debug!("{id} flying to {target} as {task_id}");
        self.flights.insert(task_id, (id, FlightKind::Single { target }));
        Ok(task_id)
    }

    /// Launch every idle entity that has somewhere to go.
    ///
    /// Entities with only a target fly it as a one-leg trajectory.  Returns
    /// the number of flights launched.
    pub fn start_simulation(&mut self, engine: &mut Engine) -> usize {
        let step = engine.time_step();
        let mut launched = Vec::new();

        for (&id, entity) in self.entities.iter_mut() {
            if entity.moving || !entity.has_flight() {
                continue;
            }
            let legs = match (entity.trajectory.is_empty(), entity.target) {
                (false, _) => entity.trajectory.clone(),
                (true, Some(target)) => vec![Leg::new(target, entity.flight_duration_ms)],
                (true, None) => continue,
            };
            let Some(last) = legs.last().map(Leg::target) else {
                continue;
            };
            let task_id = engine.submit(trajectory_task(entity, legs, step));
            entity.moving = true;
            launched.push((task_id, (id, FlightKind::Trajectory { last })));
        }

        log::debug!("simulation started: {} entities launched", launched.len());
        let count = launched.len();
        self.flights.extend(launched);
        count
    }

    /// `true` if [`start_simulation`][Self::start_simulation] would launch
    /// anything.
    pub fn simulation_available(&self) -> bool {
        self.entities.values().any(|e| !e.moving && e.has_flight())
    }

    /// `true` while any entity is moving.
    pub fn simulation_running(&self) -> bool {
        self.entities.values().any(|e| e.moving)
    }

    // ── Completion ────────────────────────────────────────────────────────

    /// Fold finished tasks back into the store.  Ids this fleet did not
    /// submit, or whose entity was removed, are ignored.  Returns the number
    /// of entities updated.
    pub fn apply_completions(&mut self, finished: &[TaskId]) -> usize {
        let mut applied = 0;
        for task_id in finished {
            let Some((id, kind)) = self.flights.remove(task_id) else {
                continue;
            };
            let Some(entity) = self.entities.get_mut(&id) else {
                continue;
            };
            match kind {
                FlightKind::Single { target } => {
                    entity.start_position = target;
                    entity.target = None;
                    entity.flight_duration_ms = 0.0;
                }
                FlightKind::Trajectory { last } => {
                    entity.start_position = last;
                    entity.target = None;
                    entity.trajectory.clear();
                    entity.leg_index.set(None);
                }
            }
            entity.moving = false;
            applied += 1;
            log::debug!("{id} arrived at {}", entity.start_position);
        }
        applied
    }

    /// Flights submitted and not yet applied.
    pub fn in_flight(&self) -> usize {
        self.flights.len()
    }

    pub fn snapshots(&self) -> Vec<EntitySnapshot> {
        self.entities.values().map(Entity::snapshot).collect()
    }
}

/// A trajectory task that keeps `entity`'s leg index current.
fn trajectory_task(entity: &Entity, legs: Vec<Leg>, step: Duration) -> TrajectoryTask {
    let count = legs.len();
    let cursor = Rc::clone(&entity.leg_index);
    cursor.set(Some(0));
    TrajectoryTask::new(&entity.position, legs, step).on_leg(move |reached| {
        if reached + 1 < count {
            cursor.set(Some(reached + 1));
        }
    })
}
