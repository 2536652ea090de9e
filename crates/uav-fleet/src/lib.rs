//! `uav-fleet` — the entity store that feeds tasks to the engine.
//!
//! The engine only ever sees position handles and legs.  This crate keeps
//! the rest of each entity's state (name, pending target, pending
//! trajectory, moving flag), turns it into tasks, and folds finished tasks
//! back into the store.
//!
//! # Flight lifecycle
//!
//! ```text
//! idle ──start_flight / start_simulation──▶ moving
//!   ▲                                          │
//!   └──────── apply_completions(finished) ◀────┘
//! ```
//!
//! Removing a moving entity drops its position handle; the engine reclaims
//! the orphaned task on its next tick and no completion is ever reported.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use uav_core::{EngineConfig, LatLng, Leg};
//! use uav_fleet::Simulation;
//! use uav_engine::NoopObserver;
//!
//! let mut sim = Simulation::new(EngineConfig::default())?;
//! let id = sim.fleet.add_entity(LatLng::new(0.0, 0.0));
//! sim.fleet.push_leg(id, Leg::new(LatLng::new(5.0, 0.0), 500.0))?;
//! sim.launch();
//! sim.run_until_idle(10_000, &mut NoopObserver);
//! ```

pub mod entity;
pub mod error;
pub mod fleet;
pub mod simulation;


pub use entity::{Entity, EntitySnapshot, EntityUpdate};
pub use error::{FleetError, FleetResult};
pub use fleet::{FlightKind, Fleet};
pub use simulation::{SimObserver, Simulation};
