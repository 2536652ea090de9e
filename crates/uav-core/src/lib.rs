//! `uav-core` — foundational types for the `rust_uav` motion engine.
//!
//! This crate is a dependency of every other `uav-*` crate.  It has no
//! `uav-*` dependencies of its own.
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `EntityId`, `TaskId`                                  |
//! | [`geo`]         | `LatLng` — unprojected coordinate pair                |
//! | [`leg`]         | `Leg`, duration clamping, CSV / JSON leg-list codecs  |
//! | [`time`]        | `Tick`, `SimClock`                                    |
//! | [`config`]      | `EngineConfig` (TOML)                                 |
//! | [`error`]       | `CoreError`, `CoreResult`                             |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod leg;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::EngineConfig;
pub use error::{CoreError, CoreResult};
pub use geo::LatLng;
pub use ids::{EntityId, TaskId};
pub use leg::{
    Leg, MIN_DURATION, clamp_duration, clamp_duration_ms, legs_from_json, legs_to_json,
    load_legs_csv, load_legs_reader, write_legs_csv,
};
pub use time::{MIN_TIME_STEP, SimClock, Tick};
