//! `uav-engine` — the tick loop that owns every active task.
//!
//! # Tick loop
//!
//! ```text
//! while running, once per tick interval:
//!   ① Inbox    — tasks submitted through an EngineHandle since the last
//!                tick join the active set.
//!   ② Step     — advance() every active task once, in insertion order.
//!                Errors and panics are contained per task and logged.
//!   ③ Reclaim  — drop finished tasks (recorded for take_finished) and
//!                orphaned tasks whose entity no longer exists.
//!   ④ Clock    — advance simulated time by exactly one time step.
//! ```
//!
//! Scheduling is single-threaded and cooperative: no task is suspended
//! mid-step and nothing runs in parallel.  `Engine` is deliberately `!Send`.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use uav_core::{EngineConfig, LatLng};
//! use uav_engine::Engine;
//! use uav_motion::{MotionTask, PositionHandle};
//!
//! let mut engine = Engine::new(EngineConfig::default())?;
//! let drone = PositionHandle::new(LatLng::new(0.0, 0.0));
//! engine.submit(MotionTask::new(&drone, LatLng::new(10.0, 10.0), secs(1), engine.time_step()));
//! engine.start();
//! engine.run_paced(None, &mut NoopObserver);
//! ```

pub mod engine;
pub mod error;
pub mod handle;
pub mod observer;
pub mod ticker;


pub use engine::Engine;
pub use error::{EngineError, EngineResult};
pub use handle::EngineHandle;
pub use observer::{EngineObserver, NoopObserver, TickReport};
pub use ticker::Ticker;
