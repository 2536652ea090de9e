//! `uav-motion` — the units of work the scheduler steps.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                          |
//! |----------------|-------------------------------------------------------------------|
//! | [`handle`]     | `PositionHandle` (owning) and `PositionLink` (task-side, weak)     |
//! | [`task`]       | `Task` trait, `TaskKind` closed variant set, `OnDone` callbacks    |
//! | [`motion`]     | `MotionTask` — constant-velocity move to one target               |
//! | [`trajectory`] | `TrajectoryTask` — ordered legs, one inner `MotionTask` at a time |
//! | [`error`]      | `TaskError`, `TaskResult<T>`                                      |
//!
//! # Movement model
//!
//! A motion is pure linear interpolation in unprojected coordinate space:
//!
//! 1. At construction the start position is snapshotted and the per-tick
//!    displacement `(target − start) × step / duration` is fixed.
//! 2. Every tick adds that displacement to the live position and advances
//!    elapsed time by one step.
//! 3. Once `elapsed ≥ duration` the position is snapped to the exact target
//!    and the completion callback fires once.
//!
//! Externally perturbing the position mid-flight does not change the
//! displacement; only the final snap corrects it.

pub mod error;
pub mod handle;
pub mod motion;
pub mod task;
pub mod trajectory;

#[cfg(test)]
mod tests;

pub use error::{TaskError, TaskResult};
pub use handle::{PositionHandle, PositionLink};
pub use motion::MotionTask;
pub use task::{OnDone, Task, TaskKind, panic_message};
pub use trajectory::{OnLeg, TrajectoryPhase, TrajectoryTask};
