use thiserror::Error;

/// Failure of a single `advance` call.
///
/// A failed step leaves the position untouched.  Simulated time still
/// advances, so the task keeps moving towards completion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TaskError {
    #[error("step would move to non-finite position ({lat}, {lng})")]
    NonFinitePosition { lat: f64, lng: f64 },

    #[error("task panicked: {0}")]
    Panicked(String),
}

pub type TaskResult<T> = Result<T, TaskError>;
