use thiserror::Error;
use uav_core::CoreError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine configuration error: {0}")]
    Config(#[from] CoreError),
}

pub type EngineResult<T> = Result<T, EngineError>;
