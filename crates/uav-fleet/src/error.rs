use thiserror::Error;
use uav_core::EntityId;
use uav_engine::EngineError;

#[derive(Debug, Error)]
pub enum FleetError {
    #[error("{0} does not exist")]
    EntityNotFound(EntityId),

    #[error("{0} is already moving")]
    AlreadyMoving(EntityId),

    #[error("{0} has neither a trajectory nor a target with a positive duration")]
    NothingToFly(EntityId),

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
}

pub type FleetResult<T> = Result<T, FleetError>;
