use bridge_core::{Direction, VehicleId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("vehicle {id} is already queued for {direction}")]
    DuplicateVehicle {
        id:        VehicleId,
        direction: Direction,
    },

    #[error("arrival parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type QueueResult<T> = Result<T, QueueError>;
