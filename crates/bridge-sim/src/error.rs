use bridge_core::BridgeError;
use bridge_queue::QueueError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] BridgeError),

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error("run incomplete: {completed} of {submitted} vehicles crossed before the timeout")]
    Incomplete {
        completed: usize,
        submitted: usize,
    },

    #[error("failed to spawn vehicle agent: {0}")]
    Spawn(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
