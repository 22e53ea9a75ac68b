use rd_agent::AgentError;
use rd_dispatch::DispatchError;
use rd_schedule::ScheduleError;
use rd_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{what} length {got} does not match responder count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("network error: {0}")]
    Network(#[from] SpatialError),

    #[error("fleet error: {0}")]
    Fleet(#[from] AgentError),

    #[error("schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

pub type SimResult<T> = Result<T, SimError>;
