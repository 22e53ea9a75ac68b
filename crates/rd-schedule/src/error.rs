use rd_core::RdError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("schedule parse error: {0}")]
    Parse(String),

    #[error("unknown arrival distribution {0:?}: expected uniform, normal, linear or exponential")]
    UnknownDistribution(String),

    #[error("invalid distribution parameters: {0}")]
    Distribution(String),

    #[error(transparent)]
    Core(#[from] RdError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
