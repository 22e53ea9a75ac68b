use rd_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("unknown agent behavior {0:?}: expected idle, patrol, station or mix")]
    UnknownBehavior(String),

    #[error("station behavior requested but no stations are registered")]
    NoStations,

    #[error("cannot spawn responders on an empty network")]
    EmptyNetwork,

    #[error("routing failed: {0}")]
    Routing(#[from] SpatialError),
}

pub type AgentResult<T> = Result<T, AgentError>;
