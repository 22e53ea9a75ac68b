use rd_agent::AgentError;
use rd_core::{AgentId, IncidentId, RdError};
use rd_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("routing failed: {0}")]
    Routing(#[from] SpatialError),

    #[error("responder error: {0}")]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Core(#[from] RdError),

    #[error("{agent} is in both the available and unavailable sets")]
    DoubleRegistered { agent: AgentId },

    #[error("{agent} is in neither the available nor the unavailable set")]
    Unregistered { agent: AgentId },

    #[error("{agent} registry entry disagrees with its assignment (assigned: {assigned})")]
    AssignmentMismatch { agent: AgentId, assigned: bool },

    #[error("{agent} is assigned to {incident}, which is not active")]
    DanglingAssignment { agent: AgentId, incident: IncidentId },

    #[error("{incident} recorded {recorded} units of responder work but {done} units are done")]
    WorkMismatch { incident: IncidentId, recorded: u64, done: u32 },

    #[error("backlog entry for {0} does not refer to an active incident")]
    DanglingBacklog(IncidentId),
}

pub type DispatchResult<T> = Result<T, DispatchError>;
