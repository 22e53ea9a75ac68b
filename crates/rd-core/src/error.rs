//! Shared error type.
//!
//! Sub-crates define their own error enums and wrap `RdError` as one variant
//! where they need to surface a core failure.

use thiserror::Error;

use crate::{AgentId, IncidentId};

/// Errors raised by `rd-core` and reused as a base by sub-crates.
#[derive(Debug, Error)]
pub enum RdError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("incident {0} not found")]
    IncidentNotFound(IncidentId),

    #[error("invalid incident type {0}: expected 1..=5")]
    InvalidIncidentKind(u32),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `rd-*` crates.
pub type RdResult<T> = Result<T, RdError>;
