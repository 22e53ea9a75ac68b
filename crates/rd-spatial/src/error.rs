//! Spatial-subsystem error type.

use thiserror::Error;

use rd_core::NodeId;

/// Errors produced by `rd-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("network is not connected: {unreachable} of {nodes} nodes unreachable from {start}")]
    Disconnected { start: NodeId, unreachable: usize, nodes: usize },
}

pub type SpatialResult<T> = Result<T, SpatialError>;
