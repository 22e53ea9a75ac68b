//! Routing trait and default breadth-first implementation.
//!
//! # Pluggability
//!
//! The coordinator and responders call routing via the [`Router`] trait, so
//! applications can swap in weighted or cached implementations without
//! touching the dispatch engine.  The default [`BfsRouter`] treats every
//! link as one step, which is exactly the movement model: a responder
//! advances one location per cycle.
//!
//! # Distance
//!
//! Dispatch compares [`Path::len`], the number of locations on the path
//! *including the source*.  A responder already at the target has a path of
//! length 1.

use std::collections::VecDeque;

use rd_core::NodeId;

use crate::network::Network;
use crate::{SpatialError, SpatialResult};

// ── Path ──────────────────────────────────────────────────────────────────────

/// An ordered list of locations from source to destination, both included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub nodes: Vec<NodeId>,
}

impl Path {
    /// Number of locations on the path, source included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of links to traverse.
    #[inline]
    pub fn hops(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// The location one step along the path: `nodes[1]`, or `nodes[0]` when
    /// source and destination coincide.
    pub fn next_step(&self) -> Option<NodeId> {
        self.nodes.get(1).or_else(|| self.nodes.first()).copied()
    }

    /// `true` if the source and destination are the same location.
    pub fn is_trivial(&self) -> bool {
        self.nodes.len() <= 1
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
///
/// `Send + Sync` because a dispatch may measure candidate distances from
/// several threads at once (`rd-dispatch` feature `parallel`).
pub trait Router: Send + Sync {
    /// Shortest path from `from` to `to`, source first.
    ///
    /// `from == to` yields a single-element path.  A disconnected pair is
    /// [`SpatialError::NoRoute`].
    fn shortest_path(&self, network: &Network, from: NodeId, to: NodeId) -> SpatialResult<Path>;

    /// Length of the shortest path (locations, source included).
    fn path_len(&self, network: &Network, from: NodeId, to: NodeId) -> SpatialResult<usize> {
        self.shortest_path(network, from, to).map(|p| p.len())
    }
}

// ── BfsRouter ─────────────────────────────────────────────────────────────────

/// Unweighted shortest path by breadth-first search.
///
/// Neighbors are expanded in ascending `NodeId` order, so among equally short
/// paths the one through lower-numbered locations is always returned.
pub struct BfsRouter;

impl Router for BfsRouter {
    fn shortest_path(&self, network: &Network, from: NodeId, to: NodeId) -> SpatialResult<Path> {
        bfs(network, from, to)
    }
}

fn bfs(network: &Network, from: NodeId, to: NodeId) -> SpatialResult<Path> {
    if !network.contains(from) {
        return Err(SpatialError::NodeNotFound(from));
    }
    if !network.contains(to) {
        return Err(SpatialError::NodeNotFound(to));
    }
    if from == to {
        return Ok(Path { nodes: vec![from] });
    }

    // prev[v] = node that first reached v; INVALID for unreached nodes.
    let mut prev = vec![NodeId::INVALID; network.node_count()];
    prev[from.index()] = from;

    let mut queue = VecDeque::from([from]);
    while let Some(node) = queue.pop_front() {
        for &next in network.neighbors(node) {
            if prev[next.index()] != NodeId::INVALID {
                continue;
            }
            prev[next.index()] = node;
            if next == to {
                return Ok(reconstruct(&prev, from, to));
            }
            queue.push_back(next);
        }
    }

    Err(SpatialError::NoRoute { from, to })
}

fn reconstruct(prev: &[NodeId], from: NodeId, to: NodeId) -> Path {
    let mut nodes = vec![to];
    let mut cur = to;
    while cur != from {
        cur = prev[cur.index()];
        nodes.push(cur);
    }
    nodes.reverse();
    Path { nodes }
}
