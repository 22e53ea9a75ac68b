//! Location graph representation and builder.
//!
//! # Data layout
//!
//! Adjacency is stored in **Compressed Sparse Row (CSR)** form.  The
//! neighbors of `NodeId n` are the contiguous slice
//!
//! ```text
//! neighbor[ out_start[n] .. out_start[n+1] ]
//! ```
//!
//! sorted ascending within each row, so every traversal visits neighbors in
//! `NodeId` order.  That ordering is what makes BFS paths (and therefore
//! dispatch distances) reproducible.

use std::collections::VecDeque;

use rd_core::{NodeId, SimRng};

use crate::{SpatialError, SpatialResult};

// ── Network ───────────────────────────────────────────────────────────────────

/// Undirected location graph in CSR form.
///
/// Do not construct directly; use [`NetworkBuilder`].
pub struct Network {
    /// CSR row pointer.  Length = `node_count + 1`.
    pub out_start: Vec<u32>,

    /// Flattened, per-row sorted neighbor lists.
    pub neighbor: Vec<NodeId>,
}

impl Network {
    /// A network with no locations.
    pub fn empty() -> Self {
        NetworkBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.out_start.len().saturating_sub(1)
    }

    /// Number of directed adjacency entries (twice the undirected links).
    pub fn edge_count(&self) -> usize {
        self.neighbor.len()
    }

    /// Number of undirected links.
    pub fn link_count(&self) -> usize {
        self.neighbor.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.node_count() == 0
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    /// Iterator over all `NodeId`s in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.node_count() as u32).map(NodeId)
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Neighbors of `node` in ascending `NodeId` order.
    #[inline]
    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        let start = self.out_start[node.index()] as usize;
        let end   = self.out_start[node.index() + 1] as usize;
        &self.neighbor[start..end]
    }

    #[inline]
    pub fn degree(&self, node: NodeId) -> usize {
        self.neighbors(node).len()
    }

    /// Check that every node is reachable from node 0.
    ///
    /// Dispatch assumes a path exists between any two locations, so the
    /// simulation builder rejects disconnected networks up front.
    pub fn ensure_connected(&self) -> SpatialResult<()> {
        let n = self.node_count();
        if n == 0 {
            return Ok(());
        }
        let mut seen = vec![false; n];
        let mut queue = VecDeque::from([NodeId(0)]);
        seen[0] = true;
        let mut reached = 1;
        while let Some(node) = queue.pop_front() {
            for &next in self.neighbors(node) {
                if !seen[next.index()] {
                    seen[next.index()] = true;
                    reached += 1;
                    queue.push_back(next);
                }
            }
        }
        if reached == n {
            Ok(())
        } else {
            Err(SpatialError::Disconnected {
                start:       NodeId(0),
                unreachable: n - reached,
                nodes:       n,
            })
        }
    }

    // ── Random locations ──────────────────────────────────────────────────

    /// A uniformly random location, or `None` for an empty network.
    pub fn random_node(&self, rng: &mut SimRng) -> Option<NodeId> {
        if self.is_empty() {
            return None;
        }
        Some(NodeId(rng.gen_range(0..self.node_count() as u32)))
    }

    /// A uniformly random location satisfying `accept`, or `None` if no
    /// location does.
    ///
    /// Shuffles all locations and returns the first accepted one, so the
    /// cost is one full shuffle regardless of how many locations qualify.
    pub fn random_node_where<F>(&self, rng: &mut SimRng, mut accept: F) -> Option<NodeId>
    where
        F: FnMut(NodeId) -> bool,
    {
        let mut order: Vec<NodeId> = self.nodes().collect();
        rng.shuffle(&mut order);
        order.into_iter().find(|&n| accept(n))
    }
}

// ── NetworkBuilder ────────────────────────────────────────────────────────────

/// Construct a [`Network`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use rd_spatial::NetworkBuilder;
///
/// let mut b = NetworkBuilder::new();
/// let a = b.add_node();
/// let c = b.add_node();
/// b.add_link(a, c);
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.neighbors(a), &[c]);
/// ```
pub struct NetworkBuilder {
    node_count: u32,
    links:      Vec<(NodeId, NodeId)>,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self { node_count: 0, links: Vec::new() }
    }

    /// Add a location and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self) -> NodeId {
        let id = NodeId(self.node_count);
        self.node_count += 1;
        id
    }

    /// Add an undirected link between `a` and `b`.  Duplicate links and
    /// self-loops are dropped at build time.
    pub fn add_link(&mut self, a: NodeId, b: NodeId) {
        self.links.push((a, b));
        self.links.push((b, a));
    }

    pub fn node_count(&self) -> usize { self.node_count as usize }

    /// A `width × height` 4-neighbour lattice.
    ///
    /// Node `(x, y)` gets id `x * height + y`, matching row-major iteration
    /// over the lattice coordinates.
    pub fn grid(width: u32, height: u32) -> Self {
        let mut b = Self::new();
        for _ in 0..width * height {
            b.add_node();
        }
        let id = |x: u32, y: u32| NodeId(x * height + y);
        for x in 0..width {
            for y in 0..height {
                if x + 1 < width {
                    b.add_link(id(x, y), id(x + 1, y));
                }
                if y + 1 < height {
                    b.add_link(id(x, y), id(x, y + 1));
                }
            }
        }
        b
    }

    /// Consume the builder and produce a [`Network`].
    pub fn build(self) -> Network {
        let n = self.node_count as usize;

        let mut links = self.links;
        links.retain(|(a, b)| a != b && a.index() < n && b.index() < n);
        links.sort_unstable();
        links.dedup();

        let mut out_start = vec![0u32; n + 1];
        for (from, _) in &links {
            out_start[from.index() + 1] += 1;
        }
        for i in 1..=n {
            out_start[i] += out_start[i - 1];
        }
        debug_assert_eq!(out_start[n] as usize, links.len());

        let neighbor = links.into_iter().map(|(_, to)| to).collect();

        Network { out_start, neighbor }
    }
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
