//! Station registry.

use rd_core::{NodeId, SimRng};
use rd_spatial::{Network, Router, SpatialResult};

/// The set of designated station locations, sorted and deduplicated.
///
/// Only populated when the run uses Station or Mix behavior.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StationRegistry {
    nodes: Vec<NodeId>,
}

impl StationRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(mut nodes: Vec<NodeId>) -> Self {
        nodes.sort_unstable();
        nodes.dedup();
        Self { nodes }
    }

    /// Draw `floor(sqrt(links))` random locations (at least one) as stations.
    /// Repeated draws collapse, so the registry may end up smaller.
    pub fn place(network: &Network, rng: &mut SimRng) -> Self {
        let count = ((network.link_count() as f64).sqrt() as usize).max(1);
        let nodes = (0..count).filter_map(|_| network.random_node(rng)).collect();
        Self::new(nodes)
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.binary_search(&node).is_ok()
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// A uniformly random station (spawn point for Station responders).
    pub fn random(&self, rng: &mut SimRng) -> Option<NodeId> {
        rng.choose(&self.nodes).copied()
    }

    /// The station with the shortest path from `from`; ties go to the lowest
    /// `NodeId`.  `None` when the registry is empty.
    pub fn nearest<R: Router>(
        &self,
        network: &Network,
        router:  &R,
        from:    NodeId,
    ) -> SpatialResult<Option<NodeId>> {
        let mut best: Option<(usize, NodeId)> = None;
        for &station in &self.nodes {
            let len = router.path_len(network, from, station)?;
            if best.is_none_or(|(best_len, _)| len < best_len) {
                best = Some((len, station));
            }
        }
        Ok(best.map(|(_, station)| station))
    }
}
