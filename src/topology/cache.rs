//! Lazily derived topology attached to an immutable [`Mesh`](crate::topology::mesh::Mesh).
//!
//! Every slot is filled at most once per mesh instance. `OnceCell` makes the
//! first initialisation thread-safe, so a mesh can be shared across threads
//! before any query has run.

use crate::topology::entities::{EntityAdjacency, EntitySet};
use once_cell::sync::OnceCell;

/// Once-computed facets, edges and facet adjacency of a mesh.
#[derive(Clone, Debug, Default)]
pub struct TopologyCache {
    facets: OnceCell<EntitySet>,
    facet_adjacency: OnceCell<EntityAdjacency>,
    edges: OnceCell<EntitySet>,
    boundary_facets: OnceCell<Vec<usize>>,
}

impl TopologyCache {
    pub fn facets(&self, init: impl FnOnce() -> EntitySet) -> &EntitySet {
        self.facets.get_or_init(init)
    }

    pub fn facet_adjacency(&self, init: impl FnOnce() -> EntityAdjacency) -> &EntityAdjacency {
        self.facet_adjacency.get_or_init(init)
    }

    pub fn edges(&self, init: impl FnOnce() -> EntitySet) -> &EntitySet {
        self.edges.get_or_init(init)
    }

    pub fn boundary_facets(&self, init: impl FnOnce() -> Vec<usize>) -> &[usize] {
        self.boundary_facets.get_or_init(init)
    }
}
