//! Boundary classification utilities.
//!
//! A facet lies on the boundary when its adjacency has a single owner. Node
//! and edge queries are derived from the boundary facets.

use crate::mesh_error::MeshError;
use crate::topology::entities::EntityAdjacency;
use crate::topology::mesh::Mesh;
use hashbrown::HashSet;
use itertools::Itertools;

/// Facet indices split into boundary and interior, both ascending.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoundaryClassification {
    pub boundary: Vec<usize>,
    pub interior: Vec<usize>,
}

/// Classify every facet of `mesh` by its number of owners.
pub fn classify_facets(mesh: &Mesh) -> BoundaryClassification {
    let f2t = mesh.facet_elements();
    let (boundary, interior): (Vec<usize>, Vec<usize>) =
        (0..f2t.len()).partition(|&f| f2t.is_boundary(f));
    BoundaryClassification { boundary, interior }
}

/// Facets with a single owner, ascending.
pub fn collect_boundary_facets(facet_elements: &EntityAdjacency) -> Vec<usize> {
    (0..facet_elements.len())
        .filter(|&f| facet_elements.is_boundary(f))
        .collect()
}

/// Sorted unique vertices of the boundary facets.
pub fn boundary_nodes(mesh: &Mesh) -> Vec<usize> {
    let facets = mesh.facets();
    mesh.boundary_facets()
        .iter()
        .flat_map(|&f| facets.row(f).iter().copied())
        .sorted_unstable()
        .dedup()
        .collect()
}

/// Vertices in `0..vertex_count` that are not boundary nodes.
pub fn interior_nodes(mesh: &Mesh) -> Vec<usize> {
    let boundary = boundary_nodes(mesh);
    (0..mesh.vertex_count())
        .filter(|v| boundary.binary_search(v).is_err())
        .collect()
}

/// Edges lying on the boundary surface of a three-dimensional mesh.
///
/// Candidates are the edges of the elements owning boundary facets. A
/// candidate is kept when its sorted vertex pair matches a pair of
/// consecutive vertices of some boundary facet; facet rows are stored in
/// cyclic order, so those pairs are exactly the facet edges. Pairs are
/// compared through the index `a * vertex_count + b`.
pub fn boundary_edges(mesh: &Mesh) -> Vec<usize> {
    if mesh.reference_dimension() < 3 {
        return Vec::new();
    }
    let radix = mesh.vertex_count();
    let encode = |a: usize, b: usize| a.min(b) * radix + a.max(b);

    let facets = mesh.facets();
    let boundary = mesh.boundary_facets();
    let surface: HashSet<usize> = boundary
        .iter()
        .flat_map(|&f| facets.row(f).iter().circular_tuple_windows())
        .map(|(&a, &b)| encode(a, b))
        .collect();

    let f2t = mesh.facet_elements();
    let t2e = mesh.element_edges();
    let edges = mesh.edges();
    boundary
        .iter()
        .flat_map(|&f| t2e.row(f2t.first(f)).iter().copied())
        .filter(|&e| {
            let row = edges.row(e);
            surface.contains(&encode(row[0], row[1]))
        })
        .sorted_unstable()
        .dedup()
        .collect()
}

/// Vertices of the facets `ix`, and in three dimensions the boundary edges
/// whose endpoints both belong to those facets.
pub fn expand_facets(mesh: &Mesh, ix: &[usize]) -> Result<(Vec<usize>, Vec<usize>), MeshError> {
    let facet_count = mesh.facet_count();
    if let Some(&facet) = ix.iter().find(|&&f| f >= facet_count) {
        return Err(MeshError::FacetIndexOutOfBounds { facet, facet_count });
    }
    let facets = mesh.facets();
    let vertices: Vec<usize> = ix
        .iter()
        .flat_map(|&f| facets.row(f).iter().copied())
        .sorted_unstable()
        .dedup()
        .collect();
    if mesh.reference_dimension() < 3 {
        return Ok((vertices, Vec::new()));
    }

    let f2t = mesh.facet_elements();
    let t2e = mesh.element_edges();
    let edges = mesh.edges();
    let candidates: HashSet<usize> = ix
        .iter()
        .flat_map(|&f| t2e.row(f2t.first(f)).iter().copied())
        .filter(|&e| {
            edges
                .row(e)
                .iter()
                .all(|v| vertices.binary_search(v).is_ok())
        })
        .collect();
    let selected = boundary_edges(mesh)
        .into_iter()
        .filter(|e| candidates.contains(e))
        .collect();
    Ok((vertices, selected))
}
