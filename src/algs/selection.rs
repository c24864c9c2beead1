//! Geometric selection of nodes, facets and elements.
//!
//! Predicates receive one point at a time, `dimension` components, and must
//! be pure. Results are ascending indices.

use crate::data::connectivity::Connectivity;
use crate::topology::mesh::Mesh;

/// Nodes whose coordinates satisfy `test`, optionally restricted to the
/// boundary nodes.
pub fn nodes_satisfying<F>(mesh: &Mesh, test: F, boundaries_only: bool) -> Vec<usize>
where
    F: Fn(&[f64]) -> bool,
{
    let selected = mesh
        .coordinates()
        .iter()
        .enumerate()
        .filter(|&(_, p)| test(p))
        .map(|(i, _)| i);
    if boundaries_only {
        let boundary = mesh.boundary_nodes();
        selected
            .filter(|i| boundary.binary_search(i).is_ok())
            .collect()
    } else {
        selected.collect()
    }
}

/// Facets whose midpoints satisfy `test`, optionally restricted to the
/// boundary facets.
pub fn facets_satisfying<F>(mesh: &Mesh, test: F, boundaries_only: bool) -> Vec<usize>
where
    F: Fn(&[f64]) -> bool,
{
    let selected = rows_satisfying(mesh, mesh.facets(), test);
    if boundaries_only {
        let f2t = mesh.facet_elements();
        selected.into_iter().filter(|&f| f2t.is_boundary(f)).collect()
    } else {
        selected
    }
}

/// Elements whose vertex means satisfy `test`.
pub fn elements_satisfying<F>(mesh: &Mesh, test: F) -> Vec<usize>
where
    F: Fn(&[f64]) -> bool,
{
    rows_satisfying(mesh, mesh.cells(), test)
}

fn rows_satisfying<F>(mesh: &Mesh, table: &Connectivity, test: F) -> Vec<usize>
where
    F: Fn(&[f64]) -> bool,
{
    let coordinates = mesh.coordinates();
    table
        .rows()
        .enumerate()
        .filter(|&(_, row)| test(coordinates.mean_of(row).as_slice()))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::element::ElementFamily;
    use crate::topology::refine::Refinement;

    #[test]
    fn left_edge_nodes() {
        let mesh = Mesh::default_mesh(ElementFamily::Quad1)
            .unwrap()
            .refined(Refinement::Uniform(1))
            .unwrap();
        let left = nodes_satisfying(&mesh, |p| p[0] < 1e-12, false);
        assert_eq!(left.len(), 3);
        let centre = nodes_satisfying(&mesh, |p| (p[0] - 0.5).abs() < 1e-12, true);
        // (0.5, 0) and (0.5, 1); the centre node is interior
        assert_eq!(centre.len(), 2);
    }

    #[test]
    fn facets_by_midpoint() {
        let mesh = Mesh::default_mesh(ElementFamily::Tri1).unwrap();
        let diagonal = facets_satisfying(&mesh, |p| (p[0] + p[1] - 1.0).abs() < 1e-12, false);
        assert_eq!(diagonal.len(), 1);
        assert!(facets_satisfying(&mesh, |p| (p[0] + p[1] - 1.0).abs() < 1e-12, true).is_empty());
    }

    #[test]
    fn elements_by_midpoint() {
        let mesh = Mesh::default_mesh(ElementFamily::Tri1).unwrap();
        assert_eq!(elements_satisfying(&mesh, |p| p[0] + p[1] > 1.0), vec![1]);
        assert_eq!(elements_satisfying(&mesh, |_| true), vec![0, 1]);
    }
}
