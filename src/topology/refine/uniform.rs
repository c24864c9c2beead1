//! One pass of uniform refinement for the linear families.
//!
//! New vertices are appended after the existing nodes in a fixed order:
//! edge midpoints, then facet centres, then element centres, each group
//! present only when the family's templates use it. Since entity indices are
//! already unique, no point is created twice.
//!
//! Children are emitted template-major: child 0 of every element, then
//! child 1 of every element, and so on.

use crate::data::connectivity::Connectivity;
use crate::data::coordinates::Coordinates;
use crate::mesh_error::MeshError;
use crate::topology::cell_type::CellType;
use crate::topology::mesh::Mesh;
use crate::topology::refine::templates::{
    HEXAHEDRON_CHILDREN, OCTAHEDRON_DIAGONALS, OCTAHEDRON_SPLITS, QUADRILATERAL_CHILDREN,
    SEGMENT_CHILDREN, Slot, TETRAHEDRON_CORNERS, TRIANGLE_CHILDREN,
};

/// Resolves template slots of an element to global vertex indices.
pub(crate) struct SlotResolver<'a> {
    mesh: &'a Mesh,
    edge_base: usize,
    facet_base: usize,
    center_base: usize,
}

impl<'a> SlotResolver<'a> {
    pub(crate) fn resolve(&self, element: usize, slot: Slot) -> usize {
        match slot {
            Slot::Vertex(i) => self.mesh.cells().row(element)[i],
            Slot::Edge(j) => self.edge_base + self.mesh.element_edges().row(element)[j],
            Slot::Facet(k) => self.facet_base + self.mesh.element_facets().row(element)[k],
            Slot::Center => self.center_base + element,
        }
    }
}

/// Append one row per (child, element) pair, child-major.
pub(crate) fn emit_children<T, F>(
    out: &mut Vec<usize>,
    children: &[T],
    elements: &[usize],
    resolve: F,
) where
    T: AsRef<[Slot]>,
    F: Fn(usize, Slot) -> usize,
{
    for child in children {
        for &e in elements {
            out.extend(child.as_ref().iter().map(|&slot| resolve(e, slot)));
        }
    }
}

/// Refine every element of a linear-family mesh once.
pub fn refine_uniform(mesh: &Mesh) -> Result<Mesh, MeshError> {
    let family = mesh.family();
    if family.degree() > 1 {
        return Err(MeshError::NotImplemented {
            family,
            operation: "uniform refinement",
        });
    }

    let base = mesh.node_count();
    let element_count = mesh.element_count();
    let all: Vec<usize> = (0..element_count).collect();
    let mut coordinates = mesh.coordinates().clone();
    let mut cells = Vec::new();

    let mut resolver = SlotResolver {
        mesh,
        edge_base: base,
        facet_base: base,
        center_base: base,
    };

    match family.cell_type() {
        CellType::Segment => {
            coordinates.extend_with_means(mesh.cells().rows());
            emit_children(&mut cells, SEGMENT_CHILDREN.as_slice(), &all, |e, s| {
                resolver.resolve(e, s)
            });
        }
        CellType::Triangle => {
            coordinates.extend_with_means(mesh.facets().rows());
            emit_children(&mut cells, TRIANGLE_CHILDREN.as_slice(), &all, |e, s| {
                resolver.resolve(e, s)
            });
        }
        CellType::Quadrilateral => {
            coordinates.extend_with_means(mesh.facets().rows());
            coordinates.extend_with_means(mesh.cells().rows());
            resolver.center_base = base + mesh.facet_count();
            emit_children(&mut cells, QUADRILATERAL_CHILDREN.as_slice(), &all, |e, s| {
                resolver.resolve(e, s)
            });
        }
        CellType::Tetrahedron => {
            coordinates.extend_with_means(mesh.edges().rows());
            emit_children(&mut cells, TETRAHEDRON_CORNERS.as_slice(), &all, |e, s| {
                resolver.resolve(e, s)
            });
            split_octahedra(&mut cells, &coordinates, &resolver, &all);
        }
        CellType::Hexahedron => {
            coordinates.extend_with_means(mesh.edges().rows());
            coordinates.extend_with_means(mesh.facets().rows());
            coordinates.extend_with_means(mesh.cells().rows());
            resolver.facet_base = base + mesh.edge_count();
            resolver.center_base = resolver.facet_base + mesh.facet_count();
            emit_children(&mut cells, HEXAHEDRON_CHILDREN.as_slice(), &all, |e, s| {
                resolver.resolve(e, s)
            });
        }
        CellType::Vertex => {
            return Err(MeshError::NotImplemented {
                family,
                operation: "uniform refinement",
            });
        }
    }

    let width = family.cell_type().vertex_count();
    let cells = Connectivity::from_parts(width, cells);
    log::debug!(
        "uniform refinement of {family:?}: {} -> {} elements, {} -> {} vertices",
        element_count,
        cells.len(),
        base,
        coordinates.len()
    );
    Ok(Mesh::from_parts(family, coordinates, cells, mesh.is_affine()))
}

/// Split the inner octahedron of every tetrahedron along its shortest
/// diagonal. Elements are grouped by diagonal; each group is emitted
/// template-major.
fn split_octahedra(
    cells: &mut Vec<usize>,
    coordinates: &Coordinates,
    resolver: &SlotResolver<'_>,
    elements: &[usize],
) {
    let mut groups: [Vec<usize>; 3] = Default::default();
    for &e in elements {
        let length = |(a, b): (usize, usize)| {
            coordinates.squared_distance(
                resolver.resolve(e, Slot::Edge(a)),
                resolver.resolve(e, Slot::Edge(b)),
            )
        };
        let [d1, d2, d3] = OCTAHEDRON_DIAGONALS.map(length);
        let case = if d1 < d2 && d1 < d3 {
            0
        } else if d2 < d3 {
            1
        } else {
            2
        };
        groups[case].push(e);
    }
    for (splits, group) in OCTAHEDRON_SPLITS.iter().zip(&groups) {
        let children = splits.map(|split| split.map(Slot::Edge));
        emit_children(cells, children.as_slice(), group, |e, s| resolver.resolve(e, s));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::element::ElementFamily;

    #[test]
    fn octahedron_split_uses_full_distance() {
        // diagonals in x and y alone would favour (e0, e5); with z it is (e2, e4)
        let coordinates = Coordinates::from_points(
            3,
            [
                [0.0, 0.0, 0.0],
                [1.0, 0.0, -0.3],
                [0.0, 1.0, 0.0],
                [-0.8, -0.9, 2.6],
            ],
        )
        .unwrap();
        let cells = Connectivity::try_new(4, vec![0, 1, 2, 3]).unwrap();
        let mesh = Mesh::try_new(ElementFamily::Tet1, coordinates, cells).unwrap();
        let fine = refine_uniform(&mesh).unwrap();
        assert_eq!(fine.element_count(), 8);

        let edges = CellType::Tetrahedron.edges();
        let midpoint = |k: usize| {
            let target = mesh.coordinates().mean_of(edges[k]);
            fine.coordinates()
                .iter()
                .position(|p| p == target.as_slice())
                .unwrap()
        };
        let (a, b) = (midpoint(2), midpoint(4));
        for child in 4..8 {
            let row = fine.cells().row(child);
            assert!(row.contains(&a) && row.contains(&b), "child {child}: {row:?}");
        }
    }
}
