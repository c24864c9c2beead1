//! Subdivision templates in element-local terms.
//!
//! A template lists child elements as rows of [`Slot`]s: a parent vertex, the
//! midpoint of a local edge or facet, or the element centre. The refinement
//! passes resolve slots to global vertex indices through `t2e`/`t2f`.
//!
//! All templates keep the orientation of the parent.

use crate::topology::cell_type::CellType;
use hashbrown::HashMap;
use once_cell::sync::Lazy;

/// Local position of a child vertex inside the parent element.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Slot {
    /// Parent vertex `i`.
    Vertex(usize),
    /// Midpoint of local edge `j`.
    Edge(usize),
    /// Centre of local facet `k`.
    Facet(usize),
    /// Element centre.
    Center,
}

use Slot::{Edge as E, Facet as F, Vertex as V};

/// Three corner triangles, then the centre triangle.
pub const TRIANGLE_CHILDREN: [[Slot; 3]; 4] = [
    [V(0), F(0), F(2)],
    [V(1), F(1), F(0)],
    [V(2), F(2), F(1)],
    [F(0), F(1), F(2)],
];

/// Corner tetrahedra, one per parent vertex.
pub const TETRAHEDRON_CORNERS: [[Slot; 4]; 4] = [
    [V(0), E(0), E(2), E(3)],
    [V(1), E(1), E(0), E(4)],
    [V(2), E(2), E(1), E(5)],
    [V(3), E(4), E(3), E(5)],
];

/// The three diagonals of the inner octahedron, as pairs of local edges
/// whose midpoints they join.
pub const OCTAHEDRON_DIAGONALS: [(usize, usize); 3] = [(2, 4), (1, 3), (0, 5)];

/// Splits of the inner octahedron along each diagonal, in local edge indices.
pub const OCTAHEDRON_SPLITS: [[[usize; 4]; 4]; 3] = [
    [[2, 4, 0, 1], [2, 4, 1, 5], [2, 4, 5, 3], [2, 4, 3, 0]],
    [[1, 3, 0, 4], [1, 3, 4, 5], [1, 3, 5, 2], [1, 3, 2, 0]],
    [[0, 5, 1, 2], [0, 5, 2, 3], [0, 5, 3, 4], [0, 5, 4, 1]],
];

/// Triangle with facets 1 and 2 split (local facet 2 is the longest edge).
pub const BLUE_RIGHT: [[Slot; 3]; 3] = [
    [V(0), V(1), F(2)],
    [F(2), V(1), F(1)],
    [F(2), F(1), V(2)],
];

/// Triangle with facets 0 and 2 split.
pub const BLUE_LEFT: [[Slot; 3]; 3] = [
    [V(0), F(0), F(2)],
    [F(0), V(1), F(2)],
    [F(2), V(1), V(2)],
];

/// Triangle bisected through the midpoint of facet 2.
pub const GREEN: [[Slot; 3]; 2] = [[V(0), V(1), F(2)], [F(2), V(1), V(2)]];

/// Children of a segment: `(v0, m)`, `(m, v1)`.
pub static SEGMENT_CHILDREN: Lazy<Vec<Vec<Slot>>> =
    Lazy::new(|| tensor_children(CellType::Segment));
/// Children of a quadrilateral, child `k` holding parent vertex `k`.
pub static QUADRILATERAL_CHILDREN: Lazy<Vec<Vec<Slot>>> =
    Lazy::new(|| tensor_children(CellType::Quadrilateral));
/// Children of a hexahedron, child `k` holding parent vertex `k`.
pub static HEXAHEDRON_CHILDREN: Lazy<Vec<Vec<Slot>>> =
    Lazy::new(|| tensor_children(CellType::Hexahedron));

type Lattice = [u8; 3];

fn lattice_point(reference: &[f64], scale: u8) -> Lattice {
    let mut out = [0u8; 3];
    for (o, &x) in out.iter_mut().zip(reference) {
        *o = if x > 0.5 { scale } else { 0 };
    }
    out
}

fn centre_of(points: impl Iterator<Item = Lattice>) -> Lattice {
    let mut sum = [0usize; 3];
    let mut n = 0usize;
    for p in points {
        for (s, &x) in sum.iter_mut().zip(&p) {
            *s += usize::from(x);
        }
        n += 1;
    }
    // centres of tensor-cell entities land on the half lattice
    sum.map(|s| (s / n.max(1)) as u8)
}

/// Octasection templates for tensor-product cells.
///
/// Parent vertices sit on a lattice of spacing two; edge midpoints, facet
/// centres and the element centre fill the odd positions. Child `k` is the
/// parent's reference cell shrunk by half towards vertex `k`, so its local
/// vertex `i` sits at lattice position `r_k + r_i`.
fn tensor_children(cell: CellType) -> Vec<Vec<Slot>> {
    let refs = cell.reference_vertices();
    let dim = cell.dimension();
    let twice = |i: usize| lattice_point(refs[i], 2);

    let mut grid: HashMap<Lattice, Slot> = HashMap::new();
    for i in 0..refs.len() {
        grid.insert(twice(i), Slot::Vertex(i));
    }
    if dim == 3 {
        for (j, edge) in cell.edges().iter().enumerate() {
            grid.insert(centre_of(edge.iter().map(|&i| twice(i))), Slot::Edge(j));
        }
    }
    if dim >= 2 {
        for (k, facet) in cell.facets().iter().enumerate() {
            grid.insert(centre_of(facet.iter().map(|&i| twice(i))), Slot::Facet(k));
        }
    }
    grid.insert(centre_of((0..refs.len()).map(twice)), Slot::Center);

    (0..refs.len())
        .map(|k| {
            let rk = lattice_point(refs[k], 1);
            (0..refs.len())
                .map(|i| {
                    let ri = lattice_point(refs[i], 1);
                    grid[&[rk[0] + ri[0], rk[1] + ri[1], rk[2] + ri[2]]]
                })
                .collect()
        })
        .collect()
}
