//! Cell shape metadata: reference dimension, local vertices and the local
//! facet/edge vertex patterns every element family is built on.
//!
//! # Local numbering
//! - [`CellType::Segment`]: vertices `(0)`, `(1)`; facets are the two vertices.
//! - [`CellType::Triangle`]: facets `(0,1) (1,2) (0,2)`; facet 2 is opposite
//!   vertex 1.
//! - [`CellType::Quadrilateral`]: counter-clockwise `(0,0) (1,0) (1,1) (0,1)`,
//!   facets `(0,1) (1,2) (2,3) (0,3)`.
//! - [`CellType::Tetrahedron`]: facets `(0,1,2) (0,1,3) (0,2,3) (1,2,3)`, edges
//!   `(0,1) (1,2) (0,2) (0,3) (1,3) (2,3)`.
//! - [`CellType::Hexahedron`]: vertex 0 at `(1,1,1)`, its three neighbours
//!   `1, 2, 3` one unit away, `7` at the origin. Facet rows are listed in
//!   cyclic order so consecutive vertices are facet edges.
//!
//! In two dimensions the edges are the facets.

/// Common cell shapes for mesh elements.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum CellType {
    /// 0D vertex.
    Vertex,
    /// 1D segment.
    Segment,
    /// 2D simplex (triangle).
    Triangle,
    /// 2D tensor-product cell (quad).
    Quadrilateral,
    /// 3D simplex (tet).
    Tetrahedron,
    /// 3D tensor-product cell (hex).
    Hexahedron,
}

impl Default for CellType {
    fn default() -> Self {
        CellType::Vertex
    }
}

const VERTEX_FACETS: &[&[usize]] = &[];
const SEGMENT_FACETS: &[&[usize]] = &[&[0], &[1]];
const SEGMENT_EDGES: &[&[usize]] = &[&[0, 1]];
const TRIANGLE_FACETS: &[&[usize]] = &[&[0, 1], &[1, 2], &[0, 2]];
const QUADRILATERAL_FACETS: &[&[usize]] = &[&[0, 1], &[1, 2], &[2, 3], &[0, 3]];
const TETRAHEDRON_FACETS: &[&[usize]] = &[&[0, 1, 2], &[0, 1, 3], &[0, 2, 3], &[1, 2, 3]];
const TETRAHEDRON_EDGES: &[&[usize]] = &[&[0, 1], &[1, 2], &[0, 2], &[0, 3], &[1, 3], &[2, 3]];
const HEXAHEDRON_FACETS: &[&[usize]] = &[
    &[0, 1, 4, 2],
    &[0, 2, 6, 3],
    &[0, 3, 5, 1],
    &[2, 4, 7, 6],
    &[1, 5, 7, 4],
    &[3, 6, 7, 5],
];
const HEXAHEDRON_EDGES: &[&[usize]] = &[
    &[0, 1],
    &[0, 2],
    &[0, 3],
    &[1, 4],
    &[1, 5],
    &[2, 4],
    &[2, 6],
    &[3, 5],
    &[3, 6],
    &[4, 7],
    &[5, 7],
    &[6, 7],
];

const VERTEX_REFERENCE: &[&[f64]] = &[&[]];
const SEGMENT_REFERENCE: &[&[f64]] = &[&[0.0], &[1.0]];
const TRIANGLE_REFERENCE: &[&[f64]] = &[&[0.0, 0.0], &[1.0, 0.0], &[0.0, 1.0]];
const QUADRILATERAL_REFERENCE: &[&[f64]] = &[&[0.0, 0.0], &[1.0, 0.0], &[1.0, 1.0], &[0.0, 1.0]];
const TETRAHEDRON_REFERENCE: &[&[f64]] = &[
    &[0.0, 0.0, 0.0],
    &[1.0, 0.0, 0.0],
    &[0.0, 1.0, 0.0],
    &[0.0, 0.0, 1.0],
];
const HEXAHEDRON_REFERENCE: &[&[f64]] = &[
    &[1.0, 1.0, 1.0],
    &[1.0, 1.0, 0.0],
    &[1.0, 0.0, 1.0],
    &[0.0, 1.0, 1.0],
    &[1.0, 0.0, 0.0],
    &[0.0, 1.0, 0.0],
    &[0.0, 0.0, 1.0],
    &[0.0, 0.0, 0.0],
];

impl CellType {
    /// Returns the topological dimension of the cell.
    pub fn dimension(self) -> usize {
        match self {
            CellType::Vertex => 0,
            CellType::Segment => 1,
            CellType::Triangle | CellType::Quadrilateral => 2,
            CellType::Tetrahedron | CellType::Hexahedron => 3,
        }
    }

    /// Number of vertices of the cell.
    pub fn vertex_count(self) -> usize {
        match self {
            CellType::Vertex => 1,
            CellType::Segment => 2,
            CellType::Triangle => 3,
            CellType::Quadrilateral | CellType::Tetrahedron => 4,
            CellType::Hexahedron => 8,
        }
    }

    /// `true` for simplices, whose geometric map from the reference cell is affine.
    pub fn is_simplex(self) -> bool {
        matches!(
            self,
            CellType::Vertex | CellType::Segment | CellType::Triangle | CellType::Tetrahedron
        )
    }

    /// Local vertex patterns of the codimension-1 entities.
    pub fn facets(self) -> &'static [&'static [usize]] {
        match self {
            CellType::Vertex => VERTEX_FACETS,
            CellType::Segment => SEGMENT_FACETS,
            CellType::Triangle => TRIANGLE_FACETS,
            CellType::Quadrilateral => QUADRILATERAL_FACETS,
            CellType::Tetrahedron => TETRAHEDRON_FACETS,
            CellType::Hexahedron => HEXAHEDRON_FACETS,
        }
    }

    /// Local vertex patterns of the one-dimensional entities.
    pub fn edges(self) -> &'static [&'static [usize]] {
        match self {
            CellType::Vertex => VERTEX_FACETS,
            CellType::Segment => SEGMENT_EDGES,
            CellType::Triangle => TRIANGLE_FACETS,
            CellType::Quadrilateral => QUADRILATERAL_FACETS,
            CellType::Tetrahedron => TETRAHEDRON_EDGES,
            CellType::Hexahedron => HEXAHEDRON_EDGES,
        }
    }

    /// Shape of the facets, i.e. the boundary cell type.
    pub fn facet_type(self) -> CellType {
        match self {
            CellType::Vertex | CellType::Segment => CellType::Vertex,
            CellType::Triangle | CellType::Quadrilateral => CellType::Segment,
            CellType::Tetrahedron => CellType::Triangle,
            CellType::Hexahedron => CellType::Quadrilateral,
        }
    }

    /// Vertex coordinates of the reference cell, in local order.
    pub fn reference_vertices(self) -> &'static [&'static [f64]] {
        match self {
            CellType::Vertex => VERTEX_REFERENCE,
            CellType::Segment => SEGMENT_REFERENCE,
            CellType::Triangle => TRIANGLE_REFERENCE,
            CellType::Quadrilateral => QUADRILATERAL_REFERENCE,
            CellType::Tetrahedron => TETRAHEDRON_REFERENCE,
            CellType::Hexahedron => HEXAHEDRON_REFERENCE,
        }
    }
}
