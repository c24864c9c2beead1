//! MeshError: Unified error type for mesh-refine public APIs
//!
//! Every fallible operation in the crate returns `Result<_, MeshError>`.
//! Non-manifold input is only reported when validation asks for it; see
//! [`crate::topology::validation`].

use crate::topology::cell_type::CellType;
use crate::topology::element::ElementFamily;
use thiserror::Error;

/// Unified error type for mesh-refine operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// Coordinate arrays need at least one spatial component per node.
    #[error("coordinate dimension must be non-zero")]
    ZeroDimension,
    /// The flat coordinate array does not split into whole nodes.
    #[error("coordinate array of length {len} is not a multiple of dimension {dimension}")]
    CoordinateLengthMismatch { dimension: usize, len: usize },
    /// Index tables need a non-zero row width.
    #[error("connectivity row width must be non-zero")]
    ZeroWidth,
    /// The flat index array does not split into whole rows.
    #[error("connectivity of length {len} is not a multiple of row width {width}")]
    ConnectivityLengthMismatch { width: usize, len: usize },
    /// Connectivity rows do not have the node count the family expects.
    #[error("{family:?} expects {expected} nodes per element, found {found}")]
    NodesPerElementMismatch {
        family: ElementFamily,
        expected: usize,
        found: usize,
    },
    /// An element references a node that has no coordinates.
    #[error("element {element} references node {index}, but only {node_count} nodes exist")]
    VertexIndexOutOfBounds {
        element: usize,
        index: usize,
        node_count: usize,
    },
    /// A higher-order mesh lacks coordinates for its facet or interior nodes.
    #[error("{family:?} mesh needs {expected} nodes, coordinates hold {found}")]
    MissingNodes {
        family: ElementFamily,
        expected: usize,
        found: usize,
    },
    /// An element has (numerically) zero measure.
    #[error("element {element} is degenerate")]
    DegenerateElement { element: usize },
    /// An element index passed by the caller is not part of the mesh.
    #[error("element index {element} out of bounds for mesh with {element_count} elements")]
    ElementIndexOutOfBounds { element: usize, element_count: usize },
    /// A facet index passed by the caller is not part of the mesh.
    #[error("facet index {facet} out of bounds for mesh with {facet_count} facets")]
    FacetIndexOutOfBounds { facet: usize, facet_count: usize },
    /// A facet is shared by more than two elements.
    #[error("non-manifold {cell_type:?} entity {entity}: {incident_elements} incident elements")]
    NonManifoldEntity {
        entity: usize,
        cell_type: CellType,
        incident_elements: usize,
    },
    /// The requested operation has no implementation for this family.
    #[error("{operation} is not implemented for {family:?}")]
    NotImplemented {
        family: ElementFamily,
        operation: &'static str,
    },
    /// Connectivity of one family cannot be reused for another family.
    #[error("cannot derive a {to:?} mesh from a {from:?} mesh: cell shapes differ")]
    FamilyMismatch {
        from: ElementFamily,
        to: ElementFamily,
    },
    /// An operand's length does not match the spatial dimension.
    #[error("operand has {found} components, mesh dimension is {expected}")]
    DimensionMismatch { expected: usize, found: usize },
    /// A data array does not have one value per element or node.
    #[error("expected {expected} values, found {found}")]
    DataLengthMismatch { expected: usize, found: usize },
    /// Inconsistent mesh configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}
