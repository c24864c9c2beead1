#![cfg_attr(docsrs, feature(doc_cfg))]
//! # mesh-refine
//!
//! mesh-refine is a mesh topology and refinement library for finite-element
//! codes. A [`Mesh`](topology::mesh::Mesh) holds node coordinates and element
//! connectivity for one [`ElementFamily`](topology::element::ElementFamily);
//! facets, edges and facet adjacency are derived on demand and cached.
//!
//! ## Features
//! - Entity derivation (`facets`, `edges`, `t2f`, `t2e`, `f2t`) with lazily
//!   populated, thread-safe caches
//! - Boundary and geometric selection queries
//! - Uniform refinement of lines, triangles, quadrilaterals, tetrahedra and
//!   hexahedra; adaptive red/green/blue refinement of triangles
//! - Affine and isoparametric reference mappings, quadratic families
//!   (`Tri2`, `Quad2`) derived from linear meshes
//! - Serde interchange arrays for external format converters
//!
//! ## Usage
//!
//! ```
//! use mesh_refine::prelude::*;
//!
//! let mesh = Mesh::default_mesh(ElementFamily::Tri1)?;
//! let fine = mesh.refined(Refinement::Uniform(2))?;
//! assert_eq!(fine.element_count(), 32);
//! assert_eq!(fine.boundary_facets().len(), 16);
//! # Ok::<(), MeshError>(())
//! ```
//!
//! ## Validation
//!
//! Construction always checks array shapes and index bounds. Non-manifold
//! facets and degenerate elements are only reported when asked for through
//! [`TopologyValidationOptions`](topology::validation::TopologyValidationOptions).
//! The library logs through the `log` facade and installs no logger.

pub mod algs;
pub mod data;
pub mod geometry;
pub mod mesh_error;
pub mod topology;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::data::connectivity::Connectivity;
    pub use crate::data::coordinates::Coordinates;
    pub use crate::geometry::mapping::{GeometryMapping, MappedPoints, MeshMapping};
    pub use crate::mesh_error::MeshError;
    pub use crate::topology::cell_type::CellType;
    pub use crate::topology::element::ElementFamily;
    pub use crate::topology::mesh::{Mesh, MeshData, MeshOptions};
    pub use crate::topology::refine::Refinement;
    pub use crate::topology::validation::{NonManifoldHandling, TopologyValidationOptions};
}
