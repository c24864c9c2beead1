//! Mesh topology: cell shapes, element families, entity derivation and the
//! [`Mesh`](mesh::Mesh) value with its refinement passes.
//!
//! Most users will build a [`mesh::Mesh`] and query it; the entity builders
//! in [`entities`] are exposed for callers holding raw connectivity.

pub mod adapt;
pub mod cache;
pub mod cell_type;
pub mod element;
pub mod entities;
pub mod mesh;
pub mod refine;
pub mod validation;

pub use cell_type::CellType;
pub use element::ElementFamily;
pub use mesh::Mesh;
