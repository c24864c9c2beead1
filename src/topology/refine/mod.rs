//! Mesh refinement: uniform subdivision for every linear family and
//! adaptive red/green/blue refinement for triangles.
//!
//! # Expected invariants
//! - The input mesh is conforming and manifold: every facet has one or two
//!   owners. Run [`Mesh::validate`] first when that is in doubt.
//! - Refinement never mutates its input; the result is a fresh [`Mesh`] with
//!   empty topology caches.
//! - Children inherit the orientation of their parent.

pub mod adaptive;
pub mod templates;
pub mod uniform;

pub use adaptive::refine_adaptive;
pub use uniform::refine_uniform;

use crate::mesh_error::MeshError;
use crate::topology::mesh::Mesh;

/// How [`Mesh::refined`] should refine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Refinement<'a> {
    /// Apply this many uniform passes.
    Uniform(usize),
    /// Refine these elements adaptively (triangles only).
    Adaptive(&'a [usize]),
}

/// Refine `mesh` as requested.
pub fn refine(mesh: &Mesh, refinement: Refinement<'_>) -> Result<Mesh, MeshError> {
    match refinement {
        Refinement::Uniform(times) => {
            let mut current = mesh.clone();
            for _ in 0..times {
                current = refine_uniform(&current)?;
            }
            Ok(current)
        }
        Refinement::Adaptive(marked) => refine_adaptive(mesh, marked),
    }
}
