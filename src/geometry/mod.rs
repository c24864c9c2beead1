//! Geometry utilities for mesh-refine.
//!
//! Element measures and the reference mappings.

pub mod mapping;
pub mod quality;
