//! Mesh queries built on the cached topology.

pub mod boundary;
pub mod selection;

pub use boundary::BoundaryClassification;
