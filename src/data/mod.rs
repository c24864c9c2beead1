//! Dense mesh arrays: node coordinates and index tables.
#![warn(missing_docs)]

pub mod connectivity;
pub mod coordinates;

pub use connectivity::Connectivity;
pub use coordinates::Coordinates;
