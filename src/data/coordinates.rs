//! Geometry/coordinates storage for mesh nodes.
//!
//! Coordinates are stored densely, `dimension` consecutive values per node.

use crate::mesh_error::MeshError;
use std::slice::ChunksExact;

/// Node coordinates with an attached spatial dimension.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawCoordinates")]
pub struct Coordinates {
    dimension: usize,
    values: Vec<f64>,
}

#[derive(serde::Deserialize)]
struct RawCoordinates {
    dimension: usize,
    values: Vec<f64>,
}

impl TryFrom<RawCoordinates> for Coordinates {
    type Error = MeshError;

    fn try_from(raw: RawCoordinates) -> Result<Self, Self::Error> {
        Self::try_new(raw.dimension, raw.values)
    }
}

impl Coordinates {
    /// Wrap a flat coordinate array.
    ///
    /// `values.len()` must be a multiple of `dimension`.
    pub fn try_new(dimension: usize, values: Vec<f64>) -> Result<Self, MeshError> {
        if dimension == 0 {
            return Err(MeshError::ZeroDimension);
        }
        if values.len() % dimension != 0 {
            return Err(MeshError::CoordinateLengthMismatch {
                dimension,
                len: values.len(),
            });
        }
        Ok(Self { dimension, values })
    }

    /// Build coordinates from per-node slices.
    pub fn from_points<I, P>(dimension: usize, points: I) -> Result<Self, MeshError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[f64]>,
    {
        let mut values = Vec::new();
        for point in points {
            let point = point.as_ref();
            if point.len() != dimension {
                return Err(MeshError::DimensionMismatch {
                    expected: dimension,
                    found: point.len(),
                });
            }
            values.extend_from_slice(point);
        }
        Self::try_new(dimension, values)
    }

    pub(crate) fn from_parts(dimension: usize, values: Vec<f64>) -> Self {
        debug_assert!(dimension > 0 && values.len() % dimension == 0);
        Self { dimension, values }
    }

    /// Returns the spatial dimension per node.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len() / self.dimension
    }

    /// `true` if there are no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Coordinates of node `i`.
    ///
    /// # Panics
    /// Panics if `i >= self.len()`.
    #[inline]
    pub fn point(&self, i: usize) -> &[f64] {
        &self.values[i * self.dimension..(i + 1) * self.dimension]
    }

    /// Iterate over nodes.
    #[inline]
    pub fn iter(&self) -> ChunksExact<'_, f64> {
        self.values.chunks_exact(self.dimension)
    }

    /// Flat, node-major view of all coordinates.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Consumes the wrapper and returns the flat coordinate array.
    pub fn into_raw(self) -> Vec<f64> {
        self.values
    }

    /// Arithmetic mean of the given nodes.
    pub fn mean_of(&self, nodes: &[usize]) -> Vec<f64> {
        let mut mean = vec![0.0; self.dimension];
        for &n in nodes {
            for (m, x) in mean.iter_mut().zip(self.point(n)) {
                *m += x;
            }
        }
        let scale = 1.0 / nodes.len().max(1) as f64;
        mean.iter_mut().for_each(|m| *m *= scale);
        mean
    }

    /// Squared Euclidean distance between nodes `a` and `b` over all components.
    pub fn squared_distance(&self, a: usize, b: usize) -> f64 {
        self.point(a)
            .iter()
            .zip(self.point(b))
            .map(|(x, y)| (x - y) * (x - y))
            .sum()
    }

    /// Append the mean of every row of `groups` as a new node.
    pub(crate) fn extend_with_means<'a, I>(&mut self, groups: I)
    where
        I: IntoIterator<Item = &'a [usize]>,
    {
        for group in groups {
            let mean = self.mean_of(group);
            self.values.extend_from_slice(&mean);
        }
    }

    /// New coordinates with `f(component, value)` applied to every value.
    pub(crate) fn map_components(&self, f: impl Fn(usize, f64) -> f64) -> Self {
        let values = self
            .values
            .iter()
            .enumerate()
            .map(|(k, &x)| f(k % self.dimension, x))
            .collect();
        Self::from_parts(self.dimension, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_dimension() {
        assert_eq!(Coordinates::try_new(0, vec![]), Err(MeshError::ZeroDimension));
        assert_eq!(
            Coordinates::try_new(2, vec![0.0, 1.0, 2.0]),
            Err(MeshError::CoordinateLengthMismatch { dimension: 2, len: 3 })
        );
    }

    #[test]
    fn means_and_distances() {
        let mut c = Coordinates::from_points(2, [[0.0, 0.0], [2.0, 0.0], [2.0, 2.0]]).unwrap();
        assert_eq!(c.mean_of(&[0, 1]), vec![1.0, 0.0]);
        assert_eq!(c.squared_distance(0, 2), 8.0);
        c.extend_with_means([&[1usize, 2][..]]);
        assert_eq!(c.len(), 4);
        assert_eq!(c.point(3), &[2.0, 1.0]);
    }

    #[test]
    fn deserialization_checks_dimension() {
        let zero = serde_json::from_str::<Coordinates>(r#"{"dimension":0,"values":[]}"#);
        assert!(zero.is_err());
        let ragged = serde_json::from_str::<Coordinates>(r#"{"dimension":2,"values":[0.0]}"#);
        assert!(ragged.is_err());

        let c = serde_json::from_str::<Coordinates>(r#"{"dimension":2,"values":[0.0,1.0]}"#)
            .unwrap();
        assert_eq!(c.len(), 1);
    }
}
