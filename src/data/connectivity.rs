//! Dense index tables.
//!
//! A [`Connectivity`] stores one row of node indices per item (element,
//! facet, edge) with a fixed row width. Element connectivity, entity tables
//! and element-to-entity maps all use this layout.

use crate::mesh_error::MeshError;
use std::slice::ChunksExact;

/// Row-major table of indices with a fixed row width.
///
/// Deserialization goes through [`Connectivity::try_new`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawConnectivity")]
pub struct Connectivity {
    width: usize,
    indices: Vec<usize>,
}

#[derive(serde::Deserialize)]
struct RawConnectivity {
    width: usize,
    indices: Vec<usize>,
}

impl TryFrom<RawConnectivity> for Connectivity {
    type Error = MeshError;

    fn try_from(raw: RawConnectivity) -> Result<Self, Self::Error> {
        Self::try_new(raw.width, raw.indices)
    }
}

impl Connectivity {
    /// Wrap a flat index array, validating that it splits into whole rows.
    pub fn try_new(width: usize, indices: Vec<usize>) -> Result<Self, MeshError> {
        if width == 0 {
            return Err(MeshError::ZeroWidth);
        }
        if indices.len() % width != 0 {
            return Err(MeshError::ConnectivityLengthMismatch {
                width,
                len: indices.len(),
            });
        }
        Ok(Self { width, indices })
    }

    /// Build a table from rows; every row must have length `width`.
    pub fn from_rows<I, R>(width: usize, rows: I) -> Result<Self, MeshError>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[usize]>,
    {
        let mut indices = Vec::new();
        for row in rows {
            let row = row.as_ref();
            if row.len() != width {
                return Err(MeshError::ConnectivityLengthMismatch {
                    width,
                    len: row.len(),
                });
            }
            indices.extend_from_slice(row);
        }
        Self::try_new(width, indices)
    }

    /// Internal constructor for tables whose shape is correct by construction.
    pub(crate) fn from_parts(width: usize, indices: Vec<usize>) -> Self {
        debug_assert!(width > 0 && indices.len() % width == 0);
        Self { width, indices }
    }

    /// Number of indices per row.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len() / self.width
    }

    /// `true` if the table has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Row `i`.
    ///
    /// # Panics
    /// Panics if `i >= self.len()`.
    #[inline]
    pub fn row(&self, i: usize) -> &[usize] {
        &self.indices[i * self.width..(i + 1) * self.width]
    }

    /// Row `i`, or `None` when out of range.
    #[inline]
    pub fn get(&self, i: usize) -> Option<&[usize]> {
        self.indices.get(i * self.width..(i + 1) * self.width)
    }

    /// Iterate over rows.
    #[inline]
    pub fn rows(&self) -> ChunksExact<'_, usize> {
        self.indices.chunks_exact(self.width)
    }

    /// Column `j` across all rows.
    pub fn column(&self, j: usize) -> impl Iterator<Item = usize> + '_ {
        self.rows().map(move |row| row[j])
    }

    /// Largest index in the table.
    pub fn max_index(&self) -> Option<usize> {
        self.indices.iter().copied().max()
    }

    /// Flat, row-major view of all indices.
    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    /// Consumes the table and returns the flat index array.
    pub fn into_raw(self) -> Vec<usize> {
        self.indices
    }

    /// New table holding the selected columns of every row, in the given order.
    pub(crate) fn select_columns(&self, columns: &[usize]) -> Self {
        let mut indices = Vec::with_capacity(self.len() * columns.len());
        for row in self.rows() {
            indices.extend(columns.iter().map(|&c| row[c]));
        }
        Self::from_parts(columns.len(), indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_ragged_input() {
        assert_eq!(
            Connectivity::try_new(3, vec![0, 1, 2, 3]),
            Err(MeshError::ConnectivityLengthMismatch { width: 3, len: 4 })
        );
        assert_eq!(Connectivity::try_new(0, vec![]), Err(MeshError::ZeroWidth));
        assert!(Connectivity::from_rows(2, [[0usize, 1, 2]]).is_err());
    }

    #[test]
    fn rows_and_columns() {
        let t = Connectivity::from_rows(3, [[0usize, 1, 2], [1, 3, 2]]).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.row(1), &[1, 3, 2]);
        assert_eq!(t.column(1).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(t.max_index(), Some(3));
        assert_eq!(t.get(2), None);
        let sub = t.select_columns(&[2, 0]);
        assert_eq!(sub.as_slice(), &[2, 0, 2, 1]);
    }

    #[test]
    fn deserialization_checks_shape() {
        let zero = serde_json::from_str::<Connectivity>(r#"{"width":0,"indices":[]}"#);
        assert!(zero.is_err());
        let ragged = serde_json::from_str::<Connectivity>(r#"{"width":2,"indices":[0,1,2]}"#);
        assert!(ragged.is_err());

        let t = Connectivity::try_new(2, vec![0, 1, 1, 2]).unwrap();
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(serde_json::from_str::<Connectivity>(&json).unwrap(), t);
    }
}
