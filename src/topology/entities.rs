//! Entity derivation: unique facets/edges from element connectivity, and the
//! inverse entity → element adjacency.
//!
//! Both passes walk the incidence stream pattern-major: every element's
//! local entity 0, then every element's local entity 1, and so on. Entity
//! numbering and the owner recorded in each adjacency slot follow that order.

use crate::data::connectivity::Connectivity;
use hashbrown::HashMap;

/// Sentinel stored in the second owner slot of boundary entities.
pub const NO_ELEMENT: usize = usize::MAX;

/// Canonical key of an entity with up to four vertices: sorted, padded with
/// `usize::MAX`.
type EntityKey = [usize; 4];

fn canonical_key(vertices: &[usize]) -> EntityKey {
    debug_assert!(vertices.len() <= 4);
    let mut key = [usize::MAX; 4];
    key[..vertices.len()].copy_from_slice(vertices);
    key.sort_unstable();
    key
}

/// Deduplicated entity table plus the element → entity map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntitySet {
    /// One row per unique entity, vertex order of its first occurrence.
    pub entities: Connectivity,
    /// One row per element, the global entity index of every local pattern.
    pub element_entities: Connectivity,
}

impl EntitySet {
    /// Number of unique entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Build the unique entities described by `patterns` (local vertex positions)
/// over every element of `cells`.
///
/// All patterns must have the same length, at most four.
pub fn build_entities(cells: &Connectivity, patterns: &[&[usize]]) -> EntitySet {
    let element_count = cells.len();
    let width = patterns.first().map_or(0, |p| p.len());
    debug_assert!(patterns.iter().all(|p| p.len() == width));

    let mut lookup: HashMap<EntityKey, usize> =
        HashMap::with_capacity(element_count * patterns.len());
    let mut rows: Vec<usize> = Vec::new();
    let mut element_entities = vec![0usize; element_count * patterns.len()];
    let mut candidate = Vec::with_capacity(width);

    for (k, pattern) in patterns.iter().enumerate() {
        for (e, cell) in cells.rows().enumerate() {
            candidate.clear();
            candidate.extend(pattern.iter().map(|&local| cell[local]));
            let next = lookup.len();
            let index = *lookup.entry(canonical_key(&candidate)).or_insert_with(|| {
                rows.extend_from_slice(&candidate);
                next
            });
            element_entities[e * patterns.len() + k] = index;
        }
    }

    log::trace!(
        "built {} entities of width {} from {} elements",
        lookup.len(),
        width,
        element_count
    );

    EntitySet {
        entities: Connectivity::from_parts(width.max(1), rows),
        element_entities: Connectivity::from_parts(patterns.len().max(1), element_entities),
    }
}

/// Entity → element adjacency: the first and last owner of every entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityAdjacency {
    owners: Vec<[usize; 2]>,
}

impl EntityAdjacency {
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// First owning element of entity `i`.
    #[inline]
    pub fn first(&self, i: usize) -> usize {
        self.owners[i][0]
    }

    /// Second owning element of entity `i`, `None` on the boundary.
    #[inline]
    pub fn second(&self, i: usize) -> Option<usize> {
        match self.owners[i][1] {
            NO_ELEMENT => None,
            e => Some(e),
        }
    }

    /// `true` when entity `i` has a single owner.
    #[inline]
    pub fn is_boundary(&self, i: usize) -> bool {
        self.owners[i][1] == NO_ELEMENT
    }

    /// Raw owner pairs; the second slot holds [`NO_ELEMENT`] on the boundary.
    pub fn as_slice(&self) -> &[[usize; 2]] {
        &self.owners
    }
}

/// Invert an element → entity map.
///
/// An entity owned by more than two elements gets its first and last owner
/// recorded and the others dropped; run the non-manifold check of
/// [`crate::topology::validation`] to detect that case.
pub fn build_inverse(
    element_count: usize,
    element_entities: &Connectivity,
    entity_count: usize,
) -> EntityAdjacency {
    debug_assert_eq!(element_entities.len(), element_count);
    let mut owners = vec![[NO_ELEMENT, NO_ELEMENT]; entity_count];
    for k in 0..element_entities.width() {
        for (e, entity) in element_entities.column(k).enumerate() {
            let slot = &mut owners[entity];
            if slot[0] == NO_ELEMENT {
                slot[0] = e;
            }
            slot[1] = e;
        }
    }
    for slot in &mut owners {
        if slot[0] == slot[1] {
            slot[1] = NO_ELEMENT;
        }
    }
    EntityAdjacency { owners }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::cell_type::CellType;

    fn two_triangles() -> Connectivity {
        Connectivity::from_rows(3, [[0usize, 1, 2], [1, 3, 2]]).unwrap()
    }

    #[test]
    fn shared_edge_is_deduplicated() {
        let set = build_entities(&two_triangles(), CellType::Triangle.facets());
        assert_eq!(set.len(), 5);
        // pattern-major: (0,1) (1,3) (1,2) (3,2) (0,2)
        assert_eq!(set.entities.row(0), &[0, 1]);
        assert_eq!(set.entities.row(1), &[1, 3]);
        assert_eq!(set.entities.row(2), &[1, 2]);
        assert_eq!(set.entities.row(3), &[3, 2]);
        assert_eq!(set.entities.row(4), &[0, 2]);
        assert_eq!(set.element_entities.row(0), &[0, 2, 4]);
        assert_eq!(set.element_entities.row(1), &[1, 3, 2]);
    }

    #[test]
    fn inverse_marks_boundary() {
        let set = build_entities(&two_triangles(), CellType::Triangle.facets());
        let adj = build_inverse(2, &set.element_entities, set.len());
        let shared = set.element_entities.row(0)[1];
        assert_eq!(adj.first(shared), 0);
        assert_eq!(adj.second(shared), Some(1));
        let boundary: Vec<usize> = (0..adj.len()).filter(|&i| adj.is_boundary(i)).collect();
        assert_eq!(boundary.len(), 4);
        assert!(!boundary.contains(&shared));
    }

    #[test]
    fn keys_ignore_local_order() {
        assert_eq!(canonical_key(&[3, 1, 2]), canonical_key(&[2, 3, 1]));
        assert_ne!(canonical_key(&[0, 1]), canonical_key(&[0, 1, 2]));
    }
}
