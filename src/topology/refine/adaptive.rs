//! Adaptive red/green/blue refinement of triangle meshes.
//!
//! # Algorithm
//! 1. Every triangle is rotated so that its longest edge is local facet 2,
//!    i.e. `(v0, v2)`. Rotation keeps orientation.
//! 2. All facets of the marked triangles are flagged. Then, until nothing
//!    changes, any triangle with facet 0 or facet 1 flagged gets its longest
//!    facet flagged too. The flagged set only grows, so this terminates
//!    after at most one pass per facet.
//! 3. Each triangle is split according to its flagged facets: all three
//!    (red), `{1, 2}` (blue, right), `{0, 2}` (blue, left), `{2}` (green) or
//!    none (kept as is). The closure in step 2 rules out other patterns.
//!
//! Every flagged facet gets exactly one midpoint, numbered in ascending facet
//! order after the existing nodes, so neighbours splitting the same facet
//! share the new vertex and no hanging nodes appear.

use crate::data::connectivity::Connectivity;
use crate::data::coordinates::Coordinates;
use crate::mesh_error::MeshError;
use crate::topology::cell_type::CellType;
use crate::topology::element::ElementFamily;
use crate::topology::entities::build_entities;
use crate::topology::mesh::Mesh;
use crate::topology::refine::templates::{BLUE_LEFT, BLUE_RIGHT, GREEN, Slot, TRIANGLE_CHILDREN};
use crate::topology::refine::uniform::emit_children;

/// Refine the `marked` elements of a [`ElementFamily::Tri1`] mesh and the
/// neighbours needed to keep the mesh conforming.
///
/// Output connectivity lists the untouched elements first (input order,
/// original vertex order), then the red, blue-right, blue-left and green
/// children. An empty `marked` returns a copy of the mesh.
pub fn refine_adaptive(mesh: &Mesh, marked: &[usize]) -> Result<Mesh, MeshError> {
    let family = mesh.family();
    if family != ElementFamily::Tri1 {
        return Err(MeshError::NotImplemented {
            family,
            operation: "adaptive refinement",
        });
    }
    let element_count = mesh.element_count();
    if let Some(&element) = marked.iter().find(|&&e| e >= element_count) {
        return Err(MeshError::ElementIndexOutOfBounds {
            element,
            element_count,
        });
    }
    if marked.is_empty() {
        return Ok(Mesh::from_parts(
            family,
            mesh.coordinates().clone(),
            mesh.cells().clone(),
            mesh.is_affine(),
        ));
    }

    let rotated = longest_edge_last(mesh.coordinates(), mesh.cells());
    let facets = build_entities(&rotated, CellType::Triangle.facets());
    let t2f = &facets.element_entities;

    let mut flagged = vec![false; facets.len()];
    for &e in marked {
        for &f in t2f.row(e) {
            flagged[f] = true;
        }
    }
    close_flags(t2f, &mut flagged);

    let base = mesh.node_count();
    let mut coordinates = mesh.coordinates().clone();
    let mut midpoint = vec![usize::MAX; facets.len()];
    let split: Vec<usize> = (0..facets.len()).filter(|&f| flagged[f]).collect();
    for (rank, &f) in split.iter().enumerate() {
        midpoint[f] = base + rank;
    }
    coordinates.extend_with_means(split.iter().map(|&f| facets.entities.row(f)));

    let mut kept = Vec::new();
    let mut red = Vec::new();
    let mut blue_right = Vec::new();
    let mut blue_left = Vec::new();
    let mut green = Vec::new();
    for (e, row) in t2f.rows().enumerate() {
        match [flagged[row[0]], flagged[row[1]], flagged[row[2]]] {
            [true, true, true] => red.push(e),
            [false, true, true] => blue_right.push(e),
            [true, false, true] => blue_left.push(e),
            [false, false, true] => green.push(e),
            [a, b, false] => {
                debug_assert!(!a && !b, "closure left a flagged short edge");
                kept.push(e);
            }
        }
    }

    let mut cells = Vec::new();
    for &e in &kept {
        cells.extend_from_slice(mesh.cells().row(e));
    }
    let resolve = |e: usize, slot: Slot| match slot {
        Slot::Vertex(i) => rotated.row(e)[i],
        Slot::Facet(k) | Slot::Edge(k) => midpoint[t2f.row(e)[k]],
        Slot::Center => unreachable!("triangle templates have no centre node"),
    };
    emit_children(&mut cells, TRIANGLE_CHILDREN.as_slice(), &red, resolve);
    emit_children(&mut cells, BLUE_RIGHT.as_slice(), &blue_right, resolve);
    emit_children(&mut cells, BLUE_LEFT.as_slice(), &blue_left, resolve);
    emit_children(&mut cells, GREEN.as_slice(), &green, resolve);

    let cells = Connectivity::from_parts(3, cells);
    log::debug!(
        "adaptive refinement: {} marked, {} split edges, red={} blue={} green={} kept={}, {} -> {} elements",
        marked.len(),
        split.len(),
        red.len(),
        blue_right.len() + blue_left.len(),
        green.len(),
        kept.len(),
        element_count,
        cells.len()
    );
    Ok(Mesh::from_parts(family, coordinates, cells, mesh.is_affine()))
}

/// Rotate every triangle cyclically so its longest edge is `(v0, v2)`.
fn longest_edge_last(coordinates: &Coordinates, cells: &Connectivity) -> Connectivity {
    let mut rotated = Vec::with_capacity(cells.as_slice().len());
    for row in cells.rows() {
        let [t0, t1, t2] = [row[0], row[1], row[2]];
        let l01 = coordinates.squared_distance(t0, t1);
        let l12 = coordinates.squared_distance(t1, t2);
        let l02 = coordinates.squared_distance(t0, t2);
        if l01 > l02 && l01 > l12 {
            rotated.extend_from_slice(&[t1, t2, t0]);
        } else if l12 > l01 && l12 > l02 {
            rotated.extend_from_slice(&[t2, t0, t1]);
        } else {
            rotated.extend_from_slice(&[t0, t1, t2]);
        }
    }
    Connectivity::from_parts(3, rotated)
}

/// Flag the longest facet of every triangle with another facet flagged,
/// until a fixed point is reached.
fn close_flags(t2f: &Connectivity, flagged: &mut [bool]) {
    let mut pass = 0usize;
    loop {
        let mut added = 0usize;
        for row in t2f.rows() {
            if (flagged[row[0]] || flagged[row[1]]) && !flagged[row[2]] {
                flagged[row[2]] = true;
                added += 1;
            }
        }
        pass += 1;
        log::trace!("adaptive closure pass {pass}: {added} edges added");
        if added == 0 {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_moves_longest_edge_to_slot_two() {
        let coords = Coordinates::from_points(2, [[0.0, 0.0], [2.0, 0.0], [1.0, 0.5]]).unwrap();
        // longest edge (0,1) is local edge 0
        let cells = Connectivity::from_rows(3, [[0usize, 1, 2]]).unwrap();
        let rotated = longest_edge_last(&coords, &cells);
        assert_eq!(rotated.row(0), &[1, 2, 0]);
    }

    #[test]
    fn closure_reaches_fixed_point() {
        // listed in reverse so each pass only advances one triangle
        let t2f = Connectivity::from_rows(3, [[5usize, 4, 6], [2, 3, 4], [0, 1, 2]]).unwrap();
        let mut flagged = vec![false; 7];
        flagged[0] = true;
        close_flags(&t2f, &mut flagged);
        assert_eq!(flagged, vec![true, false, true, false, true, false, true]);
    }
}
