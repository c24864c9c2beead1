//! Cell quality utilities on explicit vertex coordinates.
//!
//! # Coordinate layout
//! Vertices are slices of length 1, 2 or 3 in local vertex order (see
//! [`CellType`]). Missing components are treated as zero.
//!
//! # Sign convention
//! Signed measures are positive when the cell has the orientation of its
//! reference cell. Cells embedded in a higher-dimensional space (a triangle
//! in 3-D, say) have no orientation; their measure is reported unsigned.
//!
//! # Examples
//! ```rust
//! use mesh_refine::geometry::quality::signed_measure;
//! use mesh_refine::topology::cell_type::CellType;
//!
//! let tri: [&[f64]; 3] = [&[0.0, 0.0], &[1.0, 0.0], &[0.0, 1.0]];
//! assert_eq!(signed_measure(CellType::Triangle, &tri), 0.5);
//!
//! let flipped: [&[f64]; 3] = [&[0.0, 0.0], &[0.0, 1.0], &[1.0, 0.0]];
//! assert!(signed_measure(CellType::Triangle, &flipped) < 0.0);
//! ```

use crate::topology::cell_type::CellType;
use crate::topology::mesh::Mesh;

/// Signed measure of a cell; see the module docs for the sign convention.
pub fn signed_measure(cell_type: CellType, vertices: &[&[f64]]) -> f64 {
    debug_assert_eq!(vertices.len(), cell_type.vertex_count());
    let dim = vertices.first().map_or(0, |v| v.len());
    let v: Vec<[f64; 3]> = vertices.iter().map(|p| pad(p)).collect();
    match cell_type {
        CellType::Vertex => 0.0,
        CellType::Segment => {
            if dim == 1 {
                v[1][0] - v[0][0]
            } else {
                norm(sub(v[1], v[0]))
            }
        }
        CellType::Triangle => {
            if dim <= 2 {
                signed_area_xy(v[0], v[1], v[2])
            } else {
                0.5 * norm(cross(sub(v[1], v[0]), sub(v[2], v[0])))
            }
        }
        CellType::Quadrilateral => {
            if dim <= 2 {
                signed_area_xy(v[0], v[1], v[2]) + signed_area_xy(v[0], v[2], v[3])
            } else {
                0.5 * norm(cross(sub(v[1], v[0]), sub(v[2], v[0])))
                    + 0.5 * norm(cross(sub(v[2], v[0]), sub(v[3], v[0])))
            }
        }
        CellType::Tetrahedron => signed_volume(v[0], v[1], v[2], v[3]),
        CellType::Hexahedron => hex_centre_jacobian(&v),
    }
}

/// Signed measure of every element of `mesh`, from its vertex coordinates.
pub fn element_measures(mesh: &Mesh) -> Vec<f64> {
    let cell_type = mesh.cell_type();
    let coordinates = mesh.coordinates();
    mesh.cells()
        .rows()
        .map(|row| {
            let points: Vec<&[f64]> = row.iter().map(|&v| coordinates.point(v)).collect();
            signed_measure(cell_type, &points)
        })
        .collect()
}

fn pad(p: &[f64]) -> [f64; 3] {
    let mut out = [0.0; 3];
    for (o, x) in out.iter_mut().zip(p) {
        *o = *x;
    }
    out
}

fn signed_area_xy(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> f64 {
    let abx = b[0] - a[0];
    let aby = b[1] - a[1];
    let acx = c[0] - a[0];
    let acy = c[1] - a[1];
    0.5 * (abx * acy - aby * acx)
}

fn signed_volume(a: [f64; 3], b: [f64; 3], c: [f64; 3], d: [f64; 3]) -> f64 {
    let ab = sub(b, a);
    let ac = sub(c, a);
    let ad = sub(d, a);
    dot(ab, cross(ac, ad)) / 6.0
}

/// Jacobian determinant of the trilinear map at the reference centre. Exact
/// volume for parallelepipeds, since the reference cube has unit volume.
fn hex_centre_jacobian(v: &[[f64; 3]]) -> f64 {
    let refs = CellType::Hexahedron.reference_vertices();
    let mut jac = [[0.0; 3]; 3];
    for (x, r) in v.iter().zip(refs) {
        for (d, &rd) in r.iter().enumerate() {
            let dn = if rd > 0.5 { 0.25 } else { -0.25 };
            for (row, xc) in jac.iter_mut().zip(x) {
                row[d] += dn * xc;
            }
        }
    }
    let cols = [
        [jac[0][0], jac[1][0], jac[2][0]],
        [jac[0][1], jac[1][1], jac[2][1]],
        [jac[0][2], jac[1][2], jac[2][2]],
    ];
    dot(cols[0], cross(cols[1], cols[2]))
}

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn norm(a: [f64; 3]) -> f64 {
    dot(a, a).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_cells_have_positive_measure() {
        let expected = [
            (CellType::Segment, 1.0),
            (CellType::Triangle, 0.5),
            (CellType::Quadrilateral, 1.0),
            (CellType::Tetrahedron, 1.0 / 6.0),
            (CellType::Hexahedron, 1.0),
        ];
        for (cell, measure) in expected {
            let verts = cell.reference_vertices();
            let m = signed_measure(cell, verts);
            assert!((m - measure).abs() < 1e-12, "{cell:?}: {m}");
        }
    }

    #[test]
    fn scaled_hexahedron_volume() {
        let verts: Vec<Vec<f64>> = CellType::Hexahedron
            .reference_vertices()
            .iter()
            .map(|r| vec![2.0 * r[0], 3.0 * r[1], 0.5 * r[2]])
            .collect();
        let refs: Vec<&[f64]> = verts.iter().map(|v| v.as_slice()).collect();
        assert!((signed_measure(CellType::Hexahedron, &refs) - 3.0).abs() < 1e-12);
    }
}
