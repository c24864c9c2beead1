//! Element families: the cell shape, the node layout of higher-order variants
//! and the Lagrange shape functions used by the isoparametric mapping.
//!
//! Node numbering of a mesh follows the layout: vertex nodes first, then one
//! node per facet (`vertex_count + facet`), then one node per element
//! (`vertex_count + facet_count + element`) where the layout asks for them.

use crate::topology::cell_type::CellType;

/// Supported element families.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ElementFamily {
    /// Two-node segment.
    Line1,
    /// Three-node triangle.
    Tri1,
    /// Six-node triangle (vertices, then facet midpoints).
    Tri2,
    /// Four-node quadrilateral.
    Quad1,
    /// Nine-node quadrilateral (vertices, facet midpoints, centre).
    Quad2,
    /// Four-node tetrahedron.
    Tet1,
    /// Eight-node hexahedron.
    Hex1,
}

/// Extra nodes a family places on top of the vertex nodes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NodeLayout {
    /// Nodes attached to every facet.
    pub per_facet: usize,
    /// Nodes attached to every element interior.
    pub per_element: usize,
}

impl NodeLayout {
    /// `true` when only vertex nodes exist.
    pub fn is_vertex_only(&self) -> bool {
        self.per_facet == 0 && self.per_element == 0
    }

    /// Total node count of a mesh with the given entity counts.
    pub fn node_count(&self, vertices: usize, facets: usize, elements: usize) -> usize {
        vertices + self.per_facet * facets + self.per_element * elements
    }
}

impl ElementFamily {
    /// Every family, in declaration order.
    pub const ALL: [ElementFamily; 7] = [
        ElementFamily::Line1,
        ElementFamily::Tri1,
        ElementFamily::Tri2,
        ElementFamily::Quad1,
        ElementFamily::Quad2,
        ElementFamily::Tet1,
        ElementFamily::Hex1,
    ];

    /// Shape of the cells.
    pub fn cell_type(self) -> CellType {
        match self {
            ElementFamily::Line1 => CellType::Segment,
            ElementFamily::Tri1 | ElementFamily::Tri2 => CellType::Triangle,
            ElementFamily::Quad1 | ElementFamily::Quad2 => CellType::Quadrilateral,
            ElementFamily::Tet1 => CellType::Tetrahedron,
            ElementFamily::Hex1 => CellType::Hexahedron,
        }
    }

    /// Polynomial degree of the geometry.
    pub fn degree(self) -> usize {
        match self {
            ElementFamily::Tri2 | ElementFamily::Quad2 => 2,
            _ => 1,
        }
    }

    /// Linear family with the same cell shape.
    pub fn linear(self) -> ElementFamily {
        match self {
            ElementFamily::Tri2 => ElementFamily::Tri1,
            ElementFamily::Quad2 => ElementFamily::Quad1,
            other => other,
        }
    }

    /// Whether meshes of this family use the affine mapping unless told otherwise.
    pub fn is_affine_by_default(self) -> bool {
        matches!(
            self,
            ElementFamily::Line1 | ElementFamily::Tri1 | ElementFamily::Tet1
        )
    }

    pub fn node_layout(self) -> NodeLayout {
        match self {
            ElementFamily::Tri2 => NodeLayout {
                per_facet: 1,
                per_element: 0,
            },
            ElementFamily::Quad2 => NodeLayout {
                per_facet: 1,
                per_element: 1,
            },
            _ => NodeLayout::default(),
        }
    }

    /// Nodes per element: vertices plus the layout's facet and interior nodes.
    pub fn nodes_per_element(self) -> usize {
        let cell = self.cell_type();
        let layout = self.node_layout();
        cell.vertex_count() + layout.per_facet * cell.facets().len() + layout.per_element
    }

    /// Reference coordinates of the element nodes, in local node order.
    pub fn reference_nodes(self) -> Vec<Vec<f64>> {
        let cell = self.cell_type();
        let vertices = cell.reference_vertices();
        let layout = self.node_layout();
        let mut nodes: Vec<Vec<f64>> = vertices.iter().map(|v| v.to_vec()).collect();
        if layout.per_facet > 0 {
            nodes.extend(cell.facets().iter().map(|facet| mean(vertices, facet)));
        }
        if layout.per_element > 0 {
            let all: Vec<usize> = (0..vertices.len()).collect();
            nodes.push(mean(vertices, &all));
        }
        nodes
    }

    /// Values of the nodal shape functions at reference point `x`.
    ///
    /// `x` must have `cell_type().dimension()` components.
    pub fn shape_values(self, x: &[f64]) -> Vec<f64> {
        debug_assert_eq!(x.len(), self.cell_type().dimension());
        match self {
            ElementFamily::Line1 | ElementFamily::Tri1 | ElementFamily::Tet1 => barycentric(x),
            ElementFamily::Tri2 => {
                let l = barycentric(x);
                let mut values: Vec<f64> = l.iter().map(|li| li * (2.0 * li - 1.0)).collect();
                values.extend(
                    CellType::Triangle
                        .facets()
                        .iter()
                        .map(|f| 4.0 * l[f[0]] * l[f[1]]),
                );
                values
            }
            ElementFamily::Quad1 | ElementFamily::Hex1 => self
                .cell_type()
                .reference_vertices()
                .iter()
                .map(|r| {
                    r.iter()
                        .zip(x)
                        .map(|(&rd, &xd)| if rd > 0.5 { xd } else { 1.0 - xd })
                        .product::<f64>()
                })
                .collect(),
            ElementFamily::Quad2 => self
                .reference_nodes()
                .iter()
                .map(|r| {
                    r.iter()
                        .zip(x)
                        .map(|(&rd, &xd)| quadratic_1d(rd, xd))
                        .product::<f64>()
                })
                .collect(),
        }
    }
}

fn mean(points: &[&[f64]], idx: &[usize]) -> Vec<f64> {
    let dim = points.first().map_or(0, |p| p.len());
    let mut m = vec![0.0; dim];
    for &i in idx {
        for (md, x) in m.iter_mut().zip(points[i]) {
            *md += x;
        }
    }
    m.iter_mut().for_each(|v| *v /= idx.len() as f64);
    m
}

fn barycentric(x: &[f64]) -> Vec<f64> {
    let mut l = Vec::with_capacity(x.len() + 1);
    l.push(1.0 - x.iter().sum::<f64>());
    l.extend_from_slice(x);
    l
}

/// 1-D quadratic Lagrange basis on nodes `0, 1/2, 1`, selected by node position.
fn quadratic_1d(node: f64, t: f64) -> f64 {
    if node < 0.25 {
        2.0 * (t - 0.5) * (t - 1.0)
    } else if node < 0.75 {
        4.0 * t * (1.0 - t)
    } else {
        2.0 * t * (t - 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_functions_are_nodal() {
        for family in ElementFamily::ALL {
            let nodes = family.reference_nodes();
            assert_eq!(nodes.len(), family.nodes_per_element(), "{family:?}");
            for (i, node) in nodes.iter().enumerate() {
                let values = family.shape_values(node);
                for (j, v) in values.iter().enumerate() {
                    let expected = if i == j { 1.0 } else { 0.0 };
                    assert!((v - expected).abs() < 1e-12, "{family:?} N{j}({i}) = {v}");
                }
            }
        }
    }

    #[test]
    fn partition_of_unity() {
        let x = [0.2, 0.3, 0.1];
        for family in ElementFamily::ALL {
            let dim = family.cell_type().dimension();
            let sum: f64 = family.shape_values(&x[..dim]).iter().sum();
            assert!((sum - 1.0).abs() < 1e-12, "{family:?}");
        }
    }

    #[test]
    fn quadratic_layouts() {
        assert_eq!(ElementFamily::Tri2.nodes_per_element(), 6);
        assert_eq!(ElementFamily::Quad2.nodes_per_element(), 9);
        assert_eq!(ElementFamily::Quad2.reference_nodes()[8], vec![0.5, 0.5]);
        assert_eq!(ElementFamily::Tri2.linear(), ElementFamily::Tri1);
        assert!(ElementFamily::Hex1.node_layout().is_vertex_only());
    }
}
