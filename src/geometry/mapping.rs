//! Reference-to-physical mappings.
//!
//! A mapping takes points of the reference element (or of a reference facet)
//! to physical coordinates inside chosen elements. Two implementations exist:
//! [`AffineMapping`] for simplices, `x = x0 + J X`, and
//! [`IsoparametricMapping`], which evaluates the Lagrange shape functions of
//! the mesh family on the element nodes. [`Mesh::mapping`] picks one by the
//! mesh's `affine` flag.

use crate::data::connectivity::Connectivity;
use crate::data::coordinates::Coordinates;
use crate::mesh_error::MeshError;
use crate::topology::cell_type::CellType;
use crate::topology::element::ElementFamily;
use crate::topology::entities::EntityAdjacency;
use crate::topology::mesh::Mesh;
use itertools::izip;
use std::borrow::Cow;

/// Mesh arrays a mapping reads.
#[derive(Clone, Debug)]
pub struct MappingInput<'a> {
    pub family: ElementFamily,
    pub coordinates: &'a Coordinates,
    /// Full element node table; borrowed when the family has vertex nodes only.
    pub element_nodes: Cow<'a, Connectivity>,
    pub facets: &'a Connectivity,
    pub facet_elements: &'a EntityAdjacency,
}

impl<'a> MappingInput<'a> {
    pub fn from_mesh(mesh: &'a Mesh) -> Self {
        let element_nodes = if mesh.family().node_layout().is_vertex_only() {
            Cow::Borrowed(mesh.cells())
        } else {
            Cow::Owned(mesh.element_nodes())
        };
        Self {
            family: mesh.family(),
            coordinates: mesh.coordinates(),
            element_nodes,
            facets: mesh.facets(),
            facet_elements: mesh.facet_elements(),
        }
    }

    pub fn reference_dim(&self) -> usize {
        self.family.cell_type().dimension()
    }
}

/// Physical points, grouped per element.
#[derive(Clone, Debug, PartialEq)]
pub struct MappedPoints {
    physical_dim: usize,
    points_per_element: usize,
    values: Vec<f64>,
}

impl MappedPoints {
    pub fn physical_dim(&self) -> usize {
        self.physical_dim
    }

    pub fn points_per_element(&self) -> usize {
        self.points_per_element
    }

    /// Number of element groups.
    pub fn len(&self) -> usize {
        let stride = self.physical_dim * self.points_per_element;
        if stride == 0 { 0 } else { self.values.len() / stride }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Point `q` of the `i`-th requested element.
    pub fn get(&self, i: usize, q: usize) -> &[f64] {
        let start = (i * self.points_per_element + q) * self.physical_dim;
        &self.values[start..start + self.physical_dim]
    }

    /// Flatten into coordinates, element-major.
    pub fn into_coordinates(self) -> Coordinates {
        Coordinates::from_parts(self.physical_dim, self.values)
    }
}

/// Narrow interface to the reference mapping.
pub trait GeometryMapping {
    fn input(&self) -> &MappingInput<'_>;

    /// Map reference point `x` of element `element` into `out`.
    ///
    /// `x` has `reference_dim()` components and `out` `physical_dim()`.
    fn map_element_point(&self, element: usize, x: &[f64], out: &mut [f64]);

    fn reference_dim(&self) -> usize {
        self.input().reference_dim()
    }

    fn physical_dim(&self) -> usize {
        self.input().coordinates.dimension()
    }

    fn element_count(&self) -> usize {
        self.input().element_nodes.len()
    }

    /// Map every reference point into every listed element.
    fn map_points<P: AsRef<[f64]>>(
        &self,
        points: &[P],
        elements: &[usize],
    ) -> Result<MappedPoints, MeshError> {
        let reference_dim = self.reference_dim();
        if let Some(p) = points.iter().find(|p| p.as_ref().len() != reference_dim) {
            return Err(MeshError::DimensionMismatch {
                expected: reference_dim,
                found: p.as_ref().len(),
            });
        }
        let element_count = self.element_count();
        if let Some(&element) = elements.iter().find(|&&e| e >= element_count) {
            return Err(MeshError::ElementIndexOutOfBounds {
                element,
                element_count,
            });
        }
        let dim = self.physical_dim();
        let mut values = vec![0.0; dim * points.len() * elements.len()];
        let mut chunks = values.chunks_exact_mut(dim);
        for &e in elements {
            for (p, out) in points.iter().zip(&mut chunks) {
                self.map_element_point(e, p.as_ref(), out);
            }
        }
        Ok(MappedPoints {
            physical_dim: dim,
            points_per_element: points.len(),
            values,
        })
    }

    /// Map points of the reference facet into every listed facet.
    ///
    /// Facet-local coordinates follow the vertex order of the facet row, so
    /// `points` given in the reference facet land at the same physical spot
    /// whichever element owns the facet first.
    fn map_facet_points<P: AsRef<[f64]>>(
        &self,
        points: &[P],
        facets: &[usize],
    ) -> Result<MappedPoints, MeshError> {
        let input = self.input();
        let cell = input.family.cell_type();
        let facet_type = cell.facet_type();
        let facet_dim = facet_type.dimension();
        if let Some(p) = points.iter().find(|p| p.as_ref().len() != facet_dim) {
            return Err(MeshError::DimensionMismatch {
                expected: facet_dim,
                found: p.as_ref().len(),
            });
        }
        let facet_count = input.facets.len();
        if let Some(&facet) = facets.iter().find(|&&f| f >= facet_count) {
            return Err(MeshError::FacetIndexOutOfBounds { facet, facet_count });
        }

        let weights: Vec<Vec<f64>> = points
            .iter()
            .map(|p| facet_shape_values(facet_type, p.as_ref()))
            .collect();
        let corners = cell.reference_vertices();
        let vertex_count = cell.vertex_count();
        let dim = self.physical_dim();
        let mut values = vec![0.0; dim * points.len() * facets.len()];
        let mut chunks = values.chunks_exact_mut(dim);
        let mut reference = vec![0.0; cell.dimension()];
        for &f in facets {
            let e = input.facet_elements.first(f);
            let element_vertices = &input.element_nodes.row(e)[..vertex_count];
            let local: Vec<usize> = input
                .facets
                .row(f)
                .iter()
                .map(|v| {
                    element_vertices
                        .iter()
                        .position(|w| w == v)
                        .unwrap_or_default()
                })
                .collect();
            for (w, out) in weights.iter().zip(&mut chunks) {
                reference.iter_mut().for_each(|r| *r = 0.0);
                for (&wi, &li) in w.iter().zip(&local) {
                    for (r, c) in reference.iter_mut().zip(corners[li]) {
                        *r += wi * c;
                    }
                }
                self.map_element_point(e, &reference, out);
            }
        }
        Ok(MappedPoints {
            physical_dim: dim,
            points_per_element: points.len(),
            values,
        })
    }
}

fn facet_shape_values(facet_type: CellType, x: &[f64]) -> Vec<f64> {
    match facet_type {
        CellType::Vertex => vec![1.0],
        CellType::Segment => ElementFamily::Line1.shape_values(x),
        CellType::Triangle => ElementFamily::Tri1.shape_values(x),
        CellType::Quadrilateral => ElementFamily::Quad1.shape_values(x),
        CellType::Tetrahedron | CellType::Hexahedron => {
            unreachable!("facets are at most two-dimensional")
        }
    }
}

/// `x = x0 + J X` for simplex meshes.
#[derive(Clone, Debug)]
pub struct AffineMapping<'a> {
    input: MappingInput<'a>,
    /// Per element, the physical-by-reference Jacobian, row-major.
    jacobians: Vec<f64>,
}

impl<'a> AffineMapping<'a> {
    pub fn new(input: MappingInput<'a>) -> Result<Self, MeshError> {
        let cell = input.family.cell_type();
        if !cell.is_simplex() {
            return Err(MeshError::Configuration(format!(
                "affine mapping needs simplices, found {cell:?}"
            )));
        }
        let dim = input.coordinates.dimension();
        let reference_dim = cell.dimension();
        let mut jacobians = Vec::with_capacity(input.element_nodes.len() * dim * reference_dim);
        for row in input.element_nodes.rows() {
            let x0 = input.coordinates.point(row[0]);
            for i in 0..dim {
                jacobians.extend(
                    row[1..=reference_dim]
                        .iter()
                        .map(|&v| input.coordinates.point(v)[i] - x0[i]),
                );
            }
        }
        Ok(Self { input, jacobians })
    }

    /// Jacobian of element `e`, row-major `physical_dim × reference_dim`.
    pub fn jacobian(&self, e: usize) -> &[f64] {
        let size = self.physical_dim() * self.reference_dim();
        &self.jacobians[e * size..(e + 1) * size]
    }
}

impl GeometryMapping for AffineMapping<'_> {
    fn input(&self) -> &MappingInput<'_> {
        &self.input
    }

    fn map_element_point(&self, element: usize, x: &[f64], out: &mut [f64]) {
        let x0 = self
            .input
            .coordinates
            .point(self.input.element_nodes.row(element)[0]);
        let jacobian = self.jacobian(element);
        let reference_dim = x.len();
        for (i, (o, &origin)) in out.iter_mut().zip(x0).enumerate() {
            let row = &jacobian[i * reference_dim..(i + 1) * reference_dim];
            *o = origin + row.iter().zip(x).map(|(j, xj)| j * xj).sum::<f64>();
        }
    }
}

/// Mapping through the Lagrange shape functions of the mesh family.
#[derive(Clone, Debug)]
pub struct IsoparametricMapping<'a> {
    input: MappingInput<'a>,
}

impl<'a> IsoparametricMapping<'a> {
    pub fn new(input: MappingInput<'a>) -> Self {
        Self { input }
    }
}

impl GeometryMapping for IsoparametricMapping<'_> {
    fn input(&self) -> &MappingInput<'_> {
        &self.input
    }

    fn map_element_point(&self, element: usize, x: &[f64], out: &mut [f64]) {
        let shape = self.input.family.shape_values(x);
        out.iter_mut().for_each(|o| *o = 0.0);
        for (&n, &node) in izip!(&shape, self.input.element_nodes.row(element)) {
            for (o, c) in out.iter_mut().zip(self.input.coordinates.point(node)) {
                *o += n * c;
            }
        }
    }
}

/// Mapping selected by a mesh's `affine` flag.
#[derive(Clone, Debug)]
pub enum MeshMapping<'a> {
    Affine(AffineMapping<'a>),
    Isoparametric(IsoparametricMapping<'a>),
}

impl GeometryMapping for MeshMapping<'_> {
    fn input(&self) -> &MappingInput<'_> {
        match self {
            MeshMapping::Affine(m) => m.input(),
            MeshMapping::Isoparametric(m) => m.input(),
        }
    }

    fn map_element_point(&self, element: usize, x: &[f64], out: &mut [f64]) {
        match self {
            MeshMapping::Affine(m) => m.map_element_point(element, x, out),
            MeshMapping::Isoparametric(m) => m.map_element_point(element, x, out),
        }
    }
}

pub(crate) fn mapping_for(mesh: &Mesh) -> Result<MeshMapping<'_>, MeshError> {
    let input = MappingInput::from_mesh(mesh);
    if mesh.is_affine() {
        Ok(MeshMapping::Affine(AffineMapping::new(input)?))
    } else {
        Ok(MeshMapping::Isoparametric(IsoparametricMapping::new(input)))
    }
}
