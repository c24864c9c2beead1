//! The immutable [`Mesh`] value.
//!
//! A mesh couples an [`ElementFamily`], node coordinates and vertex
//! connectivity. Facets, edges and facet adjacency are derived on first use
//! and cached for the lifetime of the instance; see [`TopologyCache`].
//!
//! Higher-order families (`Tri2`, `Quad2`) keep only vertex indices in
//! `cells`. Their extra nodes are implied by the node layout: after the
//! vertices come one node per facet, then one per element interior.
//! [`Mesh::element_nodes`] expands that layout into a full node table.

use crate::algs::{boundary, selection};
use crate::data::connectivity::Connectivity;
use crate::data::coordinates::Coordinates;
use crate::geometry::mapping::{GeometryMapping, MeshMapping, mapping_for};
use crate::mesh_error::MeshError;
use crate::topology::cache::TopologyCache;
use crate::topology::cell_type::CellType;
use crate::topology::element::ElementFamily;
use crate::topology::entities::{EntityAdjacency, EntitySet, build_entities, build_inverse};
use crate::topology::refine::{self, Refinement};
use crate::topology::validation::{TopologyValidationOptions, check_connectivity, validate_mesh};
use itertools::Itertools;
use std::collections::BTreeMap;

/// Construction options for [`Mesh::with_options`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MeshOptions {
    /// Use the affine reference mapping. `None` picks the family default.
    pub affine: Option<bool>,
    /// Opt-in checks run after construction.
    pub validation: TopologyValidationOptions,
}

/// Immutable finite-element mesh.
#[derive(Clone, Debug)]
pub struct Mesh {
    family: ElementFamily,
    coordinates: Coordinates,
    cells: Connectivity,
    affine: bool,
    cache: TopologyCache,
}

/// Raw arrays of a mesh for external format converters.
///
/// `connectivity` holds the full element node table (`nodes_per_element`
/// columns); `point_data` holds named per-node scalar fields.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MeshData {
    pub family: ElementFamily,
    pub dimension: usize,
    pub coordinates: Vec<f64>,
    pub nodes_per_element: usize,
    pub connectivity: Vec<usize>,
    #[serde(default)]
    pub affine: Option<bool>,
    #[serde(default)]
    pub point_data: BTreeMap<String, Vec<f64>>,
}

impl MeshData {
    /// Attach a per-node scalar field.
    pub fn with_point_data(mut self, name: &str, values: Vec<f64>) -> Result<Self, MeshError> {
        let expected = self.node_count();
        if values.len() != expected {
            return Err(MeshError::DataLengthMismatch {
                expected,
                found: values.len(),
            });
        }
        self.point_data.insert(name.to_owned(), values);
        Ok(self)
    }

    fn node_count(&self) -> usize {
        if self.dimension == 0 {
            0
        } else {
            self.coordinates.len() / self.dimension
        }
    }
}

impl Mesh {
    /// Build a mesh with the family's default options.
    pub fn try_new(
        family: ElementFamily,
        coordinates: Coordinates,
        cells: Connectivity,
    ) -> Result<Self, MeshError> {
        Self::with_options(family, coordinates, cells, MeshOptions::default())
    }

    /// Build a mesh, checking connectivity shape and index bounds and then
    /// running the requested validation.
    pub fn with_options(
        family: ElementFamily,
        coordinates: Coordinates,
        cells: Connectivity,
        options: MeshOptions,
    ) -> Result<Self, MeshError> {
        check_connectivity(family, &cells, coordinates.len())?;
        let affine = options.affine.unwrap_or(family.is_affine_by_default());
        if affine && !family.cell_type().is_simplex() {
            return Err(MeshError::Configuration(format!(
                "{family:?} has no affine reference map"
            )));
        }
        let mesh = Self::from_parts(family, coordinates, cells, affine);
        if !family.node_layout().is_vertex_only() {
            let expected = mesh.expected_node_count();
            if mesh.node_count() < expected {
                return Err(MeshError::MissingNodes {
                    family,
                    expected,
                    found: mesh.node_count(),
                });
            }
        }
        validate_mesh(&mesh, options.validation)?;
        Ok(mesh)
    }

    /// Unchecked constructor for arrays produced inside the crate.
    pub(crate) fn from_parts(
        family: ElementFamily,
        coordinates: Coordinates,
        cells: Connectivity,
        affine: bool,
    ) -> Self {
        Self {
            family,
            coordinates,
            cells,
            affine,
            cache: TopologyCache::default(),
        }
    }

    /// Build a mesh from a full element node table, as external formats store
    /// higher-order meshes.
    ///
    /// The first columns are vertices; the extra columns follow the family's
    /// local node order (facets, then interior). Vertices are renumbered to
    /// `0..vertex_count` in ascending order of their input index and the
    /// coordinates are reordered so vertex nodes come first.
    pub fn try_from_element_nodes(
        family: ElementFamily,
        coordinates: Coordinates,
        element_nodes: Connectivity,
    ) -> Result<Self, MeshError> {
        Self::from_element_nodes(family, coordinates, element_nodes, MeshOptions::default())
    }

    fn from_element_nodes(
        family: ElementFamily,
        coordinates: Coordinates,
        element_nodes: Connectivity,
        options: MeshOptions,
    ) -> Result<Self, MeshError> {
        let cell = family.cell_type();
        let vertex_width = cell.vertex_count();
        if element_nodes.width() == vertex_width {
            return Self::with_options(family, coordinates, element_nodes, options);
        }
        let expected = family.nodes_per_element();
        if element_nodes.width() != expected {
            return Err(MeshError::NodesPerElementMismatch {
                family,
                expected,
                found: element_nodes.width(),
            });
        }
        let node_count = coordinates.len();
        for (element, row) in element_nodes.rows().enumerate() {
            if let Some(&index) = row.iter().find(|&&i| i >= node_count) {
                return Err(MeshError::VertexIndexOutOfBounds {
                    element,
                    index,
                    node_count,
                });
            }
        }

        let vertex_columns: Vec<usize> = (0..vertex_width).collect();
        let vertex_part = element_nodes.select_columns(&vertex_columns);
        let unique: Vec<usize> = vertex_part.as_slice().iter().copied().sorted().dedup().collect();
        let relabelled = vertex_part
            .as_slice()
            .iter()
            .map(|v| unique.binary_search(v).unwrap_or_default())
            .collect();
        let cells = Connectivity::from_parts(vertex_width, relabelled);

        let facets = build_entities(&cells, cell.facets());
        let table = element_node_table(
            family,
            &cells,
            &facets.element_entities,
            unique.len(),
            facets.len(),
        );
        let total = family
            .node_layout()
            .node_count(unique.len(), facets.len(), cells.len());
        let dim = coordinates.dimension();
        let mut values = vec![0.0; total * dim];
        for (new, &old) in unique.iter().enumerate() {
            values[new * dim..(new + 1) * dim].copy_from_slice(coordinates.point(old));
        }
        for (ours, theirs) in table.rows().zip(element_nodes.rows()) {
            for j in vertex_width..expected {
                values[ours[j] * dim..(ours[j] + 1) * dim]
                    .copy_from_slice(coordinates.point(theirs[j]));
            }
        }
        Self::with_options(family, Coordinates::from_parts(dim, values), cells, options)
    }

    /// Mesh of the reference element.
    pub fn reference(family: ElementFamily) -> Result<Self, MeshError> {
        let cell = family.cell_type();
        let nodes = family.reference_nodes();
        let coordinates = Coordinates::from_points(cell.dimension(), &nodes)?;
        let cells = Connectivity::try_new(cell.vertex_count(), (0..cell.vertex_count()).collect())?;
        Self::try_new(family, coordinates, cells)
    }

    /// Small default mesh of the family: the unit interval, the unit square
    /// (two triangles or one quadrilateral) or the unit cube (five
    /// tetrahedra or one hexahedron).
    pub fn default_mesh(family: ElementFamily) -> Result<Self, MeshError> {
        let (points, rows): (Vec<Vec<f64>>, Vec<Vec<usize>>) = match family {
            ElementFamily::Tri2 | ElementFamily::Quad2 => {
                let linear = Self::default_mesh(family.linear())?;
                return Self::from_mesh(family, &linear);
            }
            ElementFamily::Line1 => (vec![vec![0.0], vec![1.0]], vec![vec![0, 1]]),
            ElementFamily::Tri1 => (
                vec![
                    vec![0.0, 0.0],
                    vec![1.0, 0.0],
                    vec![0.0, 1.0],
                    vec![1.0, 1.0],
                ],
                vec![vec![0, 1, 2], vec![1, 3, 2]],
            ),
            ElementFamily::Quad1 => (
                vec![
                    vec![0.0, 0.0],
                    vec![1.0, 0.0],
                    vec![1.0, 1.0],
                    vec![0.0, 1.0],
                ],
                vec![vec![0, 1, 2, 3]],
            ),
            ElementFamily::Tet1 => (
                vec![
                    vec![0.0, 0.0, 0.0],
                    vec![0.0, 0.0, 1.0],
                    vec![0.0, 1.0, 0.0],
                    vec![1.0, 0.0, 0.0],
                    vec![0.0, 1.0, 1.0],
                    vec![1.0, 0.0, 1.0],
                    vec![1.0, 1.0, 0.0],
                    vec![1.0, 1.0, 1.0],
                ],
                vec![
                    vec![0, 1, 2, 3],
                    vec![3, 5, 1, 7],
                    vec![2, 3, 6, 7],
                    vec![2, 3, 1, 7],
                    vec![1, 2, 4, 7],
                ],
            ),
            ElementFamily::Hex1 => (
                CellType::Hexahedron
                    .reference_vertices()
                    .iter()
                    .map(|v| v.to_vec())
                    .collect(),
                vec![(0..8).collect()],
            ),
        };
        let cell = family.cell_type();
        let coordinates = Coordinates::from_points(cell.dimension(), &points)?;
        let cells = Connectivity::from_rows(cell.vertex_count(), &rows)?;
        Self::try_new(family, coordinates, cells)
    }

    /// Re-derive a mesh of `family` on the connectivity of `source`.
    ///
    /// The target node layout is built from the source topology and every
    /// node is placed by mapping the family's reference nodes through the
    /// source mapping, so quadratic nodes of an affine source land on facet
    /// midpoints and element centres.
    pub fn from_mesh(family: ElementFamily, source: &Mesh) -> Result<Self, MeshError> {
        if family.cell_type() != source.cell_type() {
            return Err(MeshError::FamilyMismatch {
                from: source.family,
                to: family,
            });
        }
        let cells = source.cells.clone();
        let vertex_count = source.vertex_count();
        let table = element_node_table(
            family,
            &cells,
            source.element_facets(),
            vertex_count,
            source.facet_count(),
        );
        let total = family
            .node_layout()
            .node_count(vertex_count, source.facet_count(), cells.len());
        let dim = source.dimension();
        let mut values = vec![0.0; total * dim];
        let known = vertex_count.min(source.node_count()) * dim;
        values[..known].copy_from_slice(&source.coordinates.as_slice()[..known]);

        let mapping = source.mapping()?;
        let reference_nodes = family.reference_nodes();
        let mut out = vec![0.0; dim];
        for (e, row) in table.rows().enumerate() {
            for (node, reference) in row.iter().zip(&reference_nodes) {
                mapping.map_element_point(e, reference, &mut out);
                values[node * dim..(node + 1) * dim].copy_from_slice(&out);
            }
        }
        Self::try_new(family, Coordinates::from_parts(dim, values), cells)
    }

    /// Interchange arrays of this mesh.
    pub fn to_data(&self) -> MeshData {
        MeshData {
            family: self.family,
            dimension: self.dimension(),
            coordinates: self.coordinates.as_slice().to_vec(),
            nodes_per_element: self.family.nodes_per_element(),
            connectivity: self.element_nodes().into_raw(),
            affine: Some(self.affine),
            point_data: BTreeMap::new(),
        }
    }

    /// Rebuild a mesh from interchange arrays.
    ///
    /// `connectivity` may hold either vertex rows or full element node rows.
    /// Every point data field must have one value per node.
    pub fn try_from_data(data: &MeshData) -> Result<Self, MeshError> {
        let coordinates = Coordinates::try_new(data.dimension, data.coordinates.clone())?;
        for values in data.point_data.values() {
            if values.len() != coordinates.len() {
                return Err(MeshError::DataLengthMismatch {
                    expected: coordinates.len(),
                    found: values.len(),
                });
            }
        }
        let nodes = Connectivity::try_new(data.nodes_per_element, data.connectivity.clone())?;
        let options = MeshOptions {
            affine: data.affine,
            ..MeshOptions::default()
        };
        Self::from_element_nodes(data.family, coordinates, nodes, options)
    }

    #[inline]
    pub fn family(&self) -> ElementFamily {
        self.family
    }

    #[inline]
    pub fn cell_type(&self) -> CellType {
        self.family.cell_type()
    }

    /// Spatial dimension of the coordinates.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.coordinates.dimension()
    }

    /// Dimension of the reference element.
    #[inline]
    pub fn reference_dimension(&self) -> usize {
        self.cell_type().dimension()
    }

    /// Whether the affine reference mapping is used.
    #[inline]
    pub fn is_affine(&self) -> bool {
        self.affine
    }

    #[inline]
    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    /// Vertex connectivity, one row per element.
    #[inline]
    pub fn cells(&self) -> &Connectivity {
        &self.cells
    }

    #[inline]
    pub fn element_count(&self) -> usize {
        self.cells.len()
    }

    /// Largest vertex index plus one.
    pub fn vertex_count(&self) -> usize {
        self.cells.max_index().map_or(0, |m| m + 1)
    }

    /// Number of coordinate points, including higher-order nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.coordinates.len()
    }

    fn expected_node_count(&self) -> usize {
        self.family
            .node_layout()
            .node_count(self.vertex_count(), self.facet_count(), self.element_count())
    }

    fn facet_set(&self) -> &EntitySet {
        self.cache
            .facets(|| build_entities(&self.cells, self.cell_type().facets()))
    }

    fn edge_set(&self) -> &EntitySet {
        if self.reference_dimension() == 2 {
            return self.facet_set();
        }
        self.cache
            .edges(|| build_entities(&self.cells, self.cell_type().edges()))
    }

    /// Unique facets, one row per facet.
    pub fn facets(&self) -> &Connectivity {
        &self.facet_set().entities
    }

    /// Element → facet map (`t2f`).
    pub fn element_facets(&self) -> &Connectivity {
        &self.facet_set().element_entities
    }

    /// Facet → element adjacency (`f2t`).
    pub fn facet_elements(&self) -> &EntityAdjacency {
        self.cache.facet_adjacency(|| {
            build_inverse(self.element_count(), self.element_facets(), self.facet_count())
        })
    }

    /// Unique edges. In two dimensions these are the facets.
    pub fn edges(&self) -> &Connectivity {
        &self.edge_set().entities
    }

    /// Element → edge map (`t2e`).
    pub fn element_edges(&self) -> &Connectivity {
        &self.edge_set().element_entities
    }

    pub fn facet_count(&self) -> usize {
        self.facet_set().len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_set().len()
    }

    /// Full element node table following the family's node layout.
    pub fn element_nodes(&self) -> Connectivity {
        if self.family.node_layout().is_vertex_only() {
            return self.cells.clone();
        }
        element_node_table(
            self.family,
            &self.cells,
            self.element_facets(),
            self.vertex_count(),
            self.facet_count(),
        )
    }

    /// Facets with a single owner, ascending.
    pub fn boundary_facets(&self) -> &[usize] {
        self.cache
            .boundary_facets(|| boundary::collect_boundary_facets(self.facet_elements()))
    }

    /// Edges lying on the boundary surface; empty below three dimensions.
    pub fn boundary_edges(&self) -> Vec<usize> {
        boundary::boundary_edges(self)
    }

    /// Sorted vertices of the boundary facets.
    pub fn boundary_nodes(&self) -> Vec<usize> {
        boundary::boundary_nodes(self)
    }

    /// Vertices in `0..vertex_count` that are not boundary nodes.
    pub fn interior_nodes(&self) -> Vec<usize> {
        boundary::interior_nodes(self)
    }

    /// Vertices of the given facets, plus in 3-D the boundary edges lying
    /// within them.
    pub fn expand_facets(&self, facets: &[usize]) -> Result<(Vec<usize>, Vec<usize>), MeshError> {
        boundary::expand_facets(self, facets)
    }

    /// Nodes whose coordinates satisfy `test`.
    pub fn nodes_satisfying<F>(&self, test: F, boundaries_only: bool) -> Vec<usize>
    where
        F: Fn(&[f64]) -> bool,
    {
        selection::nodes_satisfying(self, test, boundaries_only)
    }

    /// Facets whose midpoints satisfy `test`.
    pub fn facets_satisfying<F>(&self, test: F, boundaries_only: bool) -> Vec<usize>
    where
        F: Fn(&[f64]) -> bool,
    {
        selection::facets_satisfying(self, test, boundaries_only)
    }

    /// Elements whose vertex means satisfy `test`.
    pub fn elements_satisfying<F>(&self, test: F) -> Vec<usize>
    where
        F: Fn(&[f64]) -> bool,
    {
        selection::elements_satisfying(self, test)
    }

    /// Mesh parameter: the length of the longest edge.
    pub fn param(&self) -> f64 {
        self.edges()
            .rows()
            .map(|e| self.coordinates.squared_distance(e[0], e[1]))
            .fold(0.0, f64::max)
            .sqrt()
    }

    /// Refine uniformly or adaptively; see [`crate::topology::refine`].
    pub fn refined(&self, refinement: Refinement<'_>) -> Result<Mesh, MeshError> {
        refine::refine(self, refinement)
    }

    /// Copy of the mesh with every coordinate component scaled.
    pub fn scaled(&self, factors: &[f64]) -> Result<Mesh, MeshError> {
        self.check_operand(factors)?;
        Ok(self.with_coordinates(self.coordinates.map_components(|d, x| x * factors[d])))
    }

    /// Copy of the mesh translated by `offsets`.
    pub fn translated(&self, offsets: &[f64]) -> Result<Mesh, MeshError> {
        self.check_operand(offsets)?;
        Ok(self.with_coordinates(self.coordinates.map_components(|d, x| x + offsets[d])))
    }

    fn check_operand(&self, operand: &[f64]) -> Result<(), MeshError> {
        if operand.len() != self.dimension() {
            return Err(MeshError::DimensionMismatch {
                expected: self.dimension(),
                found: operand.len(),
            });
        }
        Ok(())
    }

    fn with_coordinates(&self, coordinates: Coordinates) -> Mesh {
        Mesh::from_parts(self.family, coordinates, self.cells.clone(), self.affine)
    }

    /// Split every quadrilateral along its `1-3` diagonal into two triangles.
    ///
    /// Triangles `(0, 1, 3)` of all elements come first, then `(1, 2, 3)`.
    pub fn to_triangles(&self) -> Result<Mesh, MeshError> {
        if self.family != ElementFamily::Quad1 {
            return Err(MeshError::NotImplemented {
                family: self.family,
                operation: "triangulation",
            });
        }
        let first = self.cells.select_columns(&[0, 1, 3]);
        let second = self.cells.select_columns(&[1, 2, 3]);
        let mut indices = first.into_raw();
        indices.extend(second.into_raw());
        Ok(Mesh::from_parts(
            ElementFamily::Tri1,
            self.coordinates.clone(),
            Connectivity::from_parts(3, indices),
            ElementFamily::Tri1.is_affine_by_default(),
        ))
    }

    /// [`Mesh::to_triangles`], duplicating one value per element onto both
    /// halves.
    pub fn to_triangles_with_data(&self, values: &[f64]) -> Result<(Mesh, Vec<f64>), MeshError> {
        if values.len() != self.element_count() {
            return Err(MeshError::DataLengthMismatch {
                expected: self.element_count(),
                found: values.len(),
            });
        }
        let mesh = self.to_triangles()?;
        Ok((mesh, values.iter().chain(values).copied().collect()))
    }

    /// Reference mapping selected by the affine flag.
    pub fn mapping(&self) -> Result<MeshMapping<'_>, MeshError> {
        mapping_for(self)
    }

    /// Split into disconnected elements, each refined `nrefs` times, for
    /// plotting. The result uses the linear family of this mesh.
    pub fn split_refined(&self, nrefs: usize) -> Result<Mesh, MeshError> {
        let linear = self.family.linear();
        let reference = Mesh::reference(linear)?.refined(Refinement::Uniform(nrefs))?;
        let samples: Vec<&[f64]> = reference.coordinates().iter().collect();
        let elements: Vec<usize> = (0..self.element_count()).collect();
        let mapped = self.mapping()?.map_points(&samples, &elements)?;

        let per_element = reference.node_count();
        let local = reference.cells();
        let mut indices = Vec::with_capacity(local.as_slice().len() * elements.len());
        for e in &elements {
            indices.extend(local.as_slice().iter().map(|i| i + e * per_element));
        }
        Mesh::try_new(
            linear,
            mapped.into_coordinates(),
            Connectivity::from_parts(local.width(), indices),
        )
    }

    /// Run the opt-in validation checks.
    pub fn validate(&self, options: TopologyValidationOptions) -> Result<(), MeshError> {
        validate_mesh(self, options)
    }
}

/// Element node table of `family` over vertex connectivity `cells`.
pub(crate) fn element_node_table(
    family: ElementFamily,
    cells: &Connectivity,
    element_facets: &Connectivity,
    vertex_count: usize,
    facet_count: usize,
) -> Connectivity {
    let layout = family.node_layout();
    let width = family.nodes_per_element();
    let mut indices = Vec::with_capacity(width * cells.len());
    for (e, (row, facets)) in cells.rows().zip(element_facets.rows()).enumerate() {
        indices.extend_from_slice(row);
        if layout.per_facet > 0 {
            indices.extend(facets.iter().map(|f| vertex_count + f));
        }
        if layout.per_element > 0 {
            indices.push(vertex_count + facet_count + e);
        }
    }
    Connectivity::from_parts(width, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_and_node_counts() {
        let mesh = Mesh::default_mesh(ElementFamily::Tri2).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.facet_count(), 5);
        assert_eq!(mesh.node_count(), 9);
        assert_eq!(mesh.element_nodes().width(), 6);
    }

    #[test]
    fn affine_quadrilateral_is_rejected() {
        let mesh = Mesh::default_mesh(ElementFamily::Quad1).unwrap();
        let options = MeshOptions {
            affine: Some(true),
            ..MeshOptions::default()
        };
        let err = Mesh::with_options(
            ElementFamily::Quad1,
            mesh.coordinates().clone(),
            mesh.cells().clone(),
            options,
        )
        .unwrap_err();
        assert!(matches!(err, MeshError::Configuration(_)));
    }

    #[test]
    fn missing_quadratic_nodes() {
        let linear = Mesh::default_mesh(ElementFamily::Tri1).unwrap();
        let err = Mesh::try_new(
            ElementFamily::Tri2,
            linear.coordinates().clone(),
            linear.cells().clone(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            MeshError::MissingNodes {
                family: ElementFamily::Tri2,
                expected: 9,
                found: 4
            }
        );
    }

    #[test]
    fn scaling_checks_operand_length() {
        let mesh = Mesh::default_mesh(ElementFamily::Quad1).unwrap();
        assert_eq!(
            mesh.scaled(&[2.0]).unwrap_err(),
            MeshError::DimensionMismatch {
                expected: 2,
                found: 1
            }
        );
        let moved = mesh.translated(&[1.0, -1.0]).unwrap();
        assert_eq!(moved.coordinates().point(2), &[2.0, 0.0]);
    }

    #[test]
    fn param_is_longest_edge() {
        let mesh = Mesh::default_mesh(ElementFamily::Tri1).unwrap();
        assert!((mesh.param() - 2f64.sqrt()).abs() < 1e-12);
        let line = Mesh::default_mesh(ElementFamily::Line1).unwrap();
        assert_eq!(line.param(), 1.0);
    }
}
