//! Mesh validation helpers.
//!
//! Shape and index checks run on every construction. The costlier checks
//! below are opt-in through [`TopologyValidationOptions`].

use crate::data::connectivity::Connectivity;
use crate::geometry::quality::signed_measure;
use crate::mesh_error::MeshError;
use crate::topology::element::ElementFamily;
use crate::topology::mesh::Mesh;

const EPS: f64 = 1e-12;

/// Optional validation toggles for mesh topology and geometry checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopologyValidationOptions {
    /// Reject elements with zero measure.
    pub check_geometry: bool,
    /// How to handle facets shared by more than two elements.
    pub non_manifold: NonManifoldHandling,
}

impl Default for TopologyValidationOptions {
    fn default() -> Self {
        Self {
            check_geometry: false,
            non_manifold: NonManifoldHandling::Ignore,
        }
    }
}

impl TopologyValidationOptions {
    /// Enable all validation checks.
    pub fn all() -> Self {
        Self {
            check_geometry: true,
            non_manifold: NonManifoldHandling::Error,
        }
    }
}

/// Behavior for non-manifold detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NonManifoldHandling {
    /// Skip non-manifold detection.
    #[default]
    Ignore,
    /// Log a warning on non-manifold entities.
    Warn,
    /// Return an error on non-manifold entities.
    Error,
}

/// Connectivity width and index bounds against the node count.
pub(crate) fn check_connectivity(
    family: ElementFamily,
    cells: &Connectivity,
    node_count: usize,
) -> Result<(), MeshError> {
    let expected = family.cell_type().vertex_count();
    if cells.width() != expected {
        return Err(MeshError::NodesPerElementMismatch {
            family,
            expected,
            found: cells.width(),
        });
    }
    for (element, row) in cells.rows().enumerate() {
        if let Some(&index) = row.iter().find(|&&i| i >= node_count) {
            return Err(MeshError::VertexIndexOutOfBounds {
                element,
                index,
                node_count,
            });
        }
    }
    Ok(())
}

/// Run the opt-in checks on a constructed mesh.
pub fn validate_mesh(mesh: &Mesh, options: TopologyValidationOptions) -> Result<(), MeshError> {
    if options.check_geometry {
        validate_geometry(mesh)?;
    }
    validate_non_manifold(mesh, options.non_manifold)
}

fn validate_geometry(mesh: &Mesh) -> Result<(), MeshError> {
    let cell_type = mesh.cell_type();
    let coordinates = mesh.coordinates();
    let mut points = Vec::with_capacity(cell_type.vertex_count());
    for (element, row) in mesh.cells().rows().enumerate() {
        points.clear();
        points.extend(row.iter().map(|&v| coordinates.point(v)));
        let measure = signed_measure(cell_type, &points);
        if !measure.is_finite() || measure.abs() <= EPS {
            return Err(MeshError::DegenerateElement { element });
        }
    }
    Ok(())
}

/// Number of distinct elements incident to every entity.
pub fn incident_counts(element_entities: &Connectivity, entity_count: usize) -> Vec<usize> {
    let mut counts = vec![0usize; entity_count];
    for row in element_entities.rows() {
        for (k, &entity) in row.iter().enumerate() {
            // a degenerate element may list the same entity twice
            if !row[..k].contains(&entity) {
                counts[entity] += 1;
            }
        }
    }
    counts
}

/// Detect facets with more than two incident elements.
fn validate_non_manifold(mesh: &Mesh, handling: NonManifoldHandling) -> Result<(), MeshError> {
    if handling == NonManifoldHandling::Ignore {
        return Ok(());
    }

    let counts = incident_counts(mesh.element_facets(), mesh.facet_count());
    let cell_type = mesh.cell_type().facet_type();
    for (entity, &count) in counts.iter().enumerate() {
        if count <= 2 {
            continue;
        }
        match handling {
            NonManifoldHandling::Warn => {
                log::warn!(
                    "Non-manifold entity detected: facet={entity} type={cell_type:?} incident_elements={count}"
                );
            }
            NonManifoldHandling::Error => {
                return Err(MeshError::NonManifoldEntity {
                    entity,
                    cell_type,
                    incident_elements: count,
                });
            }
            NonManifoldHandling::Ignore => {}
        }
    }

    Ok(())
}
