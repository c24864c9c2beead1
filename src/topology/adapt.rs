//! Adaptivity driver: mark elements by an indicator and refine them.

use crate::mesh_error::MeshError;
use crate::topology::mesh::Mesh;
use crate::topology::refine::refine_adaptive;
use crate::topology::validation::TopologyValidationOptions;

/// Configuration for the adaptivity driver.
#[derive(Clone, Copy, Debug)]
pub struct AdaptivityOptions {
    /// Indicator threshold above which elements are refined.
    pub refine_threshold: f64,
    /// When enabled, reject refined meshes with degenerate elements.
    pub check_geometry: bool,
}

impl Default for AdaptivityOptions {
    fn default() -> Self {
        Self {
            refine_threshold: 0.5,
            check_geometry: false,
        }
    }
}

/// Outcome of an adaptivity pass.
#[derive(Clone, Debug)]
pub enum AdaptivityAction {
    /// The driver refined the marked elements and their closure.
    Refined(Mesh),
    /// No element exceeded the threshold.
    NoChange,
}

/// Summary of an adaptivity pass.
#[derive(Clone, Debug)]
pub struct AdaptivityResult {
    /// Elements chosen for refinement, ascending.
    pub refine_cells: Vec<usize>,
    /// The resulting action taken by the driver.
    pub action: AdaptivityAction,
}

impl AdaptivityResult {
    /// The refined mesh, if any.
    pub fn mesh(&self) -> Option<&Mesh> {
        match &self.action {
            AdaptivityAction::Refined(mesh) => Some(mesh),
            AdaptivityAction::NoChange => None,
        }
    }
}

/// Evaluate `indicator(element, vertices)` on every element and refine those
/// above the threshold with adaptive red/green/blue refinement.
pub fn adapt_topology<F>(
    mesh: &Mesh,
    indicator: F,
    options: AdaptivityOptions,
) -> Result<AdaptivityResult, MeshError>
where
    F: Fn(usize, &[usize]) -> f64,
{
    let refine_cells: Vec<usize> = mesh
        .cells()
        .rows()
        .enumerate()
        .filter(|&(e, row)| indicator(e, row) > options.refine_threshold)
        .map(|(e, _)| e)
        .collect();

    if refine_cells.is_empty() {
        log::debug!("adaptivity: no element above {}", options.refine_threshold);
        return Ok(AdaptivityResult {
            refine_cells,
            action: AdaptivityAction::NoChange,
        });
    }

    let refined = refine_adaptive(mesh, &refine_cells)?;
    if options.check_geometry {
        refined.validate(TopologyValidationOptions {
            check_geometry: true,
            ..TopologyValidationOptions::default()
        })?;
    }
    Ok(AdaptivityResult {
        refine_cells,
        action: AdaptivityAction::Refined(refined),
    })
}
