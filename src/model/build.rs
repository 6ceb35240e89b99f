use tracing::info;

use crate::error::Result;
use crate::mesh::{Mesh, Mesher};
use crate::operations::assembly::AssembleSurfaces;
use crate::operations::cleanup::RemoveDuplicates;
use crate::operations::tiling::{RegionStack, TileLayers};

use super::{BuildParams, GeometryModel, ResolutionTable};

/// Builds a labeled [`GeometryModel`] from an ordered region stack.
///
/// Phases run strictly in sequence: every layer is tiled before the registry
/// is touched, surfaces are assembled background first, near-coincident
/// geometry is cleaned up, and finally every segment receives an edge label.
pub struct BuildModel<'a> {
    stack: &'a RegionStack,
    resolutions: ResolutionTable,
    params: BuildParams,
}

impl<'a> BuildModel<'a> {
    /// Creates a new `BuildModel` operation with default parameters and no
    /// resolution hints.
    #[must_use]
    pub fn new(stack: &'a RegionStack) -> Self {
        Self {
            stack,
            resolutions: ResolutionTable::new(),
            params: BuildParams::default(),
        }
    }

    /// Sets the per-region resolution hints.
    #[must_use]
    pub fn with_resolutions(mut self, resolutions: ResolutionTable) -> Self {
        self.resolutions = resolutions;
        self
    }

    /// Sets the build parameters.
    #[must_use]
    pub fn with_params(mut self, params: BuildParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the build.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters or a resolution hint are invalid,
    /// an input polygon is invalid, or a ring collapses under the tolerance.
    pub fn execute(self) -> Result<GeometryModel> {
        self.params.validate()?;
        for (region, resolution) in &self.resolutions {
            resolution.validate(region)?;
        }
        info!(
            regions = self.stack.len(),
            atol = self.params.atol,
            resolution_min = self.params.resolution_min,
            resolution_max = self.params.resolution_max,
            "building geometry model"
        );

        let tiled = TileLayers::new(self.stack)
            .with_atol(self.params.atol)
            .execute()?;
        info!(
            layers = tiled.len(),
            empty = tiled.iter().filter(|l| l.geometry.is_empty()).count(),
            "tiled layers"
        );

        let mut model = GeometryModel::new(self.params.atol, self.params.bounds());
        AssembleSurfaces::new(&tiled, &self.resolutions).execute(&mut model)?;
        let split = RemoveDuplicates::new().execute(&mut model)?;
        let mut model = model.with_resolutions(self.resolutions);
        let edges = model.label_edges().len();
        info!(
            surfaces = model.surface_count(),
            points = model.registry().point_count(),
            segments = model.registry().segment_count(),
            edges,
            split,
            "geometry model ready"
        );
        Ok(model)
    }
}

/// Tiles, assembles and meshes `stack` in one call.
///
/// Either returns the mesh or the first error raised. Nothing is handed to
/// the mesher unless the geometry phases all succeed.
///
/// # Errors
///
/// Returns any error from [`BuildModel::execute`] or from the mesher.
pub fn mesh_from_polygons(
    stack: &RegionStack,
    resolutions: ResolutionTable,
    params: BuildParams,
    mesher: &impl Mesher,
) -> Result<Mesh> {
    let model = BuildModel::new(stack)
        .with_resolutions(resolutions)
        .with_params(params)
        .execute()?;
    mesher.generate(&model)
}
