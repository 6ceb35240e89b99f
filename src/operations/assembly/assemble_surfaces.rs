use geo::LineString;
use tracing::debug;

use crate::error::Result;
use crate::math::{from_coord, Point2};
use crate::model::{GeometryModel, ResolutionTable};
use crate::operations::tiling::TiledLayers;
use crate::topology::{SurfaceData, SurfaceId};

use super::MakeLoop;

/// Turns resolved layers into labeled surfaces over the model's registry.
///
/// Layers are visited background first. Every connected part of a layer
/// becomes one surface labeled with the region name; eclipsed layers emit
/// nothing.
pub struct AssembleSurfaces<'a> {
    layers: &'a TiledLayers,
    resolutions: &'a ResolutionTable,
}

impl<'a> AssembleSurfaces<'a> {
    /// Creates a new `AssembleSurfaces` operation.
    #[must_use]
    pub fn new(layers: &'a TiledLayers, resolutions: &'a ResolutionTable) -> Self {
        Self {
            layers,
            resolutions,
        }
    }

    /// Executes the assembly, returning the new surfaces in emission order.
    ///
    /// # Errors
    ///
    /// Returns an error if a ring is degenerate once tolerance matching is applied.
    pub fn execute(&self, model: &mut GeometryModel) -> Result<Vec<SurfaceId>> {
        let mut emitted = Vec::new();
        for layer in self.layers.in_input_order() {
            if layer.geometry.is_empty() {
                debug!(region = %layer.name, "layer fully eclipsed, skipping");
                continue;
            }
            let resolution = self.resolutions.get(&layer.name).map(|r| r.size);

            for part in layer.geometry.parts() {
                let exterior = MakeLoop::new(&ring_points(part.exterior()))
                    .with_resolution(resolution)
                    .execute(model.registry_mut())?;
                let mut holes = Vec::with_capacity(part.interiors().len());
                for interior in part.interiors() {
                    holes.push(
                        MakeLoop::new(&ring_points(interior))
                            .with_resolution(resolution)
                            .execute(model.registry_mut())?,
                    );
                }

                let id = model.add_surface(SurfaceData {
                    exterior,
                    holes,
                    label: layer.name.clone(),
                });
                emitted.push(id);
            }
            debug!(
                region = %layer.name,
                parts = layer.geometry.parts().len(),
                points = model.registry().point_count(),
                segments = model.registry().segment_count(),
                "assembled layer"
            );
        }
        Ok(emitted)
    }
}

fn ring_points(ring: &LineString<f64>) -> Vec<Point2> {
    ring.coords().copied().map(from_coord).collect()
}
