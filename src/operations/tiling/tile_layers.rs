use geo::{BooleanOps, MultiPolygon, Polygon};
use tracing::debug;

use crate::error::Result;
use crate::math::DEFAULT_ATOL;

use super::{validate_polygon, LayerGeometry, RegionStack, ResolvedLayer, TiledLayers};

/// Partitions a region stack into disjoint resolved layers.
///
/// Regions are walked from the last declared to the first. Each region loses
/// the area of every region declared after it, subtracted one polygon at a
/// time, so the most recently declared region wins every overlap.
pub struct TileLayers<'a> {
    stack: &'a RegionStack,
    atol: f64,
}

impl<'a> TileLayers<'a> {
    /// Creates a new `TileLayers` operation.
    #[must_use]
    pub fn new(stack: &'a RegionStack) -> Self {
        Self {
            stack,
            atol: DEFAULT_ATOL,
        }
    }

    /// Sets the tolerance; fragments of area `<= atol²` are discarded.
    #[must_use]
    pub fn with_atol(mut self, atol: f64) -> Self {
        self.atol = atol;
        self
    }

    /// Executes the tiling, returning layers in tiling order.
    ///
    /// # Errors
    ///
    /// Returns an error if any input polygon is invalid.
    pub fn execute(&self) -> Result<TiledLayers> {
        for (name, polygon) in self.stack.iter() {
            validate_polygon(name, polygon)?;
        }

        let entries: Vec<(&str, &Polygon<f64>)> = self.stack.iter().collect();
        let min_area = self.atol * self.atol;
        let mut layers = Vec::with_capacity(entries.len());

        for (index, &(name, polygon)) in entries.iter().enumerate().rev() {
            let mut remaining = MultiPolygon::new(vec![polygon.clone()]);
            for &(_, later) in &entries[index + 1..] {
                if remaining.0.is_empty() {
                    break;
                }
                remaining = remaining.difference(later);
            }

            let raw_parts = remaining.0.len();
            let geometry = LayerGeometry::from_parts(remaining, min_area);
            let parts = geometry.parts().len();
            if parts < raw_parts {
                debug!(
                    region = name,
                    dropped = raw_parts - parts,
                    "discarded sliver fragments"
                );
            }
            debug!(
                region = name,
                index,
                parts,
                area = geometry.area(),
                "resolved layer"
            );

            layers.push(ResolvedLayer {
                name: name.to_owned(),
                index,
                geometry,
            });
        }

        Ok(TiledLayers::new(layers))
    }
}
