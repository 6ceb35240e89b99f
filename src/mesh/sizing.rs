use crate::error::Result;
use crate::math::distance_2d::point_to_ring_dist;
use crate::math::Point2;
use crate::model::{GeometryModel, ResolutionBounds};

struct Hint {
    label: String,
    size: f64,
    distance: f64,
    rings: Vec<Vec<Point2>>,
}

/// Target element size over the model.
///
/// Inside a hinted region the size is the region's hint. Within `distance`
/// of a hinted region's boundary the size grows linearly from the hint to
/// the global maximum. Everything is clamped to the global bounds.
pub struct SizeField {
    bounds: ResolutionBounds,
    hints: Vec<Hint>,
}

impl SizeField {
    /// Builds the field from the model's resolution table and surfaces.
    ///
    /// # Errors
    ///
    /// Returns an error if a loop references missing registry entities.
    pub fn new(model: &GeometryModel) -> Result<Self> {
        let registry = model.registry();
        let mut hints = Vec::new();
        for (label, ids) in model.surface_groups() {
            let Some(resolution) = model.resolutions().get(label) else {
                continue;
            };
            let mut rings = Vec::new();
            if resolution.distance > 0.0 {
                for &id in ids {
                    for curve_loop in model.surface(id)?.loops() {
                        rings.push(curve_loop.positions(registry)?);
                    }
                }
            }
            hints.push(Hint {
                label: label.to_owned(),
                size: resolution.size,
                distance: resolution.distance,
                rings,
            });
        }
        Ok(Self {
            bounds: model.bounds(),
            hints,
        })
    }

    /// Target size at `p`, which lies in the region labeled `label` (if known).
    #[must_use]
    pub fn size_at(&self, p: &Point2, label: Option<&str>) -> f64 {
        let mut size = self.bounds.max;
        for hint in &self.hints {
            if label == Some(hint.label.as_str()) {
                size = size.min(hint.size);
            } else if hint.distance > 0.0 {
                let d = hint
                    .rings
                    .iter()
                    .map(|ring| point_to_ring_dist(p, ring))
                    .fold(f64::INFINITY, f64::min);
                if d < hint.distance {
                    let relaxed = hint.size + (self.bounds.max - hint.size) * d / hint.distance;
                    size = size.min(relaxed);
                }
            }
        }
        self.bounds.clamp(size)
    }
}
