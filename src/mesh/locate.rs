use crate::error::Result;
use crate::math::polygon_2d::point_in_polygon;
use crate::math::Point2;
use crate::model::GeometryModel;

struct Entry {
    group: usize,
    label: String,
    min: Point2,
    max: Point2,
    exterior: Vec<Point2>,
    holes: Vec<Vec<Point2>>,
}

/// Finds the surface containing a point.
///
/// Surfaces of a built model are disjoint, so at most one matches away from
/// boundaries. Group indices follow the model's physical surface groups.
pub struct SurfaceLocator {
    entries: Vec<Entry>,
}

impl SurfaceLocator {
    /// Collects the boundary rings of every surface in `model`.
    ///
    /// # Errors
    ///
    /// Returns an error if a loop references missing registry entities.
    pub fn new(model: &GeometryModel) -> Result<Self> {
        let registry = model.registry();
        let mut entries = Vec::with_capacity(model.surface_count());
        for (group, (label, ids)) in model.surface_groups().enumerate() {
            for &id in ids {
                let surface = model.surface(id)?;
                let exterior = surface.exterior.positions(registry)?;
                let holes = surface
                    .holes
                    .iter()
                    .map(|h| h.positions(registry))
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                let (min, max) = bounding_box(&exterior);
                entries.push(Entry {
                    group,
                    label: label.to_owned(),
                    min,
                    max,
                    exterior,
                    holes,
                });
            }
        }
        Ok(Self { entries })
    }

    /// Returns `(group index, label)` of the surface containing `p`.
    #[must_use]
    pub fn locate(&self, p: &Point2) -> Option<(usize, &str)> {
        self.entries
            .iter()
            .filter(|e| p.x >= e.min.x && p.x <= e.max.x && p.y >= e.min.y && p.y <= e.max.y)
            .find(|e| point_in_polygon(p, &e.exterior, &e.holes))
            .map(|e| (e.group, e.label.as_str()))
    }
}

fn bounding_box(points: &[Point2]) -> (Point2, Point2) {
    let mut min = Point2::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in points {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    (min, max)
}
