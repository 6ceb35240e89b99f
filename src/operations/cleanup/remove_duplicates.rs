use tracing::debug;

use crate::error::Result;
use crate::math::distance_2d::project_on_segment;
use crate::math::points_match;
use crate::model::GeometryModel;
use crate::topology::{GeometryRegistry, PointId, SegmentId};

/// Model-wide cleanup of near-coincident geometry the registry cannot see.
///
/// The registry keeps registered points pairwise farther apart than the
/// tolerance, and never stores the same segment twice. What can remain is a
/// point lying on the interior of another region's segment (a T-junction,
/// e.g. a narrow rectangle resting on a wider one). Such segments are split
/// at those points, loops are rewritten to walk the pieces, and overlapping
/// pieces collapse onto existing segments.
#[derive(Debug, Default)]
pub struct RemoveDuplicates;

impl RemoveDuplicates {
    /// Creates a new `RemoveDuplicates` operation.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the cleanup, returning the number of segments split.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry is inconsistent with the model's loops.
    pub fn execute(&self, model: &mut GeometryModel) -> Result<usize> {
        let mut total = 0;
        loop {
            let splits = find_splits(model.registry())?;
            if splits.is_empty() {
                break;
            }
            for (segment, chain) in splits {
                let mut pieces = Vec::with_capacity(chain.len() - 1);
                for pair in chain.windows(2) {
                    pieces.push(
                        model
                            .registry_mut()
                            .add_or_get_segment_between(pair[0], pair[1])?
                            .signed(),
                    );
                }
                model.splice_segment(segment, &pieces);
                model.registry_mut().retire_segment(segment);
                total += 1;
            }
        }
        debug!(
            split = total,
            segments = model.registry().segment_count(),
            "removed duplicate geometry"
        );
        Ok(total)
    }
}

/// For every segment with registered points on its interior, returns the
/// point chain from start to end through those points.
fn find_splits(registry: &GeometryRegistry) -> Result<Vec<(SegmentId, Vec<PointId>)>> {
    let atol = registry.atol();
    let mut splits = Vec::new();
    for (id, seg) in registry.segments() {
        let (a, b) = registry.segment_positions(id)?;
        let mut interior: Vec<(f64, PointId)> = registry
            .points()
            .filter(|&(pid, _)| !seg.touches(pid))
            .filter_map(|(pid, data)| {
                let p = &data.position;
                let (t, dist) = project_on_segment(p, &a, &b);
                let strictly_inside = dist <= atol
                    && !points_match(p, &a, atol)
                    && !points_match(p, &b, atol);
                strictly_inside.then_some((t, pid))
            })
            .collect();
        if interior.is_empty() {
            continue;
        }
        interior.sort_by(|x, y| x.0.total_cmp(&y.0));

        let mut chain = Vec::with_capacity(interior.len() + 2);
        chain.push(seg.start);
        chain.extend(interior.into_iter().map(|(_, pid)| pid));
        chain.push(seg.end);
        splits.push((id, chain));
    }
    Ok(splits)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;
    use crate::model::{BuildParams, ResolutionTable};
    use crate::operations::assembly::{AssembleSurfaces, MakeLoop};
    use crate::operations::query::SurfaceArea;
    use crate::operations::tiling::{RegionStack, TileLayers};
    use crate::topology::SurfaceData;
    use approx::assert_relative_eq;
    use geo::{Polygon, Rect};

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon<f64> {
        Rect::new((x0, y0), (x1, y1)).to_polygon()
    }

    fn assembled(stack: &RegionStack) -> GeometryModel {
        let params = BuildParams::default();
        let tiled = TileLayers::new(stack).execute().unwrap();
        let mut model = GeometryModel::new(params.atol, params.bounds());
        AssembleSurfaces::new(&tiled, &ResolutionTable::new())
            .execute(&mut model)
            .unwrap();
        model
    }

    fn model_from_rings(rings: &[(&str, Vec<Point2>)]) -> GeometryModel {
        let mut model = GeometryModel::new(1e-3, BuildParams::default().bounds());
        for (label, ring) in rings {
            let exterior = MakeLoop::new(ring).execute(model.registry_mut()).unwrap();
            model.add_surface(SurfaceData {
                exterior,
                holes: vec![],
                label: (*label).to_owned(),
            });
        }
        model
    }

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn t_junction_is_split_and_shared() {
        // A narrow ridge resting on a wide slab: the slab's top edge carries
        // the ridge's bottom corners on its interior.
        let mut model = model_from_rings(&[
            ("slab", vec![p(0.0, 0.0), p(4.0, 0.0), p(4.0, 1.0), p(0.0, 1.0)]),
            ("ridge", vec![p(1.0, 1.0), p(2.0, 1.0), p(2.0, 2.0), p(1.0, 2.0)]),
        ]);
        assert_eq!(model.registry().segment_count(), 8);

        let split = RemoveDuplicates::new().execute(&mut model).unwrap();
        assert_eq!(split, 1);
        // Slab top becomes three pieces; the middle one is the ridge bottom.
        assert_eq!(model.registry().segment_count(), 9);
        assert_eq!(model.interface("slab", "ridge").len(), 1);

        for (_, surface) in model.surfaces() {
            assert!(surface.exterior.is_closed(model.registry()).unwrap());
        }
        let slab = model.surfaces_labeled("slab")[0];
        assert_eq!(model.surface(slab).unwrap().exterior.len(), 6);
        assert_relative_eq!(
            SurfaceArea::new(slab).execute(&model).unwrap(),
            4.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn near_miss_within_tolerance_is_split() {
        let mut model = model_from_rings(&[
            ("slab", vec![p(0.0, 0.0), p(4.0, 0.0), p(4.0, 1.0), p(0.0, 1.0)]),
            ("ridge", vec![p(1.0, 1.0005), p(2.0, 1.0005), p(2.0, 2.0), p(1.0, 2.0)]),
        ]);
        let split = RemoveDuplicates::new().execute(&mut model).unwrap();
        assert_eq!(split, 1);
        assert_eq!(model.interface("slab", "ridge").len(), 1);
    }

    #[test]
    fn conforming_model_is_untouched() {
        let stack = RegionStack::new()
            .with("left", rect(0.0, 0.0, 1.0, 1.0))
            .with("right", rect(1.0, 0.0, 2.0, 1.0));
        let mut model = assembled(&stack);
        let split = RemoveDuplicates::new().execute(&mut model).unwrap();
        assert_eq!(split, 0);
        assert_eq!(model.registry().segment_count(), 7);
    }

    #[test]
    fn reversed_use_receives_reversed_pieces() {
        let stack = RegionStack::new()
            .with("slab", rect(0.0, 0.0, 3.0, 1.0))
            .with("trench", rect(1.0, -1.0, 2.0, 2.0));
        let mut model = assembled(&stack);
        let split = RemoveDuplicates::new().execute(&mut model).unwrap();
        // Both long sides of the trench carry two slab corners each.
        assert_eq!(split, 2);
        for (_, surface) in model.surfaces() {
            assert!(surface.exterior.is_closed(model.registry()).unwrap());
        }
        let trench = model.surfaces_labeled("trench")[0];
        assert_eq!(model.surface(trench).unwrap().exterior.len(), 8);
        assert_eq!(model.interface("slab", "trench").len(), 2);
    }
}
