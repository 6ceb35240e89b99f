use crate::error::Result;
use crate::math::polygon_2d::signed_area;
use crate::model::GeometryModel;
use crate::topology::{CurveLoop, GeometryRegistry, SurfaceId};

/// Computes the signed area enclosed by a loop.
///
/// Positive for counter-clockwise traversal, negative for clockwise.
pub struct LoopArea<'a> {
    curve_loop: &'a CurveLoop,
}

impl<'a> LoopArea<'a> {
    /// Creates a new `LoopArea` query.
    #[must_use]
    pub fn new(curve_loop: &'a CurveLoop) -> Self {
        Self { curve_loop }
    }

    /// Executes the query using the registry's canonical coordinates.
    ///
    /// # Errors
    ///
    /// Returns an error if the loop references missing entities.
    pub fn execute(&self, registry: &GeometryRegistry) -> Result<f64> {
        Ok(signed_area(&self.curve_loop.positions(registry)?))
    }
}

/// Computes the area of a surface: exterior area minus hole areas.
pub struct SurfaceArea {
    surface: SurfaceId,
}

impl SurfaceArea {
    /// Creates a new `SurfaceArea` query.
    #[must_use]
    pub fn new(surface: SurfaceId) -> Self {
        Self { surface }
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface or its loops reference missing entities.
    pub fn execute(&self, model: &GeometryModel) -> Result<f64> {
        let surface = model.surface(self.surface)?;
        let registry = model.registry();
        let mut area = LoopArea::new(&surface.exterior).execute(registry)?.abs();
        for hole in &surface.holes {
            area -= LoopArea::new(hole).execute(registry)?.abs();
        }
        Ok(area)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;
    use crate::model::BuildParams;
    use crate::operations::assembly::MakeLoop;
    use crate::topology::SurfaceData;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn loop_area_sign_follows_traversal() {
        let mut reg = GeometryRegistry::default();
        let ccw = MakeLoop::new(&[p(0.0, 0.0), p(2.0, 0.0), p(2.0, 1.0), p(0.0, 1.0)])
            .execute(&mut reg)
            .unwrap();
        assert_relative_eq!(LoopArea::new(&ccw).execute(&reg).unwrap(), 2.0);

        let cw = MakeLoop::new(&[p(0.0, 0.0), p(0.0, 1.0), p(2.0, 1.0), p(2.0, 0.0)])
            .execute(&mut reg)
            .unwrap();
        assert_relative_eq!(LoopArea::new(&cw).execute(&reg).unwrap(), -2.0);
        // Same four segments, walked the other way.
        assert_eq!(reg.segment_count(), 4);
    }

    #[test]
    fn surface_area_excises_holes() {
        let mut model = GeometryModel::new(1e-3, BuildParams::default().bounds());
        let exterior = MakeLoop::new(&[p(0.0, 0.0), p(3.0, 0.0), p(3.0, 3.0), p(0.0, 3.0)])
            .execute(model.registry_mut())
            .unwrap();
        let hole = MakeLoop::new(&[p(1.0, 1.0), p(1.0, 2.0), p(2.0, 2.0), p(2.0, 1.0)])
            .execute(model.registry_mut())
            .unwrap();
        let id = model.add_surface(SurfaceData {
            exterior,
            holes: vec![hole],
            label: "clad".into(),
        });
        assert_relative_eq!(SurfaceArea::new(id).execute(&model).unwrap(), 8.0);
    }
}
