use std::collections::HashSet;

use crate::error::{Result, TopologyError};
use crate::math::Point2;
use crate::topology::{CurveLoop, GeometryRegistry, PointId};

/// Builds a closed loop of registry segments from a ring of vertices.
///
/// The ring is open: the closing pair (last, first) is implied. A trailing
/// vertex equal to the first within tolerance is accepted and ignored, so
/// closed rings work too.
pub struct MakeLoop<'a> {
    vertices: &'a [Point2],
    resolution: Option<f64>,
}

impl<'a> MakeLoop<'a> {
    /// Creates a new `MakeLoop` operation.
    #[must_use]
    pub fn new(vertices: &'a [Point2]) -> Self {
        Self {
            vertices,
            resolution: None,
        }
    }

    /// Sets the resolution hint recorded on newly registered vertices.
    #[must_use]
    pub fn with_resolution(mut self, resolution: Option<f64>) -> Self {
        self.resolution = resolution;
        self
    }

    /// Executes the operation, registering vertices and segments as needed.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::DegenerateLoop`] if fewer than 3 distinct
    /// vertices remain once tolerance matching is applied.
    pub fn execute(&self, registry: &mut GeometryRegistry) -> Result<CurveLoop> {
        let mut ids: Vec<PointId> = Vec::with_capacity(self.vertices.len());
        for &v in self.vertices {
            let id = registry.add_or_get_point(v, self.resolution);
            if ids.last() != Some(&id) {
                ids.push(id);
            }
        }
        while ids.len() > 1 && ids.first() == ids.last() {
            ids.pop();
        }

        let distinct = ids.iter().collect::<HashSet<_>>().len();
        if distinct < 3 {
            return Err(TopologyError::DegenerateLoop { distinct }.into());
        }

        let n = ids.len();
        let mut edges = Vec::with_capacity(n);
        for i in 0..n {
            let a = registry.point(ids[i])?.position;
            let b = registry.point(ids[(i + 1) % n])?.position;
            edges.push(registry.add_or_get_segment(a, b)?.signed());
        }
        Ok(CurveLoop::new(edges))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::StackmeshError;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn square(x0: f64, y0: f64, size: f64) -> Vec<Point2> {
        vec![
            p(x0, y0),
            p(x0 + size, y0),
            p(x0 + size, y0 + size),
            p(x0, y0 + size),
        ]
    }

    #[test]
    fn square_loop_is_closed() {
        let mut reg = GeometryRegistry::default();
        let lp = MakeLoop::new(&square(0.0, 0.0, 1.0))
            .execute(&mut reg)
            .unwrap();
        assert_eq!(lp.len(), 4);
        assert!(lp.is_closed(&reg).unwrap());
        assert!(lp.edges.iter().all(|e| e.forward));
        assert_eq!(reg.segment_count(), 4);
        assert_eq!(reg.point_count(), 4);
    }

    #[test]
    fn closed_ring_convention_is_accepted() {
        let mut ring = square(0.0, 0.0, 1.0);
        ring.push(p(0.0, 0.0));
        let mut reg = GeometryRegistry::default();
        let lp = MakeLoop::new(&ring).execute(&mut reg).unwrap();
        assert_eq!(lp.len(), 4);
    }

    #[test]
    fn neighbour_walks_shared_edge_backwards() {
        let mut reg = GeometryRegistry::default();
        let left = MakeLoop::new(&square(0.0, 0.0, 1.0))
            .execute(&mut reg)
            .unwrap();
        let right = MakeLoop::new(&square(1.0, 0.0, 1.0))
            .execute(&mut reg)
            .unwrap();

        // Left square walks (1,0)->(1,1); right square walks (1,1)->(1,0).
        let shared = left.edges[1];
        let back = right.edges[3];
        assert_eq!(shared.segment, back.segment);
        assert!(shared.forward);
        assert!(!back.forward);
        assert!(right.is_closed(&reg).unwrap());
        assert_eq!(reg.segment_count(), 7);
        assert_eq!(reg.point_count(), 6);
    }

    #[test]
    fn near_duplicate_vertices_collapse() {
        let ring = vec![
            p(0.0, 0.0),
            p(2e-4, 0.0),
            p(1.0, 0.0),
            p(1.0, 1.0),
            p(0.0, 1.0),
        ];
        let mut reg = GeometryRegistry::default();
        let lp = MakeLoop::new(&ring).execute(&mut reg).unwrap();
        assert_eq!(lp.len(), 4);
    }

    #[test]
    fn fewer_than_three_distinct_vertices_is_degenerate() {
        let ring = vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0 + 5e-4, 0.0)];
        let mut reg = GeometryRegistry::default();
        let err = MakeLoop::new(&ring).execute(&mut reg).unwrap_err();
        assert!(matches!(
            err,
            StackmeshError::Topology(TopologyError::DegenerateLoop { distinct: 2 })
        ));
    }

    #[test]
    fn resolution_is_attached_to_new_vertices() {
        let mut reg = GeometryRegistry::default();
        MakeLoop::new(&square(0.0, 0.0, 1.0))
            .with_resolution(Some(0.02))
            .execute(&mut reg)
            .unwrap();
        assert!(reg.points().all(|(_, d)| d.resolution == Some(0.02)));
    }
}
