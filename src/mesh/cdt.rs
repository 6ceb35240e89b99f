use std::collections::HashMap;

use spade::handles::FixedVertexHandle;
use spade::{ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation};
use tracing::{debug, info, warn};

use crate::error::{MeshError, Result};
use crate::math::distance_2d::point_to_segment_dist;
use crate::math::Point2;
use crate::model::GeometryModel;
use crate::operations::query::SegmentAdjacency;
use crate::topology::SegmentId;

use super::{Mesh, Mesher, PhysicalGroup, SizeField, SurfaceLocator};

type Cdt = ConstrainedDelaunayTriangulation<SpadePoint2<f64>>;

/// Area of an equilateral triangle with edge length `h`.
fn target_area(h: f64) -> f64 {
    3.0_f64.sqrt() / 4.0 * h * h
}

/// Constrained Delaunay mesher.
///
/// Every registry segment is split into pieces no longer than the local
/// target size and inserted as a chain of constraint edges. Triangles
/// larger than the local target are then refined by centroid insertion.
#[derive(Debug, Clone)]
pub struct CdtMesher {
    max_vertices: usize,
}

impl Default for CdtMesher {
    fn default() -> Self {
        Self {
            max_vertices: 200_000,
        }
    }
}

impl CdtMesher {
    /// Creates a mesher with the default vertex budget.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the number of triangulation vertices. Refinement stops once
    /// the cap is reached.
    #[must_use]
    pub fn with_max_vertices(mut self, max_vertices: usize) -> Self {
        self.max_vertices = max_vertices;
        self
    }
}

impl Mesher for CdtMesher {
    fn generate(&self, model: &GeometryModel) -> Result<Mesh> {
        model.bounds().validate()?;
        let field = SizeField::new(model)?;
        let locator = SurfaceLocator::new(model)?;

        let mut cdt = Cdt::new();
        let owners = insert_segments(&mut cdt, model, &field)?;
        debug!(
            vertices = cdt.num_vertices(),
            constraints = owners.len(),
            "boundary constraints inserted"
        );

        self.refine(&mut cdt, &locator, &field, model.bounds().min)?;
        let mesh = extract(&cdt, model, &locator, &owners);
        info!(
            vertices = mesh.vertices.len(),
            triangles = mesh.triangles.len(),
            lines = mesh.lines.len(),
            "mesh generated"
        );
        Ok(mesh)
    }
}

impl CdtMesher {
    fn refine(
        &self,
        cdt: &mut Cdt,
        locator: &SurfaceLocator,
        field: &SizeField,
        min_size: f64,
    ) -> Result<()> {
        let min_area = target_area(min_size);
        let mut pass = 0usize;
        loop {
            let budget = self.max_vertices.saturating_sub(cdt.num_vertices());
            if budget == 0 {
                warn!(max_vertices = self.max_vertices, "vertex budget exhausted, refinement stopped");
                return Ok(());
            }

            let mut pending = Vec::new();
            for face in cdt.inner_faces() {
                let [a, b, c] = face.vertices().map(|v| to_point(v.position()));
                let centroid = Point2::from((a.coords + b.coords + c.coords) / 3.0);
                let Some((_, label)) = locator.locate(&centroid) else {
                    continue;
                };
                let area = (b - a).perp(&(c - a)).abs() * 0.5;
                let target = target_area(field.size_at(&centroid, Some(label)));
                if area > target.max(min_area) {
                    pending.push(centroid);
                }
            }
            if pending.is_empty() {
                return Ok(());
            }

            pending.truncate(budget);
            pass += 1;
            debug!(pass, inserted = pending.len(), "refinement pass");
            for p in pending {
                insert(cdt, &p)?;
            }
        }
    }
}

fn to_point(p: SpadePoint2<f64>) -> Point2 {
    Point2::new(p.x, p.y)
}

fn insert(cdt: &mut Cdt, p: &Point2) -> Result<FixedVertexHandle> {
    cdt.insert(SpadePoint2::new(p.x, p.y))
        .map_err(|e: InsertionError| MeshError::Generation(format!("CDT insert: {e}")).into())
}

fn edge_key(a: FixedVertexHandle, b: FixedVertexHandle) -> (usize, usize) {
    let (a, b) = (a.index(), b.index());
    (a.min(b), a.max(b))
}

/// Inserts every segment as a chain of constraint edges, returning the
/// segment owning each constraint edge.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn insert_segments(
    cdt: &mut Cdt,
    model: &GeometryModel,
    field: &SizeField,
) -> Result<HashMap<(usize, usize), SegmentId>> {
    let registry = model.registry();
    let adjacency = SegmentAdjacency::new().execute(model);

    let mut handles = HashMap::with_capacity(registry.point_count());
    for (id, data) in registry.points() {
        handles.insert(id, insert(cdt, &data.position)?);
    }

    let mut owners = HashMap::new();
    for (segment, data) in registry.segments() {
        let start = registry.point(data.start)?;
        let end = registry.point(data.end)?;
        let (a, b) = (start.position, end.position);
        let mid = Point2::from((a.coords + b.coords) * 0.5);

        let mut size = adjacency
            .get(&segment)
            .into_iter()
            .flatten()
            .map(|label| field.size_at(&mid, Some(label.as_str())))
            .fold(model.bounds().max, f64::min);
        for hint in [start.resolution, end.resolution].into_iter().flatten() {
            size = size.min(hint);
        }
        let size = model.bounds().clamp(size);

        let pieces = ((b - a).norm() / size).ceil().max(1.0) as usize;
        let mut prev = handles[&data.start];
        for k in 1..=pieces {
            let next = if k == pieces {
                handles[&data.end]
            } else {
                insert(cdt, &(a + (b - a) * (k as f64 / pieces as f64)))?
            };
            if !cdt.can_add_constraint(prev, next) {
                return Err(MeshError::Generation(format!(
                    "segment ({}, {})-({}, {}) crosses another boundary",
                    a.x, a.y, b.x, b.y
                ))
                .into());
            }
            cdt.add_constraint(prev, next);
            owners.insert(edge_key(prev, next), segment);
            prev = next;
        }
    }
    Ok(owners)
}

/// Finds the segment a constraint edge lies on when it is not a recorded piece.
fn owning_segment(model: &GeometryModel, a: &Point2, b: &Point2) -> Option<SegmentId> {
    let registry = model.registry();
    let atol = registry.atol();
    registry.segments().find_map(|(id, _)| {
        let (s, e) = registry.segment_positions(id).ok()?;
        (point_to_segment_dist(a, &s, &e) <= atol && point_to_segment_dist(b, &s, &e) <= atol)
            .then_some(id)
    })
}

#[allow(clippy::cast_possible_truncation)]
fn extract(
    cdt: &Cdt,
    model: &GeometryModel,
    locator: &SurfaceLocator,
    owners: &HashMap<(usize, usize), SegmentId>,
) -> Mesh {
    let mut mesh = Mesh::default();
    for (name, _) in model.surface_groups() {
        mesh.groups.push(PhysicalGroup {
            dimension: 2,
            name: name.to_owned(),
        });
    }
    let mut line_groups = HashMap::new();
    for edge in model.edge_labels() {
        line_groups.insert(edge.segment, mesh.groups.len());
        mesh.groups.push(PhysicalGroup {
            dimension: 1,
            name: edge.label.clone(),
        });
    }

    let mut vertex_map: HashMap<usize, u32> = HashMap::new();
    let mut index_of = |mesh: &mut Mesh, handle: FixedVertexHandle, pos: SpadePoint2<f64>| -> u32 {
        *vertex_map.entry(handle.index()).or_insert_with(|| {
            mesh.vertices.push(to_point(pos));
            (mesh.vertices.len() - 1) as u32
        })
    };

    for face in cdt.inner_faces() {
        let verts = face.vertices();
        let [a, b, c] = verts.map(|v| to_point(v.position()));
        let centroid = Point2::from((a.coords + b.coords + c.coords) / 3.0);
        let Some((group, _)) = locator.locate(&centroid) else {
            continue;
        };
        let mut tri = [0u32; 3];
        for (i, vh) in verts.iter().enumerate() {
            tri[i] = index_of(&mut mesh, vh.fix(), vh.position());
        }
        mesh.triangles.push(tri);
        mesh.triangle_groups.push(group);
    }

    for edge in cdt.undirected_edges() {
        if !cdt.is_constraint_edge(edge.fix()) {
            continue;
        }
        let [v0, v1] = edge.vertices();
        let segment = owners.get(&edge_key(v0.fix(), v1.fix())).copied().or_else(|| {
            owning_segment(model, &to_point(v0.position()), &to_point(v1.position()))
        });
        let Some(&group) = segment.and_then(|s| line_groups.get(&s)) else {
            continue;
        };
        let line = [
            index_of(&mut mesh, v0.fix(), v0.position()),
            index_of(&mut mesh, v1.fix(), v1.position()),
        ];
        mesh.lines.push(line);
        mesh.line_groups.push(group);
    }
    mesh
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::StackmeshError;
    use crate::model::{BuildParams, Resolution, ResolutionTable};
    use crate::operations::assembly::MakeLoop;
    use crate::topology::SurfaceData;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn params() -> BuildParams {
        BuildParams::default().with_resolution_bounds(0.05, 0.25)
    }

    fn model_from_rings(rings: &[(&str, Vec<Point2>)], resolutions: ResolutionTable) -> GeometryModel {
        let params = params();
        let mut model = GeometryModel::new(params.atol, params.bounds()).with_resolutions(resolutions);
        for (label, ring) in rings {
            let exterior = MakeLoop::new(ring).execute(model.registry_mut()).unwrap();
            model.add_surface(SurfaceData {
                exterior,
                holes: vec![],
                label: (*label).into(),
            });
        }
        model.label_edges();
        model
    }

    fn two_blocks(resolutions: ResolutionTable) -> GeometryModel {
        model_from_rings(
            &[
                ("left", vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)]),
                ("right", vec![p(1.0, 0.0), p(2.0, 0.0), p(2.0, 1.0), p(1.0, 1.0)]),
            ],
            resolutions,
        )
    }

    #[test]
    fn labeled_areas_are_conserved() {
        let model = two_blocks(ResolutionTable::new());
        let mesh = CdtMesher::new().generate(&model).unwrap();

        assert_relative_eq!(mesh.area_of("left"), 1.0, epsilon = 1e-9);
        assert_relative_eq!(mesh.area_of("right"), 1.0, epsilon = 1e-9);
        assert_relative_eq!(mesh.total_area(), 2.0, epsilon = 1e-9);
        assert_eq!(mesh.triangles.len(), mesh.triangle_groups.len());
    }

    #[test]
    fn every_edge_label_gets_its_full_length() {
        let model = two_blocks(ResolutionTable::new());
        let mesh = CdtMesher::new().generate(&model).unwrap();

        assert_eq!(model.edge_labels().len(), 7);
        for edge in model.edge_labels() {
            let (a, b) = model.registry().segment_positions(edge.segment).unwrap();
            assert_relative_eq!(mesh.length_of(&edge.label), nalgebra::distance(&a, &b), epsilon = 1e-9);
        }
    }

    #[test]
    fn boundary_pieces_respect_maximum_size() {
        let model = two_blocks(ResolutionTable::new());
        let mesh = CdtMesher::new().generate(&model).unwrap();
        for line in &mesh.lines {
            let len = nalgebra::distance(
                &mesh.vertices[line[0] as usize],
                &mesh.vertices[line[1] as usize],
            );
            assert!(len <= 0.25 + 1e-9);
        }
    }

    #[test]
    fn hinted_region_is_denser() {
        let mut resolutions = ResolutionTable::new();
        resolutions.insert("left".into(), Resolution::new(0.05));
        let model = two_blocks(resolutions);
        let mesh = CdtMesher::new().generate(&model).unwrap();

        let left = mesh.triangles_in("left").count();
        let right = mesh.triangles_in("right").count();
        assert!(left > 2 * right, "left {left}, right {right}");
    }

    #[test]
    fn vertex_budget_stops_refinement() {
        let model = two_blocks(ResolutionTable::new());
        let mesh = CdtMesher::new().with_max_vertices(40).generate(&model).unwrap();
        assert!(mesh.vertices.len() <= 40);
        assert_relative_eq!(mesh.total_area(), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn crossing_boundaries_fail() {
        // Two overlapping squares that were never tiled.
        let model = model_from_rings(
            &[
                ("a", vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)]),
                ("b", vec![p(0.3, 0.3), p(1.3, 0.3), p(1.3, 1.3), p(0.3, 1.3)]),
            ],
            ResolutionTable::new(),
        );
        let err = CdtMesher::new().generate(&model).unwrap_err();
        assert!(matches!(err, StackmeshError::Mesh(MeshError::Generation(_))));
    }
}
