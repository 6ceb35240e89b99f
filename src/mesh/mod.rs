//! Mesh generation from an assembled [`GeometryModel`].
//!
//! Meshing sits behind the [`Mesher`] trait; [`CdtMesher`] is the built-in
//! constrained Delaunay implementation.

mod cdt;
mod locate;
mod sizing;

pub use cdt::CdtMesher;
pub use locate::SurfaceLocator;
pub use sizing::SizeField;

use crate::error::Result;
use crate::math::Point2;
use crate::model::GeometryModel;

/// Produces a mesh from a labeled geometry model.
pub trait Mesher {
    /// Generates the mesh. Failures are reported as
    /// [`MeshError::Generation`](crate::error::MeshError::Generation).
    ///
    /// # Errors
    ///
    /// Returns an error if the mesher cannot produce a conforming mesh.
    fn generate(&self, model: &GeometryModel) -> Result<Mesh>;
}

/// A named group of mesh cells (dimension 2) or boundary lines (dimension 1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalGroup {
    /// Topological dimension of the tagged elements.
    pub dimension: u8,
    /// Region name or generated edge label.
    pub name: String,
}

/// A labeled triangle mesh.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Vertex positions.
    pub vertices: Vec<Point2>,
    /// Triangle indices, counter-clockwise.
    pub triangles: Vec<[u32; 3]>,
    /// Physical group of each triangle, indexing `groups`.
    pub triangle_groups: Vec<usize>,
    /// Boundary line elements lying on model segments.
    pub lines: Vec<[u32; 2]>,
    /// Physical group of each line, indexing `groups`.
    pub line_groups: Vec<usize>,
    /// Physical group table.
    pub groups: Vec<PhysicalGroup>,
}

impl Mesh {
    /// Index of the group called `name` with the given dimension.
    #[must_use]
    pub fn group_index(&self, dimension: u8, name: &str) -> Option<usize> {
        self.groups
            .iter()
            .position(|g| g.dimension == dimension && g.name == name)
    }

    /// Triangles tagged with region `name`.
    pub fn triangles_in<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a [u32; 3]> + 'a {
        let group = self.group_index(2, name);
        self.triangles
            .iter()
            .zip(&self.triangle_groups)
            .filter(move |(_, &g)| Some(g) == group)
            .map(|(t, _)| t)
    }

    /// Lines tagged with edge label `name`.
    pub fn lines_in<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a [u32; 2]> + 'a {
        let group = self.group_index(1, name);
        self.lines
            .iter()
            .zip(&self.line_groups)
            .filter(move |(_, &g)| Some(g) == group)
            .map(|(l, _)| l)
    }

    /// Total area of the triangles tagged with region `name`.
    #[must_use]
    pub fn area_of(&self, name: &str) -> f64 {
        self.triangles_in(name).map(|t| self.triangle_area(t)).sum()
    }

    /// Total area of all triangles.
    #[must_use]
    pub fn total_area(&self) -> f64 {
        self.triangles.iter().map(|t| self.triangle_area(t)).sum()
    }

    /// Total length of the lines tagged with edge label `name`.
    #[must_use]
    pub fn length_of(&self, name: &str) -> f64 {
        self.lines_in(name)
            .map(|l| nalgebra::distance(&self.vertices[l[0] as usize], &self.vertices[l[1] as usize]))
            .sum()
    }

    fn triangle_area(&self, t: &[u32; 3]) -> f64 {
        let a = self.vertices[t[0] as usize];
        let b = self.vertices[t[1] as usize];
        let c = self.vertices[t[2] as usize];
        (b - a).perp(&(c - a)).abs() * 0.5
    }
}
