//! The assembled, labeled geometry handed to a mesher.

mod build;
mod params;

pub use build::{mesh_from_polygons, BuildModel};
pub use params::{BuildParams, Resolution, ResolutionBounds, ResolutionTable};

use indexmap::IndexMap;
use slotmap::SlotMap;

use crate::error::TopologyError;
use crate::operations::query::SegmentAdjacency;
use crate::topology::{GeometryRegistry, SegmentId, SignedSegment, SurfaceData, SurfaceId};

/// A physical label attached to one boundary segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeLabel {
    /// Generated label, `edge_{n}`.
    pub label: String,
    /// The labeled segment.
    pub segment: SegmentId,
}

/// Labeled surfaces and edges over a shared point/segment registry.
#[derive(Debug)]
pub struct GeometryModel {
    registry: GeometryRegistry,
    surfaces: SlotMap<SurfaceId, SurfaceData>,
    surface_order: Vec<SurfaceId>,
    surface_groups: IndexMap<String, Vec<SurfaceId>>,
    edge_labels: Vec<EdgeLabel>,
    bounds: ResolutionBounds,
    resolutions: ResolutionTable,
}

impl GeometryModel {
    /// Creates an empty model with a fresh registry.
    #[must_use]
    pub fn new(atol: f64, bounds: ResolutionBounds) -> Self {
        Self {
            registry: GeometryRegistry::new(atol),
            surfaces: SlotMap::with_key(),
            surface_order: Vec::new(),
            surface_groups: IndexMap::new(),
            edge_labels: Vec::new(),
            bounds,
            resolutions: ResolutionTable::new(),
        }
    }

    /// Attaches the per-region hints the mesher should honour.
    #[must_use]
    pub fn with_resolutions(mut self, resolutions: ResolutionTable) -> Self {
        self.resolutions = resolutions;
        self
    }

    /// The shared point/segment registry.
    #[must_use]
    pub fn registry(&self) -> &GeometryRegistry {
        &self.registry
    }

    /// Mutable access to the registry while surfaces are assembled.
    pub fn registry_mut(&mut self) -> &mut GeometryRegistry {
        &mut self.registry
    }

    /// Global element size bounds.
    #[must_use]
    pub fn bounds(&self) -> ResolutionBounds {
        self.bounds
    }

    /// Per-region resolution hints.
    #[must_use]
    pub fn resolutions(&self) -> &ResolutionTable {
        &self.resolutions
    }

    // --- Surface operations ---

    /// Inserts a surface and adds it to the physical group of its label.
    pub fn add_surface(&mut self, data: SurfaceData) -> SurfaceId {
        let label = data.label.clone();
        let id = self.surfaces.insert(data);
        self.surface_order.push(id);
        self.surface_groups.entry(label).or_default().push(id);
        id
    }

    /// Returns a reference to the surface data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the model.
    pub fn surface(&self, id: SurfaceId) -> Result<&SurfaceData, TopologyError> {
        self.surfaces
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("surface".into()))
    }

    /// Iterates over surfaces in emission order.
    pub fn surfaces(&self) -> impl Iterator<Item = (SurfaceId, &SurfaceData)> {
        self.surface_order.iter().map(|&id| (id, &self.surfaces[id]))
    }

    /// Number of surfaces.
    #[must_use]
    pub fn surface_count(&self) -> usize {
        self.surface_order.len()
    }

    /// Surfaces carrying `label`, in emission order.
    #[must_use]
    pub fn surfaces_labeled(&self, label: &str) -> &[SurfaceId] {
        self.surface_groups.get(label).map_or(&[], Vec::as_slice)
    }

    /// Physical surface groups in order of first emission.
    pub fn surface_groups(&self) -> impl Iterator<Item = (&str, &[SurfaceId])> {
        self.surface_groups
            .iter()
            .map(|(name, ids)| (name.as_str(), ids.as_slice()))
    }

    /// Rewrites every loop that uses `segment` to use `pieces` instead.
    pub(crate) fn splice_segment(&mut self, segment: SegmentId, pieces: &[SignedSegment]) {
        for surface in self.surfaces.values_mut() {
            surface.exterior.splice(segment, pieces);
            for hole in &mut surface.holes {
                hole.splice(segment, pieces);
            }
        }
    }

    // --- Edge labels ---

    /// Labels every live segment `edge_{n}` in registry order, replacing
    /// any previous labels.
    pub fn label_edges(&mut self) -> &[EdgeLabel] {
        self.edge_labels = self
            .registry
            .segments()
            .enumerate()
            .map(|(n, (segment, _))| EdgeLabel {
                label: format!("edge_{n}"),
                segment,
            })
            .collect();
        &self.edge_labels
    }

    /// Boundary edge labels, one per unique segment.
    #[must_use]
    pub fn edge_labels(&self) -> &[EdgeLabel] {
        &self.edge_labels
    }

    /// The label attached to `segment`, if edges have been labeled.
    #[must_use]
    pub fn edge_label(&self, segment: SegmentId) -> Option<&str> {
        self.edge_labels
            .iter()
            .find(|e| e.segment == segment)
            .map(|e| e.label.as_str())
    }

    /// Segments bordering both region `a` and region `b`.
    #[must_use]
    pub fn interface(&self, a: &str, b: &str) -> Vec<SegmentId> {
        SegmentAdjacency::new()
            .execute(self)
            .into_iter()
            .filter(|(_, labels)| labels.iter().any(|l| l == a) && labels.iter().any(|l| l == b))
            .map(|(segment, _)| segment)
            .collect()
    }
}
