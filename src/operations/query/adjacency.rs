use indexmap::IndexMap;

use crate::model::GeometryModel;
use crate::topology::SegmentId;

/// Maps every segment to the labels of the surfaces it bounds.
///
/// Segments with two labels are interfaces between regions; segments with
/// one label lie on the outer boundary of the model or between two parts of
/// the same region.
#[derive(Debug, Default)]
pub struct SegmentAdjacency;

impl SegmentAdjacency {
    /// Creates a new `SegmentAdjacency` query.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the query. Segments appear in registry order; labels in
    /// order of first use.
    #[must_use]
    pub fn execute(&self, model: &GeometryModel) -> IndexMap<SegmentId, Vec<String>> {
        let mut adjacency: IndexMap<SegmentId, Vec<String>> = model
            .registry()
            .segments()
            .map(|(id, _)| (id, Vec::new()))
            .collect();
        for (_, surface) in model.surfaces() {
            for curve_loop in surface.loops() {
                for edge in &curve_loop.edges {
                    if let Some(labels) = adjacency.get_mut(&edge.segment) {
                        if !labels.contains(&surface.label) {
                            labels.push(surface.label.clone());
                        }
                    }
                }
            }
        }
        adjacency
    }
}
