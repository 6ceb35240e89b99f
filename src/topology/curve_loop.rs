use crate::error::TopologyError;
use crate::math::Point2;

use super::point::PointId;
use super::registry::GeometryRegistry;
use super::segment::{SegmentId, SignedSegment};

/// A closed, ordered sequence of signed segments bounding a surface or a hole.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurveLoop {
    /// The ordered edges; the end of the last edge is the start of the first.
    pub edges: Vec<SignedSegment>,
}

impl CurveLoop {
    /// Creates a loop from already-oriented edges.
    #[must_use]
    pub fn new(edges: Vec<SignedSegment>) -> Self {
        Self { edges }
    }

    /// Number of edges in the loop.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if the loop has no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Returns `true` if `segment` appears in the loop in either direction.
    #[must_use]
    pub fn uses(&self, segment: SegmentId) -> bool {
        self.edges.iter().any(|e| e.segment == segment)
    }

    /// Returns the start point of every edge, in traversal order.
    ///
    /// # Errors
    ///
    /// Returns an error if an edge is not present in the registry.
    pub fn vertices(&self, registry: &GeometryRegistry) -> Result<Vec<PointId>, TopologyError> {
        self.edges
            .iter()
            .map(|e| Ok(e.endpoints(registry.segment(e.segment)?).0))
            .collect()
    }

    /// Returns the vertex positions in traversal order (open ring).
    ///
    /// # Errors
    ///
    /// Returns an error if an edge or point is not present in the registry.
    pub fn positions(&self, registry: &GeometryRegistry) -> Result<Vec<Point2>, TopologyError> {
        self.vertices(registry)?
            .into_iter()
            .map(|id| Ok(registry.point(id)?.position))
            .collect()
    }

    /// Checks that consecutive edges share endpoints and the loop closes.
    ///
    /// # Errors
    ///
    /// Returns an error if an edge is not present in the registry.
    pub fn is_closed(&self, registry: &GeometryRegistry) -> Result<bool, TopologyError> {
        if self.edges.is_empty() {
            return Ok(false);
        }
        let n = self.edges.len();
        for i in 0..n {
            let a = self.edges[i];
            let b = self.edges[(i + 1) % n];
            let (_, a_end) = a.endpoints(registry.segment(a.segment)?);
            let (b_start, _) = b.endpoints(registry.segment(b.segment)?);
            if a_end != b_start {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Replaces every occurrence of `segment` with `pieces`.
    ///
    /// `pieces` must run along the forward direction of `segment`; reversed
    /// occurrences receive the pieces reversed.
    pub(crate) fn splice(&mut self, segment: SegmentId, pieces: &[SignedSegment]) {
        if !self.uses(segment) {
            return;
        }
        let mut edges = Vec::with_capacity(self.edges.len() + pieces.len());
        for &e in &self.edges {
            if e.segment != segment {
                edges.push(e);
            } else if e.forward {
                edges.extend_from_slice(pieces);
            } else {
                edges.extend(pieces.iter().rev().copied().map(SignedSegment::reversed));
            }
        }
        self.edges = edges;
    }
}
