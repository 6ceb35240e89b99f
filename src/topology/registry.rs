use slotmap::SlotMap;

use crate::error::TopologyError;
use crate::math::{points_match, Point2, DEFAULT_ATOL};

use super::point::{PointData, PointId};
use super::segment::{SegmentData, SegmentId, SegmentMatch};

/// Tolerance-based store of canonical points and boundary segments.
///
/// Identity is by proximity, not by value: a query within `atol` of an
/// existing entity resolves to that entity. Lookups are linear scans in
/// insertion order, so when a query lies within `atol` of several points
/// the earliest registered one wins.
///
/// A build owns exactly one registry; it only grows while surfaces are
/// assembled.
#[derive(Debug)]
pub struct GeometryRegistry {
    atol: f64,
    points: SlotMap<PointId, PointData>,
    segments: SlotMap<SegmentId, SegmentData>,
    point_order: Vec<PointId>,
    segment_order: Vec<SegmentId>,
}

impl Default for GeometryRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_ATOL)
    }
}

impl GeometryRegistry {
    /// Creates an empty registry matching within `atol`.
    #[must_use]
    pub fn new(atol: f64) -> Self {
        Self {
            atol,
            points: SlotMap::with_key(),
            segments: SlotMap::with_key(),
            point_order: Vec::new(),
            segment_order: Vec::new(),
        }
    }

    /// The match tolerance.
    #[must_use]
    pub fn atol(&self) -> f64 {
        self.atol
    }

    // --- Point operations ---

    /// Returns the first registered point within tolerance of `p`.
    #[must_use]
    pub fn find_point(&self, p: &Point2) -> Option<PointId> {
        self.point_order
            .iter()
            .copied()
            .find(|&id| points_match(&self.points[id].position, p, self.atol))
    }

    /// Returns every registered point within tolerance of `p`, in insertion order.
    ///
    /// More than one entry means matching is not transitive around `p`.
    #[must_use]
    pub fn ambiguous_point_matches(&self, p: &Point2) -> Vec<PointId> {
        self.point_order
            .iter()
            .copied()
            .filter(|&id| points_match(&self.points[id].position, p, self.atol))
            .collect()
    }

    /// Returns the existing point within tolerance of `p`, or registers a new one.
    ///
    /// `resolution` is only recorded when a new point is created.
    pub fn add_or_get_point(&mut self, p: Point2, resolution: Option<f64>) -> PointId {
        if let Some(id) = self.find_point(&p) {
            #[cfg(debug_assertions)]
            self.check_unambiguous(&p);
            return id;
        }
        let id = self.points.insert(PointData::new(p, resolution));
        self.point_order.push(id);
        id
    }

    #[cfg(debug_assertions)]
    fn check_unambiguous(&self, p: &Point2) {
        let matches = self.ambiguous_point_matches(p);
        if matches.len() > 1 {
            tracing::warn!(
                x = p.x,
                y = p.y,
                candidates = matches.len(),
                atol = self.atol,
                "point matches several registered points; using the first"
            );
        }
    }

    /// Returns a reference to the point data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the registry.
    pub fn point(&self, id: PointId) -> Result<&PointData, TopologyError> {
        self.points
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("point".into()))
    }

    /// Number of registered points.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.point_order.len()
    }

    /// Iterates over points in registration order.
    pub fn points(&self) -> impl Iterator<Item = (PointId, &PointData)> {
        self.point_order.iter().map(|&id| (id, &self.points[id]))
    }

    // --- Segment operations ---

    /// Finds a registered segment joining `p1` and `p2` in either direction.
    #[must_use]
    pub fn find_segment(&self, p1: &Point2, p2: &Point2) -> Option<SegmentMatch> {
        self.segment_order
            .iter()
            .find_map(|&id| self.match_segment(id, p1, p2))
    }

    /// Returns every registered segment joining `p1` and `p2`, in insertion order.
    ///
    /// More than one entry means an endpoint query lies within tolerance of
    /// several points; [`find_segment`](Self::find_segment) returns the first.
    #[must_use]
    pub fn ambiguous_segment_matches(&self, p1: &Point2, p2: &Point2) -> Vec<SegmentMatch> {
        self.segment_order
            .iter()
            .filter_map(|&id| self.match_segment(id, p1, p2))
            .collect()
    }

    fn match_segment(&self, id: SegmentId, p1: &Point2, p2: &Point2) -> Option<SegmentMatch> {
        let seg = self.segments[id];
        let start = &self.points[seg.start].position;
        let end = &self.points[seg.end].position;
        if points_match(p1, start, self.atol) && points_match(p2, end, self.atol) {
            Some(SegmentMatch {
                segment: id,
                same_orientation: true,
            })
        } else if points_match(p1, end, self.atol) && points_match(p2, start, self.atol) {
            Some(SegmentMatch {
                segment: id,
                same_orientation: false,
            })
        } else {
            None
        }
    }

    /// Returns the existing segment joining `p1` and `p2`, or registers a new one
    /// in query order (registering its endpoints first).
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::ZeroLengthSegment`] if both endpoints resolve to
    /// the same point.
    pub fn add_or_get_segment(
        &mut self,
        p1: Point2,
        p2: Point2,
    ) -> Result<SegmentMatch, TopologyError> {
        if let Some(found) = self.find_segment(&p1, &p2) {
            #[cfg(debug_assertions)]
            self.check_unambiguous_segment(&p1, &p2);
            return Ok(found);
        }
        let start = self.add_or_get_point(p1, None);
        let end = self.add_or_get_point(p2, None);
        self.add_or_get_segment_between(start, end)
    }

    #[cfg(debug_assertions)]
    fn check_unambiguous_segment(&self, p1: &Point2, p2: &Point2) {
        let matches = self.ambiguous_segment_matches(p1, p2);
        if matches.len() > 1 {
            tracing::warn!(
                x1 = p1.x,
                y1 = p1.y,
                x2 = p2.x,
                y2 = p2.y,
                candidates = matches.len(),
                atol = self.atol,
                "segment matches several registered segments; using the first"
            );
        }
    }

    /// Segment lookup by canonical point identity rather than coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::ZeroLengthSegment`] if `start == end`.
    pub fn add_or_get_segment_between(
        &mut self,
        start: PointId,
        end: PointId,
    ) -> Result<SegmentMatch, TopologyError> {
        if start == end {
            let p = self.point(start)?.position;
            return Err(TopologyError::ZeroLengthSegment { x: p.x, y: p.y });
        }
        let existing = self.segment_order.iter().copied().find_map(|id| {
            let seg = self.segments[id];
            if seg.start == start && seg.end == end {
                Some(SegmentMatch {
                    segment: id,
                    same_orientation: true,
                })
            } else if seg.start == end && seg.end == start {
                Some(SegmentMatch {
                    segment: id,
                    same_orientation: false,
                })
            } else {
                None
            }
        });
        if let Some(found) = existing {
            return Ok(found);
        }
        let id = self.segments.insert(SegmentData { start, end });
        self.segment_order.push(id);
        Ok(SegmentMatch {
            segment: id,
            same_orientation: true,
        })
    }

    /// Returns a reference to the segment data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the registry.
    pub fn segment(&self, id: SegmentId) -> Result<&SegmentData, TopologyError> {
        self.segments
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("segment".into()))
    }

    /// Returns the endpoint positions of a segment in stored orientation.
    ///
    /// # Errors
    ///
    /// Returns an error if the segment or one of its points is missing.
    pub fn segment_positions(&self, id: SegmentId) -> Result<(Point2, Point2), TopologyError> {
        let seg = self.segment(id)?;
        Ok((self.point(seg.start)?.position, self.point(seg.end)?.position))
    }

    /// Number of live segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segment_order.len()
    }

    /// Iterates over live segments in registration order.
    pub fn segments(&self) -> impl Iterator<Item = (SegmentId, &SegmentData)> {
        self.segment_order.iter().map(|&id| (id, &self.segments[id]))
    }

    /// Removes a segment that has been replaced by its pieces.
    pub(crate) fn retire_segment(&mut self, id: SegmentId) {
        if self.segments.remove(id).is_some() {
            self.segment_order.retain(|&s| s != id);
        }
    }
}
