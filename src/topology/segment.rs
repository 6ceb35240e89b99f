use super::point::PointId;

slotmap::new_key_type! {
    /// Unique identifier for a boundary segment in the geometry registry.
    pub struct SegmentId;
}

/// Data associated with a registered segment.
///
/// A segment is geometrically undirected but remembers the orientation
/// in which it was first inserted (`start → end`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentData {
    /// First endpoint, as first inserted.
    pub start: PointId,
    /// Second endpoint, as first inserted.
    pub end: PointId,
}

impl SegmentData {
    /// Returns `true` if `point` is one of the two endpoints.
    #[must_use]
    pub fn touches(&self, point: PointId) -> bool {
        self.start == point || self.end == point
    }
}

/// Result of a segment lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentMatch {
    /// The canonical segment.
    pub segment: SegmentId,
    /// `true` if the query order agrees with the stored `start → end`.
    pub same_orientation: bool,
}

impl SegmentMatch {
    /// Converts the match into a loop entry traversed in query order.
    #[must_use]
    pub fn signed(self) -> SignedSegment {
        SignedSegment::new(self.segment, self.same_orientation)
    }
}

/// A segment with traversal direction within a loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedSegment {
    /// The segment identifier.
    pub segment: SegmentId,
    /// If `true`, the segment is traversed `start → end`; otherwise `end → start`.
    pub forward: bool,
}

impl SignedSegment {
    /// Creates a new signed segment.
    #[must_use]
    pub fn new(segment: SegmentId, forward: bool) -> Self {
        Self { segment, forward }
    }

    /// The same segment traversed the other way.
    #[must_use]
    pub fn reversed(self) -> Self {
        Self {
            segment: self.segment,
            forward: !self.forward,
        }
    }

    /// Returns `(from, to)` in traversal order.
    #[must_use]
    pub fn endpoints(self, data: &SegmentData) -> (PointId, PointId) {
        if self.forward {
            (data.start, data.end)
        } else {
            (data.end, data.start)
        }
    }
}
