use super::curve_loop::CurveLoop;
use super::segment::SegmentId;

slotmap::new_key_type! {
    /// Unique identifier for a planar surface.
    pub struct SurfaceId;
}

/// A labeled planar surface: one exterior loop with zero or more holes excised.
#[derive(Debug, Clone)]
pub struct SurfaceData {
    /// The outer boundary loop.
    pub exterior: CurveLoop,
    /// Inner boundary loops (holes).
    pub holes: Vec<CurveLoop>,
    /// Physical label, the name of the region this surface belongs to.
    pub label: String,
}

impl SurfaceData {
    /// Iterates over the exterior loop followed by every hole loop.
    pub fn loops(&self) -> impl Iterator<Item = &CurveLoop> {
        std::iter::once(&self.exterior).chain(self.holes.iter())
    }

    /// Returns `true` if any boundary loop of this surface uses `segment`.
    #[must_use]
    pub fn uses(&self, segment: SegmentId) -> bool {
        self.loops().any(|l| l.uses(segment))
    }
}
