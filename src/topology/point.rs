use crate::math::Point2;

slotmap::new_key_type! {
    /// Unique identifier for a point in the geometry registry.
    pub struct PointId;
}

/// Data associated with a registered point.
#[derive(Debug, Clone)]
pub struct PointData {
    /// The 2D position of the point.
    pub position: Point2,
    /// Target mesh element size near this point, if one was requested.
    pub resolution: Option<f64>,
}

impl PointData {
    /// Creates a new point at the given position.
    #[must_use]
    pub fn new(position: Point2, resolution: Option<f64>) -> Self {
        Self {
            position,
            resolution,
        }
    }
}
