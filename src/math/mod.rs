pub mod distance_2d;
pub mod intersect_2d;
pub mod polygon_2d;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Default absolute tolerance for point and segment identity, in caller units.
pub const DEFAULT_ATOL: f64 = 1e-3;

/// Numerical tolerance for purely arithmetic checks (parallelism, zero areas).
pub const TOLERANCE: f64 = 1e-12;

/// Returns `true` if `a` and `b` are the same point under tolerance `atol`.
///
/// Uses Euclidean distance, inclusive of `atol` itself.
#[must_use]
pub fn points_match(a: &Point2, b: &Point2, atol: f64) -> bool {
    nalgebra::distance(a, b) <= atol
}

/// Converts a `geo` coordinate into a [`Point2`].
#[must_use]
pub fn from_coord(c: geo::Coord<f64>) -> Point2 {
    Point2::new(c.x, c.y)
}
