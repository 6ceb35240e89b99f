use super::Point2;

/// Returns the parameter `t` in `[0, 1]` of the point on segment `a → b`
/// closest to `p`, together with the distance to it.
#[must_use]
pub fn project_on_segment(p: &Point2, a: &Point2, b: &Point2) -> (f64, f64) {
    let d = b - a;
    let len_sq = d.norm_squared();

    if len_sq < 1e-20 {
        // Degenerate segment (zero length).
        return (0.0, nalgebra::distance(p, a));
    }

    // Project point onto the infinite line, clamp to [0, 1].
    let t = ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0);
    let closest = a + d * t;
    (t, nalgebra::distance(p, &closest))
}

/// Returns the minimum distance from `p` to the segment `a → b`.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    project_on_segment(p, a, b).1
}

/// Returns the minimum distance from `p` to any edge of a closed ring.
#[must_use]
pub fn point_to_ring_dist(p: &Point2, ring: &[Point2]) -> f64 {
    let n = ring.len();
    (0..n)
        .map(|i| point_to_segment_dist(p, &ring[i], &ring[(i + 1) % n]))
        .fold(f64::INFINITY, f64::min)
}
