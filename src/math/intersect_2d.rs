use super::{Point2, TOLERANCE};

/// Bounded segment-segment intersection in 2D.
///
/// Returns `(intersection_point, t, u)` where `t` and `u` are in `[0, 1]`.
/// Parallel and collinear segments return `None`; see
/// [`collinear_overlap_2d`] for the latter.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> Option<(Point2, f64, f64)> {
    let da = a1 - a0;
    let db = b1 - b0;

    let cross = da.perp(&db);
    if cross.abs() < TOLERANCE {
        return None;
    }

    let d = b0 - a0;
    let t = d.perp(&db) / cross;
    let u = d.perp(&da) / cross;

    // Use a small epsilon to include endpoints.
    let eps = TOLERANCE;
    if t >= -eps && t <= 1.0 + eps && u >= -eps && u <= 1.0 + eps {
        let t_clamped = t.clamp(0.0, 1.0);
        Some((a0 + da * t_clamped, t_clamped, u.clamp(0.0, 1.0)))
    } else {
        None
    }
}

/// Returns `true` if two collinear segments share more than a single point.
#[must_use]
pub fn collinear_overlap_2d(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> bool {
    let da = a1 - a0;
    let len_sq = da.norm_squared();
    if len_sq < TOLERANCE {
        return false;
    }
    let scale = len_sq.sqrt();
    if da.perp(&(b0 - a0)).abs() / scale > TOLERANCE * scale.max(1.0)
        || da.perp(&(b1 - a0)).abs() / scale > TOLERANCE * scale.max(1.0)
    {
        return false;
    }
    let s0 = (b0 - a0).dot(&da) / len_sq;
    let s1 = (b1 - a0).dot(&da) / len_sq;
    let (lo, hi) = if s0 < s1 { (s0, s1) } else { (s1, s0) };
    hi.min(1.0) - lo.max(0.0) > TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn crossing_segments() {
        let (pt, t, u) =
            segment_segment_intersect_2d(&p(0.0, 0.0), &p(2.0, 2.0), &p(0.0, 2.0), &p(2.0, 0.0))
                .unwrap_or_else(|| panic!("segments should cross"));
        assert!((pt.x - 1.0).abs() < 1e-10 && (pt.y - 1.0).abs() < 1e-10);
        assert!((t - 0.5).abs() < 1e-10 && (u - 0.5).abs() < 1e-10);
    }

    #[test]
    fn disjoint_segments() {
        assert!(
            segment_segment_intersect_2d(&p(0.0, 0.0), &p(1.0, 0.0), &p(0.0, 1.0), &p(1.0, 2.0))
                .is_none()
        );
    }

    #[test]
    fn collinear_overlap_detected() {
        assert!(collinear_overlap_2d(&p(0.0, 0.0), &p(2.0, 0.0), &p(1.0, 0.0), &p(3.0, 0.0)));
        // Touching at a single endpoint is not an overlap.
        assert!(!collinear_overlap_2d(&p(0.0, 0.0), &p(1.0, 0.0), &p(1.0, 0.0), &p(2.0, 0.0)));
        assert!(!collinear_overlap_2d(&p(0.0, 0.0), &p(1.0, 0.0), &p(0.0, 1.0), &p(1.0, 1.0)));
    }
}
