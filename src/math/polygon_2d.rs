use super::Point2;

/// Computes the signed area of a closed ring (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise. The ring is
/// treated as open: the closing edge (last, first) is implied.
#[must_use]
pub fn signed_area(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Even-odd point-in-ring test. Points exactly on the boundary may go either way.
#[must_use]
pub fn point_in_ring(p: &Point2, ring: &[Point2]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (&ring[i], &ring[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Returns `true` if `p` lies inside `exterior` and outside every hole.
#[must_use]
pub fn point_in_polygon(p: &Point2, exterior: &[Point2], holes: &[Vec<Point2>]) -> bool {
    point_in_ring(p, exterior) && !holes.iter().any(|h| point_in_ring(p, h))
}

/// Drops a trailing vertex that repeats the first one (closed-ring convention).
#[must_use]
pub fn open_ring(points: &[Point2]) -> &[Point2] {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) if points.len() > 1 && first == last => {
            &points[..points.len() - 1]
        }
        _ => points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::TOLERANCE;

    fn unit_square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn signed_area_ccw_square() {
        assert!((signed_area(&unit_square()) - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_cw_square() {
        let mut pts = unit_square();
        pts.reverse();
        assert!((signed_area(&pts) + 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_degenerate() {
        assert!(signed_area(&[Point2::new(0.0, 0.0)]).abs() < TOLERANCE);
        assert!(signed_area(&[]).abs() < TOLERANCE);
    }

    #[test]
    fn point_in_ring_basic() {
        let sq = unit_square();
        assert!(point_in_ring(&Point2::new(0.5, 0.5), &sq));
        assert!(!point_in_ring(&Point2::new(1.5, 0.5), &sq));
        assert!(!point_in_ring(&Point2::new(0.5, -0.1), &sq));
    }

    #[test]
    fn point_in_polygon_respects_holes() {
        let hole = vec![
            Point2::new(0.25, 0.25),
            Point2::new(0.75, 0.25),
            Point2::new(0.75, 0.75),
            Point2::new(0.25, 0.75),
        ];
        let holes = vec![hole];
        assert!(!point_in_polygon(&Point2::new(0.5, 0.5), &unit_square(), &holes));
        assert!(point_in_polygon(&Point2::new(0.1, 0.5), &unit_square(), &holes));
    }

    #[test]
    fn open_ring_strips_closing_vertex() {
        let mut closed = unit_square();
        closed.push(Point2::new(0.0, 0.0));
        assert_eq!(open_ring(&closed).len(), 4);
        assert_eq!(open_ring(&unit_square()).len(), 4);
    }
}
