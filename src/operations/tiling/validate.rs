use geo::{LineString, Polygon};

use crate::error::GeometryError;
use crate::math::intersect_2d::{collinear_overlap_2d, segment_segment_intersect_2d};
use crate::math::polygon_2d::{open_ring, point_in_ring, signed_area};
use crate::math::{from_coord, Point2, TOLERANCE};

/// Checks that `polygon` is valid: every ring is simple and non-degenerate,
/// rings neither cross nor touch each other, every hole lies inside the
/// exterior, and no hole lies inside another hole.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidPolygon`] naming `region` and the first
/// defect found.
pub fn validate_polygon(region: &str, polygon: &Polygon<f64>) -> Result<(), GeometryError> {
    let invalid = |reason: String| GeometryError::InvalidPolygon {
        region: region.to_owned(),
        reason,
    };

    let exterior = check_ring(polygon.exterior()).map_err(|r| invalid(format!("exterior ring: {r}")))?;
    let mut holes = Vec::with_capacity(polygon.interiors().len());
    for (i, hole) in polygon.interiors().iter().enumerate() {
        holes.push(check_ring(hole).map_err(|r| invalid(format!("hole {i}: {r}")))?);
    }

    for (i, hole) in holes.iter().enumerate() {
        if rings_touch(&exterior, hole) {
            return Err(invalid(format!("hole {i} touches the exterior ring")));
        }
        if !point_in_ring(&hole[0], &exterior) {
            return Err(invalid(format!("hole {i} lies outside the exterior ring")));
        }
        for (j, other) in holes.iter().enumerate().skip(i + 1) {
            if rings_touch(hole, other) {
                return Err(invalid(format!("holes {i} and {j} touch")));
            }
            if point_in_ring(&other[0], hole) || point_in_ring(&hole[0], other) {
                return Err(invalid(format!("holes {i} and {j} are nested")));
            }
        }
    }
    Ok(())
}

/// Returns the open, deduplicated ring if it is simple and non-degenerate.
fn check_ring(ring: &LineString<f64>) -> Result<Vec<Point2>, String> {
    let closed: Vec<Point2> = ring.coords().copied().map(from_coord).collect();
    if closed.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return Err("non-finite coordinate".into());
    }

    let mut pts: Vec<Point2> = Vec::with_capacity(closed.len());
    for &p in open_ring(&closed) {
        if pts.last() != Some(&p) {
            pts.push(p);
        }
    }
    while pts.len() > 1 && pts.first() == pts.last() {
        pts.pop();
    }
    if pts.len() < 3 {
        return Err(format!("only {} distinct vertices", pts.len()));
    }
    if signed_area(&pts).abs() < TOLERANCE {
        return Err("zero area".into());
    }

    let n = pts.len();
    for i in 0..n {
        let (a0, a1) = (&pts[i], &pts[(i + 1) % n]);
        for j in (i + 1)..n {
            let (b0, b1) = (&pts[j], &pts[(j + 1) % n]);
            if collinear_overlap_2d(a0, a1, b0, b1) {
                return Err(format!("edges {i} and {j} overlap"));
            }
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            if !adjacent && segment_segment_intersect_2d(a0, a1, b0, b1).is_some() {
                return Err(format!("edges {i} and {j} intersect"));
            }
        }
    }
    Ok(pts)
}

/// Returns `true` if any edge of `a` crosses, touches or overlaps an edge of `b`.
fn rings_touch(a: &[Point2], b: &[Point2]) -> bool {
    let (n, m) = (a.len(), b.len());
    (0..n).any(|i| {
        let (a0, a1) = (&a[i], &a[(i + 1) % n]);
        (0..m).any(|j| {
            let (b0, b1) = (&b[j], &b[(j + 1) % m]);
            collinear_overlap_2d(a0, a1, b0, b1) || segment_segment_intersect_2d(a0, a1, b0, b1).is_some()
        })
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use geo::{polygon, Rect};

    #[test]
    fn rectangle_is_valid() {
        let rect = Rect::new((0.0, 0.0), (2.0, 1.0)).to_polygon();
        assert!(validate_polygon("box", &rect).is_ok());
    }

    #[test]
    fn bowtie_is_rejected() {
        let bowtie = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0), (x: 1.0, y: 0.0), (x: 0.0, y: 1.0)];
        let err = validate_polygon("bowtie", &bowtie);
        assert!(matches!(
            err,
            Err(GeometryError::InvalidPolygon { ref region, .. }) if region == "bowtie"
        ));
    }

    #[test]
    fn collapsed_ring_is_rejected() {
        let sliver = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 2.0, y: 0.0)];
        assert!(validate_polygon("sliver", &sliver).is_err());
    }

    #[test]
    fn self_touching_hole_is_checked() {
        let bad_hole = polygon!(
            exterior: [(x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 4.0), (x: 0.0, y: 4.0)],
            interiors: [[(x: 1.0, y: 1.0), (x: 3.0, y: 3.0), (x: 3.0, y: 1.0), (x: 1.0, y: 3.0)]],
        );
        let err = validate_polygon("clad", &bad_hole).unwrap_err();
        assert!(err.to_string().contains("hole 0"), "{err}");
    }

    #[test]
    fn hole_crossing_exterior_is_rejected() {
        let poly = polygon!(
            exterior: [(x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 4.0), (x: 0.0, y: 4.0)],
            interiors: [[(x: 3.0, y: 1.0), (x: 6.0, y: 1.0), (x: 6.0, y: 2.0), (x: 3.0, y: 2.0)]],
        );
        let err = validate_polygon("bad", &poly).unwrap_err();
        assert!(err.to_string().contains("touches the exterior"), "{err}");
    }

    #[test]
    fn hole_outside_exterior_is_rejected() {
        let poly = polygon!(
            exterior: [(x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 4.0), (x: 0.0, y: 4.0)],
            interiors: [[(x: 5.0, y: 1.0), (x: 6.0, y: 1.0), (x: 6.0, y: 2.0), (x: 5.0, y: 2.0)]],
        );
        let err = validate_polygon("bad", &poly).unwrap_err();
        assert!(err.to_string().contains("outside the exterior"), "{err}");
    }

    #[test]
    fn overlapping_and_nested_holes_are_rejected() {
        let overlapping = polygon!(
            exterior: [(x: 0.0, y: 0.0), (x: 8.0, y: 0.0), (x: 8.0, y: 8.0), (x: 0.0, y: 8.0)],
            interiors: [
                [(x: 1.0, y: 1.0), (x: 4.0, y: 1.0), (x: 4.0, y: 4.0), (x: 1.0, y: 4.0)],
                [(x: 3.0, y: 3.0), (x: 6.0, y: 3.0), (x: 6.0, y: 6.0), (x: 3.0, y: 6.0)]
            ],
        );
        let err = validate_polygon("bad", &overlapping).unwrap_err();
        assert!(err.to_string().contains("holes 0 and 1 touch"), "{err}");

        let nested = polygon!(
            exterior: [(x: 0.0, y: 0.0), (x: 8.0, y: 0.0), (x: 8.0, y: 8.0), (x: 0.0, y: 8.0)],
            interiors: [
                [(x: 1.0, y: 1.0), (x: 7.0, y: 1.0), (x: 7.0, y: 7.0), (x: 1.0, y: 7.0)],
                [(x: 3.0, y: 3.0), (x: 5.0, y: 3.0), (x: 5.0, y: 5.0), (x: 3.0, y: 5.0)]
            ],
        );
        let err = validate_polygon("bad", &nested).unwrap_err();
        assert!(err.to_string().contains("nested"), "{err}");
    }

    #[test]
    fn disjoint_holes_are_valid() {
        let poly = polygon!(
            exterior: [(x: 0.0, y: 0.0), (x: 8.0, y: 0.0), (x: 8.0, y: 8.0), (x: 0.0, y: 8.0)],
            interiors: [
                [(x: 1.0, y: 1.0), (x: 3.0, y: 1.0), (x: 3.0, y: 3.0), (x: 1.0, y: 3.0)],
                [(x: 5.0, y: 5.0), (x: 7.0, y: 5.0), (x: 7.0, y: 7.0), (x: 5.0, y: 7.0)]
            ],
        );
        assert!(validate_polygon("clad", &poly).is_ok());
    }
}
