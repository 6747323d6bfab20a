//! Shape-tween vertex morphing.
//!
//! Two correspondence modes:
//! - `Distributive`: vertices matched by relative arc-length position; both
//!   paths are resampled to a shared vertex count and blended pairwise.
//! - `Angular`: corner vertices (sharp direction changes) are matched first,
//!   in path order, and each corner-to-corner run is resampled separately.
//!   Falls back to distributive when the corner structures don't line up.

use stagekit_api_core::Point;

use crate::element::ShapePath;
use crate::tween::ShapeBlend;

/// Direction change at a vertex beyond this many degrees marks a corner.
const CORNER_ANGLE_DEG: f64 = 30.0;

/// Blend `a` toward `b` at parameter `t` (already eased by the caller).
pub fn morph(a: &ShapePath, b: &ShapePath, t: f64, blend: ShapeBlend) -> ShapePath {
    if a.is_empty() || b.is_empty() {
        return a.clone();
    }
    match blend {
        ShapeBlend::Distributive => distributive(a, b, t),
        ShapeBlend::Angular => angular(a, b, t),
    }
}

fn distributive(a: &ShapePath, b: &ShapePath, t: f64) -> ShapePath {
    let n = a.len().max(b.len()).max(2);
    let pa = resample(a, n);
    let pb = resample(b, n);
    ShapePath {
        points: lerp_points(&pa, &pb, t),
        closed: a.closed && b.closed,
    }
}

fn angular(a: &ShapePath, b: &ShapePath, t: f64) -> ShapePath {
    // Closed-path corner alignment needs a rotation search; resampling by
    // arc length handles those acceptably, so corners drive open paths only.
    if a.closed || b.closed {
        return distributive(a, b, t);
    }
    let ca = corner_indices(a);
    let cb = corner_indices(b);
    if ca.len() != cb.len() || ca.is_empty() {
        return distributive(a, b, t);
    }

    let runs_a = split_runs(&a.points, &ca);
    let runs_b = split_runs(&b.points, &cb);
    debug_assert_eq!(runs_a.len(), runs_b.len());

    let mut points: Vec<Point> = Vec::with_capacity(a.len().max(b.len()));
    for (run_a, run_b) in runs_a.iter().zip(runs_b.iter()) {
        let n = run_a.len().max(run_b.len()).max(2);
        let ra = resample(&ShapePath::open(run_a.clone()), n);
        let rb = resample(&ShapePath::open(run_b.clone()), n);
        let blended = lerp_points(&ra, &rb, t);
        // Runs share their boundary corner; drop the duplicate junction.
        let skip = usize::from(!points.is_empty());
        points.extend(blended.into_iter().skip(skip));
    }
    ShapePath {
        points,
        closed: false,
    }
}

/// Uniform arc-length resampling to exactly `n` vertices.
/// Open paths keep both endpoints; closed paths distribute samples around
/// the full loop without duplicating the seam.
fn resample(path: &ShapePath, n: usize) -> Vec<Point> {
    debug_assert!(n >= 2);
    if path.len() == 1 {
        return vec![path.points[0]; n];
    }
    let denom = if path.closed { n } else { n - 1 };
    (0..n)
        .map(|i| path.point_at(i as f64 / denom as f64))
        .collect()
}

fn lerp_points(a: &[Point], b: &[Point], t: f64) -> Vec<Point> {
    a.iter().zip(b.iter()).map(|(pa, pb)| pa.lerp(pb, t)).collect()
}

/// Interior vertices where the direction turns by more than the corner
/// threshold. Endpoints are implicit run boundaries and are not listed.
fn corner_indices(path: &ShapePath) -> Vec<usize> {
    let pts = &path.points;
    let mut corners = Vec::new();
    for i in 1..pts.len().saturating_sub(1) {
        let din = direction(&pts[i - 1], &pts[i]);
        let dout = direction(&pts[i], &pts[i + 1]);
        let (Some(din), Some(dout)) = (din, dout) else {
            continue;
        };
        let dot = (din.x * dout.x + din.y * dout.y).clamp(-1.0, 1.0);
        if dot.acos().to_degrees() > CORNER_ANGLE_DEG {
            corners.push(i);
        }
    }
    corners
}

fn direction(a: &Point, b: &Point) -> Option<Point> {
    let len = a.distance(b);
    if len <= 0.0 {
        return None;
    }
    Some(Point::new((b.x - a.x) / len, (b.y - a.y) / len))
}

/// Split an open point list into runs bounded by the given interior corner
/// indices (plus the path endpoints). Consecutive runs share their corner.
fn split_runs(points: &[Point], corners: &[usize]) -> Vec<Vec<Point>> {
    let mut boundaries = Vec::with_capacity(corners.len() + 2);
    boundaries.push(0);
    boundaries.extend_from_slice(corners);
    boundaries.push(points.len() - 1);

    boundaries
        .windows(2)
        .map(|w| points[w[0]..=w[1]].to_vec())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
    }

    fn line(from: (f64, f64), to: (f64, f64)) -> ShapePath {
        ShapePath::open(vec![Point::new(from.0, from.1), Point::new(to.0, to.1)])
    }

    #[test]
    fn distributive_midpoint_of_segments() {
        let a = line((0.0, 0.0), (10.0, 0.0));
        let b = line((0.0, 10.0), (10.0, 10.0));
        let m = morph(&a, &b, 0.5, ShapeBlend::Distributive);
        assert_eq!(m.len(), 2);
        approx(m.points[0].y, 5.0, 1e-12);
        approx(m.points[1].y, 5.0, 1e-12);
    }

    #[test]
    fn distributive_resamples_to_common_count() {
        let a = ShapePath::open(vec![
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(10.0, 0.0),
        ]);
        let b = line((0.0, 10.0), (10.0, 10.0));
        let m = morph(&a, &b, 0.5, ShapeBlend::Distributive);
        assert_eq!(m.len(), 3);
        // Middle vertex sits at the arc-length midpoint of both paths.
        approx(m.points[1].x, 5.0, 1e-12);
        approx(m.points[1].y, 5.0, 1e-12);
    }

    #[test]
    fn morph_endpoints_are_sources() {
        let a = line((0.0, 0.0), (10.0, 0.0));
        let b = line((2.0, 4.0), (8.0, 4.0));
        let at0 = morph(&a, &b, 0.0, ShapeBlend::Distributive);
        let at1 = morph(&a, &b, 1.0, ShapeBlend::Distributive);
        approx(at0.points[0].x, 0.0, 1e-12);
        approx(at0.points[0].y, 0.0, 1e-12);
        approx(at1.points[1].x, 8.0, 1e-12);
        approx(at1.points[1].y, 4.0, 1e-12);
    }

    #[test]
    fn angular_preserves_matched_corner() {
        // Both paths are right angles: corner halfway along each.
        let a = ShapePath::open(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ]);
        let b = ShapePath::open(vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(-10.0, 10.0),
        ]);
        let m = morph(&a, &b, 0.5, ShapeBlend::Angular);
        // Corner vertex blends corner-to-corner, not by raw arc position.
        let corner = m.points[1];
        approx(corner.x, 5.0, 1e-12);
        approx(corner.y, 5.0, 1e-12);
        assert_eq!(m.len(), 3);
    }

    #[test]
    fn angular_falls_back_when_corner_counts_differ() {
        let bent = ShapePath::open(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ]);
        let straight = line((0.0, 0.0), (20.0, 0.0));
        let m = morph(&bent, &straight, 0.5, ShapeBlend::Angular);
        // Falls back to distributive: common count is 3.
        assert_eq!(m.len(), 3);
    }

    #[test]
    fn empty_side_holds_left() {
        let a = line((0.0, 0.0), (1.0, 0.0));
        let empty = ShapePath::default();
        assert_eq!(morph(&a, &empty, 0.7, ShapeBlend::Distributive), a);
    }
}
