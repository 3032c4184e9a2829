//! Tolerance-bounded ring simplification (Douglas-Peucker).

use crate::geometry::ring_self_intersects;

/// Simplify a closed ring in place of its vertex list.
///
/// The ring is split at two anchors (vertex 0 and the vertex farthest from
/// it) and each half is reduced with Douglas-Peucker: no surviving chord
/// deviates from a removed vertex by more than `tolerance`. A tolerance of
/// zero removes exactly the collinear vertices.
///
/// If simplification would introduce a self-crossing the original ring is
/// returned unchanged. Rings that come back with fewer than 3 vertices
/// must be dropped by the caller.
pub fn simplify_ring(ring: &[(f64, f64)], tolerance: f64) -> Vec<(f64, f64)> {
    if ring.len() <= 3 {
        return ring.to_vec();
    }

    // Farthest vertex from vertex 0; always survives, which keeps repeated
    // simplification stable.
    let mut far = 1;
    let mut far_dist = 0.0;
    for (i, &(x, y)) in ring.iter().enumerate().skip(1) {
        let dx = x - ring[0].0;
        let dy = y - ring[0].1;
        let dist = dx * dx + dy * dy;
        if dist > far_dist {
            far_dist = dist;
            far = i;
        }
    }

    let first_half = douglas_peucker(&ring[..=far], tolerance);
    let mut second_points: Vec<(f64, f64)> = ring[far..].to_vec();
    second_points.push(ring[0]);
    let second_half = douglas_peucker(&second_points, tolerance);

    let mut out = first_half;
    // Both halves carry the shared anchors; keep each exactly once.
    out.extend(second_half[1..second_half.len() - 1].iter().copied());

    if out.len() >= 4 && ring_self_intersects(&out) {
        tracing::warn!(
            vertices = ring.len(),
            "simplification introduced a self-crossing, keeping original ring"
        );
        return ring.to_vec();
    }
    out
}

/// Douglas-Peucker on an open polyline, keeping both endpoints.
fn douglas_peucker(points: &[(f64, f64)], tolerance: f64) -> Vec<(f64, f64)> {
    let n = points.len();
    if n <= 2 {
        return points.to_vec();
    }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    let mut stack = vec![(0usize, n - 1)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }
        let mut max_dist = 0.0;
        let mut max_idx = start;
        for i in (start + 1)..end {
            let dist = perpendicular_distance(points[i], points[start], points[end]);
            if dist > max_dist {
                max_dist = dist;
                max_idx = i;
            }
        }
        if max_dist > tolerance {
            keep[max_idx] = true;
            stack.push((start, max_idx));
            stack.push((max_idx, end));
        }
    }

    points
        .iter()
        .zip(&keep)
        .filter_map(|(&p, &k)| k.then_some(p))
        .collect()
}

/// Distance from a point to the line through two anchors (or to the anchor
/// itself when they coincide).
fn perpendicular_distance(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return ((p.0 - a.0).powi(2) + (p.1 - a.1).powi(2)).sqrt();
    }
    (dy * (p.0 - a.0) - dx * (p.1 - a.1)).abs() / len
}
