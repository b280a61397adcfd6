//! Geometric utility functions

use crate::types::Vertex;

/// Normal returned for triangles whose area is too small to define a plane
const DEGENERATE_NORMAL: Vertex = Vertex {
    x: 0.0,
    y: 0.0,
    z: 1.0,
};

/// Plane through three points as `(unit normal, offset)`
///
/// The normal follows the right-hand rule for `a -> b -> c`, and the offset is
/// chosen so that [`signed_distance`] is zero on the plane. A degenerate
/// triangle gives normal `(0, 0, 1)` and offset `0`.
pub fn plane_from_points(a: &Vertex, b: &Vertex, c: &Vertex) -> (Vertex, f64) {
    match b.sub(a).cross(&c.sub(a)).try_normalize() {
        Some(normal) => {
            let offset = -normal.dot(a);
            (normal, offset)
        }
        None => (DEGENERATE_NORMAL, 0.0),
    }
}

/// Signed distance from a point to a plane (positive = in front of the plane)
#[inline]
pub fn signed_distance(point: &Vertex, normal: &Vertex, offset: f64) -> f64 {
    normal.dot(point) + offset
}

/// Squared distance from `point` to the closest point of segment `a`-`b`
pub fn squared_distance_to_segment(point: &Vertex, a: &Vertex, b: &Vertex) -> f64 {
    let ab = b.sub(a);
    let len_sq = ab.magnitude_squared();
    if len_sq == 0.0 {
        return point.distance_squared(a);
    }
    let t = (point.sub(a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    point.distance_squared(&a.add(&ab.scale(t)))
}

/// Per-axis extreme points of a flat coordinate slice
///
/// Returns `(min, max)` where `min[axis]` is the index of the first point
/// attaining the smallest coordinate along `axis` (likewise for `max`).
pub fn find_extreme_points(points: &[f64]) -> ([usize; 3], [usize; 3]) {
    let mut min = [0usize; 3];
    let mut max = [0usize; 3];
    let count = points.len() / 3;

    for i in 1..count {
        for axis in 0..3 {
            let value = points[3 * i + axis];
            if value < points[3 * min[axis] + axis] {
                min[axis] = i;
            }
            if value > points[3 * max[axis] + axis] {
                max[axis] = i;
            }
        }
    }

    (min, max)
}

/// Acceptance tolerance scaled to the magnitude of the input
///
/// `scale * f64::EPSILON * sum over axes of max(|min|, |max|)`.
pub fn compute_tolerance(points: &[f64], min: &[usize; 3], max: &[usize; 3], scale: f64) -> f64 {
    let extent: f64 = (0..3)
        .map(|axis| {
            let lo = points[3 * min[axis] + axis].abs();
            let hi = points[3 * max[axis] + axis].abs();
            lo.max(hi)
        })
        .sum();
    scale * f64::EPSILON * extent
}
