//! Normalized image-space geometry.
//!
//! All coordinates live in the detector's normalized space: `0..1` on both
//! axes, with `y` growing downward.

/// Axis-aligned box `[x1, y1, x2, y2]` with `x1 <= x2` and `y1 <= y2`.
pub type BBox = [f64; 4];

/// Point `[x, y]`.
pub type Point = [f64; 2];

/// Added to the edge-intersection denominator so horizontal edges never divide by zero.
const RAY_CAST_EPSILON: f64 = 1e-9;

/// Box area. Inverted or degenerate boxes have zero area.
pub fn area(b: &BBox) -> f64 {
    let w = (b[2] - b[0]).max(0.0);
    let h = (b[3] - b[1]).max(0.0);
    w * h
}

/// Intersection over union, in `[0, 1]`.
///
/// Returns 0 when both boxes are degenerate (zero union).
pub fn iou(a: &BBox, b: &BBox) -> f64 {
    let x1 = a[0].max(b[0]);
    let y1 = a[1].max(b[1]);
    let x2 = a[2].min(b[2]);
    let y2 = a[3].min(b[3]);
    let inter = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
    let union = area(a) + area(b) - inter;
    if union == 0.0 {
        0.0
    } else {
        inter / union
    }
}

/// Midpoint of a box.
pub fn center(b: &BBox) -> Point {
    [(b[0] + b[2]) / 2.0, (b[1] + b[3]) / 2.0]
}

/// Ray-casting parity test. The polygon is closed (last vertex joins the first).
///
/// Polygons with fewer than 3 vertices contain nothing.
pub fn point_in_polygon(point: &Point, polygon: &[Point]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let [x, y] = *point;
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for (i, vi) in polygon.iter().enumerate() {
        let [xi, yi] = *vi;
        let [xj, yj] = polygon[j];
        let straddles = (yi > y) != (yj > y);
        if straddles && x < (xj - xi) * (y - yi) / (yj - yi + RAY_CAST_EPSILON) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}
