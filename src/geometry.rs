//! Point and segment distance math.
//!
//! Pure functions shared by edge hit-testing and vertex insertion. All
//! distances are in surface units.

use egui::Pos2;

/// Returns the squared distance between two points.
pub fn squared_distance(a: Pos2, b: Pos2) -> f32 {
    let d = a - b;
    d.x * d.x + d.y * d.y
}

/// Returns the squared distance from point `p` to the segment `[v, w]`.
///
/// Projects `p` onto the segment's supporting line, clamps the projection
/// parameter to `[0, 1]`, and measures against the clamped point. A
/// degenerate segment (`v == w`) degrades to the point distance.
pub fn squared_distance_to_segment(p: Pos2, v: Pos2, w: Pos2) -> f32 {
    let l2 = squared_distance(v, w);
    if l2 == 0.0 {
        return squared_distance(p, v);
    }

    let t = ((p - v).dot(w - v) / l2).clamp(0.0, 1.0);
    let projection = v + (w - v) * t;
    squared_distance(p, projection)
}

/// Returns the distance from point `p` to the segment `[v, w]`.
pub fn distance_to_segment(p: Pos2, v: Pos2, w: Pos2) -> f32 {
    squared_distance_to_segment(p, v, w).sqrt()
}
