//! Quadratic Bezier resampling of a polyline.

use glam::Vec3;

/// Resample `points` as a chain of quadratic Bezier segments
///
/// Points are consumed in triples `p[i], p[i+1], p[i+2]` for `i = 0, 2, 4, ...`:
/// anchor, control, next anchor. Each triple yields `vertex_count + 1` samples
/// at ratios `k / vertex_count`, evaluated by nested linear interpolation, so
/// every segment starts exactly on its anchor.
///
/// Fewer than three points (or a zero vertex count) yields an empty vector.
pub fn smooth(points: &[Vec3], vertex_count: usize) -> Vec<Vec3> {
    if vertex_count == 0 || points.len() < 3 {
        return Vec::new();
    }

    let segments = (points.len() - 1) / 2;
    let mut smoothed = Vec::with_capacity(segments * (vertex_count + 1));

    for i in (0..points.len() - 2).step_by(2) {
        let (anchor, control, next) = (points[i], points[i + 1], points[i + 2]);
        for k in 0..=vertex_count {
            let ratio = k as f32 / vertex_count as f32;
            let tangent1 = anchor.lerp(control, ratio);
            let tangent2 = control.lerp(next, ratio);
            smoothed.push(tangent1.lerp(tangent2, ratio));
        }
    }

    smoothed
}
