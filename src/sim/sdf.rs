//! Signed distance helpers used to rasterize track and sprite masks

use glam::Vec2;

/// Distance from `p` to the segment `a`-`b`
#[inline]
pub fn sd_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let pa = p - a;
    let ba = b - a;
    let len_sq = ba.length_squared();
    if len_sq < 1e-6 {
        return pa.length(); // Degenerate segment
    }
    let t = (pa.dot(ba) / len_sq).clamp(0.0, 1.0);
    (pa - ba * t).length()
}

/// Distance from `p` to a closed polyline through `points`
///
/// Returns `f32::INFINITY` for an empty polyline.
pub fn sd_closed_polyline(p: Vec2, points: &[Vec2]) -> f32 {
    match points {
        [] => f32::INFINITY,
        [only] => (p - *only).length(),
        _ => points
            .iter()
            .zip(points.iter().cycle().skip(1))
            .map(|(&a, &b)| sd_segment(p, a, b))
            .fold(f32::INFINITY, f32::min),
    }
}

/// Signed distance to an axis-aligned box with rounded corners
///
/// `center` and `half_size` describe the box before rounding; `radius`
/// shrinks the corners inward.
#[inline]
pub fn sd_rounded_box(p: Vec2, center: Vec2, half_size: Vec2, radius: f32) -> f32 {
    let q = (p - center).abs() - half_size + Vec2::splat(radius);
    q.max(Vec2::ZERO).length() + q.x.max(q.y).min(0.0) - radius
}
