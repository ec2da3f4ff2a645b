//! Polar-to-cartesian motion integration
//!
//! Orientation is in degrees, 0 pointing up the screen, positive angles
//! turning counter-clockwise. Screen y grows downward.

use glam::Vec2;

/// Move `pos` one tick along `angle` at signed speed `vel`
#[inline]
pub fn advance(pos: Vec2, angle: f32, vel: f32) -> Vec2 {
    let radians = angle.to_radians();
    let vertical = radians.cos() * vel;
    let horizontal = radians.sin() * vel;
    Vec2::new(pos.x - horizontal, pos.y - vertical)
}

/// Velocity vector for signed speed `vel` at `angle`
#[inline]
pub fn velocity_vector(angle: f32, vel: f32) -> Vec2 {
    crate::heading(angle) * vel
}
