//! Wacky Racers - a top-down racing game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (car kinematics, mask collision, finish line)
//! - `renderer`: Terminal rendering of the track and cars
//! - `platform`: Keyboard hold tracking and scripted input
//! - `headless`: Run a race from an input script without a terminal
//! - `settings`: Data-driven car tuning and game options

pub mod error;
pub mod headless;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation rate (one tick per frame)
    pub const FPS: u32 = 60;
    /// Maximum ticks run per rendered frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Track dimensions in pixels
    pub const TRACK_WIDTH: u32 = 810;
    pub const TRACK_HEIGHT: u32 = 810;
    /// Half the drivable width around the track centerline
    pub const TRACK_HALF_WIDTH: f32 = 40.0;

    /// Finish line top-left corner and size
    pub const FINISH_POS: (i32, i32) = (130, 250);
    pub const FINISH_SIZE: (u32, u32) = (92, 18);

    /// Car sprite size (unrotated, pointing up)
    pub const CAR_WIDTH: u32 = 18;
    pub const CAR_HEIGHT: u32 = 36;

    /// Start positions (top-left of the unrotated sprite)
    pub const PLAYER_START: (f32, f32) = (180.0, 200.0);
    pub const COMPUTER_START: (f32, f32) = (150.0, 200.0);

    /// Car tuning defaults
    pub const MAX_VEL: f32 = 4.0;
    pub const ROTATION_VEL: f32 = 4.0;
    pub const ACCELERATION: f32 = 0.1;

    /// Number of quantized orientations cached for the car mask
    pub const ROTATION_BUCKETS: u32 = 360;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

/// Unit direction a car faces at `angle` degrees (0 = up, counter-clockwise positive)
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    let radians = angle.to_radians();
    Vec2::new(-radians.sin(), -radians.cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-4.0), 356.0);
        assert_eq!(normalize_degrees(724.0), 4.0);
    }

    #[test]
    fn test_heading() {
        let up = heading(0.0);
        assert!(up.x.abs() < 1e-6 && (up.y + 1.0).abs() < 1e-6);
        let left = heading(90.0);
        assert!((left.x + 1.0).abs() < 1e-6 && left.y.abs() < 1e-6);
    }
}
