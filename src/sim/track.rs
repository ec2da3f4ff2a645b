//! Static track geometry: border mask and finish line
//!
//! The border mask sits at the origin and marks every pixel a car may not
//! touch. The finish mask has its own position and a normal pointing in the
//! direction a valid lap crossing travels.

use glam::{IVec2, UVec2, Vec2};

use super::mask::OccupancyMask;
use super::path::Path;
use super::sdf::sd_closed_polyline;
use crate::consts::*;

#[derive(Debug, Clone)]
pub struct Track {
    pub border: OccupancyMask,
    pub finish: OccupancyMask,
    /// Top-left of the finish mask in track coordinates
    pub finish_pos: IVec2,
    /// Unit direction of a valid crossing
    pub finish_normal: Vec2,
}

impl Track {
    pub fn new(
        border: OccupancyMask,
        finish: OccupancyMask,
        finish_pos: IVec2,
        finish_normal: Vec2,
    ) -> Self {
        Self {
            border,
            finish,
            finish_pos,
            finish_normal: finish_normal.normalize_or_zero(),
        }
    }

    /// The built-in circuit: a road of `half_width` around the circuit
    /// waypoints, finish line across the start straight, crossed upward.
    pub fn circuit(half_width: f32) -> Self {
        let centerline = Path::circuit();
        let border = centerline_border(centerline.points(), TRACK_WIDTH, TRACK_HEIGHT, half_width);
        let finish = OccupancyMask::filled(FINISH_SIZE.0, FINISH_SIZE.1);
        log::debug!(
            "Built circuit {}x{}, {} border pixels",
            TRACK_WIDTH,
            TRACK_HEIGHT,
            border.count()
        );
        Self::new(
            border,
            finish,
            IVec2::new(FINISH_POS.0, FINISH_POS.1),
            Vec2::NEG_Y,
        )
    }

    pub fn size(&self) -> UVec2 {
        self.border.size()
    }

    /// Whether a point in track coordinates lies on the finish mask
    pub fn on_finish(&self, p: IVec2) -> bool {
        let local = p - self.finish_pos;
        self.finish.get(local.x, local.y)
    }
}

/// Mask of every pixel farther than `half_width` from the closed centerline
pub fn centerline_border(centerline: &[Vec2], width: u32, height: u32, half_width: f32) -> OccupancyMask {
    OccupancyMask::from_fn(width, height, |x, y| {
        let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
        sd_closed_polyline(p, centerline) > half_width
    })
}
