//! Collision probe between a car sprite and static track masks
//!
//! Positions are floating point; masks live on the integer pixel grid. The
//! sprite's origin is floored relative to the reference mask's origin before
//! the overlap scan.

use glam::{IVec2, UVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::mask::OccupancyMask;

/// Which side of the finish line a car came through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishCrossing {
    /// Travelling with the race direction: lap complete
    Forward,
    /// Entered from the far side
    WrongWay,
}

/// How a finish-line overlap is classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishRule {
    /// Sign of the car's velocity along the finish normal
    #[default]
    Heading,
    /// First overlap on the finish mask's top row means wrong way
    ScanRow,
}

/// Overlap point (in `reference` coordinates) of `sprite` drawn with its
/// top-left at `sprite_pos`, against `reference` drawn at `reference_pos`
pub fn probe(
    reference: &OccupancyMask,
    reference_pos: IVec2,
    sprite: &OccupancyMask,
    sprite_pos: Vec2,
) -> Option<IVec2> {
    let offset = (sprite_pos - reference_pos.as_vec2()).floor().as_ivec2();
    reference.overlap(sprite, offset)
}

/// Top-left of a rotated sprite that keeps the unrotated sprite's center
///
/// `pos` is the top-left of the unrotated sprite of size `base`.
#[inline]
pub fn rotated_origin(pos: Vec2, base: UVec2, rotated: UVec2) -> Vec2 {
    pos + (base.as_vec2() - rotated.as_vec2()) / 2.0
}

/// Decide which way a car crossed the finish line
///
/// `point` is the first overlap point in finish-mask coordinates,
/// `velocity` the car's velocity vector and `normal` the finish normal.
pub fn classify_crossing(rule: FinishRule, point: IVec2, velocity: Vec2, normal: Vec2) -> FinishCrossing {
    let forward = match rule {
        FinishRule::Heading => velocity.dot(normal) > 0.0,
        FinishRule::ScanRow => point.y != 0,
    };
    if forward {
        FinishCrossing::Forward
    } else {
        FinishCrossing::WrongWay
    }
}
