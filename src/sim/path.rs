//! Waypoint paths
//!
//! The computer car carries one. Nothing steers along it yet; it is drawn,
//! extended by recorded clicks, and dumped as JSON when the game exits.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Hand-placed points around the built-in circuit, in driving order
pub const DEFAULT_PATH: [(f32, f32); 26] = [
    (176.0, 133.0),
    (116.0, 78.0),
    (60.0, 135.0),
    (72.0, 478.0),
    (306.0, 729.0),
    (388.0, 707.0),
    (407.0, 558.0),
    (496.0, 478.0),
    (597.0, 566.0),
    (598.0, 677.0),
    (667.0, 738.0),
    (742.0, 661.0),
    (739.0, 408.0),
    (680.0, 364.0),
    (452.0, 367.0),
    (398.0, 315.0),
    (457.0, 259.0),
    (684.0, 270.0),
    (740.0, 177.0),
    (675.0, 76.0),
    (331.0, 78.0),
    (280.0, 129.0),
    (283.0, 367.0),
    (228.0, 419.0),
    (175.0, 358.0),
    (176.0, 256.0),
];

/// Ordered list of waypoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path {
    points: Vec<Vec2>,
}

impl Path {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    pub const fn empty() -> Self {
        Self { points: Vec::new() }
    }

    /// The built-in circuit's waypoints
    pub fn circuit() -> Self {
        Self::new(DEFAULT_PATH.iter().map(|&(x, y)| Vec2::new(x, y)).collect())
    }

    pub fn push(&mut self, point: Vec2) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
