//! Rotated sprite masks cached per quantized orientation
//!
//! Rebuilding a rotated mask every tick is wasteful; orientations are
//! snapped to `buckets` evenly spaced angles and each bucket's mask is built
//! once on first use.

use std::collections::HashMap;

use super::mask::OccupancyMask;
use crate::normalize_degrees;

#[derive(Debug, Clone)]
pub struct RotatedMaskCache {
    base: OccupancyMask,
    buckets: u32,
    masks: HashMap<u32, OccupancyMask>,
}

impl RotatedMaskCache {
    /// `buckets` is clamped to at least 1 (a single bucket never rotates)
    pub fn new(base: OccupancyMask, buckets: u32) -> Self {
        Self {
            base,
            buckets: buckets.max(1),
            masks: HashMap::new(),
        }
    }

    /// The unrotated sprite mask
    pub fn base(&self) -> &OccupancyMask {
        &self.base
    }

    /// Degrees covered by one bucket
    pub fn step(&self) -> f32 {
        360.0 / self.buckets as f32
    }

    /// Bucket index nearest to `angle`
    pub fn bucket(&self, angle: f32) -> u32 {
        let index = (normalize_degrees(angle) / self.step()).round() as u32;
        index % self.buckets
    }

    /// Mask for the sprite rotated to `angle` degrees
    pub fn get(&mut self, angle: f32) -> &OccupancyMask {
        let bucket = self.bucket(angle);
        let step = self.step();
        let base = &self.base;
        self.masks
            .entry(bucket)
            .or_insert_with(|| base.rotated(bucket as f32 * step))
    }

    /// Number of orientations built so far
    pub fn cached(&self) -> usize {
        self.masks.len()
    }
}
