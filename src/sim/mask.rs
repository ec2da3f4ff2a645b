//! Per-pixel occupancy masks for pixel-accurate collision
//!
//! A mask is a `width × height` grid of bits, row-major, one `u64` word per
//! 64 columns. Bit set = opaque pixel.

use glam::{IVec2, UVec2, Vec2};

use crate::error::{Error, Result};

/// Alpha values above this count as opaque when building from RGBA
pub const ALPHA_THRESHOLD: u8 = 127;

/// Bitmap of opaque pixels
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OccupancyMask {
    width: u32,
    height: u32,
    /// Words per row
    stride: usize,
    bits: Vec<u64>,
}

impl OccupancyMask {
    /// Fully transparent mask
    pub fn new(width: u32, height: u32) -> Self {
        let stride = (width as usize).div_ceil(64);
        Self {
            width,
            height,
            stride,
            bits: vec![0; stride * height as usize],
        }
    }

    /// Fully opaque mask
    pub fn filled(width: u32, height: u32) -> Self {
        Self::from_fn(width, height, |_, _| true)
    }

    /// Build a mask by evaluating `opaque(x, y)` for every pixel
    pub fn from_fn<F>(width: u32, height: u32, mut opaque: F) -> Self
    where
        F: FnMut(u32, u32) -> bool,
    {
        let mut mask = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if opaque(x, y) {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    /// Build a mask from a tightly packed RGBA8 buffer using the alpha channel
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(Error::MaskSize {
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self::from_fn(width, height, |x, y| {
            let i = (y as usize * width as usize + x as usize) * 4;
            rgba[i + 3] > ALPHA_THRESHOLD
        }))
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    /// Whether pixel (x, y) is opaque; out-of-bounds pixels are transparent
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        let (word, bit) = self.locate(x as u32, y as u32);
        self.bits[word] & (1 << bit) != 0
    }

    /// Set or clear pixel (x, y). Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, opaque: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let (word, bit) = self.locate(x, y);
        if opaque {
            self.bits[word] |= 1 << bit;
        } else {
            self.bits[word] &= !(1 << bit);
        }
    }

    #[inline]
    fn locate(&self, x: u32, y: u32) -> (usize, u32) {
        (y as usize * self.stride + (x / 64) as usize, x % 64)
    }

    /// Number of opaque pixels
    pub fn count(&self) -> u32 {
        self.bits.iter().map(|w| w.count_ones()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&w| w == 0)
    }

    /// First pixel where `other`, placed with its origin at `offset` in this
    /// mask's coordinates, overlaps this mask.
    ///
    /// Rows are scanned top to bottom, columns left to right. The returned
    /// point is in this mask's coordinates.
    pub fn overlap(&self, other: &OccupancyMask, offset: IVec2) -> Option<IVec2> {
        let x0 = offset.x.max(0);
        let y0 = offset.y.max(0);
        let x1 = (offset.x + other.width as i32).min(self.width as i32);
        let y1 = (offset.y + other.height as i32).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }

        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x, y) && other.get(x - offset.x, y - offset.y) {
                    return Some(IVec2::new(x, y));
                }
            }
        }
        None
    }

    /// Copy of this mask rotated counter-clockwise by `angle` degrees about
    /// its center.
    ///
    /// The result is sized to the rotated bounding box, so a 90° rotation
    /// swaps width and height. Sampling is nearest-neighbour from each
    /// destination pixel center.
    pub fn rotated(&self, angle: f32) -> OccupancyMask {
        let angle = crate::normalize_degrees(angle);
        if angle == 0.0 {
            return self.clone();
        }

        let (sin, cos) = angle.to_radians().sin_cos();
        let w = self.width as f32;
        let h = self.height as f32;
        // Shave float noise so exact quarter turns do not gain a pixel
        let out_w = (w * cos.abs() + h * sin.abs() - 1e-3).ceil().max(0.0) as u32;
        let out_h = (w * sin.abs() + h * cos.abs() - 1e-3).ceil().max(0.0) as u32;

        let src_center = Vec2::new(w, h) / 2.0;
        let dst_center = Vec2::new(out_w as f32, out_h as f32) / 2.0;

        OccupancyMask::from_fn(out_w, out_h, |x, y| {
            let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - dst_center;
            // Inverse of the screen-space counter-clockwise rotation
            let src = Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos) + src_center;
            self.get(src.x.floor() as i32, src.y.floor() as i32)
        })
    }
}
