//! Per-pixel compositing
//!
//! Every primitive funnels its writes through `composite()`, so the active
//! pixel mode and blend factor apply uniformly to lines, fills, sprites and text.

use super::pixel::Pixel;
use super::pixel_buffer::PixelBuffer;

/// How a source pixel is combined with the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelMode {
    /// Straight overwrite, alpha included
    #[default]
    Normal,
    /// Overwrite only fully opaque source pixels
    Mask,
    /// Blend by source alpha scaled by the blend factor
    Alpha,
}

/// Write `src` at (x, y) under `mode`.
///
/// In `Alpha` mode the colour channels are `a * src + (1 - a) * dst` with
/// `a = src.a / 255 * blend`, truncated; the written alpha is always 255.
#[inline]
pub fn composite(target: &mut PixelBuffer, x: i32, y: i32, src: Pixel, mode: PixelMode, blend: f32) {
    match mode {
        PixelMode::Normal => target.set_pixel(x, y, src),
        PixelMode::Mask => {
            if src.is_opaque() {
                target.set_pixel(x, y, src);
            }
        },
        PixelMode::Alpha => {
            let d = target.get_pixel(x, y);
            let a = (src.a as f32 / 255.0) * blend;
            let c = 1.0 - a;
            let r = a * src.r as f32 + c * d.r as f32;
            let g = a * src.g as f32 + c * d.g as f32;
            let b = a * src.b as f32 + c * d.b as f32;
            target.set_pixel(x, y, Pixel::rgb(r as u8, g as u8, b as u8));
        },
    }
}

/// Current compositing state: pixel mode plus blend factor in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Compositor {
    mode: PixelMode,
    blend: f32,
}

impl Compositor {
    pub fn new() -> Self {
        Self {
            mode: PixelMode::Normal,
            blend: 1.0,
        }
    }

    #[inline]
    pub fn mode(&self) -> PixelMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: PixelMode) {
        self.mode = mode;
    }

    #[inline]
    pub fn blend(&self) -> f32 {
        self.blend
    }

    /// Set the blend factor, clamped to [0, 1]. NaN resets to 1.0.
    pub fn set_blend(&mut self, blend: f32) {
        self.blend = if blend.is_nan() { 1.0 } else { blend.clamp(0.0, 1.0) };
    }

    /// Composite one pixel using the current state
    #[inline]
    pub fn composite(&self, target: &mut PixelBuffer, x: i32, y: i32, src: Pixel) {
        composite(target, x, y, src, self.mode, self.blend);
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}
