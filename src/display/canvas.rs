//! Rasterizer
//!
//! Integer scan algorithms for lines, circles, rectangles, triangles, sprites
//! and text. Every pixel goes through the compositor, so masking and alpha
//! blending apply to all primitives alike.

use super::compositor::{Compositor, PixelMode};
use super::font::{GlyphAtlas, GLYPH_HEIGHT, GLYPH_WIDTH};
use super::pixel::{Pixel, BLANK};
use super::pixel_buffer::PixelBuffer;
use super::scan::{merge_ranges, CircleWalk, LineWalk};

/// A draw target bound together with the compositing state and font
pub struct Canvas<'a> {
    target: &'a mut PixelBuffer,
    compositor: &'a mut Compositor,
    font: &'a GlyphAtlas,
    clip_width: i32,
    clip_height: i32,
}

impl<'a> Canvas<'a> {
    /// Bind a target. `fill_rect` clips to the target's own size.
    pub fn new(
        target: &'a mut PixelBuffer,
        compositor: &'a mut Compositor,
        font: &'a GlyphAtlas,
    ) -> Self {
        let clip_width = target.width() as i32;
        let clip_height = target.height() as i32;
        Self {
            target,
            compositor,
            font,
            clip_width,
            clip_height,
        }
    }

    /// Override the rectangle `fill_rect` clamps to (the engine uses its screen size)
    pub fn with_clip(mut self, width: u32, height: u32) -> Self {
        self.clip_width = width as i32;
        self.clip_height = height as i32;
        self
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.target.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.target.height()
    }

    pub fn target(&self) -> &PixelBuffer {
        &*self.target
    }

    pub fn pixel_mode(&self) -> PixelMode {
        self.compositor.mode()
    }

    pub fn set_pixel_mode(&mut self, mode: PixelMode) {
        self.compositor.set_mode(mode);
    }

    pub fn pixel_blend(&self) -> f32 {
        self.compositor.blend()
    }

    pub fn set_pixel_blend(&mut self, blend: f32) {
        self.compositor.set_blend(blend);
    }

    // ========================================================================
    // Points and spans
    // ========================================================================

    /// Composite a single pixel
    #[inline]
    pub fn draw(&mut self, x: i32, y: i32, p: Pixel) {
        self.compositor.composite(self.target, x, y, p);
    }

    /// Composite at wide coordinates; anything outside `i32` is off every target
    #[inline]
    fn plot(&mut self, x: i64, y: i64, p: Pixel) {
        if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
            self.draw(x, y, p);
        }
    }

    /// Composite the inclusive span [x1, x2] on row y, clipped to the target
    fn hspan(&mut self, x1: i64, x2: i64, y: i64, p: Pixel) {
        if y < 0 || y >= i64::from(self.target.height()) {
            return;
        }
        let start = x1.max(0);
        let end = x2.min(i64::from(self.target.width()) - 1);
        for x in start..=end {
            self.plot(x, y, p);
        }
    }

    /// Raw fill of the whole target (no compositing)
    pub fn clear(&mut self, p: Pixel) {
        self.target.clear(p);
    }

    // ========================================================================
    // Lines
    // ========================================================================

    /// Bresenham line, endpoints included.
    ///
    /// Steps along the dominant axis from the lower endpoint, so a line and
    /// its reverse cover the same pixels. Only the steps whose major
    /// coordinate falls on the target are visited.
    pub fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, p: Pixel) {
        let line = LineWalk::new(x1, y1, x2, y2);
        for i in line.steps_within(self.target.width(), self.target.height()) {
            let (x, y) = line.point(i);
            self.plot(x, y, p);
        }
    }

    // ========================================================================
    // Circles
    // ========================================================================

    /// Midpoint circle outline (8-way symmetry). Radius 0 draws nothing.
    ///
    /// Only octant columns that can put a point on the target are stepped.
    pub fn draw_circle(&mut self, x: i32, y: i32, radius: i32, p: Pixel) {
        if radius <= 0 {
            return;
        }

        let circle = CircleWalk::new(radius);
        let (x, y) = (i64::from(x), i64::from(y));
        let w = i64::from(self.target.width());
        let h = i64::from(self.target.height());
        // Column x0 lands on the target only if x +- x0 or y +- x0 does
        let columns = [(x - w + 1, x), (-x, w - 1 - x), (y - h + 1, y), (-y, h - 1 - y)];

        for (first, last) in merge_ranges(&columns, 0, circle.last_column()) {
            for x0 in first..=last {
                let y0 = circle.row(x0);
                self.plot(x - x0, y - y0, p);
                self.plot(x - y0, y - x0, p);
                self.plot(x + y0, y - x0, p);
                self.plot(x + x0, y - y0, p);
                self.plot(x - x0, y + y0, p);
                self.plot(x - y0, y + x0, p);
                self.plot(x + y0, y + x0, p);
                self.plot(x + x0, y + y0, p);
            }
        }
    }

    /// Filled disc using the same midpoint stepping as `draw_circle`.
    ///
    /// Each step contributes centred spans on four rows; only the widest
    /// span per row is composited. In `Alpha` mode a pixel is therefore
    /// blended once, not once per step that reaches its row. Rows off the
    /// target are never visited.
    pub fn fill_circle(&mut self, x: i32, y: i32, radius: i32, p: Pixel) {
        if radius <= 0 {
            return;
        }

        let circle = CircleWalk::new(radius);
        let (x, y) = (i64::from(x), i64::from(y));
        let h = i64::from(self.target.height());
        let rows = [(y - h + 1, y), (-y, h - 1 - y)];

        for (first, last) in merge_ranges(&rows, 0, i64::from(radius)) {
            for row in first..=last {
                let w = circle.half_width(row);
                self.hspan(x - w, x + w, y - row, p);
                if row != 0 {
                    self.hspan(x - w, x + w, y + row, p);
                }
            }
        }
    }

    // ========================================================================
    // Rectangles
    // ========================================================================

    /// Outline from (x, y) to (x + w, y + h) inclusive: a (w+1) x (h+1) box
    pub fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, p: Pixel) {
        let x2 = x.saturating_add(w);
        let y2 = y.saturating_add(h);
        self.draw_line(x, y, x2, y, p);
        self.draw_line(x2, y, x2, y2, p);
        self.draw_line(x2, y2, x, y2, p);
        self.draw_line(x, y2, x, y, p);
    }

    /// Fill [x, x + w) x [y, y + h), clamped to the clip rectangle
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, p: Pixel) {
        let x1 = x.clamp(0, self.clip_width);
        let y1 = y.clamp(0, self.clip_height);
        let x2 = x.saturating_add(w).clamp(0, self.clip_width);
        let y2 = y.saturating_add(h).clamp(0, self.clip_height);

        for j in y1..y2 {
            for i in x1..x2 {
                self.draw(i, j, p);
            }
        }
    }

    // ========================================================================
    // Triangles
    // ========================================================================

    pub fn draw_triangle(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, x3: i32, y3: i32, p: Pixel) {
        self.draw_line(x1, y1, x2, y2, p);
        self.draw_line(x2, y2, x3, y3, p);
        self.draw_line(x3, y3, x1, y1, p);
    }

    /// Scan-line triangle fill.
    ///
    /// Each edge is stepped exactly as `draw_line` steps it; a row spans
    /// from the leftmost to the rightmost edge pixel on that row. The
    /// outline from `draw_triangle` always lies inside the fill, and flat
    /// tops, flat bottoms and fully flat triangles each get exactly one
    /// span per row. Rows off the target are skipped.
    pub fn fill_triangle(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, x3: i32, y3: i32, p: Pixel) {
        let edges = [
            LineWalk::new(x1, y1, x2, y2),
            LineWalk::new(x2, y2, x3, y3),
            LineWalk::new(x3, y3, x1, y1),
        ];
        let top = i64::from(y1.min(y2).min(y3)).max(0);
        let bottom = i64::from(y1.max(y2).max(y3)).min(i64::from(self.target.height()) - 1);

        for y in top..=bottom {
            let span = edges
                .iter()
                .filter_map(|edge| edge.row_extent(y))
                .reduce(|(alo, ahi), (blo, bhi)| (alo.min(blo), ahi.max(bhi)));
            if let Some((lo, hi)) = span {
                self.hspan(lo, hi, y, p);
            }
        }
    }

    // ========================================================================
    // Sprites
    // ========================================================================

    /// Composite a whole sprite with its top-left at (x, y)
    pub fn draw_sprite(&mut self, x: i32, y: i32, sprite: &PixelBuffer) {
        let (x, y) = (i64::from(x), i64::from(y));
        for j in 0..sprite.height() as i32 {
            for i in 0..sprite.width() as i32 {
                self.plot(x + i64::from(i), y + i64::from(j), sprite.get_pixel(i, j));
            }
        }
    }

    /// Composite the w x h window of `sprite` starting at (ox, oy).
    /// Reads past the sprite's edges yield `BLANK`.
    pub fn draw_partial_sprite(
        &mut self,
        x: i32,
        y: i32,
        sprite: &PixelBuffer,
        ox: i32,
        oy: i32,
        w: i32,
        h: i32,
    ) {
        let (x, y) = (i64::from(x), i64::from(y));
        // Only the part of the window that lands on the target
        let cols = (-x).max(0)..i64::from(w).min(i64::from(self.target.width()) - x);
        let rows = (-y).max(0)..i64::from(h).min(i64::from(self.target.height()) - y);

        for j in rows {
            for i in cols.clone() {
                let src = sample(sprite, i + i64::from(ox), j + i64::from(oy));
                self.plot(x + i, y + j, src);
            }
        }
    }

    // ========================================================================
    // Text
    // ========================================================================

    /// Draw text with the 8x8 font, each glyph pixel expanded to scale x scale.
    ///
    /// Opaque colours are drawn in `Mask` mode, translucent ones in `Alpha`;
    /// the previous pixel mode is restored afterwards. `'\n'` returns to x and
    /// moves down one line. Characters outside 32..=127 draw nothing but
    /// still take up a cell.
    pub fn draw_string(&mut self, x: i32, y: i32, text: &str, col: Pixel, scale: u32) {
        let saved = self.compositor.mode();
        self.compositor.set_mode(if col.is_opaque() {
            PixelMode::Mask
        } else {
            PixelMode::Alpha
        });

        let scale = i64::from(scale);
        let (x, y) = (i64::from(x), i64::from(y));
        let height = i64::from(self.target.height());
        let mut sx = 0i64;
        let mut sy = 0i64;

        for ch in text.chars() {
            if ch == '\n' {
                sx = 0;
                sy = sy.saturating_add(i64::from(GLYPH_HEIGHT) * scale);
                continue;
            }

            for gy in 0..GLYPH_HEIGHT {
                for gx in 0..GLYPH_WIDTH {
                    if !self.font.is_lit(ch, gx, gy) {
                        continue;
                    }
                    let px = x.saturating_add(sx).saturating_add(i64::from(gx) * scale);
                    let py = y.saturating_add(sy).saturating_add(i64::from(gy) * scale);
                    // One scale x scale block, clipped to the target rows
                    for row in py.max(0)..py.saturating_add(scale).min(height) {
                        self.hspan(px, px.saturating_add(scale - 1), row, col);
                    }
                }
            }
            sx = sx.saturating_add(i64::from(GLYPH_WIDTH) * scale);
        }

        self.compositor.set_mode(saved);
    }
}

/// Sprite read at wide coordinates; out of range is `BLANK`
fn sample(sprite: &PixelBuffer, x: i64, y: i64) -> Pixel {
    match (i32::try_from(x), i32::try_from(y)) {
        (Ok(x), Ok(y)) => sprite.get_pixel(x, y),
        _ => BLANK,
    }
}
