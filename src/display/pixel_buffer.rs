use super::pixel::{Pixel, BLANK};
use crate::error::{Error, Result};
use log::debug;
use std::io::ErrorKind;
use std::path::Path;

// ============================================================================
// PixelBuffer
// ============================================================================

/// Fixed-size RGBA pixel grid, row-major.
/// Used both as the screen and as sprites / off-screen draw targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Vec<Pixel>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Create a buffer filled with opaque black
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![Pixel::default(); width as usize * height as usize],
            width,
            height,
        }
    }

    /// Create a buffer from decoded RGBA bytes (4 bytes per pixel)
    pub fn from_rgba(width: u32, height: u32, data: &[u8]) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(Error::Decode(format!(
                "expected {} bytes for {}x{} RGBA, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }
        let pixels = data
            .chunks_exact(4)
            .map(|c| Pixel::rgba(c[0], c[1], c[2], c[3]))
            .collect();
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Load an image file as a sprite.
    ///
    /// Missing files give `NotFound`; anything the decoder rejects gives `Decode`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::NotFound(path.to_path_buf()),
            _ => Error::Io(e),
        })?;

        let image = image::load_from_memory(&bytes)
            .map_err(|e| Error::Decode(e.to_string()))?
            .to_rgba8();
        let (width, height) = image.dimensions();
        debug!("loaded {} ({}x{})", path.display(), width, height);

        Self::from_rgba(width, height, image.as_raw())
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Check if coordinates are within bounds
    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Read a pixel (bounds checked). Outside the buffer this is `BLANK`.
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Pixel {
        if self.in_bounds(x, y) {
            self.pixels[self.pixel_index(x as u32, y as u32)]
        } else {
            BLANK
        }
    }

    /// Write a pixel (bounds checked). Outside the buffer this does nothing.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, p: Pixel) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            self.pixels[idx] = p;
        }
    }

    /// Nearest-pixel sample with normalised coordinates.
    /// `u * width` and `v * height` are truncated; 1.0 falls off the edge.
    #[inline]
    pub fn sample(&self, u: f32, v: f32) -> Pixel {
        let sx = (u * self.width as f32) as i32;
        let sy = (v * self.height as f32) as i32;
        self.get_pixel(sx, sy)
    }

    /// Overwrite every pixel (no compositing)
    pub fn clear(&mut self, p: Pixel) {
        self.pixels.fill(p);
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Mutable access to raw pixels
    pub fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.pixels
    }

    /// Serialise as RGBA bytes for texture upload, reusing `out`'s allocation
    pub fn to_rgba_bytes(&self, out: &mut Vec<u8>) {
        out.clear();
        out.reserve(self.pixels.len() * 4);
        for p in &self.pixels {
            out.extend_from_slice(&[p.r, p.g, p.b, p.a]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::pixel::{RED, WHITE};

    #[test]
    fn test_new_is_opaque_black() {
        let buf = PixelBuffer::new(3, 2);
        assert_eq!(buf.pixels().len(), 6);
        assert!(buf.pixels().iter().all(|p| *p == Pixel::default()));
    }

    #[test]
    fn test_out_of_bounds_read_is_blank() {
        let buf = PixelBuffer::new(4, 4);
        for (x, y) in [(-1, 0), (0, -1), (4, 0), (0, 4), (i32::MIN, i32::MAX)] {
            assert_eq!(buf.get_pixel(x, y), BLANK);
        }
    }

    #[test]
    fn test_out_of_bounds_write_is_ignored() {
        let mut buf = PixelBuffer::new(4, 4);
        let before = buf.clone();
        for (x, y) in [(-1, 0), (0, -1), (4, 0), (0, 4), (100, 100)] {
            buf.set_pixel(x, y, RED);
        }
        assert_eq!(buf, before);
    }

    #[test]
    fn test_set_then_get() {
        let mut buf = PixelBuffer::new(4, 4);
        buf.set_pixel(3, 1, RED);
        assert_eq!(buf.get_pixel(3, 1), RED);
        // Row-major layout
        assert_eq!(buf.pixels()[4 + 3], RED);
    }

    #[test]
    fn test_sample_truncates() {
        let mut buf = PixelBuffer::new(4, 4);
        buf.set_pixel(1, 2, WHITE);
        assert_eq!(buf.sample(0.25, 0.5), WHITE);
        assert_eq!(buf.sample(0.49, 0.74), WHITE);
        assert_eq!(buf.sample(0.5, 0.5), Pixel::default());
    }

    #[test]
    fn test_sample_at_one_is_blank() {
        let buf = PixelBuffer::new(4, 4);
        assert_eq!(buf.sample(1.0, 0.0), BLANK);
        assert_eq!(buf.sample(0.0, 1.0), BLANK);
        assert_eq!(buf.sample(-0.5, 0.0), BLANK);
    }

    #[test]
    fn test_from_rgba() {
        let data = [1, 2, 3, 4, 5, 6, 7, 8];
        let buf = PixelBuffer::from_rgba(2, 1, &data).unwrap();
        assert_eq!(buf.get_pixel(0, 0), Pixel::rgba(1, 2, 3, 4));
        assert_eq!(buf.get_pixel(1, 0), Pixel::rgba(5, 6, 7, 8));

        let mut bytes = Vec::new();
        buf.to_rgba_bytes(&mut bytes);
        assert_eq!(bytes, data);
    }

    #[test]
    fn test_from_rgba_length_mismatch() {
        let err = PixelBuffer::from_rgba(2, 2, &[0; 7]).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_zero_sized_buffer() {
        let buf = PixelBuffer::new(0, 0);
        assert!(buf.pixels().is_empty());
        assert_eq!(buf.get_pixel(0, 0), BLANK);
    }

    #[test]
    fn test_load_missing_file() {
        let err = PixelBuffer::load("/nonexistent/sprite.png").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_load_garbage_is_decode_error() {
        let path = std::env::temp_dir().join(format!("rasterkit-garbage-{}.png", std::process::id()));
        std::fs::write(&path, b"definitely not a png").unwrap();
        let result = PixelBuffer::load(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn test_load_png() {
        let path = std::env::temp_dir().join(format!("rasterkit-sprite-{}.png", std::process::id()));
        let mut img = image::RgbaImage::new(3, 2);
        img.put_pixel(2, 1, image::Rgba([10, 20, 30, 40]));
        img.save(&path).unwrap();

        let result = PixelBuffer::load(&path);
        let _ = std::fs::remove_file(&path);
        let buf = result.unwrap();
        assert_eq!((buf.width(), buf.height()), (3, 2));
        assert_eq!(buf.get_pixel(2, 1), Pixel::rgba(10, 20, 30, 40));
        assert_eq!(buf.get_pixel(0, 0), BLANK);
    }
}
