mod canvas;
mod compositor;
pub mod font;
pub mod pixel;
mod pixel_buffer;
mod scan;

pub use canvas::Canvas;
pub use compositor::{composite, Compositor, PixelMode};
pub use font::{text_width, GlyphAtlas, GLYPH_HEIGHT, GLYPH_WIDTH};
pub use pixel::Pixel;
pub use pixel_buffer::PixelBuffer;

pub const DEFAULT_WIDTH: u32 = 256;
pub const DEFAULT_HEIGHT: u32 = 240;
