//! rasterkit: a small software rasterizer.
//!
//! Pixel buffers, per-pixel compositing (normal / mask / alpha), integer
//! scan algorithms for lines, circles, rectangles, triangles, sprites and
//! bitmap text, plus a frame loop that latches keyboard and mouse input and
//! hands finished frames to a pluggable [`Host`].

pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod host;
pub mod input;
pub mod util;

pub use config::EngineConfig;
pub use display::{Canvas, Compositor, GlyphAtlas, Pixel, PixelBuffer, PixelMode};
pub use engine::{Application, Engine};
pub use error::{Error, Result};
pub use host::{Headless, Host};
pub use input::{HwButton, InputSink, Key, KeyMap};
