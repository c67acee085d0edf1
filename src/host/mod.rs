//! Presentation hosts
//!
//! A host owns the window (or lack of one): it turns platform events into raw
//! input samples and shows the finished primary buffer each frame.

#[cfg(feature = "sdl")]
pub mod sdl;

use crate::display::PixelBuffer;
use crate::error::Result;
use crate::input::InputSink;

/// Windowing and presentation collaborator driven by the frame loop
pub trait Host {
    /// Deliver pending platform events as raw samples (and shutdown requests)
    fn pump_events(&mut self, input: &InputSink) -> Result<()>;

    /// Show a completed frame
    fn present(&mut self, frame: &PixelBuffer) -> Result<()>;

    /// Update the window title / status line
    fn set_title(&mut self, title: &str);
}

type Script = Box<dyn FnMut(u64, &InputSink)>;

/// Host without a window.
///
/// Keeps the last presented frame and every title it was given. With a frame
/// limit it requests shutdown once that many frames have been presented.
pub struct Headless {
    max_frames: Option<u64>,
    frames: u64,
    titles: Vec<String>,
    last_frame: Option<PixelBuffer>,
    script: Option<Script>,
}

impl Headless {
    /// Runs until the application or another input handle stops the engine
    pub fn new() -> Self {
        Self {
            max_frames: None,
            frames: 0,
            titles: Vec::new(),
            last_frame: None,
            script: None,
        }
    }

    /// Stop after `max_frames` presented frames
    pub fn with_frame_limit(max_frames: u64) -> Self {
        Self {
            max_frames: Some(max_frames),
            ..Self::new()
        }
    }

    /// Feed input before each frame: the closure gets the frame index
    /// (starting at 0) and the sink to write samples into
    pub fn with_script(mut self, script: impl FnMut(u64, &InputSink) + 'static) -> Self {
        self.script = Some(Box::new(script));
        self
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn last_frame(&self) -> Option<&PixelBuffer> {
        self.last_frame.as_ref()
    }
}

impl Default for Headless {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for Headless {
    fn pump_events(&mut self, input: &InputSink) -> Result<()> {
        if self.max_frames.is_some_and(|max| self.frames >= max) {
            input.request_shutdown();
            return Ok(());
        }
        if let Some(script) = self.script.as_mut() {
            script(self.frames, input);
        }
        Ok(())
    }

    fn present(&mut self, frame: &PixelBuffer) -> Result<()> {
        match &mut self.last_frame {
            Some(last) if last.width() == frame.width() && last.height() == frame.height() => {
                last.pixels_mut().copy_from_slice(frame.pixels());
            },
            slot => *slot = Some(frame.clone()),
        }
        self.frames += 1;
        Ok(())
    }

    fn set_title(&mut self, title: &str) {
        self.titles.push(title.to_string());
    }
}
