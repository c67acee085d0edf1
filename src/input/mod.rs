//! Input state
//!
//! Hosts write raw "currently down" samples through an [`InputSink`] from
//! their event path; the frame loop snapshots them once per frame and feeds
//! the snapshot into [`ButtonLatch`]es.

mod keys;
mod latch;

pub use keys::{Key, KeyMap};
pub use latch::{ButtonLatch, HwButton};

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Arc;

/// Number of tracked mouse buttons
pub const MOUSE_BUTTONS: usize = 5;

/// Raw samples shared between the host and the frame loop.
/// Each flag is independent, so plain relaxed atomics are enough.
#[derive(Debug)]
struct RawInput {
    keys: Vec<AtomicBool>,
    mouse: [AtomicBool; MOUSE_BUTTONS],
    mouse_x: AtomicI32,
    mouse_y: AtomicI32,
    focused: AtomicBool,
}

impl RawInput {
    fn new() -> Self {
        Self {
            keys: (0..Key::COUNT).map(|_| AtomicBool::new(false)).collect(),
            mouse: std::array::from_fn(|_| AtomicBool::new(false)),
            mouse_x: AtomicI32::new(0),
            mouse_y: AtomicI32::new(0),
            focused: AtomicBool::new(true),
        }
    }
}

/// Write handle for raw input, plus the engine's shutdown flag.
///
/// Cheap to clone and safe to move to another thread.
#[derive(Debug, Clone)]
pub struct InputSink {
    raw: Arc<RawInput>,
    shutdown: Arc<AtomicBool>,
    pixel_width: i32,
    pixel_height: i32,
}

impl InputSink {
    /// `shutdown` is the engine's stop request; setting it ends the loop
    pub fn new(shutdown: Arc<AtomicBool>, pixel_width: u32, pixel_height: u32) -> Self {
        Self {
            raw: Arc::new(RawInput::new()),
            shutdown,
            pixel_width: pixel_width.max(1) as i32,
            pixel_height: pixel_height.max(1) as i32,
        }
    }

    pub fn set_key(&self, key: Key, down: bool) {
        self.raw.keys[key.index()].store(down, Ordering::Relaxed);
    }

    /// Buttons at or beyond `MOUSE_BUTTONS` are ignored
    pub fn set_mouse_button(&self, button: usize, down: bool) {
        if let Some(flag) = self.raw.mouse.get(button) {
            flag.store(down, Ordering::Relaxed);
        }
    }

    /// Record the cursor in surface coordinates; stored in buffer pixels
    pub fn set_mouse_position(&self, surface_x: i32, surface_y: i32) {
        self.raw
            .mouse_x
            .store(surface_x / self.pixel_width, Ordering::Relaxed);
        self.raw
            .mouse_y
            .store(surface_y / self.pixel_height, Ordering::Relaxed);
    }

    pub fn set_focus(&self, focused: bool) {
        self.raw.focused.store(focused, Ordering::Relaxed);
    }

    /// Ask the frame loop to stop after the current frame. Also valid
    /// before the loop starts, in which case it never draws a frame.
    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    #[inline]
    pub fn key_down(&self, key: Key) -> bool {
        self.raw.keys[key.index()].load(Ordering::Relaxed)
    }

    #[inline]
    pub fn mouse_down(&self, button: usize) -> bool {
        self.raw
            .mouse
            .get(button)
            .is_some_and(|b| b.load(Ordering::Relaxed))
    }

    /// Cursor position in buffer pixels
    pub fn mouse_position(&self) -> (i32, i32) {
        (
            self.raw.mouse_x.load(Ordering::Relaxed),
            self.raw.mouse_y.load(Ordering::Relaxed),
        )
    }

    pub fn is_focused(&self) -> bool {
        self.raw.focused.load(Ordering::Relaxed)
    }

    /// Copy the current key samples into `out` (indexed by `Key::index`)
    pub fn snapshot_keys(&self, out: &mut [bool]) {
        for (dst, src) in out.iter_mut().zip(&self.raw.keys) {
            *dst = src.load(Ordering::Relaxed);
        }
    }

    /// Copy the current mouse button samples into `out`
    pub fn snapshot_mouse(&self, out: &mut [bool]) {
        for (dst, src) in out.iter_mut().zip(&self.raw.mouse) {
            *dst = src.load(Ordering::Relaxed);
        }
    }
}
