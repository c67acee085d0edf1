//! SDL2 window host

use super::Host;
use crate::config::EngineConfig;
use crate::display::PixelBuffer;
use crate::error::{Error, Result};
use crate::input::{InputSink, Key, KeyMap};
use log::{info, warn};
use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Scancode;
use sdl2::mouse::MouseButton;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Texture, TextureCreator, WindowCanvas};
use sdl2::video::WindowContext;
use sdl2::EventPump;

/// Window, renderer and event queue
pub struct Display {
    canvas: WindowCanvas,
    event_pump: EventPump,
    keymap: KeyMap,
}

/// Streaming texture the primary buffer is uploaded into
pub struct RenderTarget<'a> {
    texture: Texture<'a>,
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

/// `Host` backed by an SDL2 window
pub struct SdlHost<'a> {
    display: Display,
    target: RenderTarget<'a>,
}

impl Display {
    /// Open a window sized `screen * pixel` from the config.
    ///
    /// The texture creator is returned separately because textures borrow it.
    pub fn open(config: &EngineConfig) -> Result<(Self, TextureCreator<WindowContext>)> {
        let (width, height) = config.window_size();
        let sdl_context = sdl2::init().map_err(Error::Host)?;
        let video_subsystem = sdl_context.video().map_err(Error::Host)?;

        let window = video_subsystem
            .window(&config.app_name, width, height)
            .position_centered()
            .build()
            .map_err(|e| Error::Host(e.to_string()))?;

        let mut canvas_builder = window.into_canvas().accelerated();
        if config.vsync {
            canvas_builder = canvas_builder.present_vsync();
        }
        let canvas = canvas_builder
            .build()
            .map_err(|e| Error::Host(e.to_string()))?;

        let texture_creator = canvas.texture_creator();
        let event_pump = sdl_context.event_pump().map_err(Error::Host)?;

        info!(
            "window {}x{} (vsync {})",
            width,
            height,
            if config.vsync { "on" } else { "off" }
        );

        Ok((
            Self {
                canvas,
                event_pump,
                keymap: scancode_map(),
            },
            texture_creator,
        ))
    }
}

impl<'a> RenderTarget<'a> {
    pub fn with_size(
        texture_creator: &'a TextureCreator<WindowContext>,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        // RGBA32 matches the byte order of `PixelBuffer::to_rgba_bytes` on any endianness
        let texture = texture_creator
            .create_texture_streaming(PixelFormatEnum::RGBA32, width, height)
            .map_err(|e| Error::Host(e.to_string()))?;
        Ok(Self {
            texture,
            width,
            height,
            bytes: Vec::with_capacity(width as usize * height as usize * 4),
        })
    }
}

impl<'a> SdlHost<'a> {
    /// Pair a window with a texture matching the config's screen size
    pub fn new(
        display: Display,
        texture_creator: &'a TextureCreator<WindowContext>,
        config: &EngineConfig,
    ) -> Result<Self> {
        let target =
            RenderTarget::with_size(texture_creator, config.screen_width, config.screen_height)?;
        Ok(Self { display, target })
    }
}

impl Host for SdlHost<'_> {
    fn pump_events(&mut self, input: &InputSink) -> Result<()> {
        for event in self.display.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => input.request_shutdown(),
                Event::KeyDown {
                    scancode: Some(sc), ..
                } => {
                    if let Some(key) = self.display.keymap.lookup(sc as u32) {
                        input.set_key(key, true);
                    }
                },
                Event::KeyUp {
                    scancode: Some(sc), ..
                } => {
                    if let Some(key) = self.display.keymap.lookup(sc as u32) {
                        input.set_key(key, false);
                    }
                },
                Event::MouseMotion { x, y, .. } => input.set_mouse_position(x, y),
                Event::MouseButtonDown { mouse_btn, .. } => {
                    if let Some(button) = mouse_index(mouse_btn) {
                        input.set_mouse_button(button, true);
                    }
                },
                Event::MouseButtonUp { mouse_btn, .. } => {
                    if let Some(button) = mouse_index(mouse_btn) {
                        input.set_mouse_button(button, false);
                    }
                },
                Event::Window { win_event, .. } => match win_event {
                    WindowEvent::FocusGained => input.set_focus(true),
                    WindowEvent::FocusLost => input.set_focus(false),
                    _ => {},
                },
                _ => {},
            }
        }
        Ok(())
    }

    fn present(&mut self, frame: &PixelBuffer) -> Result<()> {
        let target = &mut self.target;
        if frame.width() != target.width || frame.height() != target.height {
            return Err(Error::Host(format!(
                "frame is {}x{}, texture is {}x{}",
                frame.width(),
                frame.height(),
                target.width,
                target.height
            )));
        }

        frame.to_rgba_bytes(&mut target.bytes);
        target
            .texture
            .update(None, &target.bytes, (target.width * 4) as usize)
            .map_err(|e| Error::Host(e.to_string()))?;

        let canvas = &mut self.display.canvas;
        canvas.copy(&target.texture, None, None).map_err(Error::Host)?;
        canvas.present();
        Ok(())
    }

    fn set_title(&mut self, title: &str) {
        if let Err(e) = self.display.canvas.window_mut().set_title(title) {
            warn!("could not set window title: {}", e);
        }
    }
}

/// SDL button -> engine index (0 left, 1 right, 2 middle, 3/4 extra)
fn mouse_index(btn: MouseButton) -> Option<usize> {
    match btn {
        MouseButton::Left => Some(0),
        MouseButton::Right => Some(1),
        MouseButton::Middle => Some(2),
        MouseButton::X1 => Some(3),
        MouseButton::X2 => Some(4),
        MouseButton::Unknown => None,
    }
}

/// Physical key positions, so WASD-style layouts work on any keyboard map
fn scancode_map() -> KeyMap {
    use Scancode as S;

    #[rustfmt::skip]
    let pairs = [
        (S::A, Key::A), (S::B, Key::B), (S::C, Key::C), (S::D, Key::D), (S::E, Key::E),
        (S::F, Key::F), (S::G, Key::G), (S::H, Key::H), (S::I, Key::I), (S::J, Key::J),
        (S::K, Key::K), (S::L, Key::L), (S::M, Key::M), (S::N, Key::N), (S::O, Key::O),
        (S::P, Key::P), (S::Q, Key::Q), (S::R, Key::R), (S::S, Key::S), (S::T, Key::T),
        (S::U, Key::U), (S::V, Key::V), (S::W, Key::W), (S::X, Key::X), (S::Y, Key::Y),
        (S::Z, Key::Z),
        (S::Num0, Key::K0), (S::Num1, Key::K1), (S::Num2, Key::K2), (S::Num3, Key::K3),
        (S::Num4, Key::K4), (S::Num5, Key::K5), (S::Num6, Key::K6), (S::Num7, Key::K7),
        (S::Num8, Key::K8), (S::Num9, Key::K9),
        (S::F1, Key::F1), (S::F2, Key::F2), (S::F3, Key::F3), (S::F4, Key::F4),
        (S::F5, Key::F5), (S::F6, Key::F6), (S::F7, Key::F7), (S::F8, Key::F8),
        (S::F9, Key::F9), (S::F10, Key::F10), (S::F11, Key::F11), (S::F12, Key::F12),
        (S::Up, Key::Up), (S::Down, Key::Down), (S::Left, Key::Left), (S::Right, Key::Right),
        (S::Space, Key::Space), (S::Tab, Key::Tab),
        (S::LShift, Key::Shift), (S::RShift, Key::Shift),
        (S::LCtrl, Key::Ctrl), (S::RCtrl, Key::Ctrl),
        (S::Insert, Key::Ins), (S::Delete, Key::Del), (S::Home, Key::Home), (S::End, Key::End),
        (S::PageUp, Key::PgUp), (S::PageDown, Key::PgDn),
        (S::Backspace, Key::Back), (S::Escape, Key::Escape), (S::Return, Key::Enter),
        (S::Pause, Key::Pause), (S::ScrollLock, Key::Scroll),
    ];

    pairs.into_iter().map(|(sc, key)| (sc as u32, key)).collect()
}
