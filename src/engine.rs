//! Engine context and frame loop

use crate::config::EngineConfig;
use crate::display::{Canvas, Compositor, GlyphAtlas, PixelBuffer, PixelMode};
use crate::error::Result;
use crate::host::Host;
use crate::input::{ButtonLatch, HwButton, InputSink, Key, MOUSE_BUTTONS};
use crate::util::FrameClock;
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// User callbacks driven by [`Engine::run`]
pub trait Application {
    /// Called once before the first frame; `false` aborts startup
    fn on_create(&mut self, _engine: &mut Engine) -> bool {
        true
    }

    /// Called every frame with the elapsed seconds; `false` stops the loop
    fn on_update(&mut self, _engine: &mut Engine, _elapsed: f32) -> bool {
        false
    }

    /// Called when the loop stops; `false` vetoes shutdown and resumes it
    fn on_destroy(&mut self, _engine: &mut Engine) -> bool {
        true
    }
}

/// Owns the screen, the draw target binding, compositing state and input
pub struct Engine {
    config: EngineConfig,
    primary: PixelBuffer,
    /// Off-screen target; `None` means draw to `primary`
    target: Option<PixelBuffer>,
    compositor: Compositor,
    font: GlyphAtlas,
    keys: ButtonLatch,
    mouse: ButtonLatch,
    key_samples: Vec<bool>,
    mouse_samples: [bool; MOUSE_BUTTONS],
    input: InputSink,
    /// Latched shutdown request, shared with every `InputSink` clone
    shutdown: Arc<AtomicBool>,
    running: bool,
    clock: FrameClock,
}

impl Engine {
    /// Fails with `InvalidConfiguration` if any dimension is zero
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let shutdown = Arc::new(AtomicBool::new(false));
        let input = InputSink::new(Arc::clone(&shutdown), config.pixel_width, config.pixel_height);
        let primary = PixelBuffer::new(config.screen_width, config.screen_height);

        info!(
            "engine '{}': {}x{} screen, {}x{} pixels",
            config.app_name,
            config.screen_width,
            config.screen_height,
            config.pixel_width,
            config.pixel_height
        );

        Ok(Self {
            config,
            primary,
            target: None,
            compositor: Compositor::new(),
            font: GlyphAtlas::new(),
            keys: ButtonLatch::new(Key::COUNT),
            mouse: ButtonLatch::new(MOUSE_BUTTONS),
            key_samples: vec![false; Key::COUNT],
            mouse_samples: [false; MOUSE_BUTTONS],
            input,
            shutdown,
            running: false,
            clock: FrameClock::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub fn screen_width(&self) -> u32 {
        self.config.screen_width
    }

    #[inline]
    pub fn screen_height(&self) -> u32 {
        self.config.screen_height
    }

    // ========================================================================
    // Draw target
    // ========================================================================

    /// The screen buffer handed to the host each frame
    pub fn primary(&self) -> &PixelBuffer {
        &self.primary
    }

    /// Bind an off-screen buffer as the draw target, or `None` for the
    /// primary buffer. Returns the off-screen buffer that was bound before.
    pub fn set_draw_target(&mut self, target: Option<PixelBuffer>) -> Option<PixelBuffer> {
        std::mem::replace(&mut self.target, target)
    }

    pub fn draw_target(&self) -> &PixelBuffer {
        self.target.as_ref().unwrap_or(&self.primary)
    }

    pub fn draw_target_mut(&mut self) -> &mut PixelBuffer {
        match self.target.as_mut() {
            Some(target) => target,
            None => &mut self.primary,
        }
    }

    pub fn draw_target_width(&self) -> u32 {
        self.draw_target().width()
    }

    pub fn draw_target_height(&self) -> u32 {
        self.draw_target().height()
    }

    /// Drawing surface for the current target. `fill_rect` clips to the
    /// screen size whichever buffer is bound.
    pub fn canvas(&mut self) -> Canvas<'_> {
        let target = match self.target.as_mut() {
            Some(target) => target,
            None => &mut self.primary,
        };
        Canvas::new(target, &mut self.compositor, &self.font)
            .with_clip(self.config.screen_width, self.config.screen_height)
    }

    pub fn font(&self) -> &GlyphAtlas {
        &self.font
    }

    // ========================================================================
    // Compositing state
    // ========================================================================

    pub fn pixel_mode(&self) -> PixelMode {
        self.compositor.mode()
    }

    pub fn set_pixel_mode(&mut self, mode: PixelMode) {
        self.compositor.set_mode(mode);
    }

    pub fn pixel_blend(&self) -> f32 {
        self.compositor.blend()
    }

    /// Clamped to [0, 1]
    pub fn set_pixel_blend(&mut self, blend: f32) {
        self.compositor.set_blend(blend);
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Handle for hosts (or other threads) to write raw input through
    pub fn input(&self) -> InputSink {
        self.input.clone()
    }

    #[inline]
    pub fn key(&self, key: Key) -> HwButton {
        self.keys.get(key.index())
    }

    /// Button 0 is left, 1 right, 2 middle
    #[inline]
    pub fn mouse(&self, button: usize) -> HwButton {
        self.mouse.get(button)
    }

    pub fn mouse_x(&self) -> i32 {
        self.input.mouse_position().0
    }

    pub fn mouse_y(&self) -> i32 {
        self.input.mouse_position().1
    }

    pub fn is_focused(&self) -> bool {
        self.input.is_focused()
    }

    /// Latch this frame's raw samples
    fn update_input(&mut self) {
        self.input.snapshot_keys(&mut self.key_samples);
        self.input.snapshot_mouse(&mut self.mouse_samples);
        self.keys.update(&self.key_samples);
        self.mouse.update(&self.mouse_samples);
    }

    // ========================================================================
    // Frame loop
    // ========================================================================

    /// True while `run` is driving frames and no shutdown has been requested
    pub fn is_running(&self) -> bool {
        self.running && !self.shutdown.load(Ordering::Acquire)
    }

    /// Request the loop to stop after the current frame.
    /// The request stays set; only an `on_destroy` veto clears it.
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Release);
    }

    /// Frames counted over the last full second
    pub fn fps(&self) -> u32 {
        self.clock.fps()
    }

    /// Run `app` against `host` until it stops.
    ///
    /// Returns `Ok` when `on_create` declines or the loop ends normally;
    /// host errors stop the loop and are returned. A shutdown requested
    /// before the call is honoured: no frame is updated or presented.
    pub fn run<A, H>(&mut self, app: &mut A, host: &mut H) -> Result<()>
    where
        A: Application + ?Sized,
        H: Host + ?Sized,
    {
        self.running = true;
        let result = self.drive(app, host);
        self.running = false;
        result
    }

    fn drive<A, H>(&mut self, app: &mut A, host: &mut H) -> Result<()>
    where
        A: Application + ?Sized,
        H: Host + ?Sized,
    {
        if !app.on_create(self) {
            info!("on_create declined, not starting");
            self.stop();
            return Ok(());
        }

        if self.shutdown.load(Ordering::Acquire) {
            info!("shutdown already requested, skipping frames");
        } else {
            info!("frame loop started");
        }
        self.clock.reset();

        loop {
            if let Err(e) = self.run_frames(app, host) {
                self.stop();
                return Err(e);
            }
            if app.on_destroy(self) {
                break;
            }
            info!("on_destroy declined, resuming");
            self.shutdown.store(false, Ordering::Release);
        }

        info!("frame loop stopped");
        Ok(())
    }

    fn run_frames<A, H>(&mut self, app: &mut A, host: &mut H) -> Result<()>
    where
        A: Application + ?Sized,
        H: Host + ?Sized,
    {
        while self.is_running() {
            let (elapsed, fps) = self.clock.tick();

            host.pump_events(&self.input)?;
            if !self.is_running() {
                break;
            }
            self.update_input();

            if !app.on_update(self, elapsed) {
                self.stop();
            }

            host.present(&self.primary)?;

            if let Some(fps) = fps {
                let title = format!("rasterkit - {} - FPS: {}", self.config.app_name, fps);
                debug!("{}", title);
                host.set_title(&title);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::pixel::{BLACK, BLUE, RED, WHITE};
    use crate::error::Error;
    use crate::host::Headless;

    fn engine(w: u32, h: u32) -> Engine {
        Engine::new(EngineConfig::new("test", w, h).with_pixel_size(2, 2)).unwrap()
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let err = Engine::new(EngineConfig::new("bad", 0, 10)).err();
        assert!(matches!(err, Some(Error::InvalidConfiguration(_))));
        let err = Engine::new(EngineConfig::new("bad", 10, 10).with_pixel_size(1, 0)).err();
        assert!(matches!(err, Some(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_primary_matches_screen() {
        let e = engine(32, 24);
        assert_eq!((e.primary().width(), e.primary().height()), (32, 24));
        assert_eq!((e.draw_target_width(), e.draw_target_height()), (32, 24));
        assert!(e.primary().pixels().iter().all(|p| *p == BLACK));
        assert!(!e.is_running());
    }

    #[test]
    fn test_draw_target_mut_follows_binding() {
        let mut e = engine(8, 8);
        e.draw_target_mut().set_pixel(2, 3, RED);
        assert_eq!(e.primary().get_pixel(2, 3), RED);

        e.set_draw_target(Some(PixelBuffer::new(4, 4)));
        assert_eq!(e.draw_target_mut().width(), 4);
        e.draw_target_mut().set_pixel(1, 1, WHITE);
        assert_eq!(e.primary().get_pixel(1, 1), BLACK);

        let sprite = e.set_draw_target(None).unwrap();
        assert_eq!(sprite.get_pixel(1, 1), WHITE);
    }

    #[test]
    fn test_draw_target_round_trip() {
        let mut e = engine(16, 16);
        let sprite = PixelBuffer::new(4, 4);

        assert!(e.set_draw_target(Some(sprite)).is_none());
        assert_eq!(e.draw_target_width(), 4);
        e.canvas().draw(1, 1, RED);

        let sprite = e.set_draw_target(None).unwrap();
        assert_eq!(sprite.get_pixel(1, 1), RED);
        assert_eq!(e.primary().get_pixel(1, 1), BLACK);
        assert_eq!(e.draw_target_width(), 16);

        e.canvas().draw_sprite(8, 8, &sprite);
        assert_eq!(e.primary().get_pixel(9, 9), RED);
    }

    #[test]
    fn test_fill_rect_clips_to_screen_on_offscreen_target() {
        let mut e = engine(4, 4);
        e.set_draw_target(Some(PixelBuffer::new(8, 8)));
        e.canvas().fill_rect(0, 0, 8, 8, WHITE);
        let target = e.set_draw_target(None).unwrap();
        assert_eq!(target.get_pixel(3, 3), WHITE);
        assert_eq!(target.get_pixel(4, 4), BLACK);
    }

    #[test]
    fn test_pixel_state_shared_with_canvas() {
        let mut e = engine(4, 4);
        e.set_pixel_mode(PixelMode::Mask);
        e.set_pixel_blend(3.0);
        assert_eq!(e.pixel_blend(), 1.0);
        {
            let mut c = e.canvas();
            assert_eq!(c.pixel_mode(), PixelMode::Mask);
            c.draw(0, 0, crate::display::Pixel::rgba(255, 255, 255, 10));
            c.set_pixel_mode(PixelMode::Alpha);
        }
        assert_eq!(e.primary().get_pixel(0, 0), BLACK);
        assert_eq!(e.pixel_mode(), PixelMode::Alpha);
    }

    struct Counter {
        frames: u32,
        limit: u32,
        destroy_vetoes: u32,
        created: bool,
        destroyed: u32,
    }

    impl Counter {
        fn new(limit: u32) -> Self {
            Self {
                frames: 0,
                limit,
                destroy_vetoes: 0,
                created: false,
                destroyed: 0,
            }
        }
    }

    impl Application for Counter {
        fn on_create(&mut self, engine: &mut Engine) -> bool {
            self.created = true;
            engine.canvas().clear(BLUE);
            true
        }

        fn on_update(&mut self, engine: &mut Engine, elapsed: f32) -> bool {
            assert!(elapsed >= 0.0);
            self.frames += 1;
            engine.canvas().draw(0, 0, WHITE);
            self.frames < self.limit
        }

        fn on_destroy(&mut self, _engine: &mut Engine) -> bool {
            self.destroyed += 1;
            if self.destroy_vetoes > 0 {
                self.destroy_vetoes -= 1;
                self.limit += 2;
                return false;
            }
            true
        }
    }

    #[test_log::test]
    fn test_update_false_stops_loop() {
        let mut e = engine(8, 8);
        let mut app = Counter::new(3);
        let mut host = Headless::new();
        e.run(&mut app, &mut host).unwrap();

        assert!(app.created);
        assert_eq!(app.frames, 3);
        assert_eq!(app.destroyed, 1);
        assert_eq!(host.frames_presented(), 3);
        assert!(!e.is_running());

        let frame = host.last_frame().unwrap();
        assert_eq!(frame.get_pixel(0, 0), WHITE);
        assert_eq!(frame.get_pixel(1, 1), BLUE);
    }

    #[test_log::test]
    fn test_destroy_veto_resumes() {
        let mut e = engine(8, 8);
        let mut app = Counter::new(2);
        app.destroy_vetoes = 1;
        let mut host = Headless::new();
        e.run(&mut app, &mut host).unwrap();

        assert_eq!(app.destroyed, 2);
        assert_eq!(app.frames, 4);
        assert_eq!(host.frames_presented(), 4);
    }

    #[test_log::test]
    fn test_create_false_never_updates() {
        struct Refuse;
        impl Application for Refuse {
            fn on_create(&mut self, _engine: &mut Engine) -> bool {
                false
            }
            fn on_update(&mut self, _engine: &mut Engine, _elapsed: f32) -> bool {
                panic!("must not run");
            }
        }

        let mut e = engine(8, 8);
        let mut host = Headless::new();
        e.run(&mut Refuse, &mut host).unwrap();
        assert_eq!(host.frames_presented(), 0);
        assert!(!e.is_running());
    }

    #[test]
    fn test_default_update_stops_after_one_frame() {
        struct Idle;
        impl Application for Idle {}

        let mut e = engine(8, 8);
        let mut host = Headless::new();
        e.run(&mut Idle, &mut host).unwrap();
        assert_eq!(host.frames_presented(), 1);
    }

    #[test]
    fn test_first_frame_sets_title() {
        let mut e = engine(8, 8);
        let mut host = Headless::new();
        e.run(&mut Counter::new(1), &mut host).unwrap();
        assert_eq!(host.titles(), ["rasterkit - test - FPS: 1"]);
    }

    #[test]
    fn test_host_shutdown_skips_update() {
        let mut e = engine(8, 8);
        let mut app = Counter::new(u32::MAX);
        let mut host = Headless::with_frame_limit(5);
        e.run(&mut app, &mut host).unwrap();
        assert_eq!(app.frames, 5);
        assert_eq!(host.frames_presented(), 5);
    }

    struct KeyRecorder {
        log: Vec<(bool, bool, bool)>,
        mouse: Vec<(i32, i32, bool)>,
    }

    impl Application for KeyRecorder {
        fn on_update(&mut self, engine: &mut Engine, _elapsed: f32) -> bool {
            let k = engine.key(Key::Space);
            self.log.push((k.pressed, k.released, k.held));
            self.mouse
                .push((engine.mouse_x(), engine.mouse_y(), engine.mouse(0).pressed));
            true
        }
    }

    #[test]
    fn test_input_latched_per_frame() {
        let mut e = engine(8, 8);
        let mut app = KeyRecorder {
            log: Vec::new(),
            mouse: Vec::new(),
        };
        let samples = [false, true, true, false];
        let mut host = Headless::with_frame_limit(4).with_script(move |frame, input| {
            input.set_key(Key::Space, samples[frame as usize]);
            input.set_mouse_position(frame as i32 * 10, 7);
            input.set_mouse_button(0, frame == 2);
        });
        e.run(&mut app, &mut host).unwrap();

        assert_eq!(
            app.log,
            [
                (false, false, false),
                (true, false, true),
                (false, false, true),
                (false, true, false),
            ]
        );
        // Surface coordinates divided by the 2x2 pixel size
        assert_eq!(app.mouse[3], (15, 3, false));
        assert!(app.mouse[2].2);
    }

    #[test]
    fn test_stop_from_another_thread() {
        struct Forever;
        impl Application for Forever {
            fn on_update(&mut self, _engine: &mut Engine, _elapsed: f32) -> bool {
                std::thread::sleep(std::time::Duration::from_millis(1));
                true
            }
        }

        let mut e = engine(4, 4);
        let input = e.input();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(20));
            input.request_shutdown();
        });
        e.run(&mut Forever, &mut Headless::new()).unwrap();
        handle.join().unwrap();
        assert!(!e.is_running());
    }

    #[test_log::test]
    fn test_shutdown_before_run_skips_frames() {
        let mut e = engine(8, 8);
        e.input().request_shutdown();
        assert!(!e.is_running());

        let mut app = Counter::new(u32::MAX);
        let mut host = Headless::new();
        e.run(&mut app, &mut host).unwrap();

        assert!(app.created);
        assert_eq!(app.frames, 0);
        assert_eq!(app.destroyed, 1);
        assert_eq!(host.frames_presented(), 0);
        assert!(!e.is_running());
    }

    #[test]
    fn test_stop_before_run_skips_frames() {
        let mut e = engine(8, 8);
        e.stop();
        let mut host = Headless::new();
        e.run(&mut Counter::new(3), &mut host).unwrap();
        assert_eq!(host.frames_presented(), 0);
    }

    #[test]
    fn test_destroy_veto_clears_early_shutdown() {
        let mut e = engine(8, 8);
        e.input().request_shutdown();
        let mut app = Counter::new(2);
        app.destroy_vetoes = 1;
        let mut host = Headless::new();
        e.run(&mut app, &mut host).unwrap();

        // First pass ran no frames; the veto re-armed the loop for limit 4
        assert_eq!(app.destroyed, 2);
        assert_eq!(app.frames, 4);
        assert_eq!(host.frames_presented(), 4);
    }

    struct FailingHost;

    impl Host for FailingHost {
        fn pump_events(&mut self, _input: &InputSink) -> Result<()> {
            Ok(())
        }

        fn present(&mut self, _frame: &PixelBuffer) -> Result<()> {
            Err(Error::Host("surface lost".to_string()))
        }

        fn set_title(&mut self, _title: &str) {}
    }

    #[test]
    fn test_host_error_stops_loop() {
        let mut e = engine(4, 4);
        let result = e.run(&mut Counter::new(10), &mut FailingHost);
        assert!(matches!(result, Err(Error::Host(_))));
        assert!(!e.is_running());
    }
}
