use rasterkit::display::pixel::{BLACK, BLANK, GREEN, RED, WHITE};
use rasterkit::{Application, Engine, EngineConfig, Headless, Key, Pixel, PixelBuffer, PixelMode};

/// Draws into an off-screen sprite once, then composes it onto the screen
/// every frame until Escape is pressed.
struct Compose {
    sprite: Option<PixelBuffer>,
    frames: u32,
    escape_seen_at: Option<u32>,
}

impl Application for Compose {
    fn on_create(&mut self, engine: &mut Engine) -> bool {
        engine.set_draw_target(Some(PixelBuffer::new(8, 8)));
        {
            let mut c = engine.canvas();
            c.clear(BLANK);
            c.fill_circle(4, 4, 3, RED);
        }
        self.sprite = engine.set_draw_target(None);
        self.sprite.is_some()
    }

    fn on_update(&mut self, engine: &mut Engine, _elapsed: f32) -> bool {
        self.frames += 1;
        if engine.key(Key::Escape).pressed {
            self.escape_seen_at = Some(self.frames);
            return false;
        }

        let Some(sprite) = &self.sprite else {
            return false;
        };
        let mut c = engine.canvas();
        c.clear(BLACK);
        c.set_pixel_mode(PixelMode::Mask);
        c.draw_sprite(10, 10, sprite);
        c.set_pixel_mode(PixelMode::Normal);
        c.draw_line(0, 31, 31, 31, GREEN);
        c.draw_string(0, 0, "OK", WHITE, 1);
        true
    }
}

#[test_log::test]
fn test_offscreen_sprite_composed_onto_screen() {
    let mut engine = Engine::new(EngineConfig::new("compose", 32, 32).with_pixel_size(1, 1)).unwrap();
    let mut app = Compose {
        sprite: None,
        frames: 0,
        escape_seen_at: None,
    };
    let mut host = Headless::new().with_script(|frame, input| {
        input.set_key(Key::Escape, frame == 3);
    });

    engine.run(&mut app, &mut host).unwrap();

    // Frames 1-3 drew, frame 4 saw the key go down and stopped
    assert_eq!(app.escape_seen_at, Some(4));
    assert_eq!(host.frames_presented(), 4);

    let frame = host.last_frame().unwrap();
    // Sprite centre is red, its transparent corner left the background alone
    assert_eq!(frame.get_pixel(14, 14), RED);
    assert_eq!(frame.get_pixel(10, 10), BLACK);
    assert_eq!(frame.get_pixel(31, 31), GREEN);
    // Text is drawn in the top-left cell
    let lit = (0..8)
        .flat_map(|y| (0..16).map(move |x| (x, y)))
        .filter(|&(x, y)| frame.get_pixel(x, y) == WHITE)
        .count();
    assert!(lit > 20);
    assert_eq!(engine.primary(), frame);
}

#[test]
fn test_engine_rejects_zero_pixel_size() {
    let config = EngineConfig::new("bad", 64, 64).with_pixel_size(0, 1);
    assert!(matches!(
        Engine::new(config),
        Err(rasterkit::Error::InvalidConfiguration(_))
    ));
}

#[test]
fn test_alpha_text_over_background() {
    struct Once;
    impl Application for Once {
        fn on_update(&mut self, engine: &mut Engine, _elapsed: f32) -> bool {
            let mut c = engine.canvas();
            c.clear(Pixel::rgb(0, 0, 200));
            c.draw_string(0, 0, "#", Pixel::rgba(255, 255, 255, 51), 2);
            false
        }
    }

    let mut engine = Engine::new(EngineConfig::new("alpha", 16, 16).with_pixel_size(1, 1)).unwrap();
    let mut host = Headless::new();
    engine.run(&mut Once, &mut host).unwrap();

    let frame = host.last_frame().unwrap();
    let blended: Vec<Pixel> = frame
        .pixels()
        .iter()
        .copied()
        .filter(|p| *p != Pixel::rgb(0, 0, 200))
        .collect();
    assert!(!blended.is_empty());
    for p in blended {
        // 20% white over blue
        assert!((49..=51).contains(&p.r), "{:?}", p);
        assert!((210..=212).contains(&p.b), "{:?}", p);
        assert_eq!(p.a, 255);
    }
    assert_eq!(engine.pixel_mode(), PixelMode::Normal);
}
