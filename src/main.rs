use log::{info, warn};
use rasterkit::display::pixel::{
    BLACK, CYAN, DARK_BLUE, DARK_GREY, GREEN, MAGENTA, RED, VERY_DARK_BLUE, WHITE, YELLOW,
};
use rasterkit::display::text_width;
use rasterkit::host::sdl::{Display, SdlHost};
use rasterkit::{Application, Engine, EngineConfig, Key, Pixel, PixelBuffer, PixelMode};
use std::path::PathBuf;

struct Options {
    config: EngineConfig,
    sprite: Option<PathBuf>,
}

/// Parse command line arguments on top of an optional config file
fn parse_args() -> rasterkit::Result<Options> {
    let args: Vec<String> = std::env::args().collect();

    let mut config = EngineConfig::new("demo", 256, 240);
    if let Some(i) = args.iter().position(|a| a == "--config" || a == "-c") {
        if let Some(path) = args.get(i + 1) {
            config = EngineConfig::load(path)?;
            info!("loaded config from {}", path);
        }
    }

    let mut sprite = None;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--no-vsync" => config.vsync = false,
            "--width" | "-w" => {
                if let Some(w) = args.get(i + 1).and_then(|s| s.parse().ok()) {
                    config.screen_width = w;
                }
                i += 1;
            },
            "--height" | "-h" => {
                if let Some(h) = args.get(i + 1).and_then(|s| s.parse().ok()) {
                    config.screen_height = h;
                }
                i += 1;
            },
            "--scale" | "-s" => {
                if let Some(s) = args.get(i + 1).and_then(|s| s.parse().ok()) {
                    config.pixel_width = s;
                    config.pixel_height = s;
                }
                i += 1;
            },
            "--sprite" => {
                sprite = args.get(i + 1).map(PathBuf::from);
                i += 1;
            },
            "--config" | "-c" => i += 1,
            "--help" => {
                println!("Usage: rasterkit-demo [OPTIONS]");
                println!();
                println!("Options:");
                println!("  --config PATH, -c PATH  Load engine settings from JSON");
                println!("  --width W, -w W         Screen width in pixels (default: 256)");
                println!("  --height H, -h H        Screen height in pixels (default: 240)");
                println!("  --scale N, -s N         Window pixels per screen pixel (default: 4)");
                println!("  --sprite PATH           PNG to use as the demo sprite");
                println!("  --no-vsync              Disable VSync for uncapped framerate");
                println!("  --help                  Show this help message");
                std::process::exit(0);
            },
            other => warn!("ignoring unknown argument {}", other),
        }
        i += 1;
    }

    Ok(Options { config, sprite })
}

/// Checkerboard with transparent holes, used when no sprite file is given
fn checker_sprite() -> PixelBuffer {
    let mut sprite = PixelBuffer::new(16, 16);
    for y in 0..16 {
        for x in 0..16 {
            let p = if (x / 4 + y / 4) % 2 == 0 {
                Pixel::rgb((x * 16) as u8, 128, (y * 16) as u8)
            } else {
                Pixel::rgba(0, 0, 0, 0)
            };
            sprite.set_pixel(x, y, p);
        }
    }
    sprite
}

const MODES: [PixelMode; 3] = [PixelMode::Normal, PixelMode::Mask, PixelMode::Alpha];

struct Showcase {
    sprite_path: Option<PathBuf>,
    sprite: PixelBuffer,
    /// Off-screen panel redrawn every frame, then blitted
    panel: Option<PixelBuffer>,
    time: f32,
    mode: usize,
    blend: f32,
    show_help: bool,
}

impl Showcase {
    fn new(sprite_path: Option<PathBuf>) -> Self {
        Self {
            sprite_path,
            sprite: checker_sprite(),
            panel: Some(PixelBuffer::new(64, 40)),
            time: 0.0,
            mode: 2,
            blend: 0.5,
            show_help: true,
        }
    }

    fn draw_panel(&mut self, engine: &mut Engine) {
        let Some(panel) = self.panel.take() else {
            return;
        };
        engine.set_draw_target(Some(panel));
        {
            let mut c = engine.canvas();
            c.clear(DARK_BLUE);
            c.draw_rect(0, 0, 63, 39, WHITE);
            let r = 4 + ((self.time * 3.0).sin() * 4.0).abs() as i32;
            c.fill_circle(32, 20, r + 6, YELLOW);
            c.draw_circle(32, 20, r + 10, RED);
        }
        self.panel = engine.set_draw_target(None);
    }
}

impl Application for Showcase {
    fn on_create(&mut self, engine: &mut Engine) -> bool {
        if let Some(path) = &self.sprite_path {
            match PixelBuffer::load(path) {
                Ok(sprite) => self.sprite = sprite,
                Err(e) => warn!("{}; using built-in sprite", e),
            }
        }
        info!(
            "showcase ready on {}x{} screen",
            engine.screen_width(),
            engine.screen_height()
        );
        true
    }

    fn on_update(&mut self, engine: &mut Engine, elapsed: f32) -> bool {
        if engine.key(Key::Escape).pressed {
            return false;
        }
        if engine.key(Key::Space).pressed {
            self.mode = (self.mode + 1) % MODES.len();
        }
        if engine.key(Key::H).pressed {
            self.show_help = !self.show_help;
        }
        if engine.key(Key::Up).held {
            self.blend = (self.blend + elapsed).min(1.0);
        }
        if engine.key(Key::Down).held {
            self.blend = (self.blend - elapsed).max(0.0);
        }
        self.time += elapsed;

        self.draw_panel(engine);

        let w = engine.screen_width() as i32;
        let h = engine.screen_height() as i32;
        let (mx, my) = (engine.mouse_x(), engine.mouse_y());
        let fps = engine.fps();
        let t = self.time;

        let mut c = engine.canvas();
        c.set_pixel_mode(PixelMode::Normal);
        c.clear(VERY_DARK_BLUE);

        // Line fan from the top-left corner
        for i in 0..=16 {
            c.draw_line(0, 0, i * w / 16, h - 1, DARK_GREY);
        }

        // Spinning triangle
        let (cx, cy, rad) = (w as f32 * 0.7, h as f32 * 0.55, h as f32 * 0.25);
        let corner = |k: f32| {
            let a = t + k * std::f32::consts::TAU / 3.0;
            ((cx + a.cos() * rad) as i32, (cy + a.sin() * rad) as i32)
        };
        let (p0, p1, p2) = (corner(0.0), corner(1.0), corner(2.0));
        c.fill_triangle(p0.0, p0.1, p1.0, p1.1, p2.0, p2.1, GREEN);
        c.draw_triangle(p0.0, p0.1, p1.0, p1.1, p2.0, p2.1, WHITE);

        c.fill_rect(8, h - 40, 40, 24, MAGENTA);
        c.draw_rect(8, h - 40, 40, 24, WHITE);
        c.draw_circle(w / 4, h / 2, 20, CYAN);

        if let Some(panel) = &self.panel {
            c.draw_sprite(w / 2 - 32, 12, panel);
        }

        // Sprite follows the mouse under the selected mode
        c.set_pixel_mode(MODES[self.mode]);
        c.set_pixel_blend(self.blend);
        c.draw_sprite(mx - 8, my - 8, &self.sprite);
        c.draw_partial_sprite(mx + 12, my - 4, &self.sprite, 4, 4, 8, 8);
        c.set_pixel_mode(PixelMode::Normal);
        c.set_pixel_blend(1.0);

        c.draw_string(4, 4, &format!("FPS {}", fps), WHITE, 1);
        let mode = format!("{:?} {:.2}", MODES[self.mode], self.blend);
        c.draw_string(w - text_width(&mode, 1) - 4, 4, &mode, YELLOW, 1);
        if self.show_help {
            c.fill_rect(0, h - 12, w, 12, BLACK);
            c.draw_string(2, h - 10, "SPACE mode  UP/DN blend  H help", Pixel::rgba(255, 255, 255, 160), 1);
        }

        true
    }

    fn on_destroy(&mut self, _engine: &mut Engine) -> bool {
        info!("showcase closing after {:.1}s", self.time);
        true
    }
}

fn main() -> rasterkit::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Options { config, sprite } = parse_args()?;
    let mut engine = Engine::new(config.clone())?;

    println!("=== rasterkit demo ===");
    println!(
        "Screen: {}x{} at {}x{}",
        config.screen_width, config.screen_height, config.pixel_width, config.pixel_height
    );
    println!("Controls:");
    println!("  Mouse      - Move the sprite");
    println!("  Space      - Cycle pixel mode (Normal / Mask / Alpha)");
    println!("  Up/Down    - Change blend factor");
    println!("  H          - Toggle help line");
    println!("  Escape     - Quit");

    let (display, texture_creator) = Display::open(&config)?;
    let mut host = SdlHost::new(display, &texture_creator, &config)?;
    let mut app = Showcase::new(sprite);

    engine.run(&mut app, &mut host)
}
