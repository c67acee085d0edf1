//! Shared utilities

// ============================================================================
// Frame Clock
// ============================================================================

use std::time::Instant;

/// Per-frame delta time plus a frames-per-second count refreshed once a second
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_frame: Instant,
    frame_timer: f32,
    frame_count: u32,
    fps: u32,
}

impl FrameClock {
    /// The timer starts full, so the very first frame produces a report
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            frame_timer: 1.0,
            frame_count: 0,
            fps: 0,
        }
    }

    /// Restart delta measurement from now
    pub fn reset(&mut self) {
        self.last_frame = Instant::now();
        self.frame_timer = 1.0;
        self.frame_count = 0;
    }

    /// Call once at the start of each frame.
    /// Returns (delta_time, fps report if a second has elapsed)
    pub fn tick(&mut self) -> (f32, Option<u32>) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        (dt, self.advance(dt))
    }

    /// Account one frame lasting `dt` seconds
    pub fn advance(&mut self, dt: f32) -> Option<u32> {
        self.frame_timer += dt;
        self.frame_count += 1;
        if self.frame_timer >= 1.0 {
            self.frame_timer -= 1.0;
            self.fps = self.frame_count;
            self.frame_count = 0;
            Some(self.fps)
        } else {
            None
        }
    }

    /// Frames counted during the last full second
    pub fn fps(&self) -> u32 {
        self.fps
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_reports() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(0.016), Some(1));
        assert_eq!(clock.fps(), 1);
    }

    #[test]
    fn test_reports_once_per_second() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        let reports: Vec<u32> = (0..120).filter_map(|_| clock.advance(0.031_25)).collect();
        // 1/32 s frames sum exactly in binary
        assert_eq!(reports, [32, 32, 32]);
        assert_eq!(clock.fps(), 32);
    }

    #[test]
    fn test_tick_measures_elapsed_time() {
        let mut clock = FrameClock::new();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let (dt, report) = clock.tick();
        assert!(dt >= 0.004);
        assert_eq!(report, Some(1));
    }
}
