use std::time::{Duration, Instant};

/// Wall-clock time since the render loop started.
pub struct Clock {
    start: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_time(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

const FPS_WINDOW: Duration = Duration::from_millis(500);

/// Counts frames and reports a frames-per-second figure every half second.
pub struct FrameTiming {
    frame_count: u32,
    window_start: Instant,
    fps: f32,
}

impl FrameTiming {
    pub fn new(now: Instant) -> Self {
        Self {
            frame_count: 0,
            window_start: now,
            fps: 0.0,
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Returns the new fps value when a measurement window closes.
    pub fn record_frame(&mut self, now: Instant) -> Option<f32> {
        self.frame_count = self.frame_count.saturating_add(1);

        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < FPS_WINDOW {
            return None;
        }

        self.fps = self.frame_count as f32 / elapsed.as_secs_f32();
        self.frame_count = 0;
        self.window_start = now;
        Some(self.fps)
    }
}
