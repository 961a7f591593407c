use std::time::Instant;

/// Wall-clock delta between frames. The game clamps it before use.
pub struct FrameTimer {
    last: Instant,
    pub dt: f32,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            dt: 0.0,
        }
    }

    pub fn tick(&mut self) {
        let now = Instant::now();
        self.dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
    }

    /// Restart the baseline so the first frame after a pause is not one long delta.
    pub fn resume(&mut self) {
        self.last = Instant::now();
        self.dt = 0.0;
    }
}
