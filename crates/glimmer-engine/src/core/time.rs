/// Frame clock.
/// Turns variable browser frame deltas (seconds) into whole milliseconds,
/// carrying the fractional remainder so no time is lost between frames.
pub struct FrameClock {
    /// Milliseconds elapsed since the clock started.
    now_ms: u64,
    /// Sub-millisecond remainder carried to the next frame.
    carry_ms: f64,
    /// Largest delta a single frame may contribute.
    max_frame_ms: u32,
}

impl FrameClock {
    pub fn new(max_frame_ms: u32) -> Self {
        Self {
            now_ms: 0,
            carry_ms: 0.0,
            max_frame_ms: max_frame_ms.max(1),
        }
    }

    /// Add a frame delta in seconds. Returns the whole milliseconds to advance.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        // Negative or NaN deltas (clock skew, paused tabs) contribute nothing
        let frame_ms = if frame_dt.is_finite() && frame_dt > 0.0 {
            frame_dt as f64 * 1000.0
        } else {
            0.0
        };
        // Cap so a backgrounded tab doesn't dump seconds of time in one frame
        self.carry_ms = (self.carry_ms + frame_ms).min(self.max_frame_ms as f64);
        let whole = self.carry_ms.floor();
        self.carry_ms -= whole;
        let step = whole as u32;
        self.now_ms += step as u64;
        step
    }

    /// Milliseconds elapsed since the clock started.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// The per-frame cap in milliseconds.
    pub fn max_frame_ms(&self) -> u32 {
        self.max_frame_ms
    }
}
