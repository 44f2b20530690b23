/// Frame clock driven by caller-supplied timestamps.
///
/// The host owns the real clock (animation-frame callback, test harness,
/// fixed-step loop) and passes milliseconds in. The first tick has no
/// reference point and yields a zero delta.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameClock {
    last_ms: Option<f64>,
    /// Seconds since the previous tick
    pub delta: f64,
    /// Total number of ticks
    pub frame_count: u64,
}

impl FrameClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `now_ms` and returns the elapsed seconds since the last tick.
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        self.delta = match self.last_ms {
            Some(last) => (now_ms - last) / 1000.0,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        self.frame_count += 1;
        self.delta
    }

    /// Forgets the reference timestamp; the next tick yields zero again.
    pub fn reset(&mut self) {
        self.last_ms = None;
        self.delta = 0.0;
    }

    #[inline]
    #[must_use]
    pub fn dt_seconds(&self) -> f64 {
        self.delta
    }
}
