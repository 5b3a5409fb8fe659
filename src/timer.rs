/// A recurring timer owned by whoever drives it.
///
/// The frame loop hands each `Interval` the elapsed frame time and asks how
/// many periods fired. Nothing is global, so two engines (or two tests) never
/// share timer state, and `stop` discards any accumulated time so a stopped
/// interval can never fire late.
#[derive(Debug, Clone)]
pub struct Interval {
    period: f32,
    elapsed: f32,
    running: bool,
}

impl Interval {
    /// Creates a stopped interval with the given period (seconds).
    pub fn new(period: f32) -> Self {
        debug_assert!(period > 0.0);
        Self {
            period,
            elapsed: 0.0,
            running: false,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stops the interval and clears accumulated time.
    pub fn stop(&mut self) {
        self.running = false;
        self.elapsed = 0.0;
    }

    /// Advances the interval by `dt` seconds and returns how many whole
    /// periods fired. The remainder carries over, so a long frame catches up
    /// instead of silently dropping ticks.
    pub fn advance(&mut self, dt: f32) -> u32 {
        if !self.running {
            return 0;
        }
        self.elapsed += dt;
        let mut fired = 0;
        while self.elapsed >= self.period {
            self.elapsed -= self.period;
            fired += 1;
        }
        fired
    }
}
