use std::cell::Cell;
use std::time::{Duration, Instant};

/// Monotonic timestamp source, measured from an arbitrary origin.
pub trait TimeSource {
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven clock for deterministic tests and replays.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, to: Duration) {
        self.now.set(to);
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// What one frame callback should do.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FramePoll {
    /// First frame after (re)arming: timestamp recorded, no tick.
    Baseline,
    /// Interval not yet elapsed.
    Waiting,
    /// Run exactly one simulation step.
    Tick,
}

/// Maps frame timestamps onto simulation ticks at a variable rate.
///
/// At most one tick fires per frame regardless of how long the frame took, so
/// a stalled frame never produces a catch-up burst.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulationClock {
    last_tick: Option<Duration>,
}

impl SimulationClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Polls the clock for the frame at `now`, ticking at `speed` per second.
    pub fn poll(&mut self, now: Duration, speed: u32) -> FramePoll {
        let Some(last_tick) = self.last_tick else {
            self.last_tick = Some(now);
            return FramePoll::Baseline;
        };

        if now.saturating_sub(last_tick) < tick_interval(speed) {
            return FramePoll::Waiting;
        }

        self.last_tick = Some(now);
        FramePoll::Tick
    }

    /// Forgets the baseline so the next frame starts timing afresh.
    pub fn reset(&mut self) {
        self.last_tick = None;
    }

    #[must_use]
    pub fn has_baseline(&self) -> bool {
        self.last_tick.is_some()
    }
}

/// Returns the interval between ticks at `speed` ticks per second.
#[must_use]
pub fn tick_interval(speed: u32) -> Duration {
    Duration::from_secs(1) / speed.max(1)
}
