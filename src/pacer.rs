//! External step scheduling.
//!
//! The core never sleeps on its own. Whoever drives it supplies a [`Pacer`]
//! that yields for the requested delay and reports how much time actually
//! went by. [`RealTimePacer`] sleeps the calling thread; [`FixedPacer`]
//! advances simulated time instantly.

use std::time::{Duration, Instant};

pub trait Pacer {
    /// Yield for roughly `delay` and return the seconds that elapsed.
    fn wait(&mut self, delay: Duration) -> f32;
}

/// Sleeps and measures wall-clock time between calls.
#[derive(Debug)]
pub struct RealTimePacer {
    last: Instant,
}

impl Default for RealTimePacer {
    fn default() -> Self {
        Self::new()
    }
}

impl RealTimePacer {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }
}

impl Pacer for RealTimePacer {
    fn wait(&mut self, delay: Duration) -> f32 {
        std::thread::sleep(delay);
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        dt
    }
}

/// Reports exactly the requested delay without sleeping.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedPacer;

impl Pacer for FixedPacer {
    fn wait(&mut self, delay: Duration) -> f32 {
        delay.as_secs_f32()
    }
}

/// Any `FnMut(Duration) -> f32` works as a pacer, which is handy for tests
/// that need to act between ticks.
impl<F: FnMut(Duration) -> f32> Pacer for F {
    fn wait(&mut self, delay: Duration) -> f32 {
        self(delay)
    }
}
