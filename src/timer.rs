use std::num::NonZeroUsize;
use std::time::Duration;
use std::time::Instant;

/// A monotonic stopwatch.
///
/// Backed by [`Instant`], so wall-clock adjustments never affect readings.
#[derive(Clone, Copy, Debug)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    /// Reads the clock.
    #[inline(always)]
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Time elapsed since [`Stopwatch::start`].
    #[inline(always)]
    pub fn stop(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Spreads `elapsed` over `ops` operations, in nanoseconds.
pub fn nanos_per_op(elapsed: Duration, ops: NonZeroUsize) -> f64 {
    elapsed.as_secs_f64() * 1e9 / ops.get() as f64
}
