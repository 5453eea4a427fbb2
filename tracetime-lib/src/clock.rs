//! Clock abstraction used by the tracer.
//!
//! Timing code reads the clock through a trait so tests can substitute a
//! fake implementation and drive elapsed time deterministically.

use std::fmt::Debug;
use std::time::{Duration, Instant};

/// Source of elapsed time since some fixed origin.
///
/// Readings from the same clock are monotonic for the real implementation;
/// callers treat `now()` values as positions on a shared timeline and only
/// ever subtract them.
pub(crate) trait Clock: Debug + Send + Sync + 'static {
    /// Time elapsed since the clock's origin.
    fn now(&self) -> Duration;
}

/// Real clock backed by [`Instant`], anchored at construction time.
#[derive(Debug)]
pub(crate) struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub(crate) fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Fake clock for tests.
///
/// All clones share the same underlying reading, so a test can advance time
/// after handing the clock to a tracer.
#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct FakeClock {
    reading: std::sync::Arc<std::sync::Mutex<Duration>>,
}

#[cfg(test)]
impl FakeClock {
    pub(crate) fn new() -> Self {
        Self {
            reading: std::sync::Arc::new(std::sync::Mutex::new(Duration::ZERO)),
        }
    }

    /// Move the clock forward by `step`.
    pub(crate) fn advance(&self, step: Duration) {
        let mut reading = self.reading.lock().unwrap();
        *reading += step;
    }
}

#[cfg(test)]
impl Clock for FakeClock {
    fn now(&self) -> Duration {
        *self.reading.lock().unwrap()
    }
}
