//! Live console time tracing.
//!
//! [`TimeTracer`] measures elapsed wall-clock time for an overall run and
//! for segments within it, while a background render thread keeps a
//! right-aligned status line updated on the terminal.

mod controls;
mod render;
mod state;

pub use state::ClearConfig;

use std::io::{self, Write};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::clock::{Clock, SystemClock};
use crate::term::{DetectedWidth, TerminalWidthProvider};

use state::TimerState;

/// Concurrent console stopwatch.
///
/// `TimeTracer` owns the shared timing state, enforces the
/// idle / running / running-with-segment state machine, and manages the
/// single render thread that is alive exactly while a run is in progress.
pub struct TimeTracer {
    state: Arc<Mutex<TimerState>>,
    clock: Arc<dyn Clock>,
    sink: Arc<Mutex<dyn Write + Send>>,
    width: Arc<dyn TerminalWidthProvider>,
    stop_clear: Arc<Mutex<ClearConfig>>,
    render_thread_exists: Arc<AtomicBool>,
    render_thread_handle: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl TimeTracer {
    /// Create a tracer that writes to stdout and queries the attached
    /// terminal for its width.
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }

    /// Create a tracer writing to the given sink instead of stdout.
    pub fn with_output<W>(sink: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self::assemble(
            Arc::new(SystemClock::new()),
            Arc::new(Mutex::new(sink)),
            Arc::new(DetectedWidth),
        )
    }

    pub(crate) fn assemble(
        clock: Arc<dyn Clock>,
        sink: Arc<Mutex<dyn Write + Send>>,
        width: Arc<dyn TerminalWidthProvider>,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(TimerState::new())),
            clock,
            sink,
            width,
            stop_clear: Arc::new(Mutex::new(ClearConfig::default())),
            render_thread_exists: Arc::new(AtomicBool::new(false)),
            render_thread_handle: Arc::new(Mutex::new(None)),
        }
    }

    /// Replace the terminal width provider.
    pub fn set_width_provider<P>(&mut self, provider: P)
    where
        P: TerminalWidthProvider,
    {
        self.width = Arc::new(provider);
    }

    /// Override the reset applied at the end of [`stop`].
    ///
    /// By default `stop` performs a full reset. Callers that want timing
    /// data to survive across runs can install a partial configuration.
    ///
    /// [`stop`]: Self::stop
    pub fn set_stop_clear_config(&self, config: ClearConfig) {
        *self.stop_clear.lock().unwrap() = config;
    }
}

/// Seconds elapsed from `since` to `now`, clamped at zero.
///
/// A reading that appears to precede `since` comes from a clock anomaly and
/// must not surface as a negative duration.
pub(crate) fn elapsed_secs(since: Option<Duration>, now: Duration) -> f64 {
    match since {
        Some(since) => now.saturating_sub(since).as_secs_f64(),
        None => 0.0,
    }
}

impl Drop for TimeTracer {
    fn drop(&mut self) {
        // The render thread must never outlive its tracer: signal it to
        // finish and wait for it before the shared state is released.
        if let Ok(mut state) = self.state.lock() {
            state.running = false;
        }
        self.join_render_thread();
    }
}
