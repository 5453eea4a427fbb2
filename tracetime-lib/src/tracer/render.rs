//! Background status-line renderer for `TimeTracer`.
//!
//! One render thread exists per running period. Each tick it snapshots the
//! timing state under the lock, releases the lock, and only then formats
//! and prints, so caller-side API calls are never blocked by terminal I/O.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use log::warn;

use crate::clock::Clock;
use crate::format::{format_duration, right_justify};
use crate::term::{resolve_columns, TerminalWidthProvider};

use super::state::TimerState;
use super::{elapsed_secs, TimeTracer};

/// Time between render ticks; also bounds how long a renderer keeps going
/// after `running` is cleared.
pub(crate) const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Shared handles captured by the render thread.
pub(super) struct RenderContext {
    pub(super) state: Arc<Mutex<TimerState>>,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) sink: Arc<Mutex<dyn Write + Send>>,
    pub(super) width: Arc<dyn TerminalWidthProvider>,
    pub(super) alive: Arc<AtomicBool>,
}

/// Guard that keeps the renderer liveness flag in sync with thread lifetime.
struct RenderThreadGuard {
    alive: Arc<AtomicBool>,
}

impl RenderThreadGuard {
    fn new(alive: Arc<AtomicBool>) -> Self {
        alive.store(true, Ordering::Relaxed);
        Self { alive }
    }
}

impl Drop for RenderThreadGuard {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::Relaxed);
    }
}

impl TimeTracer {
    /// Spawn the render thread for the current run.
    pub(super) fn spawn_render_thread(&self) -> io::Result<()> {
        let context = RenderContext {
            state: self.state.clone(),
            clock: self.clock.clone(),
            sink: self.sink.clone(),
            width: self.width.clone(),
            alive: self.render_thread_exists.clone(),
        };

        // Mark the renderer alive before the thread is scheduled so callers
        // observing `render_active` right after spawn see a consistent value.
        self.render_thread_exists.store(true, Ordering::Relaxed);

        let handle = thread::Builder::new()
            .name("tracetime-render".to_string())
            .spawn(move || run_render_loop(context));
        match handle {
            Ok(handle) => {
                *self.render_thread_handle.lock().unwrap() = Some(handle);
                Ok(())
            }
            Err(err) => {
                self.render_thread_exists.store(false, Ordering::Relaxed);
                Err(err)
            }
        }
    }

    /// Wait for the render thread to finish, if one was spawned.
    ///
    /// The renderer observes a cleared `running` flag within one poll
    /// interval, so this blocks for at most roughly [`POLL_INTERVAL`].
    pub(super) fn join_render_thread(&self) {
        let taken = match self.render_thread_handle.lock() {
            Ok(mut handle) => handle.take(),
            Err(_) => None,
        };
        if let Some(handle) = taken {
            if handle.thread().id() == thread::current().id() {
                warn!("render thread join requested from render thread; skipping");
            } else if handle.join().is_err() {
                warn!("render thread panicked during join");
            }
        }
    }
}

fn run_render_loop(context: RenderContext) {
    let _guard = RenderThreadGuard::new(context.alive.clone());

    loop {
        let state = context.state.lock().unwrap();
        if !state.running {
            break;
        }
        let start_time = state.start_time;
        let segment_time = state.segment_time;
        let in_segment = state.in_segment;
        drop(state);

        let now = context.clock.now();
        let total = elapsed_secs(start_time, now);
        let text = if in_segment {
            let segment = elapsed_secs(segment_time, now);
            format!(
                "segment time: {} | total time: {}",
                format_duration(segment),
                format_duration(total)
            )
        } else {
            format!("total time: {}", format_duration(total))
        };

        let columns = resolve_columns(context.width.as_ref());
        let justified = right_justify(&text, columns);

        let mut sink = context.sink.lock().unwrap();
        let _ = write!(sink, "\r\x1b[2K{}", justified);
        let _ = sink.flush();
        drop(sink);

        thread::sleep(POLL_INTERVAL);
    }
}
