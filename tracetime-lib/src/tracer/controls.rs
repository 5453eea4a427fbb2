//! Lifecycle and reporting operations for `TimeTracer`.
//!
//! Methods here move the tracer through its state machine
//! (idle / running / running-with-segment), coordinate with the render
//! thread, and print the one-shot segment and end-of-run summaries.

use std::io::Write;
use std::sync::atomic::Ordering;

use crate::error::TracerError;
use crate::format::format_duration;

use super::{elapsed_secs, ClearConfig, TimeTracer};

impl TimeTracer {
    /// Start the overall run and launch the live status renderer.
    ///
    /// Fails with [`TracerError::AlreadyRunning`] if a run is in progress;
    /// the failed call leaves the timing state untouched.
    pub fn start(&self) -> Result<(), TracerError> {
        {
            let state = self.state.lock().unwrap();
            if state.running {
                return Err(TracerError::AlreadyRunning);
            }
        }

        // A renderer left over from a previous run exits on its next poll
        // now that `running` is false. Wait for it before spawning so two
        // renderers never coexist, then re-check under the lock.
        self.join_render_thread();

        let mut state = self.state.lock().unwrap();
        if state.running {
            return Err(TracerError::AlreadyRunning);
        }
        state.start_time = Some(self.clock.now());
        state.running = true;
        drop(state);

        self.spawn_render_thread().map_err(|err| {
            let mut state = self.state.lock().unwrap();
            state.start_time = None;
            state.running = false;
            TracerError::Spawn(err)
        })
    }

    /// Toggle a segment boundary.
    ///
    /// With no segment open, opens one at the current time. With a segment
    /// open, closes it, records its duration, and prints a one-line
    /// summary. The live renderer picks up the change on its next tick and
    /// switches between the total-only and segment-plus-total formats.
    ///
    /// Fails with [`TracerError::NotRunning`] outside a run.
    pub fn mark_segment(&self) -> Result<(), TracerError> {
        let mut state = self.state.lock().unwrap();
        if !state.running {
            return Err(TracerError::NotRunning);
        }

        if state.in_segment {
            let duration = elapsed_secs(state.segment_time, self.clock.now());
            state.segments.push(duration);
            state.in_segment = false;
            state.segment_time = None;
            drop(state);

            self.print_line(&format!("segment duration: {}", format_duration(duration)));
        } else {
            state.segment_time = Some(self.clock.now());
            state.in_segment = true;
        }

        Ok(())
    }

    /// Stop the run, wait for the renderer to finish, and print the
    /// end-of-run summary.
    ///
    /// An open segment is closed implicitly first so its time is not
    /// dropped. When `record` is true and at least one segment was
    /// recorded, the run's total is added to the accumulated total and the
    /// full record report is printed. The total line is always printed.
    /// Afterwards the timing state is reset with the configuration from
    /// [`set_stop_clear_config`] (full reset by default).
    ///
    /// Fails with [`TracerError::NotRunning`] if no run is in progress.
    ///
    /// [`set_stop_clear_config`]: Self::set_stop_clear_config
    pub fn stop(&self, record: bool) -> Result<(), TracerError> {
        let mut state = self.state.lock().unwrap();
        if !state.running {
            return Err(TracerError::NotRunning);
        }

        let now = self.clock.now();
        let closed_segment = if state.in_segment {
            let duration = elapsed_secs(state.segment_time, now);
            state.segments.push(duration);
            state.in_segment = false;
            state.segment_time = None;
            Some(duration)
        } else {
            None
        };

        let total = elapsed_secs(state.start_time, now);
        state.running = false;
        let record_run = record && !state.segments.is_empty();
        if record_run {
            state.total_time += total;
        }
        drop(state);

        // The renderer sees the cleared flag within one poll interval;
        // joining here keeps it from drawing over the summary lines.
        self.join_render_thread();

        if let Some(duration) = closed_segment {
            self.print_line(&format!("segment duration: {}", format_duration(duration)));
        }
        if record_run {
            self.record_summary();
        }
        self.print_line(&format!("total time: {}", format_duration(total)));

        let config = *self.stop_clear.lock().unwrap();
        self.clear_history(config);

        Ok(())
    }

    /// Print the framed per-segment report and the combined segment time.
    pub fn record_summary(&self) {
        let segments = {
            let state = self.state.lock().unwrap();
            state.segments.clone()
        };
        let sum: f64 = segments.iter().sum();

        let mut sink = self.sink.lock().unwrap();
        let _ = write!(sink, "\r\x1b[2K");
        let _ = writeln!(sink, "***------------ run record ------------***");
        let _ = writeln!(sink, "  recorded segment times:");
        for (index, duration) in segments.iter().enumerate() {
            let _ = writeln!(
                sink,
                "    segment {}: {}",
                index + 1,
                format_duration(*duration)
            );
        }
        let _ = writeln!(sink, "  combined segment time: {}", format_duration(sum));
        let _ = writeln!(sink, "***----------------------------------***");
        let _ = sink.flush();
    }

    /// Apply the given selective reset to the timing state.
    pub fn clear_history(&self, config: ClearConfig) {
        let mut state = self.state.lock().unwrap();
        state.apply_clear(&config);
    }

    /// Return true while a run is in progress.
    pub fn is_running(&self) -> bool {
        self.state.lock().unwrap().running
    }

    /// Return true while a segment is open.
    pub fn in_segment(&self) -> bool {
        self.state.lock().unwrap().in_segment
    }

    /// Recorded segment durations, in completion order.
    pub fn segments(&self) -> Vec<f64> {
        self.state.lock().unwrap().segments.clone()
    }

    /// Accumulated total across recorded runs.
    pub fn total_time(&self) -> f64 {
        self.state.lock().unwrap().total_time
    }

    /// Return true while the render thread is alive.
    pub fn render_active(&self) -> bool {
        self.render_thread_exists.load(Ordering::Relaxed)
    }

    /// Erase the live status line and print `text` as a normal line.
    fn print_line(&self, text: &str) {
        let mut sink = self.sink.lock().unwrap();
        let _ = write!(sink, "\r\x1b[2K");
        let _ = writeln!(sink, "{}", text);
        let _ = sink.flush();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::Duration;

    use crate::clock::FakeClock;
    use crate::error::TracerError;
    use crate::term::FixedWidth;

    use super::super::render::POLL_INTERVAL;
    use super::super::{ClearConfig, TimeTracer};

    fn tracer_with_fake_clock() -> (TimeTracer, Arc<FakeClock>, Arc<Mutex<Vec<u8>>>) {
        let clock = Arc::new(FakeClock::new());
        let sink: Arc<Mutex<Vec<u8>>> = Arc::new(Mutex::new(Vec::new()));
        let tracer = TimeTracer::assemble(clock.clone(), sink.clone(), Arc::new(FixedWidth(40)));
        (tracer, clock, sink)
    }

    fn sink_text(sink: &Arc<Mutex<Vec<u8>>>) -> String {
        String::from_utf8(sink.lock().unwrap().clone()).unwrap()
    }

    #[test]
    fn double_start_fails_without_mutation() {
        let (tracer, _clock, _sink) = tracer_with_fake_clock();
        tracer.start().unwrap();

        let before = tracer.state.lock().unwrap().clone();
        let result = tracer.start();
        assert!(matches!(result, Err(TracerError::AlreadyRunning)));
        assert_eq!(*tracer.state.lock().unwrap(), before);

        tracer.stop(true).unwrap();
    }

    #[test]
    fn stop_before_start_fails() {
        let (tracer, _clock, _sink) = tracer_with_fake_clock();
        assert!(matches!(tracer.stop(true), Err(TracerError::NotRunning)));
    }

    #[test]
    fn mark_segment_before_start_fails() {
        let (tracer, _clock, _sink) = tracer_with_fake_clock();
        assert!(matches!(
            tracer.mark_segment(),
            Err(TracerError::NotRunning)
        ));
    }

    #[test]
    fn mark_segment_parity_controls_open_state() {
        let (tracer, _clock, _sink) = tracer_with_fake_clock();
        tracer.set_stop_clear_config(ClearConfig::none());
        tracer.start().unwrap();

        for _ in 0..3 {
            tracer.mark_segment().unwrap();
        }
        assert!(tracer.in_segment());

        tracer.mark_segment().unwrap();
        assert!(!tracer.in_segment());
        assert_eq!(tracer.segments().len(), 2);

        tracer.stop(true).unwrap();
    }

    #[test]
    fn records_segment_and_total_with_mocked_clock() {
        let (tracer, clock, sink) = tracer_with_fake_clock();
        tracer.set_stop_clear_config(ClearConfig::none());

        tracer.start().unwrap();
        clock.advance(Duration::from_secs(2));
        tracer.mark_segment().unwrap();
        clock.advance(Duration::from_secs(1));
        tracer.mark_segment().unwrap();
        tracer.stop(true).unwrap();

        assert!(!tracer.is_running());
        assert_eq!(tracer.segments(), vec![1.0]);
        assert!((tracer.total_time() - 3.0).abs() < 1e-6);

        let output = sink_text(&sink);
        assert!(output.contains("segment duration: 00:00:01.00"));
        assert!(output.contains("total time: 00:00:03.00"));
    }

    #[test]
    fn stop_closes_an_open_segment() {
        let (tracer, clock, sink) = tracer_with_fake_clock();
        tracer.set_stop_clear_config(ClearConfig::none());

        tracer.start().unwrap();
        clock.advance(Duration::from_secs(1));
        tracer.mark_segment().unwrap();
        clock.advance(Duration::from_secs(2));
        tracer.stop(true).unwrap();

        assert_eq!(tracer.segments(), vec![2.0]);
        assert!(!tracer.in_segment());
        assert!(sink_text(&sink).contains("segment duration: 00:00:02.00"));
    }

    #[test]
    fn stop_without_record_skips_accumulation_and_report() {
        let (tracer, clock, sink) = tracer_with_fake_clock();
        tracer.set_stop_clear_config(ClearConfig::none());

        tracer.start().unwrap();
        tracer.mark_segment().unwrap();
        clock.advance(Duration::from_secs(1));
        tracer.mark_segment().unwrap();
        tracer.stop(false).unwrap();

        assert_eq!(tracer.total_time(), 0.0);
        let output = sink_text(&sink);
        assert!(!output.contains("run record"));
        assert!(output.contains("total time: 00:00:01.00"));
    }

    #[test]
    fn stop_applies_full_reset_by_default() {
        let (tracer, clock, _sink) = tracer_with_fake_clock();

        tracer.start().unwrap();
        tracer.mark_segment().unwrap();
        clock.advance(Duration::from_secs(1));
        tracer.mark_segment().unwrap();
        tracer.stop(true).unwrap();

        assert_eq!(tracer.segments(), Vec::<f64>::new());
        assert_eq!(tracer.total_time(), 0.0);
        assert!(!tracer.is_running());
    }

    #[test]
    fn record_summary_prints_segment_sum() {
        let (tracer, clock, sink) = tracer_with_fake_clock();
        tracer.set_stop_clear_config(ClearConfig::none());

        tracer.start().unwrap();
        for step in [1.0_f64, 2.0, 1.5] {
            tracer.mark_segment().unwrap();
            clock.advance(Duration::from_secs_f64(step));
            tracer.mark_segment().unwrap();
        }
        tracer.stop(false).unwrap();

        tracer.record_summary();
        let output = sink_text(&sink);
        assert!(output.contains("segment 3: 00:00:01.50"));
        assert!(output.contains("combined segment time: 00:00:04.50"));
    }

    #[test]
    fn renderer_terminates_after_stop() {
        let (tracer, _clock, _sink) = tracer_with_fake_clock();

        tracer.start().unwrap();
        assert!(tracer.render_active());

        tracer.stop(true).unwrap();
        assert!(!tracer.render_active());
    }

    #[test]
    fn renderer_draws_right_justified_status_line() {
        let (tracer, _clock, sink) = tracer_with_fake_clock();

        tracer.start().unwrap();
        // Wait for the first drawn frame rather than a fixed interval so a
        // slow spawn cannot race the stop below.
        let deadline = std::time::Instant::now() + POLL_INTERVAL * 20;
        while sink.lock().unwrap().is_empty() && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        tracer.stop(true).unwrap();

        let output = sink_text(&sink);
        assert!(output.contains("\u{1b}[2K"));
        assert!(output.contains(&format!("{:>40}", "total time: 00:00:00.00")));
    }

    #[test]
    fn drop_while_running_stops_the_renderer() {
        let (tracer, _clock, _sink) = tracer_with_fake_clock();
        tracer.start().unwrap();

        let alive = tracer.render_thread_exists.clone();
        drop(tracer);
        assert!(!alive.load(std::sync::atomic::Ordering::Relaxed));
    }

    #[test]
    fn restart_after_stop_reuses_a_single_renderer() {
        let (tracer, _clock, _sink) = tracer_with_fake_clock();

        tracer.start().unwrap();
        tracer.stop(true).unwrap();
        tracer.start().unwrap();
        assert!(tracer.render_active());
        tracer.stop(true).unwrap();
        assert!(!tracer.render_active());
    }

    #[test]
    fn concurrent_marks_never_tear_state() {
        let (tracer, _clock, _sink) = tracer_with_fake_clock();
        tracer.set_stop_clear_config(ClearConfig::none());

        tracer.start().unwrap();
        for _ in 0..100 {
            tracer.mark_segment().unwrap();
            if tracer.segments().len() % 10 == 0 {
                thread::sleep(Duration::from_millis(1));
            }
        }
        tracer.stop(true).unwrap();

        assert_eq!(tracer.segments().len(), 50);
        assert!(!tracer.in_segment());
    }
}
