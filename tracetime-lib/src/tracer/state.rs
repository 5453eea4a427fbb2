//! Shared timing state and the selective-reset configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Mutable timing record shared between the caller and the render thread.
///
/// Every field is read and written under the tracer's lock. `start_time` and
/// `segment_time` are positions on the tracer clock's timeline; durations
/// are derived by subtracting them from a later reading.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct TimerState {
    pub(crate) start_time: Option<Duration>,
    pub(crate) segment_time: Option<Duration>,
    pub(crate) total_time: f64,
    pub(crate) running: bool,
    pub(crate) in_segment: bool,
    pub(crate) segments: Vec<f64>,
}

impl TimerState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Reset the fields selected by `config` to their initial values.
    pub(crate) fn apply_clear(&mut self, config: &ClearConfig) {
        if config.segments {
            self.segments.clear();
        }
        if config.total_time {
            self.total_time = 0.0;
        }
        if config.start_time {
            self.start_time = None;
        }
        if config.segment_time {
            self.segment_time = None;
        }
        if config.running {
            self.running = false;
        }
        if config.in_segment {
            self.in_segment = false;
        }
    }
}

/// Selects which timing fields [`TimeTracer::clear_history`] resets.
///
/// Every option defaults to `true`, making the default value a full reset.
///
/// [`TimeTracer::clear_history`]: super::TimeTracer::clear_history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClearConfig {
    pub segments: bool,
    pub total_time: bool,
    pub start_time: bool,
    pub segment_time: bool,
    pub running: bool,
    pub in_segment: bool,
}

impl Default for ClearConfig {
    fn default() -> Self {
        Self {
            segments: true,
            total_time: true,
            start_time: true,
            segment_time: true,
            running: true,
            in_segment: true,
        }
    }
}

impl ClearConfig {
    /// Configuration that leaves every field untouched.
    pub fn none() -> Self {
        Self {
            segments: false,
            total_time: false,
            start_time: false,
            segment_time: false,
            running: false,
            in_segment: false,
        }
    }
}
