use std::fmt::{Display, Formatter};

/// Error type for tracer lifecycle operations.
#[derive(Debug)]
pub enum TracerError {
    /// `start` was called while a run was already in progress.
    AlreadyRunning,
    /// `stop` or `mark_segment` was called with no run in progress.
    NotRunning,
    /// The render thread could not be created.
    Spawn(std::io::Error),
}

impl Display for TracerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyRunning => write!(f, "timing has already started"),
            Self::NotRunning => write!(f, "timing has not started"),
            Self::Spawn(err) => write!(f, "failed to spawn render thread: {}", err),
        }
    }
}

impl std::error::Error for TracerError {}

impl From<std::io::Error> for TracerError {
    fn from(value: std::io::Error) -> Self {
        Self::Spawn(value)
    }
}
