//! Save/load error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors from snapshot encoding, file access and the background worker.
/// None of these are fatal; callers log and carry on.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The requested snapshot file does not exist
    #[error("snapshot not found: {}", .0.display())]
    NotFound(PathBuf),
    /// Any other file system failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A section could not be serialized
    #[error("encoding error: {0}")]
    Encode(String),
    /// The bytes are not a valid snapshot
    #[error("corrupt snapshot: {0}")]
    Corrupt(String),
    /// Every snapshot number up to `u32::MAX` has been handed out
    #[error("no snapshot numbers left")]
    Exhausted,
    /// Written by a newer build with a format this one cannot read
    #[error("snapshot format v{found} is newer than supported v{supported}")]
    UnsupportedFormat { found: u16, supported: u16 },
    /// A request of the same kind is still running
    #[error("a {0} is already in progress")]
    Busy(&'static str),
    /// Nothing finished within the wait limit
    #[error("timed out waiting for the save worker")]
    Timeout,
    /// The worker thread disappeared before answering
    #[error("save worker stopped unexpectedly")]
    WorkerGone,
}

impl SaveError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SaveError::NotFound(_))
    }
}
