//! Error types for the wb-harness crate.

use std::time::Duration;

/// Failures of the test harness itself or of the code it drives.
///
/// [`WorkerCrash`](HarnessError::WorkerCrash) is deferred: an error raised
/// inside the session body is captured on the worker thread and re-raised
/// from whichever orchestrator call joins it.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// The worker's body returned an error or panicked.
    #[error("session worker failed: {0}")]
    WorkerCrash(String),

    /// The worker returned cleanly before ever reaching a watch loop.
    ///
    /// A harness invariant violation: the body never constructed and ran a
    /// listener, so there is nothing to drive.
    #[error("session worker exited before reaching the watch loop")]
    WorkerExited,

    /// The worker did not reach its watch loop within the ready timeout.
    #[error("worker not ready within {0:?}")]
    ReadyTimeout(Duration),

    /// No acknowledgment arrived for an injected event.
    #[error("no acknowledgment for injected event within {0:?}")]
    AckTimeout(Duration),

    /// A harness channel closed unexpectedly.
    #[error("harness channel closed unexpectedly")]
    ChannelClosed,

    /// An event was injected before any listener was constructed.
    #[error("no listener constructed in this session")]
    NoListener,

    /// The current working directory is not valid UTF-8.
    #[error("current directory is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(std::path::PathBuf),

    /// An I/O error while spawning or interacting with the worker.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
