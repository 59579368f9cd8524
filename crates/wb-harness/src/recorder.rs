//! Explicit call recording for backend assertions.
//!
//! Instead of intercepting arbitrary method dispatch, tests share a
//! [`Recorder`] with a [`RecordingBackend`] and assert on the exact call
//! sequence afterwards: `create_with` for every watcher built, `start` per
//! start, `stop` for the stop-all, plus the Ancient-era `force_polling`
//! toggle.

use std::sync::Arc;

use camino::Utf8PathBuf;
use parking_lot::Mutex;
use wb_core::{SharedHandler, WatchOptions};
use wb_facade::{BackendError, Interrupt, WatchBackend, WatcherId};

/// One recorded backend call.
///
/// # Examples
///
/// ```
/// use wb_harness::RecordedCall;
///
/// let call = RecordedCall::new("create_with", ["."]);
/// assert_eq!(call, RecordedCall::new("create_with", ["."]));
/// assert_ne!(call, RecordedCall::bare("start"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Name of the recorded operation.
    pub method: String,
    /// Stringified arguments, in call order.
    pub args: Vec<String>,
}

impl RecordedCall {
    /// Creates a call record.
    #[must_use]
    pub fn new<M, I>(method: M, args: I) -> Self
    where
        M: Into<String>,
        I: IntoIterator<Item: Into<String>>,
    {
        Self {
            method: method.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// A call record with no arguments.
    #[must_use]
    pub fn bare(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            args: Vec::new(),
        }
    }
}

/// A shared, ordered log of backend calls.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl Recorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a call to the log.
    pub fn record<M, I>(&self, method: M, args: I)
    where
        M: Into<String>,
        I: IntoIterator<Item: Into<String>>,
    {
        self.calls.lock().push(RecordedCall::new(method, args));
    }

    /// A snapshot of all recorded calls, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }
}

/// How a [`RecordingBackend`] behaves inside `start_blocking`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockingBehavior {
    /// Return [`BackendError::Interrupted`] immediately, simulating an
    /// interrupt arriving during the blocking start.
    #[default]
    InterruptImmediately,
    /// Block on the token first, then return `Interrupted`, like a real
    /// Ancient-era start.
    WaitForInterrupt,
}

/// A [`WatchBackend`] that only records what was asked of it.
#[derive(Debug)]
pub struct RecordingBackend {
    recorder: Recorder,
    blocking: BlockingBehavior,
    next_id: usize,
}

impl RecordingBackend {
    /// Creates a recording backend writing into `recorder`.
    #[must_use]
    pub fn new(recorder: Recorder) -> Self {
        Self {
            recorder,
            blocking: BlockingBehavior::default(),
            next_id: 0,
        }
    }

    /// Overrides the `start_blocking` behavior.
    #[must_use]
    pub fn with_blocking(mut self, blocking: BlockingBehavior) -> Self {
        self.blocking = blocking;
        self
    }

    fn record_create(&self, directories: &[Utf8PathBuf], options: Option<&WatchOptions>) {
        let mut args: Vec<String> = directories.iter().map(ToString::to_string).collect();
        if let Some(options) = options {
            args.push(format!("{options:?}"));
        }
        self.recorder.record("create_with", args);
    }
}

impl WatchBackend for RecordingBackend {
    fn build_watcher(
        &mut self,
        directories: &[Utf8PathBuf],
        options: &WatchOptions,
        _handler: SharedHandler,
    ) -> Result<WatcherId, BackendError> {
        self.record_create(directories, Some(options));
        let id = WatcherId::from_index(self.next_id);
        self.next_id += 1;
        Ok(id)
    }

    fn start(&mut self, _id: WatcherId) -> Result<(), BackendError> {
        self.recorder.record("start", Vec::<String>::new());
        Ok(())
    }

    fn start_blocking(
        &mut self,
        directories: &[Utf8PathBuf],
        force_polling: bool,
        _handler: SharedHandler,
        interrupt: &Interrupt,
    ) -> Result<(), BackendError> {
        // Ancient construction order: build, toggle polling, then start.
        self.record_create(directories, None);
        if force_polling {
            self.recorder.record("force_polling", ["true"]);
        }
        self.recorder.record("start", Vec::<String>::new());
        if self.blocking == BlockingBehavior::WaitForInterrupt {
            interrupt.wait();
        }
        Err(BackendError::Interrupted)
    }

    fn stop_all(&mut self) -> Result<(), BackendError> {
        self.recorder.record("stop", Vec::<String>::new());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_preserves_call_order() {
        let recorder = Recorder::new();
        recorder.record("first", ["a"]);
        recorder.record("second", Vec::<String>::new());

        assert_eq!(
            recorder.calls(),
            vec![
                RecordedCall::new("first", ["a"]),
                RecordedCall::bare("second"),
            ]
        );
    }

    #[test]
    fn clones_share_the_log() {
        let recorder = Recorder::new();
        recorder.clone().record("from-clone", Vec::<String>::new());
        assert_eq!(recorder.calls().len(), 1);
    }
}
