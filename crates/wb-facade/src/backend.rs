//! The backend seam between the facade and the underlying watch service.
//!
//! [`WatchBackend`] is the indirection point the era strategies call
//! through. The bundled production implementation wraps `notify`; the test
//! harness substitutes a recording stand-in without the facade noticing.
//!
//! The trait mirrors the two construction paths of the historical service:
//! the factory path (`build_watcher` + `start`, used by every era from Old
//! onwards) and the Ancient direct-construction path (`start_blocking`,
//! which does not return control until interrupted).

use camino::Utf8PathBuf;
use wb_core::{SharedHandler, WatchOptions};

use crate::interrupt::Interrupt;

/// Identifier of a watcher built through [`WatchBackend::build_watcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatcherId(usize);

impl WatcherId {
    /// Creates an id from a backend-assigned index.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// The backend-assigned index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Errors raised by a watch backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// A blocking start was interrupted.
    ///
    /// Not a failure: this is the normal way an Ancient-era start returns.
    /// The Ancient strategy consumes it; it never reaches callers.
    #[error("blocking watcher start was interrupted")]
    Interrupted,

    /// An id that this backend never handed out.
    #[error("unknown watcher id {0:?}")]
    UnknownWatcher(WatcherId),

    /// The underlying notify watcher failed.
    #[cfg(feature = "bundled-backend")]
    #[error("notify backend error: {0}")]
    Notify(#[from] notify::Error),

    /// An I/O error during watcher setup.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The operations every era strategy needs from the underlying service.
///
/// Implementations must be [`Send`] so a facade can be driven from a worker
/// thread.
pub trait WatchBackend: Send {
    /// Builds (but does not start) one watcher over `directories`.
    ///
    /// Returns an id to pass to [`start`](Self::start). The Stale era calls
    /// this once per directory; the other factory-path eras call it once
    /// with the full list.
    fn build_watcher(
        &mut self,
        directories: &[Utf8PathBuf],
        options: &WatchOptions,
        handler: SharedHandler,
    ) -> Result<WatcherId, BackendError>;

    /// Starts a previously built watcher. Returns immediately.
    fn start(&mut self, id: WatcherId) -> Result<(), BackendError>;

    /// Ancient-era path: construct a watcher directly and block the calling
    /// thread until `interrupt` fires.
    ///
    /// `force_polling` is the trailing positional boolean of that era,
    /// applied as a post-construction toggle. Returns
    /// [`BackendError::Interrupted`] once the token fires.
    fn start_blocking(
        &mut self,
        directories: &[Utf8PathBuf],
        force_polling: bool,
        handler: SharedHandler,
        interrupt: &Interrupt,
    ) -> Result<(), BackendError>;

    /// Stops every watcher started through this backend.
    fn stop_all(&mut self) -> Result<(), BackendError>;
}
