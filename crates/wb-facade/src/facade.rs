//! The version-adaptive facade and its era strategies.
//!
//! [`Facade`] presents one blocking contract (watch, deliver callbacks,
//! return once interrupted) across every era of the underlying service.
//! The era is fixed at construction; [`ChangeListener::listen`] dispatches
//! to the matching start/stop strategy:
//!
//! - **Old / Current**: build one watcher over all directories, start it,
//!   suspend on the interrupt token, stop all watchers on wake.
//! - **Stale**: same, except one watcher is built per directory (the service
//!   mishandled several directories in a single watcher), and all of them
//!   are started before suspending.
//! - **Ancient**: filter out unwatchable directories, then hand control to
//!   the backend's blocking start; the interrupt that ends it is swallowed
//!   here and no stop call is made, because that era has no separate
//!   shutdown step. Reproduced deliberately, limitation and all.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info, warn};
use wb_core::{Era, SharedHandler, WatchRequest};

use crate::backend::{BackendError, WatchBackend};
use crate::error::FacadeError;
use crate::interrupt::Interrupt;

/// The uniform blocking watch contract.
///
/// `listen` returns only after the interrupt token has been handled (or,
/// Ancient era, after an internal interrupt with no further signal). The
/// test harness's fake backend implements this same trait, so user code can
/// be driven against either without change.
pub trait ChangeListener: Send {
    /// Watches `request`'s directories, delivering changes to `handler`,
    /// until `interrupt` fires.
    fn listen(
        &mut self,
        request: &WatchRequest,
        handler: SharedHandler,
        interrupt: &Interrupt,
    ) -> Result<(), FacadeError>;
}

/// A facade bound to exactly one [`Era`] at construction.
pub struct Facade {
    era: Era,
    backend: Box<dyn WatchBackend>,
}

impl std::fmt::Debug for Facade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Facade")
            .field("era", &self.era)
            .finish_non_exhaustive()
    }
}

impl Facade {
    /// Creates a facade for `era` over an explicit backend.
    ///
    /// Production callers go through [`create`](crate::create); this
    /// constructor is the seam the test harness uses to substitute a
    /// recording backend.
    #[must_use]
    pub fn with_backend(era: Era, backend: Box<dyn WatchBackend>) -> Self {
        Self { era, backend }
    }

    /// The era this facade was bound to.
    #[must_use]
    pub fn era(&self) -> Era {
        self.era
    }

    /// One watcher over the whole directory list (Old/Current strategy).
    fn listen_common(
        &mut self,
        request: &WatchRequest,
        handler: SharedHandler,
        interrupt: &Interrupt,
    ) -> Result<(), FacadeError> {
        let id = self
            .backend
            .build_watcher(request.directories(), request.options(), handler)?;
        self.backend.start(id)?;
        self.wait_then_stop(interrupt)
    }

    /// One watcher per directory, all built before any waiting (Stale).
    fn listen_split(
        &mut self,
        request: &WatchRequest,
        handler: SharedHandler,
        interrupt: &Interrupt,
    ) -> Result<(), FacadeError> {
        let mut ids = Vec::with_capacity(request.directories().len());
        for dir in request.directories() {
            let id = self.backend.build_watcher(
                std::slice::from_ref(dir),
                request.options(),
                handler.clone(),
            )?;
            ids.push(id);
        }
        for id in ids {
            self.backend.start(id)?;
        }
        self.wait_then_stop(interrupt)
    }

    /// Direct blocking construction, interrupt swallowed, no stop (Ancient).
    fn listen_ancient(
        &mut self,
        request: &WatchRequest,
        handler: SharedHandler,
        interrupt: &Interrupt,
    ) -> Result<(), FacadeError> {
        let directories = watchable_directories(request.directories());
        if directories.is_empty() {
            warn!("no watchable directories left after filtering");
        }
        match self.backend.start_blocking(
            &directories,
            request.options().force_polling,
            handler,
            interrupt,
        ) {
            // No shutdown step exists in this era; return without stopping.
            Ok(()) | Err(BackendError::Interrupted) => Ok(()),
            Err(other) => Err(other.into()),
        }
    }

    fn wait_then_stop(&mut self, interrupt: &Interrupt) -> Result<(), FacadeError> {
        debug!(era = ?self.era, "watchers started, waiting for interrupt");
        interrupt.wait();
        info!(era = ?self.era, "interrupt received, stopping watchers");
        self.backend.stop_all()?;
        Ok(())
    }
}

impl ChangeListener for Facade {
    fn listen(
        &mut self,
        request: &WatchRequest,
        handler: SharedHandler,
        interrupt: &Interrupt,
    ) -> Result<(), FacadeError> {
        debug!(era = ?self.era, directories = ?request.directories(), "listen");
        match self.era {
            Era::Ancient => self.listen_ancient(request, handler, interrupt),
            Era::Stale => self.listen_split(request, handler, interrupt),
            Era::Old | Era::Current => self.listen_common(request, handler, interrupt),
        }
    }
}

/// Filters `directories` down to the ones an Ancient-era service can watch.
///
/// That era probes writability by writing a sentinel file into each watched
/// directory, which fails hard on read-only or missing directories, so we
/// probe the same way up front and silently drop entries that would break
/// it. Order of the retained entries is preserved.
#[must_use]
pub fn watchable_directories(directories: &[Utf8PathBuf]) -> Vec<Utf8PathBuf> {
    directories
        .iter()
        .filter(|dir| {
            let keep = dir.is_dir() && directory_writable(dir);
            if !keep {
                debug!(directory = %dir, "dropping unwatchable directory");
            }
            keep
        })
        .cloned()
        .collect()
}

/// Probes writability the way the Ancient backend does: write a sentinel
/// file and remove it again.
fn directory_writable(dir: &Utf8Path) -> bool {
    let sentinel = dir.join(format!(".wb-write-probe-{}", std::process::id()));
    match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(sentinel.as_std_path())
    {
        Ok(file) => {
            drop(file);
            let _ = fs::remove_file(sentinel.as_std_path());
            true
        }
        Err(_) => false,
    }
}
