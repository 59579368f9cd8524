//! Bundled production backend over the `notify` crate.
//!
//! A deliberately thin shim: each [`WatchBackend::build_watcher`] call maps
//! to one notify watcher, started recursively over its directories on
//! [`start`](WatchBackend::start). Notify delivers events on its own
//! internal thread; they are translated into [`ChangeSet`]s and pushed
//! through the shared handler. Non-UTF-8 paths are skipped with a warning.

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use notify::{Event, EventKind, PollWatcher, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, warn};
use wb_core::{ChangeSet, SharedHandler, Version, WatchOptions};

use crate::backend::{BackendError, WatchBackend, WatcherId};
use crate::interrupt::Interrupt;

/// Poll interval used when polling is forced.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Either flavor of notify watcher, driven through the same calls.
enum InnerWatcher {
    Recommended(RecommendedWatcher),
    Poll(PollWatcher),
}

impl InnerWatcher {
    fn watch(&mut self, path: &Utf8Path) -> Result<(), notify::Error> {
        match self {
            Self::Recommended(w) => w.watch(path.as_std_path(), RecursiveMode::Recursive),
            Self::Poll(w) => w.watch(path.as_std_path(), RecursiveMode::Recursive),
        }
    }
}

struct WatcherSlot {
    watcher: InnerWatcher,
    directories: Vec<Utf8PathBuf>,
    started: bool,
}

/// [`WatchBackend`] implementation over `notify`.
pub struct NotifyBackend {
    watchers: Vec<WatcherSlot>,
}

impl NotifyBackend {
    /// The compat level of the underlying service this shim emulates.
    ///
    /// Sits inside the Current era, so the common strategy drives it.
    pub const COMPAT_VERSION: Version = Version::new(2, 8, 0);

    /// Creates a backend with no watchers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            watchers: Vec::new(),
        }
    }

    fn build(
        &mut self,
        directories: &[Utf8PathBuf],
        force_polling: bool,
        handler: SharedHandler,
    ) -> Result<WatcherId, BackendError> {
        let watcher = if force_polling {
            let config = notify::Config::default().with_poll_interval(POLL_INTERVAL);
            InnerWatcher::Poll(PollWatcher::new(event_bridge(handler), config)?)
        } else {
            InnerWatcher::Recommended(RecommendedWatcher::new(
                event_bridge(handler),
                notify::Config::default(),
            )?)
        };

        let id = WatcherId::from_index(self.watchers.len());
        self.watchers.push(WatcherSlot {
            watcher,
            directories: directories.to_vec(),
            started: false,
        });
        Ok(id)
    }
}

impl Default for NotifyBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl WatchBackend for NotifyBackend {
    fn build_watcher(
        &mut self,
        directories: &[Utf8PathBuf],
        options: &WatchOptions,
        handler: SharedHandler,
    ) -> Result<WatcherId, BackendError> {
        self.build(directories, options.force_polling, handler)
    }

    fn start(&mut self, id: WatcherId) -> Result<(), BackendError> {
        let slot = self
            .watchers
            .get_mut(id.index())
            .ok_or(BackendError::UnknownWatcher(id))?;
        for dir in slot.directories.clone() {
            slot.watcher.watch(&dir)?;
        }
        slot.started = true;
        info!(directories = ?slot.directories, "notify watcher started");
        Ok(())
    }

    fn start_blocking(
        &mut self,
        directories: &[Utf8PathBuf],
        force_polling: bool,
        handler: SharedHandler,
        interrupt: &Interrupt,
    ) -> Result<(), BackendError> {
        let id = self.build(directories, force_polling, handler)?;
        self.start(id)?;
        interrupt.wait();
        debug!("blocking notify watcher interrupted");
        Err(BackendError::Interrupted)
    }

    fn stop_all(&mut self) -> Result<(), BackendError> {
        // Dropping a notify watcher releases its OS resources.
        let count = self.watchers.len();
        self.watchers.clear();
        info!(count, "stopped all notify watchers");
        Ok(())
    }
}

/// Builds the notify event callback that feeds the shared handler.
fn event_bridge(handler: SharedHandler) -> impl Fn(Result<Event, notify::Error>) + Send + 'static {
    move |result| match result {
        Ok(event) => {
            if let Some(set) = change_set_from(&event) {
                (*handler.lock())(&set);
            }
        }
        Err(error) => warn!(error = %error, "notify event error"),
    }
}

/// Translates one notify event into a [`ChangeSet`], if it carries any
/// usable paths.
fn change_set_from(event: &Event) -> Option<ChangeSet> {
    let mut set = ChangeSet::default();
    let bucket = match event.kind {
        EventKind::Create(_) => &mut set.added,
        EventKind::Modify(_) => &mut set.modified,
        EventKind::Remove(_) => &mut set.removed,
        _ => return None,
    };

    for path in &event.paths {
        match Utf8PathBuf::from_path_buf(path.clone()) {
            Ok(utf8) => bucket.push(utf8),
            Err(invalid) => {
                warn!(path = %invalid.display(), "skipping non-UTF-8 path in event");
            }
        }
    }

    (!set.is_empty()).then_some(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;
    use std::time::Instant;

    use parking_lot::Mutex;
    use wb_core::shared_handler;

    #[test]
    fn change_set_from_ignores_access_events() {
        let event = Event::new(EventKind::Access(notify::event::AccessKind::Any));
        assert!(change_set_from(&event).is_none());
    }

    #[test]
    fn change_set_from_buckets_by_kind() {
        let mut event = Event::new(EventKind::Create(notify::event::CreateKind::File));
        event = event.add_path("/tmp/a.txt".into());
        let set = change_set_from(&event).expect("change set");
        assert_eq!(set.added, vec![Utf8PathBuf::from("/tmp/a.txt")]);
        assert!(set.modified.is_empty());
    }

    #[test]
    fn stop_all_clears_watchers() {
        let mut backend = NotifyBackend::new();
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 tempdir");

        let id = backend
            .build_watcher(
                std::slice::from_ref(&dir),
                &WatchOptions::default(),
                shared_handler(|_| {}),
            )
            .expect("build watcher");
        backend.start(id).expect("start watcher");
        backend.stop_all().expect("stop all");

        assert!(matches!(
            backend.start(id),
            Err(BackendError::UnknownWatcher(_))
        ));
    }

    #[test]
    fn watcher_sees_file_creation() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 tempdir");

        let seen: Arc<Mutex<Vec<ChangeSet>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut backend = NotifyBackend::new();
        let id = backend
            .build_watcher(
                std::slice::from_ref(&dir),
                &WatchOptions::default(),
                shared_handler(move |set: &ChangeSet| sink.lock().push(set.clone())),
            )
            .expect("build watcher");
        backend.start(id).expect("start watcher");

        fs::write(dir.join("probe.txt").as_std_path(), "x").expect("write probe");

        // Native watchers deliver asynchronously; poll briefly.
        let deadline = Instant::now() + Duration::from_secs(2);
        while seen.lock().is_empty() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(20));
        }
        backend.stop_all().expect("stop all");

        // Timing-dependent on some platforms; only assert when delivered.
        if let Some(set) = seen.lock().first() {
            assert!(!set.is_empty());
        }
    }
}
