//! Change events and the shared callback type.
//!
//! A [`ChangeSet`] is one delivery from the watch service: the modified,
//! added, and removed paths observed in a single notification. Callbacks are
//! shared behind a mutex ([`SharedHandler`]) because the thread that invokes
//! them depends on the era: a backend worker thread, the facade's own
//! blocking call, or the test harness's worker.

use std::sync::Arc;

use camino::Utf8PathBuf;
use parking_lot::Mutex;

/// One batch of changed paths, grouped by kind.
///
/// # Examples
///
/// ```
/// use wb_core::ChangeSet;
///
/// let set = ChangeSet::with_modified(["src/lib.rs"]);
/// assert_eq!(set.len(), 1);
/// assert!(!set.is_empty());
/// assert!(set.added.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Paths whose contents changed.
    pub modified: Vec<Utf8PathBuf>,
    /// Paths that appeared.
    pub added: Vec<Utf8PathBuf>,
    /// Paths that disappeared.
    pub removed: Vec<Utf8PathBuf>,
}

impl ChangeSet {
    /// Creates a change set from the three path lists.
    #[must_use]
    pub fn new<M, A, R>(modified: M, added: A, removed: R) -> Self
    where
        M: IntoIterator<Item: Into<Utf8PathBuf>>,
        A: IntoIterator<Item: Into<Utf8PathBuf>>,
        R: IntoIterator<Item: Into<Utf8PathBuf>>,
    {
        Self {
            modified: modified.into_iter().map(Into::into).collect(),
            added: added.into_iter().map(Into::into).collect(),
            removed: removed.into_iter().map(Into::into).collect(),
        }
    }

    /// A change set containing only modified paths.
    #[must_use]
    pub fn with_modified<M>(paths: M) -> Self
    where
        M: IntoIterator<Item: Into<Utf8PathBuf>>,
    {
        Self {
            modified: paths.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Total number of paths across all three lists.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modified.len() + self.added.len() + self.removed.len()
    }

    /// `true` when no paths are present at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A change callback shared between the caller and whichever thread the
/// active backend delivers events on.
pub type SharedHandler = Arc<Mutex<dyn FnMut(&ChangeSet) + Send + 'static>>;

/// Wraps a closure into a [`SharedHandler`].
///
/// # Examples
///
/// ```
/// use wb_core::{ChangeSet, shared_handler};
///
/// let handler = shared_handler(|set: &ChangeSet| {
///     println!("{} paths changed", set.len());
/// });
/// (*handler.lock())(&ChangeSet::default());
/// ```
#[must_use]
pub fn shared_handler<F>(f: F) -> SharedHandler
where
    F: FnMut(&ChangeSet) + Send + 'static,
{
    Arc::new(Mutex::new(f))
}
