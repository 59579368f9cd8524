//! Era policy: mapping backend versions to behavioral variants.
//!
//! The underlying watch service changed its API incompatibly four times.
//! History of the divergences the facade has to bridge:
//!
//! - **Ancient** (`< 2.0.0`): the start call blocks the calling thread
//!   itself, polling is toggled with a post-construction method call, and
//!   the service probes directory writability by writing a sentinel file,
//!   which fails hard on read-only directories.
//! - **Old** (`>= 2.0.0`): major API change; starting returns control to the
//!   caller and a separate indefinite wait plus an explicit stop call are
//!   needed for shutdown.
//! - **Stale** (`>= 2.7.7`): a regression broke watching several directories
//!   through a single watcher, so one watcher per directory is required.
//! - **Current** (`>= 2.7.12`): the multi-directory defect is fixed; the Old
//!   calling convention is correct again.
//!
//! [`Era::resolve`] is a pure function from a [`Version`] to exactly one of
//! these variants; the four ranges partition the version space with no gaps
//! or overlaps.

use crate::error::CoreError;
use crate::version::Version;

/// A behavioral variant of the facade, bound to a contiguous version range
/// of the underlying watch service.
///
/// Each era carries an exclusive upper version bound; a version belongs to
/// the first era whose bound strictly exceeds it.
///
/// # Examples
///
/// ```
/// use wb_core::{Era, Version};
///
/// assert_eq!(Era::resolve(Version::new(1, 1, 0)).unwrap(), Era::Ancient);
/// assert_eq!(Era::resolve(Version::new(2, 7, 6)).unwrap(), Era::Old);
/// assert_eq!(Era::resolve(Version::new(2, 7, 11)).unwrap(), Era::Stale);
/// assert_eq!(Era::resolve(Version::new(2, 8, 0)).unwrap(), Era::Current);
/// assert!(Era::resolve(Version::new(3, 0, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Era {
    /// Pre-2.0 service: blocking start, no separate shutdown step.
    Ancient,
    /// `>= 2.0.0, < 2.7.7`: the common start/wait/stop convention.
    Old,
    /// `>= 2.7.7, < 2.7.12`: one watcher per directory required.
    Stale,
    /// `>= 2.7.12, < 2.99.99`: the common convention, defect fixed.
    Current,
}

impl Era {
    /// All eras in ascending boundary order.
    pub const ALL: [Self; 4] = [Self::Ancient, Self::Old, Self::Stale, Self::Current];

    /// The exclusive upper version bound of this era.
    #[must_use]
    pub const fn upper_bound(self) -> Version {
        match self {
            Self::Ancient => Version::new(2, 0, 0),
            Self::Old => Version::new(2, 7, 7),
            Self::Stale => Version::new(2, 7, 12),
            Self::Current => Version::new(2, 99, 99),
        }
    }

    /// Resolves the era covering `version`.
    ///
    /// Stateless and pure. Returns [`CoreError::NoMatchingEra`] when the
    /// version lies beyond every known era, which is a fatal configuration
    /// error at facade construction time.
    pub fn resolve(version: Version) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|era| version < era.upper_bound())
            .ok_or(CoreError::NoMatchingEra(version))
    }
}
