//! Configuration and request types for the compatibility facade.
//!
//! [`WatchRequest`] describes what a caller wants watched; [`WatchOptions`]
//! carries the recognized per-request options; [`CompatConfig`] is the
//! explicit configuration value threaded into facade creation (there is no
//! process-wide override state).

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Options recognized by every era of the underlying watch service.
///
/// # Examples
///
/// ```
/// use wb_core::WatchOptions;
///
/// let opts = WatchOptions::default();
/// assert!(!opts.force_polling);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchOptions {
    /// Force the polling adapter instead of native OS watching.
    ///
    /// Ancient-era services expose this as a post-construction method call
    /// rather than a constructor option; the facade handles the difference.
    pub force_polling: bool,
}

/// A validated "watch these directories with these options" request.
///
/// The directory list is an ordered, non-empty sequence of opaque UTF-8
/// paths; they are passed through to the backend untouched.
///
/// # Examples
///
/// ```
/// use wb_core::{WatchOptions, WatchRequest};
///
/// let request = WatchRequest::new(["lib", "spec"], WatchOptions::default()).unwrap();
/// assert_eq!(request.directories().len(), 2);
///
/// let empty: [&str; 0] = [];
/// assert!(WatchRequest::new(empty, WatchOptions::default()).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchRequest {
    directories: Vec<Utf8PathBuf>,
    options: WatchOptions,
}

impl WatchRequest {
    /// Creates a request over the given directories.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyWatchList`] if `directories` is empty.
    pub fn new<I, P>(directories: I, options: WatchOptions) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = P>,
        P: Into<Utf8PathBuf>,
    {
        let directories: Vec<Utf8PathBuf> = directories.into_iter().map(Into::into).collect();
        if directories.is_empty() {
            return Err(CoreError::EmptyWatchList);
        }
        Ok(Self {
            directories,
            options,
        })
    }

    /// The directories to watch, in caller order.
    #[must_use]
    pub fn directories(&self) -> &[Utf8PathBuf] {
        &self.directories
    }

    /// The per-request options.
    #[must_use]
    pub fn options(&self) -> &WatchOptions {
        &self.options
    }
}

/// Configuration for facade creation.
///
/// Replaces the original design's process-wide override state: callers that
/// need a specific backend version pass it here, and the test harness
/// constructs its own listener outright instead of overriding a global.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatConfig {
    /// Skip backend version detection and use this version string instead.
    pub version_override: Option<String>,
}

impl CompatConfig {
    /// A config that forces the given backend version.
    #[must_use]
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            version_override: Some(version.into()),
        }
    }
}
