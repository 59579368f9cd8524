//! Error types for the wb-core crate.

use crate::version::Version;

/// Validation failures for versions, eras, and watch requests.
///
/// # Examples
///
/// ```
/// use wb_core::{CoreError, Version};
///
/// let err = CoreError::NoMatchingEra(Version::new(3, 0, 0));
/// assert!(err.to_string().contains("3.0.0"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A version string could not be parsed.
    #[error("invalid version string '{input}': {reason}")]
    InvalidVersion {
        /// The offending input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// No era covers the given backend version.
    ///
    /// Fatal: the facade cannot pick a start/stop strategy.
    #[error("no known era covers backend version {0}")]
    NoMatchingEra(Version),

    /// A watch request was built with an empty directory list.
    #[error("watch request needs at least one directory")]
    EmptyWatchList,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_version_display() {
        let err = CoreError::InvalidVersion {
            input: "2.x".to_owned(),
            reason: "component is not a non-negative integer".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("2.x"));
        assert!(msg.contains("integer"));
    }

    #[test]
    fn empty_watch_list_display() {
        assert!(
            CoreError::EmptyWatchList
                .to_string()
                .contains("at least one directory")
        );
    }
}
