//! Error types for the wb-facade crate.

use wb_core::CoreError;

use crate::backend::BackendError;

/// Errors raised by facade creation and the `listen` contract.
#[derive(Debug, thiserror::Error)]
pub enum FacadeError {
    /// Version parsing, era resolution, or request validation failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The underlying backend failed while building or running watchers.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// No compatible backend could be located.
    ///
    /// Surfaced with a remediation hint rather than retried; the caller
    /// decides what to do about a missing backend.
    #[error("no compatible watch backend available: {reason}. {remedy}")]
    BackendUnavailable {
        /// Why loading failed.
        reason: String,
        /// What the operator can do about it.
        remedy: String,
    },
}
