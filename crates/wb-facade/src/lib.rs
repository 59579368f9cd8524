//! Version-adaptive facade over the underlying watch service.
//!
//! The underlying change-notification service changed its API incompatibly
//! four times (constructor signature, return value, threading model, and
//! shutdown semantics all differ). This crate presents one stable calling
//! convention on top of all of them:
//!
//! ```text
//! create(config) ──► Facade (bound to one Era)
//!                      │
//!                      │ listen(request, handler, interrupt)
//!                      ▼
//!      era strategy ──► WatchBackend (bundled notify shim, or a test double)
//!                      │
//!                      ▼
//!      blocks on the Interrupt token, stops watchers, returns
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use wb_core::{ChangeSet, CompatConfig, WatchOptions, WatchRequest, shared_handler};
//! use wb_facade::{ChangeListener, Interrupt, create};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut listener = create(&CompatConfig::default())?;
//!     let request = WatchRequest::new(["lib", "spec"], WatchOptions::default())?;
//!
//!     let interrupt = Interrupt::new();
//!     // Wire `interrupt.fire()` to Ctrl-C, then:
//!     listener.listen(
//!         &request,
//!         shared_handler(|set: &ChangeSet| {
//!             println!("modified: {:?}", set.modified);
//!         }),
//!         &interrupt,
//!     )?;
//!     Ok(())
//! }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod backend;
pub mod error;
pub mod facade;
pub mod interrupt;
pub mod loader;
#[cfg(feature = "bundled-backend")]
pub mod notify_backend;

pub use backend::{BackendError, WatchBackend, WatcherId};
pub use error::FacadeError;
pub use facade::{ChangeListener, Facade, watchable_directories};
pub use interrupt::Interrupt;
#[cfg(feature = "bundled-backend")]
pub use notify_backend::NotifyBackend;

use tracing::debug;
use wb_core::{CompatConfig, Era, Version};

/// Creates a facade matching the effective backend version.
///
/// The version comes from `config.version_override` when present, otherwise
/// from [`loader::detect_version`]. The resolved [`Era`] fixes the start and
/// stop strategy for the facade's lifetime.
///
/// # Errors
///
/// Fails on a malformed version string, a version no era covers, or a
/// missing backend.
///
/// # Examples
///
/// ```
/// use wb_core::{CompatConfig, Era};
/// use wb_facade::create;
///
/// let facade = create(&CompatConfig::with_version("2.7.11")).unwrap();
/// assert_eq!(facade.era(), Era::Stale);
/// ```
pub fn create(config: &CompatConfig) -> Result<Facade, FacadeError> {
    let version = match &config.version_override {
        Some(raw) => raw.parse::<Version>().map_err(FacadeError::from)?,
        None => loader::detect_version()?,
    };
    let era = Era::resolve(version).map_err(FacadeError::from)?;
    debug!(%version, ?era, "selected facade era");
    Ok(Facade::with_backend(era, loader::load_backend()?))
}
