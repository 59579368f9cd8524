//! Backend location and version detection.
//!
//! The facade factory needs two things from here: which backend to drive,
//! and which version of the underlying service it speaks so the right era
//! can be selected. An operator can pin the version through the
//! [`VERSION_ENV`] environment variable; otherwise the bundled backend's
//! compat version is used. Builds without the `bundled-backend` feature
//! must pin a version and supply their own [`WatchBackend`]; loading fails
//! with a remediation hint otherwise.

use wb_core::Version;

use crate::backend::WatchBackend;
use crate::error::FacadeError;

/// Environment variable overriding backend version detection.
pub const VERSION_ENV: &str = "WB_BACKEND_VERSION";

/// Resolves the effective backend version.
///
/// Precedence: [`VERSION_ENV`], then the bundled backend's compat version.
///
/// # Errors
///
/// Returns a parse failure for a malformed override, or
/// [`FacadeError::BackendUnavailable`] when no version source exists.
pub fn detect_version() -> Result<Version, FacadeError> {
    if let Ok(raw) = std::env::var(VERSION_ENV) {
        return Ok(raw.parse::<Version>().map_err(FacadeError::from)?);
    }
    bundled_version()
}

#[cfg(feature = "bundled-backend")]
fn bundled_version() -> Result<Version, FacadeError> {
    Ok(crate::notify_backend::NotifyBackend::COMPAT_VERSION)
}

#[cfg(not(feature = "bundled-backend"))]
fn bundled_version() -> Result<Version, FacadeError> {
    Err(unavailable())
}

/// Loads the backend the facade will drive.
///
/// # Errors
///
/// Returns [`FacadeError::BackendUnavailable`] when the crate was built
/// without the `bundled-backend` feature.
pub fn load_backend() -> Result<Box<dyn WatchBackend>, FacadeError> {
    #[cfg(feature = "bundled-backend")]
    {
        Ok(Box::new(crate::notify_backend::NotifyBackend::new()))
    }
    #[cfg(not(feature = "bundled-backend"))]
    {
        Err(unavailable())
    }
}

#[cfg(not(feature = "bundled-backend"))]
fn unavailable() -> FacadeError {
    FacadeError::BackendUnavailable {
        reason: "this build carries no bundled notify backend".to_owned(),
        remedy: format!(
            "Enable the `bundled-backend` feature, or set {VERSION_ENV} and \
             construct the facade over your own backend with Facade::with_backend"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment-variable behavior is covered indirectly through
    // `create` with a version override; mutating the process environment
    // from parallel tests is not worth the flakiness.

    #[cfg(feature = "bundled-backend")]
    #[test]
    fn bundled_version_is_in_the_current_era() {
        use wb_core::Era;

        let version = detect_version().expect("bundled version");
        if std::env::var(VERSION_ENV).is_err() {
            assert_eq!(Era::resolve(version).expect("era"), Era::Current);
        }
    }
}
