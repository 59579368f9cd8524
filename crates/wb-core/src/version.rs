//! Ordered version identifiers for the underlying watch service.
//!
//! A [`Version`] is only ever compared against era boundaries; it is never
//! inspected beyond its ordering semantics. Parsing accepts one to three
//! numeric dot-separated components, so `"2.7"` means `2.7.0`.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// An ordered `major.minor.patch` version of the underlying watch service.
///
/// Ordering is lexicographic over the three components, which is all the era
/// policy needs.
///
/// # Examples
///
/// ```
/// use wb_core::Version;
///
/// let v: Version = "2.7.7".parse().unwrap();
/// assert_eq!(v, Version::new(2, 7, 7));
/// assert!(v < Version::new(2, 7, 12));
/// assert_eq!(v.to_string(), "2.7.7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    /// Major component.
    pub major: u64,
    /// Minor component.
    pub minor: u64,
    /// Patch component.
    pub patch: u64,
}

impl Version {
    /// Creates a version from its three components.
    #[inline]
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| CoreError::InvalidVersion {
            input: s.to_owned(),
            reason: reason.to_owned(),
        };

        let mut components = [0u64; 3];
        let mut count = 0;
        for part in s.split('.') {
            if count == 3 {
                return Err(invalid("more than three components"));
            }
            components[count] = part
                .parse::<u64>()
                .map_err(|_| invalid("component is not a non-negative integer"))?;
            count += 1;
        }
        if count == 0 {
            return Err(invalid("empty version string"));
        }

        Ok(Self::new(components[0], components[1], components[2]))
    }
}
