//! Core types for the watchbridge compatibility facade.
//!
//! This crate provides the foundational, dependency-light types used across
//! the workspace:
//!
//! - [`Version`]: ordered `major.minor.patch` identifier of the underlying
//!   watch service
//! - [`Era`]: the closed set of behavioral variants the facade dispatches on
//! - [`WatchRequest`] / [`WatchOptions`]: what to watch and how
//! - [`ChangeSet`] and the [`SharedHandler`] callback alias
//! - [`CoreError`]: version, era, and request validation failures
//!
//! # Crate Dependencies
//!
//! ```text
//! wb-cli ──► wb-facade ──► wb-core
//! wb-harness ──► wb-facade ──► wb-core
//! ```
//!
//! Everything here is pure data: no I/O, no threads. The facade and the test
//! harness build on these types without pulling in each other.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod era;
pub mod error;
pub mod events;
pub mod version;

pub use config::{CompatConfig, WatchOptions, WatchRequest};
pub use era::Era;
pub use error::CoreError;
pub use events::{ChangeSet, SharedHandler, shared_handler};
pub use version::Version;
