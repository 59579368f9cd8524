//! Deterministic test harness for the watchbridge facade.
//!
//! Testing "block until interrupted" code normally means real filesystems,
//! real watchers, and sleeps. This crate replaces all of that with an
//! in-memory stand-in and explicit channels:
//!
//! - [`Session`] runs the code under test on a worker thread and drives it
//!   from the test thread: inject events, then interrupt.
//! - [`FakeBackend`] implements the facade's [`ChangeListener`] contract
//!   over a command channel instead of a filesystem; every injected event
//!   is acknowledged back, so delivery is a synchronous rendezvous.
//! - [`Recorder`] / [`RecordingBackend`] capture the exact call sequence a
//!   [`Facade`] era strategy makes against its backend.
//!
//! [`ChangeListener`]: wb_facade::ChangeListener
//! [`Facade`]: wb_facade::Facade
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//!
//! use parking_lot::Mutex;
//! use wb_core::{ChangeSet, WatchOptions, WatchRequest, shared_handler};
//! use wb_facade::ChangeListener;
//! use wb_harness::Session;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let changed: Arc<Mutex<Vec<ChangeSet>>> = Arc::new(Mutex::new(Vec::new()));
//!     let sink = Arc::clone(&changed);
//!
//!     let mut session = Session::spawn(move |ctx| {
//!         let mut listener = ctx.listener();
//!         let request = WatchRequest::new(["."], WatchOptions::default())?;
//!         let handler = shared_handler(move |set: &ChangeSet| {
//!             sink.lock().push(set.clone());
//!         });
//!         listener.listen(&request, handler, &ctx.interrupt())?;
//!         Ok(())
//!     })?;
//!
//!     session.simulate_events(&["foo.png"], &[], &[])?;
//!     session.interrupt()?;
//!
//!     assert_eq!(changed.lock().len(), 1);
//!     Ok(())
//! }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod fake;
pub mod recorder;
pub mod registry;
pub mod session;

pub use error::HarnessError;
pub use fake::{FakeBackend, FakeInstance};
pub use recorder::{BlockingBehavior, RecordedCall, Recorder, RecordingBackend};
pub use registry::InstanceRegistry;
pub use session::{BodyError, Session, SessionConfig, SessionContext};
