//! In-memory stand-in for the whole facade-plus-backend stack.
//!
//! [`FakeBackend`] implements [`ChangeListener`] directly, so user code that
//! would block inside the real facade blocks inside the fake's command loop
//! instead. Event delivery becomes a channel handoff: the orchestrator
//! pushes a [`ChangeSet`], the fake invokes the callback on the worker
//! thread, then acknowledges the same set back, giving the orchestrator a
//! synchronous delivered-and-processed rendezvous and at most one event in
//! flight.

use std::fmt;
use std::sync::Arc;

use camino::Utf8PathBuf;
use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use tracing::debug;
use wb_core::{ChangeSet, SharedHandler, WatchRequest};
use wb_facade::{ChangeListener, FacadeError, Interrupt};

/// What the orchestrator can send into a fake's watch loop.
#[derive(Debug, Clone)]
pub(crate) enum WorkerCommand {
    /// Deliver one change set to the callback.
    Deliver(ChangeSet),
    /// Leave the watch loop and return from `listen`.
    Shutdown,
}

/// Handle onto one constructed fake backend.
///
/// Stays valid after the worker has terminated; tests use it to assert on
/// what the fake observed.
#[derive(Clone)]
pub struct FakeInstance {
    inner: Arc<InstanceState>,
}

struct InstanceState {
    id: usize,
    directories: Mutex<Vec<Utf8PathBuf>>,
}

impl FakeInstance {
    pub(crate) fn new(id: usize) -> Self {
        Self {
            inner: Arc::new(InstanceState {
                id,
                directories: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Construction-order id within the session.
    #[must_use]
    pub fn id(&self) -> usize {
        self.inner.id
    }

    /// The directories the fake was asked to watch; empty until `listen`
    /// ran.
    #[must_use]
    pub fn directories(&self) -> Vec<Utf8PathBuf> {
        self.inner.directories.lock().clone()
    }

    fn record_directories(&self, directories: &[Utf8PathBuf]) {
        *self.inner.directories.lock() = directories.to_vec();
    }
}

impl fmt::Debug for FakeInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeInstance")
            .field("id", &self.inner.id)
            .field("directories", &self.directories())
            .finish()
    }
}

/// A [`ChangeListener`] whose events come from the session instead of a
/// filesystem.
pub struct FakeBackend {
    instance: FakeInstance,
    commands: Receiver<WorkerCommand>,
    acks: Sender<ChangeSet>,
    ready: Sender<()>,
}

impl FakeBackend {
    pub(crate) fn new(
        instance: FakeInstance,
        commands: Receiver<WorkerCommand>,
        acks: Sender<ChangeSet>,
        ready: Sender<()>,
    ) -> Self {
        Self {
            instance,
            commands,
            acks,
            ready,
        }
    }

    /// The instance handle registered for this fake.
    #[must_use]
    pub fn instance(&self) -> FakeInstance {
        self.instance.clone()
    }
}

impl ChangeListener for FakeBackend {
    fn listen(
        &mut self,
        request: &WatchRequest,
        handler: SharedHandler,
        interrupt: &Interrupt,
    ) -> Result<(), FacadeError> {
        self.instance.record_directories(request.directories());
        // The orchestrator's ready gate; send failure only means the
        // session is already gone.
        let _ = self.ready.send(());
        debug!(id = self.instance.id(), "fake backend entering watch loop");

        loop {
            if interrupt.is_fired() {
                return Ok(());
            }
            match self.commands.recv() {
                Ok(WorkerCommand::Deliver(set)) => {
                    (*handler.lock())(&set);
                    let _ = self.acks.send(set);
                }
                Ok(WorkerCommand::Shutdown) | Err(_) => {
                    debug!(id = self.instance.id(), "fake backend leaving watch loop");
                    return Ok(());
                }
            }
        }
    }
}
