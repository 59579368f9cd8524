//! Session orchestration: drive a blocking listener from the outside.
//!
//! A [`Session`] spawns one worker thread running user code that eventually
//! blocks inside a listener, then drives it from the test thread:
//!
//! ```text
//! test thread ──► Session::spawn ──► worker thread runs body(ctx)
//!                                      │ ctx.listener() → FakeBackend
//!                                      ▼
//!                              listen() blocks on the command channel
//! simulate_events ──► Deliver ───────► callback runs on the worker
//!            ◄─────── acknowledgment ──┘
//! interrupt ─────────► Shutdown + token ──► listen returns, worker joins
//! ```
//!
//! Every channel end is handed to the worker at spawn time; there is no
//! global or thread-local state, so sessions are independent of each other.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use camino::{Utf8Path, Utf8PathBuf};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use parking_lot::Mutex;
use tracing::{debug, error};
use wb_core::ChangeSet;
use wb_facade::Interrupt;

use crate::error::HarnessError;
use crate::fake::{FakeBackend, FakeInstance, WorkerCommand};
use crate::registry::InstanceRegistry;

/// Errors a session body may raise.
pub type BodyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Timeouts and polling cadence for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// How long to wait for the worker to reach its watch loop.
    pub ready_timeout: Duration,
    /// How long to wait for an event acknowledgment.
    pub ack_timeout: Duration,
    /// Polling cadence while waiting for readiness.
    pub poll_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ready_timeout: Duration::from_secs(5),
            ack_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(10),
        }
    }
}

/// Channel ends of the most recently constructed fake listener.
struct Endpoints {
    commands: Sender<WorkerCommand>,
    acks: Receiver<ChangeSet>,
}

/// State shared between the session and its worker.
struct Hub {
    registry: InstanceRegistry,
    endpoints: Mutex<Option<Endpoints>>,
    ready: Sender<()>,
    next_id: AtomicUsize,
}

/// Worker-side view of a session: constructs listeners and exposes the
/// interrupt token.
pub struct SessionContext {
    hub: Arc<Hub>,
    interrupt: Interrupt,
}

impl SessionContext {
    /// Constructs a fake listener wired to this session.
    ///
    /// Each call installs a fresh channel pair, so a later listener takes
    /// over event delivery; all constructed instances stay visible through
    /// [`Session::instances`].
    #[must_use]
    pub fn listener(&self) -> FakeBackend {
        let (command_tx, command_rx) = unbounded();
        let (ack_tx, ack_rx) = unbounded();
        *self.hub.endpoints.lock() = Some(Endpoints {
            commands: command_tx,
            acks: ack_rx,
        });

        let id = self.hub.next_id.fetch_add(1, Ordering::Relaxed);
        let instance = FakeInstance::new(id);
        self.hub.registry.register(instance.clone());
        debug!(id, "constructed fake listener");

        FakeBackend::new(instance, command_rx, ack_tx, self.hub.ready.clone())
    }

    /// The session's interrupt token, for passing into `listen`.
    #[must_use]
    pub fn interrupt(&self) -> Interrupt {
        self.interrupt.clone()
    }
}

/// One test scenario: a worker thread plus the channels to drive it.
pub struct Session {
    worker: Option<JoinHandle<Result<(), String>>>,
    hub: Arc<Hub>,
    interrupt: Interrupt,
    ready_rx: Receiver<()>,
    ready: bool,
    instances: Option<Vec<FakeInstance>>,
    config: SessionConfig,
}

impl Session {
    /// Spawns a session with default timeouts.
    ///
    /// The body runs on a dedicated worker thread and receives a
    /// [`SessionContext`] to construct its listener from. It is expected to
    /// block inside `listen` until [`interrupt`](Self::interrupt).
    pub fn spawn<F>(body: F) -> Result<Self, HarnessError>
    where
        F: FnOnce(SessionContext) -> Result<(), BodyError> + Send + 'static,
    {
        Self::spawn_with(SessionConfig::default(), body)
    }

    /// Spawns a session with explicit timeouts.
    pub fn spawn_with<F>(config: SessionConfig, body: F) -> Result<Self, HarnessError>
    where
        F: FnOnce(SessionContext) -> Result<(), BodyError> + Send + 'static,
    {
        let (ready_tx, ready_rx) = unbounded();
        let hub = Arc::new(Hub {
            registry: InstanceRegistry::new(),
            endpoints: Mutex::new(None),
            ready: ready_tx,
            next_id: AtomicUsize::new(0),
        });
        let interrupt = Interrupt::new();
        let ctx = SessionContext {
            hub: Arc::clone(&hub),
            interrupt: interrupt.clone(),
        };

        let worker = std::thread::Builder::new()
            .name("wb-session-worker".to_owned())
            .spawn(move || {
                body(ctx).map_err(|e| {
                    error!(error = %e, "session worker failed");
                    e.to_string()
                })
            })?;

        Ok(Self {
            worker: Some(worker),
            hub,
            interrupt,
            ready_rx,
            ready: false,
            instances: None,
            config,
        })
    }

    /// Injects one change event and blocks until the worker's callback has
    /// run and acknowledged it.
    ///
    /// Paths are converted to absolute form against the current directory;
    /// they do not need to exist.
    pub fn simulate_events(
        &mut self,
        modified: &[&str],
        added: &[&str],
        removed: &[&str],
    ) -> Result<(), HarnessError> {
        self.wait_until_ready()?;
        let set = ChangeSet::new(
            absolute_paths(modified)?,
            absolute_paths(added)?,
            absolute_paths(removed)?,
        );
        self.fire_events(set)
    }

    /// Fires the interrupt token, asks the watch loop to shut down, and
    /// joins the worker, surfacing any failure it captured.
    ///
    /// A no-op once the worker has been joined.
    pub fn interrupt(&mut self) -> Result<(), HarnessError> {
        if self.worker.is_none() {
            return Ok(());
        }
        self.wait_until_ready()?;
        self.interrupt.fire();
        if let Some(endpoints) = self.hub.endpoints.lock().as_ref() {
            let _ = endpoints.commands.send(WorkerCommand::Shutdown);
        }
        self.join_worker()
    }

    /// Fake instances constructed so far, in construction order.
    ///
    /// Memoized: the first call drains the registry, repeated calls return
    /// the same snapshot.
    pub fn instances(&mut self) -> &[FakeInstance] {
        self.instances
            .get_or_insert_with(|| self.hub.registry.drain())
    }

    /// Blocks until the worker signals it entered its watch loop.
    ///
    /// Surfaces a captured failure if the worker already terminated, and
    /// bounds the wait with the configured ready timeout.
    fn wait_until_ready(&mut self) -> Result<(), HarnessError> {
        if self.ready {
            return Ok(());
        }
        let deadline = Instant::now() + self.config.ready_timeout;
        loop {
            match self.ready_rx.recv_timeout(self.config.poll_interval) {
                Ok(()) => {
                    self.ready = true;
                    return Ok(());
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    // Worker dropped its context; give it a moment to finish.
                    std::thread::sleep(self.config.poll_interval);
                }
            }
            if self.worker.as_ref().is_some_and(JoinHandle::is_finished) {
                return match self.join_worker() {
                    Ok(()) => Err(HarnessError::WorkerExited),
                    Err(e) => Err(e),
                };
            }
            if Instant::now() >= deadline {
                return Err(HarnessError::ReadyTimeout(self.config.ready_timeout));
            }
        }
    }

    fn fire_events(&mut self, set: ChangeSet) -> Result<(), HarnessError> {
        let (commands, acks) = {
            let guard = self.hub.endpoints.lock();
            let endpoints = guard.as_ref().ok_or(HarnessError::NoListener)?;
            (endpoints.commands.clone(), endpoints.acks.clone())
        };

        // Stale acknowledgments from an earlier injection round.
        while acks.try_recv().is_ok() {}

        debug!(paths = set.len(), "injecting change event");
        commands
            .send(WorkerCommand::Deliver(set))
            .map_err(|_| HarnessError::ChannelClosed)?;

        match acks.recv_timeout(self.config.ack_timeout) {
            Ok(_) => Ok(()),
            Err(RecvTimeoutError::Timeout) => Err(HarnessError::AckTimeout(self.config.ack_timeout)),
            Err(RecvTimeoutError::Disconnected) => match self.join_worker() {
                Ok(()) => Err(HarnessError::ChannelClosed),
                Err(e) => Err(e),
            },
        }
    }

    fn join_worker(&mut self) -> Result<(), HarnessError> {
        let Some(handle) = self.worker.take() else {
            return Ok(());
        };
        match handle.join() {
            Ok(Ok(())) => Ok(()),
            Ok(Err(message)) => Err(HarnessError::WorkerCrash(message)),
            Err(panic) => Err(HarnessError::WorkerCrash(panic_message(&*panic))),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // Best-effort shutdown so an abandoned session does not leave the
        // worker blocked forever.
        self.interrupt.fire();
        if let Some(endpoints) = self.hub.endpoints.lock().as_ref() {
            let _ = endpoints.commands.send(WorkerCommand::Shutdown);
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_owned()
    }
}

/// Lexically absolutizes each path against the current directory.
fn absolute_paths(paths: &[&str]) -> Result<Vec<Utf8PathBuf>, HarnessError> {
    let cwd = std::env::current_dir()?;
    let cwd = Utf8PathBuf::from_path_buf(cwd).map_err(HarnessError::NonUtf8Path)?;
    Ok(paths
        .iter()
        .map(|raw| {
            let path = Utf8Path::new(raw);
            if path.is_absolute() {
                path.to_owned()
            } else {
                cwd.join(path)
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_paths_leaves_absolute_inputs_alone() {
        let paths = absolute_paths(&["/tmp/foo.png"]).expect("absolutize");
        assert_eq!(paths, vec![Utf8PathBuf::from("/tmp/foo.png")]);
    }

    #[test]
    fn absolute_paths_joins_relative_inputs_to_cwd() {
        let paths = absolute_paths(&["foo.png"]).expect("absolutize");
        assert!(paths[0].is_absolute());
        assert!(paths[0].as_str().ends_with("foo.png"));
    }
}
