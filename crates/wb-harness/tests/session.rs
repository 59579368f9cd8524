//! End-to-end session behavior: event round-trips, interruption, instance
//! bookkeeping, and failure surfacing.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use wb_core::{ChangeSet, WatchOptions, WatchRequest, shared_handler};
use wb_facade::ChangeListener;
use wb_harness::{HarnessError, Session, SessionConfig};

type Seen = Arc<Mutex<Vec<ChangeSet>>>;

/// Spawns a session whose worker listens on "." and appends every delivered
/// change set to the returned sink.
fn spawn_listening() -> (Session, Seen) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let session = Session::spawn(move |ctx| {
        let mut listener = ctx.listener();
        let request = WatchRequest::new(["."], WatchOptions::default())?;
        let handler = shared_handler(move |set: &ChangeSet| sink.lock().push(set.clone()));
        listener.listen(&request, handler, &ctx.interrupt())?;
        Ok(())
    })
    .expect("spawn session");

    (session, seen)
}

#[test]
fn delivers_injected_events_to_the_worker_callback() {
    let (mut session, seen) = spawn_listening();

    session
        .simulate_events(&["foo.png"], &[], &[])
        .expect("simulate");
    session.interrupt().expect("interrupt");

    let sets = seen.lock();
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].modified.len(), 1);
    assert!(sets[0].modified[0].is_absolute());
    assert!(sets[0].modified[0].as_str().ends_with("foo.png"));
    assert!(sets[0].added.is_empty());
    assert!(sets[0].removed.is_empty());
}

#[test]
fn injected_events_arrive_in_order() {
    let (mut session, seen) = spawn_listening();

    session
        .simulate_events(&["one.txt"], &[], &[])
        .expect("first");
    session
        .simulate_events(&[], &["two.txt"], &[])
        .expect("second");
    session
        .simulate_events(&[], &[], &["three.txt"])
        .expect("third");
    session.interrupt().expect("interrupt");

    let sets = seen.lock();
    assert_eq!(sets.len(), 3);
    assert!(sets[0].modified[0].as_str().ends_with("one.txt"));
    assert!(sets[1].added[0].as_str().ends_with("two.txt"));
    assert!(sets[2].removed[0].as_str().ends_with("three.txt"));
}

#[test]
fn interrupt_is_idempotent() {
    let (mut session, _seen) = spawn_listening();
    session.interrupt().expect("first interrupt");
    session.interrupt().expect("second interrupt");
}

#[test]
fn instances_report_construction_order_and_watched_directories() {
    let mut session = Session::spawn(move |ctx| {
        let mut listener = ctx.listener();
        let request = WatchRequest::new(["."], WatchOptions::default())?;
        listener.listen(&request, shared_handler(|_| {}), &ctx.interrupt())?;
        Ok(())
    })
    .expect("spawn session");

    session.interrupt().expect("interrupt");

    let ids: Vec<usize> = session.instances().iter().map(|i| i.id()).collect();
    assert_eq!(ids, [0]);
    assert_eq!(session.instances()[0].directories(), ["."]);

    // Memoized: repeated calls see the same snapshot.
    assert_eq!(session.instances().len(), 1);
}

#[test]
fn worker_body_error_surfaces_as_crash() {
    let mut session = Session::spawn(|_ctx| Err("boom".into())).expect("spawn session");

    match session.interrupt() {
        Err(HarnessError::WorkerCrash(message)) => assert_eq!(message, "boom"),
        other => panic!("expected WorkerCrash, got {other:?}"),
    }
}

#[test]
fn worker_panic_surfaces_as_crash() {
    let mut session = Session::spawn(|_ctx| panic!("kaput")).expect("spawn session");

    match session.simulate_events(&["foo.png"], &[], &[]) {
        Err(HarnessError::WorkerCrash(message)) => assert!(message.contains("kaput")),
        other => panic!("expected WorkerCrash, got {other:?}"),
    }
}

#[test]
fn worker_that_returns_without_listening_is_reported() {
    let mut session = Session::spawn(|_ctx| Ok(())).expect("spawn session");

    match session.simulate_events(&["foo.png"], &[], &[]) {
        Err(HarnessError::WorkerExited) => {}
        other => panic!("expected WorkerExited, got {other:?}"),
    }
}

#[test]
fn ready_wait_is_bounded() {
    let config = SessionConfig {
        ready_timeout: Duration::from_millis(100),
        ..SessionConfig::default()
    };
    let mut session = Session::spawn_with(config, |ctx| {
        // Never construct a listener; park until interrupted.
        ctx.interrupt().wait();
        Ok(())
    })
    .expect("spawn session");

    match session.simulate_events(&["foo.png"], &[], &[]) {
        Err(HarnessError::ReadyTimeout(timeout)) => {
            assert_eq!(timeout, Duration::from_millis(100));
        }
        other => panic!("expected ReadyTimeout, got {other:?}"),
    }
}
