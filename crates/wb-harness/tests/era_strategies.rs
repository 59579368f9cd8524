//! Backend call sequences per facade era, verified with a recording backend.
//!
//! Pre-firing the interrupt token makes `listen` run its whole strategy on
//! the calling thread with no waiting, so every sequence here is exact and
//! deterministic.

use wb_core::{Era, WatchOptions, WatchRequest, shared_handler};
use wb_facade::{ChangeListener, Facade, Interrupt};
use wb_harness::{BlockingBehavior, RecordedCall, Recorder, RecordingBackend};

fn listen_with(era: Era, request: &WatchRequest) -> Vec<RecordedCall> {
    let recorder = Recorder::new();
    let mut facade = Facade::with_backend(era, Box::new(RecordingBackend::new(recorder.clone())));

    let interrupt = Interrupt::new();
    interrupt.fire();
    facade
        .listen(request, shared_handler(|_| {}), &interrupt)
        .expect("listen");

    recorder.calls()
}

fn default_request(directories: &[&str]) -> WatchRequest {
    WatchRequest::new(directories.iter().copied(), WatchOptions::default()).expect("request")
}

#[test]
fn old_era_builds_one_watcher_then_starts_then_stops() {
    let calls = listen_with(Era::Old, &default_request(&["."]));
    let options = format!("{:?}", WatchOptions::default());
    assert_eq!(
        calls,
        vec![
            RecordedCall::new("create_with", [".".to_owned(), options]),
            RecordedCall::bare("start"),
            RecordedCall::bare("stop"),
        ]
    );
}

#[test]
fn current_era_matches_the_old_era_sequence() {
    let request = default_request(&["."]);
    assert_eq!(
        listen_with(Era::Current, &request),
        listen_with(Era::Old, &request)
    );
}

#[test]
fn stale_era_single_directory_still_builds_once() {
    let calls = listen_with(Era::Stale, &default_request(&["."]));
    let options = format!("{:?}", WatchOptions::default());
    assert_eq!(
        calls,
        vec![
            RecordedCall::new("create_with", [".".to_owned(), options]),
            RecordedCall::bare("start"),
            RecordedCall::bare("stop"),
        ]
    );
}

#[test]
fn stale_era_builds_one_watcher_per_directory_before_starting_any() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let a = tmp.path().join("a");
    let b = tmp.path().join("b");
    std::fs::create_dir(&a).expect("mkdir a");
    std::fs::create_dir(&b).expect("mkdir b");
    let a = a.to_str().expect("utf8").to_owned();
    let b = b.to_str().expect("utf8").to_owned();

    let calls = listen_with(Era::Stale, &default_request(&[&a, &b]));
    let options = format!("{:?}", WatchOptions::default());
    assert_eq!(
        calls,
        vec![
            RecordedCall::new("create_with", [a, options.clone()]),
            RecordedCall::new("create_with", [b, options]),
            RecordedCall::bare("start"),
            RecordedCall::bare("start"),
            RecordedCall::bare("stop"),
        ]
    );
}

#[test]
fn ancient_era_blocks_in_start_and_never_stops() {
    let calls = listen_with(Era::Ancient, &default_request(&["."]));
    assert_eq!(
        calls,
        vec![
            RecordedCall::new("create_with", ["."]),
            RecordedCall::bare("start"),
        ]
    );
}

#[test]
fn ancient_era_records_forced_polling_before_start() {
    let options = WatchOptions {
        force_polling: true,
    };
    let request = WatchRequest::new(["."], options).expect("request");
    let calls = listen_with(Era::Ancient, &request);
    assert_eq!(
        calls,
        vec![
            RecordedCall::new("create_with", ["."]),
            RecordedCall::new("force_polling", ["true"]),
            RecordedCall::bare("start"),
        ]
    );
}

#[test]
fn ancient_era_drops_missing_directories_before_building() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let missing = tmp.path().join("missing");
    let missing = missing.to_str().expect("utf8").to_owned();

    let calls = listen_with(Era::Ancient, &default_request(&[&missing, "."]));
    assert_eq!(
        calls,
        vec![
            RecordedCall::new("create_with", ["."]),
            RecordedCall::bare("start"),
        ]
    );
}

#[test]
fn ancient_era_unblocks_when_the_token_fires_from_another_thread() {
    let recorder = Recorder::new();
    let backend =
        RecordingBackend::new(recorder.clone()).with_blocking(BlockingBehavior::WaitForInterrupt);
    let mut facade = Facade::with_backend(Era::Ancient, Box::new(backend));

    let interrupt = Interrupt::new();
    let trigger = interrupt.clone();
    let firer = std::thread::spawn(move || {
        std::thread::sleep(std::time::Duration::from_millis(20));
        trigger.fire();
    });

    facade
        .listen(
            &default_request(&["."]),
            shared_handler(|_| {}),
            &interrupt,
        )
        .expect("listen");
    firer.join().expect("join firer");

    assert_eq!(
        recorder.calls(),
        vec![
            RecordedCall::new("create_with", ["."]),
            RecordedCall::bare("start"),
        ]
    );
}
