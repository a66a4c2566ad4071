mod common;

use std::sync::{Arc, Barrier};
use std::thread;

use common::{calls_for, inline_navigator, log, push, Call, Recorder};
use parking_lot::Mutex;
use waypost_core::{
    Args, Command, CommandObserver, Config, DestinationId, Disposition, ListenerHandle,
    Navigator, Value,
};

#[tokio::test]
async fn buffered_commands_replay_in_submission_order() {
    let navigator = inline_navigator();
    let router = navigator.router("a");
    let log = log();

    for id in 1..=20 {
        router.navigate_to(DestinationId(id), None);
    }
    navigator.settled().await.unwrap();
    assert!(log.lock().is_empty());

    navigator.register_surface("a", Recorder::new("a", &log)).unwrap();
    navigator.settled().await.unwrap();

    let expected: Vec<Call> = (1..=20).map(push).collect();
    assert_eq!(calls_for(&log, "a"), expected);
}

#[tokio::test]
async fn commands_after_registration_follow_replayed_ones() {
    let navigator = inline_navigator();
    let router = navigator.router("a");
    let log = log();

    router.navigate_to(DestinationId(1), None);
    router.navigate_to(DestinationId(2), None);
    navigator.register_surface("a", Recorder::new("a", &log)).unwrap();
    router.navigate_to(DestinationId(3), None);
    navigator.settled().await.unwrap();

    assert_eq!(calls_for(&log, "a"), vec![push(1), push(2), push(3)]);
}

#[tokio::test]
async fn per_surface_order_holds_across_interleaved_surfaces() {
    let navigator = inline_navigator();
    let a = navigator.router("a");
    let b = navigator.router("b");
    let log = log();

    navigator.register_surface("b", Recorder::new("b", &log)).unwrap();
    for id in 1..=10 {
        a.navigate_to(DestinationId(id), None);
        b.navigate_to(DestinationId(100 + id), None);
    }
    navigator.register_surface("a", Recorder::new("a", &log)).unwrap();
    for id in 11..=15 {
        b.navigate_to(DestinationId(100 + id), None);
        a.navigate_to(DestinationId(id), None);
    }
    navigator.settled().await.unwrap();

    let expected_a: Vec<Call> = (1..=15).map(push).collect();
    let expected_b: Vec<Call> = (101..=115).map(push).collect();
    assert_eq!(calls_for(&log, "a"), expected_a);
    assert_eq!(calls_for(&log, "b"), expected_b);
}

#[tokio::test]
async fn per_surface_order_holds_on_execution_thread() {
    let navigator = Navigator::start(Config::default()).unwrap();
    let router = navigator.router("a");
    let log = log();

    for id in 1..=25 {
        router.navigate_to(DestinationId(id), None);
    }
    navigator.register_surface("a", Recorder::new("a", &log)).unwrap();
    for id in 26..=50 {
        router.navigate_to(DestinationId(id), None);
    }
    navigator.settled().await.unwrap();

    let expected: Vec<Call> = (1..=50).map(push).collect();
    assert_eq!(calls_for(&log, "a"), expected);

    navigator.shutdown().unwrap();
    navigator.join().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn registration_flush_is_atomic_with_concurrent_submits() {
    const PRODUCERS: u32 = 4;
    const PER_PRODUCER: u32 = 200;

    let navigator = inline_navigator();
    let log = log();
    let start = Arc::new(Barrier::new(PRODUCERS as usize + 1));

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|producer| {
            let router = navigator.router("a");
            let start = Arc::clone(&start);
            thread::spawn(move || {
                start.wait();
                for i in 0..PER_PRODUCER {
                    router.navigate_to(DestinationId(producer * 1000 + i), None);
                }
            })
        })
        .collect();

    let registrar = {
        let dispatcher = navigator.dispatcher().clone();
        let engine = Recorder::new("a", &log);
        let start = Arc::clone(&start);
        thread::spawn(move || {
            start.wait();
            thread::yield_now();
            dispatcher.register_surface("a", engine).unwrap();
        })
    };

    for producer in producers {
        producer.join().unwrap();
    }
    registrar.join().unwrap();
    navigator.settled().await.unwrap();

    let calls = calls_for(&log, "a");
    assert_eq!(calls.len(), (PRODUCERS * PER_PRODUCER) as usize);
    for producer in 0..PRODUCERS {
        let own: Vec<Call> = calls
            .iter()
            .filter(|call| matches!(call, Call::Push(id, _) if id.get() / 1000 == producer))
            .cloned()
            .collect();
        let expected: Vec<Call> = (0..PER_PRODUCER)
            .map(|i| push(producer * 1000 + i))
            .collect();
        assert_eq!(own, expected, "producer {producer}");
    }
    assert!(navigator.dispatcher().pending("a").await.is_empty());
}

#[tokio::test]
async fn second_registration_replaces_engine() {
    let navigator = inline_navigator();
    let router = navigator.router("a");
    let old_log = log();
    let new_log = log();

    navigator.register_surface("a", Recorder::new("a", &old_log)).unwrap();
    router.navigate_to(DestinationId(1), None);
    navigator.register_surface("a", Recorder::new("a", &new_log)).unwrap();
    router.navigate_to(DestinationId(2), None);
    navigator.settled().await.unwrap();

    assert_eq!(calls_for(&old_log, "a"), vec![push(1)]);
    assert_eq!(calls_for(&new_log, "a"), vec![push(2)]);
}

#[tokio::test]
async fn unregistered_surface_buffers_again() {
    let navigator = inline_navigator();
    let router = navigator.router("a");
    let log = log();

    navigator.register_surface("a", Recorder::new("a", &log)).unwrap();
    router.navigate_to(DestinationId(1), None);
    navigator.unregister_surface("a").unwrap();
    router.navigate_to(DestinationId(2), None);
    navigator.settled().await.unwrap();

    assert_eq!(calls_for(&log, "a"), vec![push(1)]);
    assert_eq!(
        navigator.dispatcher().pending("a").await,
        vec![Command::navigate("a", DestinationId(2), None)]
    );

    navigator.register_surface("a", Recorder::new("a", &log)).unwrap();
    navigator.settled().await.unwrap();
    assert_eq!(calls_for(&log, "a"), vec![push(1), push(2)]);
}

#[tokio::test]
async fn navigate_before_register_pushes_exactly_once() {
    let navigator = inline_navigator();
    let log = log();

    navigator.router("a").navigate_to(DestinationId(5), None);
    navigator.settled().await.unwrap();
    assert!(calls_for(&log, "a").is_empty());

    navigator.register_surface("a", Recorder::new("a", &log)).unwrap();
    navigator.settled().await.unwrap();
    assert_eq!(calls_for(&log, "a"), vec![push(5)]);
}

#[tokio::test]
async fn back_or_navigate_falls_back_to_push() {
    let navigator = inline_navigator();
    let log = log();
    navigator
        .register_surface("a", Recorder::missing_destinations("a", &log))
        .unwrap();

    let args = Args::new().with("from", "menu");
    navigator
        .router("a")
        .back_or_navigate_to(DestinationId(7), Some(args.clone()));
    navigator.settled().await.unwrap();

    assert_eq!(
        calls_for(&log, "a"),
        vec![
            Call::PopTo(DestinationId(7), false),
            Call::Push(DestinationId(7), Some(args)),
        ]
    );
}

#[tokio::test]
async fn back_or_navigate_stops_after_successful_pop() {
    let navigator = inline_navigator();
    let log = log();
    navigator.register_surface("a", Recorder::new("a", &log)).unwrap();

    navigator.router("a").back_or_navigate_to(DestinationId(7), None);
    navigator.settled().await.unwrap();

    assert_eq!(calls_for(&log, "a"), vec![Call::PopTo(DestinationId(7), false)]);
}

#[tokio::test]
async fn back_with_result_pops_then_notifies_once() {
    let navigator = inline_navigator();
    let router = navigator.router("a");
    let log = log();
    navigator.register_surface("a", Recorder::new("a", &log)).unwrap();

    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = received.clone();
    let probe = log.clone();
    router.add_result_fn("CODE1", move |value| {
        // The pop has already happened by the time the listener runs
        assert_eq!(probe.lock().len(), 1);
        sink.lock().push(value.clone());
    });

    router.back_with_result("CODE1", "ok", Some(DestinationId(3)), true);
    navigator.settled().await.unwrap();

    assert_eq!(calls_for(&log, "a"), vec![Call::PopTo(DestinationId(3), true)]);
    assert_eq!(*received.lock(), vec![Value::from("ok")]);
}

#[tokio::test]
async fn remove_result_listeners_reports_and_silences() {
    let navigator = inline_navigator();
    let router = navigator.router("a");
    let log = log();
    navigator.register_surface("a", Recorder::new("a", &log)).unwrap();

    let hits = Arc::new(Mutex::new(0));
    let counter = hits.clone();
    router.add_result_fn("CODE", move |_| *counter.lock() += 1);

    assert!(router.remove_result_listeners(["CODE"]));
    assert!(!router.remove_result_listeners(["CODE"]));

    router.back_with_result("CODE", 1, None, false);
    navigator.settled().await.unwrap();

    assert_eq!(*hits.lock(), 0);
    assert_eq!(calls_for(&log, "a"), vec![Call::Pop]);
}

#[tokio::test]
async fn duplicate_listener_receives_result_once() {
    let navigator = inline_navigator();
    let router = navigator.router("a");
    navigator.register_surface("a", Recorder::new("a", &log())).unwrap();

    let hits = Arc::new(Mutex::new(0));
    let counter = hits.clone();
    let listener = ListenerHandle::from_fn(move |_| *counter.lock() += 1);

    assert!(router.add_result_listener("CODE", listener.clone()));
    assert!(!router.add_result_listener("CODE", listener.clone()));

    router.back_with_result("CODE", Value::Null, None, false);
    navigator.settled().await.unwrap();

    assert_eq!(*hits.lock(), 1);
}

#[tokio::test]
async fn shutdown_stops_before_later_commands() {
    let navigator = inline_navigator();
    let router = navigator.router("a");
    let log = log();
    navigator.register_surface("a", Recorder::new("a", &log)).unwrap();

    router.navigate_to(DestinationId(1), None);
    router.navigate_to(DestinationId(2), None);
    navigator.shutdown().unwrap();
    router.navigate_to(DestinationId(3), None);

    navigator.join().await.unwrap();
    assert!(!navigator.is_running());
    assert_eq!(calls_for(&log, "a"), vec![push(1), push(2)]);

    // Still fire and forget once closed
    router.navigate_to(DestinationId(4), None);
    assert!(navigator.shutdown().is_err());
}

#[tokio::test]
async fn observer_sees_buffering_and_dispatch() {
    #[derive(Default)]
    struct Tape(Mutex<Vec<(Disposition, Option<DestinationId>)>>);

    impl CommandObserver for Tape {
        fn on_command(&self, command: &Command, disposition: Disposition) {
            self.0.lock().push((disposition, command.destination()));
        }
    }

    let tape = Arc::new(Tape::default());
    let navigator = Navigator::builder(Config::default())
        .context(Arc::new(waypost_core::InlineContext))
        .observer(tape.clone())
        .start()
        .unwrap();

    navigator.router("a").navigate_to(DestinationId(1), None);
    navigator.register_surface("a", Recorder::new("a", &log())).unwrap();
    navigator.router("a").navigate_to(DestinationId(2), None);
    navigator.settled().await.unwrap();

    assert_eq!(
        *tape.0.lock(),
        vec![
            (Disposition::Buffered, Some(DestinationId(1))),
            (Disposition::Dispatched, Some(DestinationId(1))),
            (Disposition::Dispatched, Some(DestinationId(2))),
        ]
    );
}
