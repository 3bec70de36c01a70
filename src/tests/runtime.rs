use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc,
    },
    thread,
    time::Duration,
};

use trellis_core::{Error, Notification, Signal, dispatch};
use trellis_headless::Headless;

use super::{RUNTIME_LOCK, with_runtime};
use crate::{App, Button, Window};

#[test]
fn init_failure_skips_the_routine() {
    let _guard = RUNTIME_LOCK.lock();
    let invoked = AtomicBool::new(false);

    let result = crate::run(Headless::failing("no display"), || {
        invoked.store(true, Ordering::SeqCst);
    });

    match result {
        Err(Error::Init(err)) => assert_eq!(err.message(), "no display"),
        other => panic!("expected an init error, got {other:?}"),
    }
    assert!(!invoked.load(Ordering::SeqCst));
    assert!(!dispatch::is_ui_thread());
}

#[test]
fn nested_run_is_rejected() {
    with_runtime(|_| {
        let mut inner_invoked = false;
        let result = crate::run(Headless::new(), || inner_invoked = true);
        assert!(matches!(result, Err(Error::AlreadyRunning)));
        assert!(!inner_invoked);
        assert!(dispatch::is_ui_thread(), "outer runtime is untouched");
    });
}

#[test]
fn runtime_can_be_started_again_after_returning() {
    let first = with_runtime(|_| assert!(dispatch::is_ui_thread()));
    assert!(first.is_stopped());
    assert!(!dispatch::is_ui_thread());

    let _guard = RUNTIME_LOCK.lock();
    App::new(Headless::new())
        .panic_hook(true)
        .run(|| assert!(dispatch::is_ui_thread()))
        .unwrap();
}

#[test]
fn unread_clicks_collapse_into_one() {
    with_runtime(|driver| {
        let button = Button::new("Go");
        Window::new("clicks", 50, 20, button.clone()).open();
        let handle = button.control().handle().unwrap();

        for _ in 0..3 {
            driver.queue(handle, Notification::Clicked);
        }
        dispatch::pump(Some(Duration::ZERO));

        let clicked = button.clicked();
        assert_eq!(clicked.try_recv(), Some(()));
        assert_eq!(clicked.try_recv(), None);
    });
}

#[test]
fn blocking_recv_pumps_native_events() {
    with_runtime(|driver| {
        let button = Button::new("Go");
        Window::new("recv", 50, 20, button.clone()).open();
        driver.queue(button.control().handle().unwrap(), Notification::Clicked);

        button.clicked().recv();
        assert!(driver.iterations() >= 1);
    });
}

#[test]
fn recv_timeout_on_the_ui_thread_gives_up() {
    with_runtime(|_| {
        let signal = Signal::<u8>::new();
        assert_eq!(signal.recv_timeout(Duration::from_millis(10)), None);
    });
}

#[test]
fn worker_threads_reach_the_ui_thread_through_the_proxy() {
    with_runtime(|_| {
        let proxy = crate::proxy().unwrap();
        let done = Signal::new();
        let reply = done.clone();

        let worker = thread::spawn(move || {
            let answer = proxy.call(dispatch::is_ui_thread);
            proxy.post(move || reply.post((answer, dispatch::is_ui_thread())));
        });

        assert_eq!(done.recv(), (Some(true), true));
        worker.join().unwrap();
    });
}

#[test]
fn signals_wake_a_blocked_ui_thread_from_another_thread() {
    with_runtime(|_| {
        let value = Signal::new();
        let sender = value.clone();
        let worker = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            sender.post(42);
        });

        assert_eq!(value.recv(), 42);
        worker.join().unwrap();
    });
}

#[test]
fn proxy_outlives_the_runtime_harmlessly() {
    let proxy = Arc::new(parking_lot::Mutex::new(None));
    let slot = proxy.clone();
    with_runtime(move |_| *slot.lock() = crate::proxy());

    let proxy = proxy.lock().take().unwrap();
    assert!(!proxy.post(|| unreachable!("runtime is gone")));
    assert_eq!(proxy.call(|| 1), None);
    assert!(crate::proxy().is_none());
}

#[test]
fn call_still_queued_when_the_routine_returns_gives_none() {
    let (result, answer) = mpsc::channel();
    with_runtime(move |_| {
        let proxy = crate::proxy().unwrap();
        thread::spawn(move || {
            let _ = result.send(proxy.call(|| 7));
        });
        // Return without pumping, leaving the call queued.
        thread::sleep(Duration::from_millis(100));
    });

    assert_eq!(answer.recv_timeout(Duration::from_secs(2)), Ok(None));
}

#[test]
#[should_panic(expected = "must be called on the UI thread")]
fn controls_are_unusable_after_the_routine_returns() {
    let button = Button::new("late");
    let kept = button.clone();
    with_runtime(move |_| Window::new("late", 10, 10, kept).open());
    button.set_text("too late");
}
