//! Tests for the shared viewport observer.
//!
//! These tests verify that:
//! - Only threshold crossings reach listeners
//! - One platform watch serves every subscriber
//! - Listeners may unsubscribe or resize from inside a notification

use std::cell::RefCell;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use darc_layout::viewport::Subscription;
use darc_layout_test::prelude::*;

#[test]
fn test_threshold_crossings_only() {
    let harness = ViewportHarness::new();
    let recorder = BreakpointRecorder::subscribe();

    for width in [320.0, 500.0, 639.5, 640.0, 641.0, 1023.0, 1024.0, 1024.0] {
        harness.resize(width);
    }

    assert_eq!(
        recorder.seen(),
        vec![Breakpoint::SM, Breakpoint::MD, Breakpoint::LG]
    );
    assert_eq!(harness.current(), Breakpoint::LG);
}

#[test]
fn test_shared_watch_lifecycle() {
    let harness = ViewportHarness::new();
    assert!(!harness.is_watching());

    let first = BreakpointRecorder::subscribe();
    let second = BreakpointRecorder::subscribe();
    let third = BreakpointRecorder::subscribe();
    assert_eq!(harness.install_count(), 1);

    drop(first);
    drop(second);
    assert_eq!(harness.uninstall_count(), 0);
    harness.resize(900.0);
    assert_eq!(third.seen(), vec![Breakpoint::MD]);

    drop(third);
    assert_eq!(harness.uninstall_count(), 1);
    assert!(!harness.is_watching());
}

#[test]
fn test_current_width_applies_on_install() {
    let harness = ViewportHarness::new_with_width(1500.0);
    assert_eq!(harness.current(), Breakpoint::BASE);

    let recorder = BreakpointRecorder::subscribe();
    assert_eq!(harness.current(), Breakpoint::XL);
    assert_eq!(recorder.count(), 0);

    harness.resize(1600.0);
    assert_eq!(recorder.count(), 1);
    assert_eq!(recorder.last(), Some(Breakpoint::XXL));
}

#[test]
fn test_all_subscribers_see_same_sequence() {
    let harness = ViewportHarness::new();
    let recorders: Vec<_> = (0..4).map(|_| BreakpointRecorder::subscribe()).collect();

    for width in [800.0, 200.0, 1400.0, 1300.0] {
        harness.resize(width);
    }

    let expected = vec![Breakpoint::MD, Breakpoint::BASE, Breakpoint::XL];
    for recorder in &recorders {
        assert_eq!(recorder.seen(), expected);
    }
}

#[test]
fn test_unsubscribe_inside_listener() {
    let harness = ViewportHarness::new();
    let calls = Rc::new(RefCell::new(0));
    let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

    let subscription = viewport::subscribe({
        let calls = calls.clone();
        let slot = slot.clone();
        move |_| {
            *calls.borrow_mut() += 1;
            let own = slot.borrow_mut().take();
            drop(own);
        }
    });
    *slot.borrow_mut() = Some(subscription);
    let after = BreakpointRecorder::subscribe();

    harness.resize(700.0);
    harness.resize(900.0);

    assert_eq!(*calls.borrow(), 1);
    assert_eq!(after.seen(), vec![Breakpoint::SM, Breakpoint::MD]);
    assert_eq!(viewport::subscriber_count(), 1);
}

#[test]
fn test_resize_inside_listener_is_queued() {
    let harness = ViewportHarness::new();
    let _bounce = viewport::subscribe(|breakpoint| {
        if breakpoint == Breakpoint::SM {
            viewport::handle_resize(1300.0);
        }
    });
    let recorder = BreakpointRecorder::subscribe();

    harness.resize(700.0);

    assert_eq!(recorder.seen(), vec![Breakpoint::SM, Breakpoint::XL]);
    assert_eq!(harness.current(), Breakpoint::XL);
}

#[test]
fn test_subscriber_added_during_delivery_waits_for_next_change() {
    let harness = ViewportHarness::new();
    let late: Rc<RefCell<Option<BreakpointRecorder>>> = Rc::new(RefCell::new(None));
    let _spawner = viewport::subscribe({
        let late = late.clone();
        move |_| {
            let mut late = late.borrow_mut();
            if late.is_none() {
                *late = Some(BreakpointRecorder::subscribe());
            }
        }
    });

    harness.resize(700.0);
    harness.resize(900.0);

    let late = late.borrow();
    let late = late.as_ref().unwrap();
    assert_eq!(late.seen(), vec![Breakpoint::MD]);
}

#[test]
fn test_panicking_listener_does_not_starve_others() {
    let harness = ViewportHarness::new();
    let _faulty = viewport::subscribe(|_| {
        panic!("listener failure");
    });
    let recorder = BreakpointRecorder::subscribe();

    let result = catch_unwind(AssertUnwindSafe(|| harness.resize(900.0)));
    assert!(result.is_err());
    assert_eq!(recorder.seen(), vec![Breakpoint::MD]);

    // the observer is usable afterwards
    let _ = catch_unwind(AssertUnwindSafe(|| harness.resize(1300.0)));
    assert_eq!(recorder.last(), Some(Breakpoint::XL));
}

#[test]
fn test_queued_resize_survives_listener_panic() {
    let harness = ViewportHarness::new();
    let _bounce = viewport::subscribe(|breakpoint| {
        if breakpoint == Breakpoint::SM {
            viewport::handle_resize(1300.0);
        }
    });
    let _faulty = viewport::subscribe(|breakpoint| {
        if breakpoint == Breakpoint::SM {
            panic!("listener failure");
        }
    });
    let recorder = BreakpointRecorder::subscribe();

    let result = catch_unwind(AssertUnwindSafe(|| harness.resize(700.0)));

    assert!(result.is_err());
    assert_eq!(harness.current(), Breakpoint::XL);
    assert_eq!(viewport::width(), Some(1300.0));
    assert_eq!(recorder.seen(), vec![Breakpoint::SM, Breakpoint::XL]);
}

#[test]
fn test_custom_registry() {
    let registry =
        BreakpointRegistry::new([("phone", 0.0), ("tablet", 600.0), ("desktop", 1000.0)]).unwrap();
    let harness = ViewportHarness::with_registry(registry).unwrap();
    let recorder = BreakpointRecorder::subscribe();

    harness.resize(650.0);
    harness.resize(5000.0);

    let registry = viewport::registry();
    let keys: Vec<_> = recorder
        .seen()
        .into_iter()
        .filter_map(|bp| registry.key(bp).map(str::to_string))
        .collect();
    assert_eq!(keys, vec!["tablet", "desktop"]);
    assert!(ViewportHarness::with_registry(BreakpointRegistry::default()).is_err());
}

// the reactive runtime may only live on one thread per process, so this must stay
// the only test in this binary that creates signals
#[test]
fn test_breakpoint_signal_tracks_viewport() {
    let harness = ViewportHarness::new_with_width(800.0);
    let signal = BreakpointSignal::new();
    assert_eq!(signal.get_untracked(), Breakpoint::MD);

    harness.resize(100.0);
    assert_eq!(signal.get_untracked(), Breakpoint::BASE);
}
