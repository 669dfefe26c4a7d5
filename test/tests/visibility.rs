//! Tests for conditional content driven by viewport changes.

use std::cell::RefCell;
use std::rc::Rc;

use darc_layout::Rendered;
use darc_layout_test::prelude::*;

#[test]
fn test_between_scenario() {
    let registry = viewport::registry();
    let condition = VisibilityCondition::between_keys(&registry, "sm", "lg").unwrap();
    assert!(condition.is_visible(Breakpoint::MD));
    assert!(!condition.is_visible(Breakpoint::XL));
}

#[test]
fn test_show_and_hide_are_complements() {
    let show = VisibilityCondition::below(Breakpoint::MD);
    let hide = VisibilityCondition::below(Breakpoint::MD).inverted();
    for width in [0.0, 500.0, 767.0, 768.0, 1200.0, 3000.0] {
        let active = viewport::registry().breakpoint_for(width);
        assert_ne!(show.is_visible(active), hide.is_visible(active), "{width}");
    }
}

#[test]
fn test_presence_mounts_on_crossings() {
    let harness = ViewportHarness::new();
    let edges = Rc::new(RefCell::new(Vec::new()));
    let presence = Rc::new(RefCell::new(Presence::new(
        VisibilityCondition::above(Breakpoint::LG),
        viewport::current(),
    )));

    let _subscription = viewport::subscribe({
        let edges = edges.clone();
        let presence = presence.clone();
        move |breakpoint| {
            if let Some(change) = presence.borrow_mut().update(breakpoint) {
                edges.borrow_mut().push(change);
            }
        }
    });

    for width in [700.0, 1100.0, 1300.0, 1000.0, 900.0, 1024.0] {
        harness.resize(width);
    }

    assert_eq!(
        *edges.borrow(),
        vec![
            PresenceChange::Mount,
            PresenceChange::Unmount,
            PresenceChange::Mount
        ]
    );
    assert!(presence.borrow().is_visible());
}

#[test]
fn test_fallback_rendering() {
    let harness = ViewportHarness::new();
    let _recorder = BreakpointRecorder::subscribe();
    let nav = VisibilityCondition::above(Breakpoint::MD).fallback("hamburger");

    harness.resize(400.0);
    assert_eq!(
        nav.select(harness.current(), &"tabs"),
        Rendered::Fallback(&"hamburger")
    );
    harness.resize(800.0);
    assert_eq!(nav.select(harness.current(), &"tabs"), Rendered::Content(&"tabs"));
}

#[test]
fn test_only_on_named_breakpoints() {
    let registry = viewport::registry();
    let condition = VisibilityCondition::only_keys(&registry, ["base", "lg"]).unwrap();
    let visible: Vec<_> = registry
        .iter()
        .filter(|(bp, _)| condition.is_visible(*bp))
        .map(|(_, entry)| entry.key().to_string())
        .collect();
    assert_eq!(visible, vec!["base", "lg"]);
}
