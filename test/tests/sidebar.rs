//! Tests for the responsive sidebar mounted on the viewport observer.
//!
//! These tests verify that:
//! - The sidebar switches between fixed and overlay mode on resize
//! - Escape and overlay clicks close an open drawer
//! - Controlled sidebars only report changes through their callback
//! - Scroll locking is shared between drawers

use std::cell::RefCell;
use std::rc::Rc;

use darc_layout::sidebar::DismissReason;
use darc_layout_test::prelude::*;

#[test]
fn test_collapse_open_escape_scenario() {
    let harness = ViewportHarness::new_with_width(1100.0);
    let sidebar = Sidebar::mount(SidebarConfig::new()).unwrap();
    assert_eq!(sidebar.phase(), SidebarPhase::Fixed);
    assert_eq!(sidebar.content_inset(), 280.0);

    harness.resize(900.0);
    assert_eq!(sidebar.phase(), SidebarPhase::OverlayClosed);
    assert_eq!(sidebar.content_inset(), 0.0);

    sidebar.open();
    assert_eq!(sidebar.phase(), SidebarPhase::OverlayOpen);
    assert!(scroll_lock::is_locked());

    harness.press_escape();
    assert_eq!(sidebar.phase(), SidebarPhase::OverlayClosed);
    assert!(!scroll_lock::is_locked());
    assert_eq!(keyboard::listener_count(), 0);
}

#[test]
fn test_other_keys_do_not_close() {
    let harness = ViewportHarness::new_with_width(500.0);
    let sidebar = Sidebar::mount(SidebarConfig::new()).unwrap();
    sidebar.open();

    harness.press_key(Key::Named(NamedKey::Enter));
    harness.press_key(Key::Character("q".into()));
    assert_eq!(sidebar.phase(), SidebarPhase::OverlayOpen);

    sidebar.overlay_clicked();
    assert_eq!(sidebar.phase(), SidebarPhase::OverlayClosed);
}

#[test]
fn test_growing_past_collapse_releases_drawer() {
    let harness = ViewportHarness::new_with_width(500.0);
    let recorder = OpenChangeRecorder::new();
    let sidebar = Sidebar::mount(
        SidebarConfig::new()
            .collapse_below("md")
            .on_open_change(recorder.callback()),
    )
    .unwrap();
    sidebar.open();
    assert!(scroll_lock::is_locked());

    harness.resize(800.0);
    assert_eq!(sidebar.phase(), SidebarPhase::Fixed);
    assert!(!sidebar.state().is_open);
    assert_eq!(recorder.calls(), vec![true, false]);
    assert!(!scroll_lock::is_locked());
    assert!(!sidebar.holds_overlay_effects());

    harness.resize(500.0);
    assert_eq!(sidebar.phase(), SidebarPhase::OverlayClosed);
}

#[test]
fn test_open_in_fixed_mode_is_not_remembered() {
    let harness = ViewportHarness::new_with_width(1400.0);
    let sidebar = Sidebar::mount(SidebarConfig::new()).unwrap();
    sidebar.open();
    sidebar.toggle();

    harness.resize(600.0);
    assert_eq!(sidebar.phase(), SidebarPhase::OverlayClosed);
}

#[test]
fn test_controlled_sidebar() {
    let harness = ViewportHarness::new_with_width(600.0);
    let recorder = OpenChangeRecorder::new();
    let sidebar = Sidebar::mount(
        SidebarConfig::new()
            .open(false)
            .on_open_change(recorder.callback()),
    )
    .unwrap();

    sidebar.open();
    assert_eq!(recorder.calls(), vec![true]);
    assert_eq!(sidebar.phase(), SidebarPhase::OverlayClosed);

    sidebar.sync_open(true);
    assert_eq!(sidebar.phase(), SidebarPhase::OverlayOpen);

    harness.press_escape();
    assert_eq!(recorder.calls(), vec![true, false]);
    assert_eq!(sidebar.phase(), SidebarPhase::OverlayOpen);

    sidebar.sync_open(false);
    assert_eq!(sidebar.phase(), SidebarPhase::OverlayClosed);
    assert!(!scroll_lock::is_locked());
}

#[test]
fn test_controlled_owner_applies_changes_in_callback() {
    let harness = ViewportHarness::new_with_width(600.0);
    let slot: Rc<RefCell<Option<Sidebar>>> = Rc::new(RefCell::new(None));
    let owner = slot.clone();
    let sidebar = Sidebar::mount(
        SidebarConfig::new()
            .open(false)
            .on_open_change(move |open| {
                if let Some(sidebar) = owner.borrow().as_ref() {
                    sidebar.sync_open(open);
                }
            }),
    )
    .unwrap();
    *slot.borrow_mut() = Some(sidebar);

    let phase = || slot.borrow().as_ref().map(Sidebar::phase);
    slot.borrow().as_ref().unwrap().toggle();
    assert_eq!(phase(), Some(SidebarPhase::OverlayOpen));

    harness.press_escape();
    assert_eq!(phase(), Some(SidebarPhase::OverlayClosed));

    // break the cycle between the sidebar and its own callback
    let sidebar = slot.borrow_mut().take();
    drop(sidebar);
    assert!(!harness.is_watching());
}

#[test]
fn test_uncontrolled_callback_reports_changes() {
    let harness = ViewportHarness::new_with_width(1300.0);
    let recorder = OpenChangeRecorder::new();
    let sidebar = Sidebar::mount(
        SidebarConfig::new()
            .default_open(true)
            .on_open_change(recorder.callback()),
    )
    .unwrap();

    // a fixed sidebar has no open state to lose, so nothing is reported
    harness.resize(700.0);
    assert_eq!(sidebar.phase(), SidebarPhase::OverlayClosed);
    assert_eq!(recorder.calls(), Vec::<bool>::new());

    sidebar.toggle();
    sidebar.toggle();
    assert_eq!(recorder.calls(), vec![true, false]);
}

#[test]
fn test_dismiss_reasons_respect_config() {
    let harness = ViewportHarness::new_with_width(300.0);
    let sidebar = Sidebar::mount(SidebarConfig::new().close_on_overlay_click(false)).unwrap();
    sidebar.open();

    sidebar.dismiss(DismissReason::OverlayClick);
    assert_eq!(sidebar.phase(), SidebarPhase::OverlayOpen);
    harness.press_escape();
    assert_eq!(sidebar.phase(), SidebarPhase::OverlayClosed);
}

#[test]
fn test_two_drawers_share_scroll_lock() {
    let harness = ViewportHarness::new_with_width(400.0);
    let locks = Rc::new(RefCell::new(Vec::new()));
    scroll_lock::set_handler({
        let locks = locks.clone();
        move |locked| locks.borrow_mut().push(locked)
    });

    let navigation = Sidebar::mount(SidebarConfig::new()).unwrap();
    let filters = Sidebar::mount(SidebarConfig::new().collapse_below("xl")).unwrap();
    navigation.open();
    filters.open();
    assert_eq!(scroll_lock::holders(), 2);

    navigation.close();
    assert!(scroll_lock::is_locked());

    // one escape closes every open drawer
    navigation.open();
    harness.press_escape();
    assert_eq!(navigation.phase(), SidebarPhase::OverlayClosed);
    assert_eq!(filters.phase(), SidebarPhase::OverlayClosed);
    assert_eq!(*locks.borrow(), vec![true, false]);
}

#[test]
fn test_drop_while_open_cleans_up() {
    let harness = ViewportHarness::new_with_width(400.0);
    let sidebar = Sidebar::mount(SidebarConfig::new()).unwrap();
    sidebar.open();
    drop(sidebar);

    assert!(!scroll_lock::is_locked());
    assert_eq!(keyboard::listener_count(), 0);
    assert!(!harness.is_watching());
}

#[test]
fn test_unknown_collapse_key() {
    let _harness = ViewportHarness::new();
    let err = Sidebar::mount(SidebarConfig::new().collapse_below("desktop")).unwrap_err();
    assert_eq!(err, LayoutError::UnknownBreakpoint("desktop".into()));
    assert!(!viewport::is_watching());
}
