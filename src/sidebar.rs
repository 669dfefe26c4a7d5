//! Sidebar that turns into a drawer on narrow viewports.
//!
//! At or above `collapse_below` the sidebar is [`SidebarMode::Fixed`]: always
//! visible, with no open/closed state. Below it the sidebar is an
//! [`SidebarMode::Overlay`] drawer that opens on request and closes on Escape, a
//! click on the overlay background, or an explicit close.
//!
//! While the drawer is open the sidebar holds a global Escape listener and a
//! [`ScrollLock`]. Both are released as soon as the drawer leaves the open phase,
//! and at the latest when the [`Sidebar`] is dropped.
//!
//! The open flag is either owned by the sidebar (uncontrolled) or by the caller
//! (controlled, see [`SidebarConfig::open`]). A controlled sidebar never changes
//! its own flag: it reports the intended value through
//! [`SidebarConfig::on_open_change`] and waits for [`Sidebar::sync_open`].

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use ui_events::keyboard::{Key, NamedKey};

use crate::breakpoint::{Breakpoint, BreakpointRegistry};
use crate::error::Result;
use crate::keyboard::{self, KeyListener};
use crate::scroll_lock::ScrollLock;
use crate::viewport::{self, Subscription};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SidebarMode {
    Fixed,
    Overlay,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SidebarPhase {
    Fixed,
    OverlayClosed,
    OverlayOpen,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SidebarState {
    pub is_open: bool,
    pub mode: SidebarMode,
}

impl SidebarState {
    pub fn phase(&self) -> SidebarPhase {
        match (self.mode, self.is_open) {
            (SidebarMode::Fixed, _) => SidebarPhase::Fixed,
            (SidebarMode::Overlay, false) => SidebarPhase::OverlayClosed,
            (SidebarMode::Overlay, true) => SidebarPhase::OverlayOpen,
        }
    }

    /// Whether the sidebar content is on screen.
    pub fn is_sidebar_visible(&self) -> bool {
        self.phase() != SidebarPhase::OverlayClosed
    }
}

/// What asked the drawer to close.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DismissReason {
    Escape,
    OverlayClick,
    Request,
}

pub struct SidebarConfig {
    collapse_below: String,
    sidebar_width: f64,
    default_open: bool,
    open: Option<bool>,
    on_open_change: Option<Rc<dyn Fn(bool)>>,
    close_on_escape: bool,
    close_on_overlay_click: bool,
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            collapse_below: "lg".to_string(),
            sidebar_width: 280.0,
            default_open: false,
            open: None,
            on_open_change: None,
            close_on_escape: true,
            close_on_overlay_click: true,
        }
    }
}

impl fmt::Debug for SidebarConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SidebarConfig")
            .field("collapse_below", &self.collapse_below)
            .field("sidebar_width", &self.sidebar_width)
            .field("default_open", &self.default_open)
            .field("open", &self.open)
            .field("on_open_change", &self.on_open_change.is_some())
            .field("close_on_escape", &self.close_on_escape)
            .field("close_on_overlay_click", &self.close_on_overlay_click)
            .finish()
    }
}

impl SidebarConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Breakpoint key below which the sidebar becomes a drawer. Defaults to `"lg"`.
    pub fn collapse_below(mut self, key: impl Into<String>) -> Self {
        self.collapse_below = key.into();
        self
    }

    pub fn sidebar_width(mut self, width: f64) -> Self {
        self.sidebar_width = width;
        self
    }

    /// Initial open flag of an uncontrolled sidebar.
    pub fn default_open(mut self, open: bool) -> Self {
        self.default_open = open;
        self
    }

    /// Makes the sidebar controlled, with `open` as the caller's current value.
    pub fn open(mut self, open: bool) -> Self {
        self.open = Some(open);
        self
    }

    /// Called with the next open value whenever the sidebar wants it changed.
    ///
    /// Uncontrolled sidebars report every change of their own flag here, including
    /// the close that happens when an open drawer grows into fixed mode.
    pub fn on_open_change(mut self, on_change: impl Fn(bool) + 'static) -> Self {
        self.on_open_change = Some(Rc::new(on_change));
        self
    }

    pub fn close_on_escape(mut self, enabled: bool) -> Self {
        self.close_on_escape = enabled;
        self
    }

    pub fn close_on_overlay_click(mut self, enabled: bool) -> Self {
        self.close_on_overlay_click = enabled;
        self
    }
}

enum OpenState {
    Uncontrolled(Cell<bool>),
    Controlled(Cell<bool>),
}

impl OpenState {
    fn get(&self) -> bool {
        match self {
            OpenState::Uncontrolled(open) | OpenState::Controlled(open) => open.get(),
        }
    }
}

#[derive(Default)]
struct OverlayEffects {
    escape: Option<KeyListener>,
    scroll: Option<ScrollLock>,
}

struct Shared {
    collapse_below: Breakpoint,
    sidebar_width: f64,
    close_on_escape: bool,
    close_on_overlay_click: bool,
    on_open_change: Option<Rc<dyn Fn(bool)>>,
    open: OpenState,
    active: Cell<Breakpoint>,
    effects: RefCell<OverlayEffects>,
}

impl Shared {
    fn mode(&self) -> SidebarMode {
        if self.active.get() < self.collapse_below {
            SidebarMode::Overlay
        } else {
            SidebarMode::Fixed
        }
    }

    fn state(&self) -> SidebarState {
        SidebarState {
            is_open: self.open.get(),
            mode: self.mode(),
        }
    }

    fn phase(&self) -> SidebarPhase {
        self.state().phase()
    }

    /// Single entry point for open/close/toggle and every dismissal.
    fn request(self: &Rc<Self>, next: bool, cause: &'static str) {
        if self.mode() == SidebarMode::Fixed {
            tracing::trace!(cause, "fixed sidebar ignores open state requests");
            return;
        }
        if self.open.get() == next {
            tracing::trace!(cause, open = next, "sidebar already in requested state");
            return;
        }
        self.commit(next, cause);
    }

    fn commit(self: &Rc<Self>, next: bool, cause: &'static str) {
        if let OpenState::Uncontrolled(open) = &self.open {
            open.set(next);
            tracing::debug!(cause, phase = ?self.phase(), "sidebar changed");
            self.sync_effects();
        } else {
            tracing::debug!(cause, open = next, "requesting open change from owner");
        }
        self.notify(next);
    }

    fn notify(&self, open: bool) {
        if let Some(on_change) = self.on_open_change.clone() {
            on_change(open);
        }
    }

    fn dismiss(self: &Rc<Self>, reason: DismissReason) {
        let enabled = match reason {
            DismissReason::Escape => self.close_on_escape,
            DismissReason::OverlayClick => self.close_on_overlay_click,
            DismissReason::Request => true,
        };
        if !enabled {
            tracing::trace!(?reason, "dismissal disabled");
            return;
        }
        let cause = match reason {
            DismissReason::Escape => "escape",
            DismissReason::OverlayClick => "overlay click",
            DismissReason::Request => "close",
        };
        self.request(false, cause);
    }

    fn set_breakpoint(self: &Rc<Self>, breakpoint: Breakpoint) {
        let before = self.mode();
        self.active.set(breakpoint);
        let after = self.mode();
        if before == after {
            return;
        }
        tracing::debug!(?before, ?after, "sidebar mode changed");

        match after {
            // a drawer never appears already open because the window shrank
            SidebarMode::Overlay => {
                if self.open.get() {
                    self.commit(false, "entered overlay mode");
                }
            }
            SidebarMode::Fixed => {
                if let OpenState::Uncontrolled(open) = &self.open
                    && open.replace(false)
                {
                    self.sync_effects();
                    self.notify(false);
                    return;
                }
            }
        }
        self.sync_effects();
    }

    fn sync_open(self: &Rc<Self>, value: bool) {
        match &self.open {
            OpenState::Controlled(open) => {
                open.set(value);
                self.sync_effects();
            }
            OpenState::Uncontrolled(_) => {
                tracing::warn!("open value passed to an uncontrolled sidebar, ignoring it");
            }
        }
    }

    /// Installs or releases the open-drawer side effects to match the phase.
    ///
    /// The scroll lock handler and listener drops run with `effects` unborrowed.
    fn sync_effects(self: &Rc<Self>) {
        if self.phase() != SidebarPhase::OverlayOpen {
            let released = self.effects.take();
            drop(released);
            return;
        }

        let (needs_escape, needs_scroll) = {
            let effects = self.effects.borrow();
            (
                self.close_on_escape && effects.escape.is_none(),
                effects.scroll.is_none(),
            )
        };
        let escape = needs_escape.then(|| self.escape_listener());
        let scroll = needs_scroll.then(ScrollLock::acquire);

        let redundant = {
            let mut effects = self.effects.borrow_mut();
            let mut redundant = OverlayEffects::default();
            if effects.escape.is_none() {
                effects.escape = escape;
            } else {
                redundant.escape = escape;
            }
            if effects.scroll.is_none() {
                effects.scroll = scroll;
            } else {
                redundant.scroll = scroll;
            }
            redundant
        };
        drop(redundant);

        // the scroll handler may have closed the drawer in the meantime
        if self.phase() != SidebarPhase::OverlayOpen {
            let released = self.effects.take();
            drop(released);
        }
    }

    fn escape_listener(self: &Rc<Self>) -> KeyListener {
        let shared = Rc::downgrade(self);
        keyboard::listen(move |key| {
            if *key != Key::Named(NamedKey::Escape) {
                return;
            }
            if let Some(shared) = shared.upgrade() {
                shared.dismiss(DismissReason::Escape);
            }
        })
    }
}

/// A mounted sidebar.
///
/// Created with [`Sidebar::mount`] it follows the viewport observer; created with
/// [`Sidebar::new`] it is driven through [`Sidebar::set_breakpoint`].
pub struct Sidebar {
    subscription: Option<Subscription>,
    shared: Rc<Shared>,
}

impl fmt::Debug for Sidebar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sidebar")
            .field("state", &self.state())
            .field("collapse_below", &self.shared.collapse_below)
            .field("controlled", &self.is_controlled())
            .finish()
    }
}

impl Sidebar {
    /// Builds a sidebar that is not connected to the viewport observer.
    ///
    /// Fails if `collapse_below` is not a key of `registry`.
    pub fn new(
        config: SidebarConfig,
        registry: &BreakpointRegistry,
        active: Breakpoint,
    ) -> Result<Self> {
        let collapse_below = registry.get(&config.collapse_below)?;
        Ok(Self::build(config, collapse_below, active))
    }

    /// Builds a sidebar that follows the active breakpoint of this thread.
    pub fn mount(config: SidebarConfig) -> Result<Self> {
        let collapse_below = viewport::registry().get(&config.collapse_below)?;

        let target: Rc<RefCell<Weak<Shared>>> = Rc::new(RefCell::new(Weak::new()));
        let subscription = viewport::subscribe({
            let target = target.clone();
            move |breakpoint| {
                let shared = target.borrow().upgrade();
                if let Some(shared) = shared {
                    shared.set_breakpoint(breakpoint);
                }
            }
        });

        let mut sidebar = Self::build(config, collapse_below, viewport::current());
        *target.borrow_mut() = Rc::downgrade(&sidebar.shared);
        sidebar.subscription = Some(subscription);
        Ok(sidebar)
    }

    fn build(config: SidebarConfig, collapse_below: Breakpoint, active: Breakpoint) -> Self {
        let open = match config.open {
            Some(open) => OpenState::Controlled(Cell::new(open)),
            // an uncontrolled flag only means something in overlay mode
            None => OpenState::Uncontrolled(Cell::new(
                config.default_open && active < collapse_below,
            )),
        };
        let shared = Rc::new(Shared {
            collapse_below,
            sidebar_width: config.sidebar_width,
            close_on_escape: config.close_on_escape,
            close_on_overlay_click: config.close_on_overlay_click,
            on_open_change: config.on_open_change,
            open,
            active: Cell::new(active),
            effects: RefCell::new(OverlayEffects::default()),
        });
        shared.sync_effects();
        Self {
            subscription: None,
            shared,
        }
    }

    pub fn state(&self) -> SidebarState {
        self.shared.state()
    }

    pub fn phase(&self) -> SidebarPhase {
        self.shared.phase()
    }

    pub fn mode(&self) -> SidebarMode {
        self.shared.mode()
    }

    pub fn is_controlled(&self) -> bool {
        matches!(self.shared.open, OpenState::Controlled(_))
    }

    pub fn collapse_below(&self) -> Breakpoint {
        self.shared.collapse_below
    }

    pub fn sidebar_width(&self) -> f64 {
        self.shared.sidebar_width
    }

    /// Horizontal space the content area gives up to the sidebar.
    pub fn content_inset(&self) -> f64 {
        match self.mode() {
            SidebarMode::Fixed => self.shared.sidebar_width,
            SidebarMode::Overlay => 0.0,
        }
    }

    pub fn open(&self) {
        self.shared.request(true, "open");
    }

    pub fn close(&self) {
        self.shared.dismiss(DismissReason::Request);
    }

    pub fn toggle(&self) {
        let next = !self.shared.open.get();
        self.shared.request(next, "toggle");
    }

    pub fn dismiss(&self, reason: DismissReason) {
        self.shared.dismiss(reason);
    }

    /// Click on the dimmed background behind the drawer.
    pub fn overlay_clicked(&self) {
        self.shared.dismiss(DismissReason::OverlayClick);
    }

    /// Feeds the caller's open value back into a controlled sidebar.
    pub fn sync_open(&self, open: bool) {
        self.shared.sync_open(open);
    }

    pub fn set_breakpoint(&self, breakpoint: Breakpoint) {
        self.shared.set_breakpoint(breakpoint);
    }

    /// Whether the drawer currently holds the escape listener and scroll lock.
    pub fn holds_overlay_effects(&self) -> bool {
        let effects = self.shared.effects.borrow();
        effects.escape.is_some() || effects.scroll.is_some()
    }
}

impl Drop for Sidebar {
    fn drop(&mut self) {
        self.subscription.take();
        let released = self.shared.effects.take();
        drop(released);
    }
}
