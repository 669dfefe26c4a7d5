//! The active breakpoint of the UI thread.
//!
//! All consumers share one underlying viewport watch. The watch, a host-provided
//! [`ViewportSource`], is installed when the first listener subscribes and removed
//! when the last one unsubscribes. The host event loop forwards width changes
//! through [`handle_resize`]; listeners hear about a change only when the width
//! crosses into another breakpoint.
//!
//! State is kept per thread, next to the reactive runtime that the rest of the UI
//! runs on.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::breakpoint::{Breakpoint, BreakpointRegistry};
use crate::error::{LayoutError, Result};
use crate::listeners::{ListenerId, ListenerSet, Snapshot, deliver, resume};

thread_local! {
    static VIEWPORT: RefCell<Viewport> = RefCell::new(Viewport::default());
}

/// The platform side of the viewport watch.
///
/// Implementations start observing the window (or terminal, or canvas) size in
/// [`install`](Self::install) and forward every width change to [`handle_resize`].
pub trait ViewportSource {
    /// Starts watching. Returns the current width if it is already known.
    fn install(&mut self) -> Option<f64>;

    /// Stops watching.
    fn uninstall(&mut self);
}

#[derive(Default)]
struct Viewport {
    registry: Option<Rc<BreakpointRegistry>>,
    current: Breakpoint,
    width: Option<f64>,
    listeners: ListenerSet<Breakpoint>,
    source: Option<Box<dyn ViewportSource>>,
    delivering: bool,
    pending: Option<f64>,
}

impl Viewport {
    fn registry(&mut self) -> Rc<BreakpointRegistry> {
        self.registry
            .get_or_insert_with(|| Rc::new(BreakpointRegistry::default()))
            .clone()
    }

    fn watching(&self) -> bool {
        !self.listeners.is_empty()
    }

    fn seed(&mut self, width: f64) {
        self.width = Some(width);
        self.current = self.registry().breakpoint_for(width);
    }

    fn resize(&mut self, width: f64) -> Option<(Breakpoint, Snapshot<Breakpoint>)> {
        if !self.watching() {
            tracing::trace!(width, "viewport watch is down, ignoring resize");
            return None;
        }
        if self.delivering {
            self.pending = Some(width);
            return None;
        }
        self.pending = None;
        self.width = Some(width);

        let breakpoint = self.registry().breakpoint_for(width);
        if breakpoint == self.current {
            tracing::trace!(width, "breakpoint unchanged");
            return None;
        }
        tracing::debug!(from = ?self.current, to = ?breakpoint, width, "breakpoint changed");
        self.current = breakpoint;
        self.delivering = true;
        Some((breakpoint, self.listeners.snapshot()))
    }
}

/// Installs the breakpoint registry for this thread.
///
/// Must run before anything reads the viewport; afterwards the registry is fixed
/// and a second call fails with [`LayoutError::AlreadyConfigured`].
pub fn configure(registry: BreakpointRegistry) -> Result<()> {
    VIEWPORT.with_borrow_mut(|viewport| {
        if viewport.registry.is_some() {
            return Err(LayoutError::AlreadyConfigured);
        }
        viewport.registry = Some(Rc::new(registry));
        Ok(())
    })
}

/// The registry in use, the default one unless [`configure`] ran first.
pub fn registry() -> Rc<BreakpointRegistry> {
    VIEWPORT.with_borrow_mut(|viewport| viewport.registry())
}

/// The active breakpoint. Before any width is known this is the smallest one.
pub fn current() -> Breakpoint {
    VIEWPORT.with_borrow(|viewport| viewport.current)
}

/// The last width seen by the watch.
pub fn width() -> Option<f64> {
    VIEWPORT.with_borrow(|viewport| viewport.width)
}

pub fn is_watching() -> bool {
    VIEWPORT.with_borrow(Viewport::watching)
}

pub fn subscriber_count() -> usize {
    VIEWPORT.with_borrow(|viewport| viewport.listeners.len())
}

/// Replaces the platform watch. If the watch is up, the old source is uninstalled
/// and the new one installed in its place.
pub fn set_source(source: impl ViewportSource + 'static) {
    let (previous, watching) = VIEWPORT.with_borrow_mut(|viewport| {
        let previous = viewport.source.replace(Box::new(source));
        (previous, viewport.watching())
    });
    if !watching {
        return;
    }
    if let Some(mut previous) = previous {
        previous.uninstall();
    }
    if let Some(width) = with_source(|source| source.install()).flatten() {
        handle_resize(width);
    }
}

/// Feeds a new viewport width in from the host event loop.
///
/// A resize reported while listeners are being notified is applied once that
/// delivery finishes, so every listener sees every change in the same order. A
/// listener panic is resumed only after the queued resizes have been delivered.
pub fn handle_resize(width: f64) {
    let mut failure = None;
    let mut next = Some(width);
    while let Some(width) = next.take() {
        let Some((breakpoint, snapshot)) =
            VIEWPORT.with_borrow_mut(|viewport| viewport.resize(width))
        else {
            break;
        };
        {
            let _delivering = Delivering;
            let panicked = deliver(snapshot, &breakpoint, "viewport");
            if failure.is_none() {
                failure = panicked;
            }
        }
        next = VIEWPORT.with_borrow_mut(|viewport| viewport.pending.take());
    }
    resume(failure);
}

struct Delivering;

impl Drop for Delivering {
    fn drop(&mut self) {
        let _ = VIEWPORT.try_with(|viewport| viewport.borrow_mut().delivering = false);
    }
}

/// Registers `listener` to be called with every new breakpoint.
///
/// The first subscription installs the viewport watch. Listeners run in
/// registration order; one subscribed during a notification is first called for
/// the next change.
pub fn subscribe(listener: impl Fn(Breakpoint) + 'static) -> Subscription {
    if !is_watching() {
        let width = with_source(|source| source.install()).flatten();
        tracing::debug!(?width, "installing viewport watch");
        if let Some(width) = width {
            VIEWPORT.with_borrow_mut(|viewport| viewport.seed(width));
        }
    }
    let id = VIEWPORT.with_borrow_mut(|viewport| {
        viewport
            .listeners
            .insert(Box::new(move |breakpoint: &Breakpoint| listener(*breakpoint)))
    });
    Subscription {
        id: Some(id),
        _not_send: PhantomData,
    }
}

fn unsubscribe(id: ListenerId) {
    let Ok((removed, last)) = VIEWPORT.try_with(|viewport| {
        let mut viewport = viewport.borrow_mut();
        let removed = viewport.listeners.remove(id);
        let last = removed.is_some() && !viewport.watching();
        (removed, last)
    }) else {
        return;
    };
    drop(removed);

    if last {
        tracing::debug!("removing viewport watch");
        with_source(|source| source.uninstall());
    }
}

/// Runs `f` on the installed source without holding the viewport borrow, so the
/// source may call back into this module.
fn with_source<R>(f: impl FnOnce(&mut dyn ViewportSource) -> R) -> Option<R> {
    let mut source = VIEWPORT
        .try_with(|viewport| viewport.borrow_mut().source.take())
        .ok()
        .flatten()?;
    let result = f(source.as_mut());
    let _ = VIEWPORT.try_with(|viewport| {
        let mut viewport = viewport.borrow_mut();
        if viewport.source.is_none() {
            viewport.source = Some(source);
        }
    });
    Some(result)
}

/// Handle to a viewport listener. Dropping it unsubscribes.
#[must_use = "dropping a `Subscription` unsubscribes its listener"]
#[derive(Debug)]
pub struct Subscription {
    id: Option<ListenerId>,
    _not_send: PhantomData<Rc<()>>,
}

impl Subscription {
    /// Stops further notifications. Calling it again, or from inside the listener
    /// itself, is fine.
    pub fn unsubscribe(&mut self) {
        if let Some(id) = self.id.take() {
            unsubscribe(id);
        }
    }

    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
