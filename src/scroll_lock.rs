//! Reference-counted document scroll lock.
//!
//! Every open drawer holds a [`ScrollLock`]. The host handler is told to lock when
//! the first lock is taken and to unlock when the last one is released, so two
//! overlays closing in any order never unlock each other's background.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

thread_local! {
    static SCROLL_LOCK: RefCell<ScrollLockState> = RefCell::new(ScrollLockState::default());
}

#[derive(Default)]
struct ScrollLockState {
    holders: usize,
    handler: Option<Rc<dyn Fn(bool)>>,
}

/// Sets the host callback that applies (`true`) or lifts (`false`) the lock.
///
/// If locks are already held, the new handler is called with `true` right away.
pub fn set_handler(handler: impl Fn(bool) + 'static) {
    let handler: Rc<dyn Fn(bool)> = Rc::new(handler);
    let locked = SCROLL_LOCK.with_borrow_mut(|state| {
        state.handler = Some(handler.clone());
        state.holders > 0
    });
    if locked {
        handler(true);
    }
}

pub fn is_locked() -> bool {
    holders() > 0
}

pub fn holders() -> usize {
    SCROLL_LOCK.with_borrow(|state| state.holders)
}

/// One hold on the scroll lock, released on drop.
#[must_use = "the scroll lock is released when the guard is dropped"]
#[derive(Debug)]
pub struct ScrollLock {
    _not_send: PhantomData<Rc<()>>,
}

impl ScrollLock {
    pub fn acquire() -> Self {
        let notify = SCROLL_LOCK.with_borrow_mut(|state| {
            state.holders += 1;
            if state.holders == 1 {
                state.handler.clone()
            } else {
                None
            }
        });
        if let Some(handler) = notify {
            tracing::debug!("locking document scroll");
            handler(true);
        }
        Self {
            _not_send: PhantomData,
        }
    }
}

impl Drop for ScrollLock {
    fn drop(&mut self) {
        let notify = SCROLL_LOCK
            .try_with(|state| {
                let mut state = state.borrow_mut();
                state.holders = state.holders.saturating_sub(1);
                if state.holders == 0 {
                    state.handler.clone()
                } else {
                    None
                }
            })
            .ok()
            .flatten();
        if let Some(handler) = notify {
            tracing::debug!("unlocking document scroll");
            handler(false);
        }
    }
}
