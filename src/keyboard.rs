//! Window-wide key listeners.
//!
//! The host forwards keyboard input through [`handle_key_event`]; components that
//! need keys regardless of focus (an open drawer listening for Escape) register
//! with [`listen`] and keep the returned [`KeyListener`] alive for as long as they
//! want the keys.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

use ui_events::keyboard::{Key, KeyState, KeyboardEvent};

use crate::listeners::{ListenerId, ListenerSet, deliver, resume};

thread_local! {
    static KEY_LISTENERS: RefCell<ListenerSet<Key>> = RefCell::new(ListenerSet::default());
}

/// Dispatches a key press to every global listener. Key releases are ignored.
pub fn handle_key_event(event: &KeyboardEvent) {
    if let KeyboardEvent {
        key,
        state: KeyState::Down,
        ..
    } = event
    {
        handle_key(key);
    }
}

/// Dispatches `key` to every global listener, in registration order.
pub fn handle_key(key: &Key) {
    let snapshot = KEY_LISTENERS.with_borrow(|listeners| listeners.snapshot());
    resume(deliver(snapshot, key, "key"));
}

pub fn listen(listener: impl Fn(&Key) + 'static) -> KeyListener {
    let id = KEY_LISTENERS.with_borrow_mut(|listeners| listeners.insert(Box::new(listener)));
    KeyListener {
        id: Some(id),
        _not_send: PhantomData,
    }
}

pub fn listener_count() -> usize {
    KEY_LISTENERS.with_borrow(|listeners| listeners.len())
}

/// Registration handle returned by [`listen`]. Dropping it removes the listener.
#[must_use = "dropping a `KeyListener` removes it"]
#[derive(Debug)]
pub struct KeyListener {
    id: Option<ListenerId>,
    _not_send: PhantomData<Rc<()>>,
}

impl KeyListener {
    pub fn remove(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };
        let removed = KEY_LISTENERS
            .try_with(|listeners| listeners.borrow_mut().remove(id))
            .ok()
            .flatten();
        drop(removed);
    }
}

impl Drop for KeyListener {
    fn drop(&mut self) {
        self.remove();
    }
}
