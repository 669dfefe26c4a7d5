use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct ListenerId(u64);

pub(crate) struct Entry<A: ?Sized> {
    id: ListenerId,
    live: Cell<bool>,
    callback: Box<dyn Fn(&A)>,
}

pub(crate) type Snapshot<A> = SmallVec<[Rc<Entry<A>>; 4]>;

/// Callbacks in registration order.
///
/// Delivery runs on a snapshot taken while the owner is borrowed; the owner must
/// release its borrow before calling [`deliver`] so that callbacks can add or
/// remove listeners. Removed entries are marked dead and skipped even if they are
/// still part of an in-flight snapshot.
pub(crate) struct ListenerSet<A: ?Sized> {
    entries: SmallVec<[Rc<Entry<A>>; 4]>,
    next_id: u64,
}

impl<A: ?Sized> Default for ListenerSet<A> {
    fn default() -> Self {
        Self {
            entries: SmallVec::new(),
            next_id: 0,
        }
    }
}

impl<A: ?Sized> ListenerSet<A> {
    pub(crate) fn insert(&mut self, callback: Box<dyn Fn(&A)>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Rc::new(Entry {
            id,
            live: Cell::new(true),
            callback,
        }));
        id
    }

    /// Detaches `id`, handing back the entry so the caller can drop it once its
    /// own borrow is released. `None` if `id` was already removed.
    pub(crate) fn remove(&mut self, id: ListenerId) -> Option<Rc<Entry<A>>> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        let entry = self.entries.remove(index);
        entry.live.set(false);
        Some(entry)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn snapshot(&self) -> Snapshot<A> {
        self.entries.clone()
    }
}

/// Payload of a caught listener panic.
pub(crate) type Panic = Box<dyn Any + Send>;

/// Calls every live listener of `snapshot` with `arg`.
///
/// A panicking listener does not stop delivery to the others. The first panic is
/// handed back for the caller to resume once its own bookkeeping is done.
#[must_use = "a caught listener panic has to be resumed"]
pub(crate) fn deliver<A: ?Sized>(snapshot: Snapshot<A>, arg: &A, what: &str) -> Option<Panic> {
    let mut failure: Option<Panic> = None;
    let mut failed = 0usize;

    for entry in snapshot {
        if !entry.live.get() {
            continue;
        }
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| (entry.callback)(arg))) {
            failed += 1;
            tracing::error!(
                listener = entry.id.0,
                "{what} listener panicked: {}",
                panic_message(payload.as_ref())
            );
            if failure.is_none() {
                failure = Some(payload);
            }
        }
    }

    if failed > 1 {
        tracing::error!("{failed} {what} listeners panicked, resuming the first");
    }
    failure
}

/// Resumes the first panic caught by [`deliver`], if any.
pub(crate) fn resume(failure: Option<Panic>) {
    if let Some(payload) = failure {
        panic::resume_unwind(payload);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "<non-string panic payload>"
    }
}
