//! Reactive view of the active breakpoint.

use floem_reactive::{ReadSignal, RwSignal, SignalGet, SignalUpdate, create_rw_signal};

use crate::breakpoint::Breakpoint;
use crate::viewport::{self, Subscription};

/// Keeps a signal in step with [`viewport::current`].
///
/// Effects and derived values that read the signal rerun on every breakpoint
/// change, never on resizes inside a breakpoint. The viewport subscription lives
/// as long as this value.
pub struct BreakpointSignal {
    signal: RwSignal<Breakpoint>,
    _subscription: Subscription,
}

impl BreakpointSignal {
    pub fn new() -> Self {
        let signal = create_rw_signal(viewport::current());
        let subscription = viewport::subscribe(move |breakpoint| signal.set(breakpoint));
        // subscribing may have installed the watch and moved the breakpoint
        let current = viewport::current();
        if signal.get_untracked() != current {
            signal.set(current);
        }
        Self {
            signal,
            _subscription: subscription,
        }
    }

    pub fn read_only(&self) -> ReadSignal<Breakpoint> {
        self.signal.read_only()
    }

    /// Tracked read.
    pub fn get(&self) -> Breakpoint {
        self.signal.get()
    }

    pub fn get_untracked(&self) -> Breakpoint {
        self.signal.get_untracked()
    }
}

impl Default for BreakpointSignal {
    fn default() -> Self {
        Self::new()
    }
}
