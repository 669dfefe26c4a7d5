//! # darc-layout
//! Breakpoint-driven layout state for Rust UIs: which breakpoint the viewport is
//! in, what a responsive value resolves to there, whether conditional content is
//! present, and what a collapsible sidebar is doing.
//!
//! ## Example
//! ```rust
//! use darc_layout::prelude::*;
//!
//! let registry = BreakpointRegistry::default();
//! let columns = Responsive::from_keys(&registry, [("base", 1), ("md", 2), ("xl", 4)]).unwrap();
//!
//! assert_eq!(columns.resolve_or(registry.breakpoint_for(500.0), 1), 1);
//! assert_eq!(columns.resolve_or(registry.breakpoint_for(1100.0), 1), 2);
//!
//! let desktop_only = VisibilityCondition::above(Breakpoint::LG);
//! assert!(!desktop_only.is_visible(registry.breakpoint_for(1000.0)));
//! ```
//!
//! ## Breakpoints
//! A [`BreakpointRegistry`] is an ordered list of named minimum widths. The active
//! [`Breakpoint`] for a width is the largest one whose threshold the width
//! reaches. Breakpoints are ordinals into the registry, so they compare by size.
//!
//! ## The viewport observer
//! The [`viewport`] module holds the active breakpoint for the UI thread. The host
//! event loop reports widths through [`viewport::handle_resize`]; consumers
//! [`viewport::subscribe`] and are told only about threshold crossings. All
//! consumers share one platform watch ([`viewport::ViewportSource`]), installed on
//! the first subscription and removed after the last. [`BreakpointSignal`] exposes
//! the same value as a reactive signal.
//!
//! ## Responsive values and visibility
//! [`Responsive`] values resolve mobile-first: a breakpoint without an entry uses
//! the nearest smaller one that has one. [`VisibilityCondition`] decides whether
//! content exists at a breakpoint, and [`Presence`] turns a stream of breakpoints
//! into mount and unmount edges.
//!
//! ## Sidebar
//! [`Sidebar`] is fixed at or above its collapse breakpoint and an overlay drawer
//! below it. An open drawer listens for Escape through [`keyboard`] and holds a
//! [`ScrollLock`].

pub mod breakpoint;
pub mod error;
pub mod keyboard;
mod listeners;
pub mod responsive;
pub mod scroll_lock;
pub mod sidebar;
pub mod signal;
pub mod viewport;
pub mod visibility;

pub use breakpoint::{Breakpoint, BreakpointEntry, BreakpointRegistry, BreakpointSet};
pub use error::{LayoutError, Result};
pub use responsive::{BreakpointMap, Responsive};
pub use scroll_lock::ScrollLock;
pub use sidebar::{DismissReason, Sidebar, SidebarConfig, SidebarMode, SidebarPhase, SidebarState};
pub use signal::BreakpointSignal;
pub use viewport::{Subscription, ViewportSource};
pub use visibility::{Condition, Presence, PresenceChange, Rendered, VisibilityCondition};

pub mod prelude {
    pub use crate::LayoutError;
    pub use crate::breakpoint::{Breakpoint, BreakpointRegistry, BreakpointSet};
    pub use crate::responsive::{BreakpointMap, Responsive};
    pub use crate::sidebar::{Sidebar, SidebarConfig, SidebarMode, SidebarPhase};
    pub use crate::signal::BreakpointSignal;
    pub use crate::viewport::{self, ViewportSource};
    pub use crate::visibility::{Presence, PresenceChange, VisibilityCondition};
}
