//! Properties that vary per breakpoint.
//!
//! A [`Responsive`] value is either a single value for every breakpoint or a sparse
//! [`BreakpointMap`]. Maps cascade upward: a value set at a smaller breakpoint stays
//! in effect at every larger breakpoint until another entry overrides it.
//!
//! ```rust
//! use darc_layout::{Breakpoint, BreakpointMap, Responsive};
//!
//! let gap = Responsive::Map(
//!     BreakpointMap::new()
//!         .with(Breakpoint::BASE, 8)
//!         .with(Breakpoint::MD, 16),
//! );
//! assert_eq!(gap.resolve(Breakpoint::SM), Some(&8));
//! assert_eq!(gap.resolve(Breakpoint::XL), Some(&16));
//! ```

use smallvec::SmallVec;

use crate::breakpoint::{Breakpoint, BreakpointRegistry};
use crate::error::Result;

/// Sparse per-breakpoint values, kept sorted by breakpoint.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BreakpointMap<T> {
    entries: SmallVec<[(Breakpoint, T); 4]>,
}

impl<T> Default for BreakpointMap<T> {
    fn default() -> Self {
        Self {
            entries: SmallVec::new(),
        }
    }
}

impl<T> BreakpointMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, breakpoint: Breakpoint, value: T) -> Self {
        self.insert(breakpoint, value);
        self
    }

    /// Sets the value for `breakpoint`, returning the value it replaced.
    pub fn insert(&mut self, breakpoint: Breakpoint, value: T) -> Option<T> {
        match self
            .entries
            .binary_search_by_key(&breakpoint, |(bp, _)| *bp)
        {
            Ok(index) => Some(std::mem::replace(&mut self.entries[index].1, value)),
            Err(index) => {
                self.entries.insert(index, (breakpoint, value));
                None
            }
        }
    }

    /// The value declared exactly at `breakpoint`, without cascading.
    pub fn get(&self, breakpoint: Breakpoint) -> Option<&T> {
        self.entries
            .binary_search_by_key(&breakpoint, |(bp, _)| *bp)
            .ok()
            .map(|index| &self.entries[index].1)
    }

    /// The entry at `active` or, failing that, the closest one below it.
    pub fn resolve(&self, active: Breakpoint) -> Option<&T> {
        let end = self.entries.partition_point(|(bp, _)| *bp <= active);
        self.entries[..end].last().map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Breakpoint, &T)> {
        self.entries.iter().map(|(bp, value)| (*bp, value))
    }
}

impl<T> FromIterator<(Breakpoint, T)> for BreakpointMap<T> {
    fn from_iter<I: IntoIterator<Item = (Breakpoint, T)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (breakpoint, value) in iter {
            map.insert(breakpoint, value);
        }
        map
    }
}

/// A property value that is either fixed or declared per breakpoint.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Responsive<T> {
    Value(T),
    Map(BreakpointMap<T>),
}

impl<T> From<T> for Responsive<T> {
    fn from(value: T) -> Self {
        Responsive::Value(value)
    }
}

impl<T> Responsive<T> {
    /// Builds a map from breakpoint names, rejecting names `registry` does not know.
    pub fn from_keys<'k, I>(registry: &BreakpointRegistry, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'k str, T)>,
    {
        let mut map = BreakpointMap::new();
        for (key, value) in entries {
            map.insert(registry.get(key)?, value);
        }
        Ok(Responsive::Map(map))
    }

    /// Resolves the value in effect at `active`.
    ///
    /// Returns `None` only for a map with no entry at or below `active`.
    pub fn resolve(&self, active: Breakpoint) -> Option<&T> {
        match self {
            Responsive::Value(value) => Some(value),
            Responsive::Map(map) => map.resolve(active),
        }
    }

    /// Resolves the value at `active`, using `default` on a resolution miss.
    pub fn resolve_or(&self, active: Breakpoint, default: T) -> T
    where
        T: Clone,
    {
        self.resolve(active).cloned().unwrap_or(default)
    }

    pub fn is_responsive(&self) -> bool {
        matches!(self, Responsive::Map(_))
    }

    /// Checks that every declared breakpoint exists in `registry`.
    pub fn validate(&self, registry: &BreakpointRegistry) -> Result<()> {
        if let Responsive::Map(map) = self {
            for (breakpoint, _) in map.iter() {
                registry.check(breakpoint)?;
            }
        }
        Ok(())
    }
}

/// Resolves an optional responsive property.
///
/// An absent property or a resolution miss yields `fallback`. A resolved value is
/// returned as is, however "empty" it looks (`0`, `""`, `false`).
pub fn resolve<'a, T>(
    value: Option<&'a Responsive<T>>,
    active: Breakpoint,
    fallback: Option<&'a T>,
) -> Option<&'a T> {
    value.and_then(|value| value.resolve(active)).or(fallback)
}
