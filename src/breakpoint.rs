//! Named viewport-width bands and the registry that orders them.
//!
//! A [`BreakpointRegistry`] is built once at startup and never mutated. Everything
//! else in the crate refers to its entries through [`Breakpoint`], a small ordinal
//! handle that compares in registry order.

use std::cmp::Ordering;
use std::ops::{BitOr, Bound, RangeBounds};
use std::sync::Arc;

use bitflags::bitflags;
use smallvec::SmallVec;

use crate::error::{LayoutError, Result};

/// Ordinal handle to a breakpoint of a [`BreakpointRegistry`].
///
/// The associated constants address the default registry
/// (`base, sm, md, lg, xl, 2xl`); custom registries hand out handles through
/// [`BreakpointRegistry::get`].
#[derive(Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Default)]
pub struct Breakpoint(u8);

impl Breakpoint {
    pub const BASE: Breakpoint = Breakpoint(0);
    pub const SM: Breakpoint = Breakpoint(1);
    pub const MD: Breakpoint = Breakpoint(2);
    pub const LG: Breakpoint = Breakpoint(3);
    pub const XL: Breakpoint = Breakpoint(4);
    pub const XXL: Breakpoint = Breakpoint(5);

    /// Largest number of breakpoints a registry may hold.
    pub const MAX: usize = u32::BITS as usize;

    pub const fn from_ordinal(ordinal: usize) -> Option<Self> {
        if ordinal < Self::MAX {
            Some(Self(ordinal as u8))
        } else {
            None
        }
    }

    pub const fn ordinal(self) -> usize {
        self.0 as usize
    }

    /// The next larger breakpoint, if the ordinal space allows one.
    pub const fn next(self) -> Option<Self> {
        Self::from_ordinal(self.ordinal() + 1)
    }

    /// The next smaller breakpoint, `None` for the smallest.
    pub const fn prev(self) -> Option<Self> {
        match self.0 {
            0 => None,
            n => Some(Self(n - 1)),
        }
    }
}

bitflags! {
    /// A set of breakpoints, one bit per ordinal.
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[must_use]
    pub struct BreakpointSet: u32 {
        const BASE = 1;
        const SM = 1 << 1;
        const MD = 1 << 2;
        const LG = 1 << 3;
        const XL = 1 << 4;
        const XXL = 1 << 5;

        const _ = !0;
    }
}

impl BreakpointSet {
    pub const fn single(breakpoint: Breakpoint) -> Self {
        Self::from_bits_retain(1 << breakpoint.0)
    }

    pub const fn contains_breakpoint(self, breakpoint: Breakpoint) -> bool {
        self.bits() & (1 << breakpoint.0) != 0
    }

    /// Every breakpoint outside of `self` that exists in `registry`.
    pub fn complement_in(self, registry: &BreakpointRegistry) -> Self {
        registry.all().difference(self)
    }

    /// Members in ascending order.
    pub fn breakpoints(self) -> impl Iterator<Item = Breakpoint> {
        (0..Breakpoint::MAX as u8)
            .map(Breakpoint)
            .filter(move |bp| self.contains_breakpoint(*bp))
    }

    /// First member that is not part of `registry`.
    pub(crate) fn first_outside(self, registry: &BreakpointRegistry) -> Option<Breakpoint> {
        self.difference(registry.all()).breakpoints().next()
    }
}

impl From<Breakpoint> for BreakpointSet {
    fn from(breakpoint: Breakpoint) -> Self {
        Self::single(breakpoint)
    }
}

impl FromIterator<Breakpoint> for BreakpointSet {
    fn from_iter<I: IntoIterator<Item = Breakpoint>>(iter: I) -> Self {
        iter.into_iter()
            .fold(BreakpointSet::empty(), |set, bp| set | BreakpointSet::single(bp))
    }
}

impl BitOr for Breakpoint {
    type Output = BreakpointSet;

    fn bitor(self, rhs: Self) -> Self::Output {
        BreakpointSet::single(self) | BreakpointSet::single(rhs)
    }
}

impl BitOr<Breakpoint> for BreakpointSet {
    type Output = BreakpointSet;

    fn bitor(self, rhs: Breakpoint) -> Self::Output {
        self | BreakpointSet::single(rhs)
    }
}

/// Every breakpoint covered by `range`, e.g. `range(Breakpoint::SM..=Breakpoint::LG)`.
pub fn range<R: RangeBounds<Breakpoint>>(range: R) -> BreakpointSet {
    let start = match range.start_bound() {
        Bound::Included(bp) => bp.ordinal(),
        Bound::Excluded(bp) => bp.ordinal() + 1,
        Bound::Unbounded => 0,
    };
    // exclusive upper ordinal
    let end = match range.end_bound() {
        Bound::Included(bp) => bp.ordinal() + 1,
        Bound::Excluded(bp) => bp.ordinal(),
        Bound::Unbounded => Breakpoint::MAX,
    };
    if start >= end {
        return BreakpointSet::empty();
    }

    let mask = ((1u64 << (end - start)) - 1) << start;
    BreakpointSet::from_bits_retain(mask as u32)
}

/// A named breakpoint and the inclusive minimum width at which it becomes active.
#[derive(Clone, Debug, PartialEq)]
pub struct BreakpointEntry {
    key: Arc<str>,
    min_width: f64,
}

impl BreakpointEntry {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn min_width(&self) -> f64 {
        self.min_width
    }
}

/// Ordered, immutable set of breakpoints.
///
/// Widths must be finite, strictly increasing in declaration order, and the first
/// breakpoint must start at 0 so that every non-negative width has exactly one
/// active breakpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct BreakpointRegistry {
    entries: SmallVec<[BreakpointEntry; 6]>,
}

impl Default for BreakpointRegistry {
    fn default() -> Self {
        let entries = [
            ("base", 0.0),
            ("sm", 640.0),
            ("md", 768.0),
            ("lg", 1024.0),
            ("xl", 1280.0),
            ("2xl", 1536.0),
        ]
        .into_iter()
        .map(|(key, min_width)| BreakpointEntry {
            key: key.into(),
            min_width,
        })
        .collect();
        Self { entries }
    }
}

impl BreakpointRegistry {
    pub fn new<I, K>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<Arc<str>>,
    {
        let mut validated: SmallVec<[BreakpointEntry; 6]> = SmallVec::new();

        for (key, min_width) in entries {
            let key: Arc<str> = key.into();
            if validated.len() == Breakpoint::MAX {
                return Err(LayoutError::TooManyBreakpoints {
                    count: validated.len() + 1,
                    max: Breakpoint::MAX,
                });
            }
            if validated.iter().any(|entry| entry.key == key) {
                return Err(LayoutError::DuplicateKey(key.to_string()));
            }
            if !min_width.is_finite() || min_width < 0.0 {
                return Err(LayoutError::InvalidWidth {
                    key: key.to_string(),
                    min_width,
                });
            }
            match validated.last() {
                None if min_width != 0.0 => {
                    return Err(LayoutError::MissingBase {
                        key: key.to_string(),
                        min_width,
                    });
                }
                Some(previous) if previous.min_width >= min_width => {
                    return Err(LayoutError::NonMonotonic {
                        key: key.to_string(),
                        min_width,
                        previous: previous.key.to_string(),
                        previous_width: previous.min_width,
                    });
                }
                _ => {}
            }
            validated.push(BreakpointEntry { key, min_width });
        }

        if validated.is_empty() {
            return Err(LayoutError::EmptyRegistry);
        }
        Ok(Self { entries: validated })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; an empty registry cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn smallest(&self) -> Breakpoint {
        Breakpoint::BASE
    }

    pub fn largest(&self) -> Breakpoint {
        Breakpoint((self.entries.len() - 1) as u8)
    }

    /// The set of every breakpoint in this registry.
    pub fn all(&self) -> BreakpointSet {
        range(Breakpoint::BASE..=self.largest())
    }

    /// The greatest breakpoint whose minimum width is `<= width`.
    ///
    /// Widths below zero (or NaN) resolve to the smallest breakpoint.
    pub fn breakpoint_for(&self, width: f64) -> Breakpoint {
        let above = self
            .entries
            .partition_point(|entry| entry.min_width <= width);
        Breakpoint(above.saturating_sub(1) as u8)
    }

    pub fn compare(&self, a: Breakpoint, b: Breakpoint) -> Ordering {
        a.cmp(&b)
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|entry| &*entry.key == key)
    }

    pub fn get(&self, key: &str) -> Result<Breakpoint> {
        self.index_of(key)
            .map(|index| Breakpoint(index as u8))
            .ok_or_else(|| LayoutError::UnknownBreakpoint(key.to_string()))
    }

    pub fn contains(&self, breakpoint: Breakpoint) -> bool {
        breakpoint.ordinal() < self.entries.len()
    }

    /// Returns `breakpoint` unchanged if it belongs to this registry.
    pub fn check(&self, breakpoint: Breakpoint) -> Result<Breakpoint> {
        if self.contains(breakpoint) {
            Ok(breakpoint)
        } else {
            Err(LayoutError::BreakpointOutOfRange {
                ordinal: breakpoint.ordinal(),
                len: self.entries.len(),
            })
        }
    }

    pub fn entry(&self, breakpoint: Breakpoint) -> Option<&BreakpointEntry> {
        self.entries.get(breakpoint.ordinal())
    }

    pub fn key(&self, breakpoint: Breakpoint) -> Option<&str> {
        self.entry(breakpoint).map(BreakpointEntry::key)
    }

    pub fn min_width(&self, breakpoint: Breakpoint) -> Option<f64> {
        self.entry(breakpoint).map(BreakpointEntry::min_width)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Breakpoint, &BreakpointEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (Breakpoint(index as u8), entry))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for BreakpointRegistry {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.entries
                .iter()
                .map(|entry| (entry.key(), entry.min_width)),
        )
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for BreakpointRegistry {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries =
            <indexmap::IndexMap<String, f64> as serde::Deserialize>::deserialize(deserializer)?;
        BreakpointRegistry::new(entries).map_err(serde::de::Error::custom)
    }
}
