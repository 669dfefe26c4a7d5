//! Breakpoint-conditional content.
//!
//! A [`VisibilityCondition`] answers one question, whether content is present at a
//! breakpoint. Hidden content is not rendered at all; callers that want something
//! in its place attach a fallback and use [`VisibilityCondition::select`].
//!
//! `Show below="md"` is `VisibilityCondition::below(Breakpoint::MD)`,
//! `Hide below="md"` is the same condition [`inverted`](VisibilityCondition::inverted),
//! and `Only on="md"` is `VisibilityCondition::only(Breakpoint::MD)`.

use crate::breakpoint::{Breakpoint, BreakpointRegistry, BreakpointSet};
use crate::error::{LayoutError, Result};
use crate::responsive::Responsive;

#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    /// At `b` and every larger breakpoint.
    Above(Breakpoint),
    /// Strictly below `b`.
    Below(Breakpoint),
    /// From `lower` to `upper`, both inclusive.
    Between(Breakpoint, Breakpoint),
    Only(BreakpointSet),
    /// A responsive flag; a resolution miss counts as hidden.
    When(Responsive<bool>),
}

impl Condition {
    pub fn evaluate(&self, active: Breakpoint) -> bool {
        match self {
            Condition::Above(boundary) => active >= *boundary,
            Condition::Below(boundary) => active < *boundary,
            Condition::Between(lower, upper) => *lower <= active && active <= *upper,
            Condition::Only(targets) => targets.contains_breakpoint(active),
            Condition::When(value) => value.resolve(active).copied().unwrap_or(false),
        }
    }

    pub fn validate(&self, registry: &BreakpointRegistry) -> Result<()> {
        match self {
            Condition::Above(boundary) | Condition::Below(boundary) => {
                registry.check(*boundary)?;
            }
            Condition::Between(lower, upper) => {
                registry.check(*lower)?;
                registry.check(*upper)?;
                if lower > upper {
                    return Err(LayoutError::InvertedRange {
                        lower: lower.ordinal(),
                        upper: upper.ordinal(),
                    });
                }
            }
            Condition::Only(targets) => {
                if let Some(outside) = targets.first_outside(registry) {
                    registry.check(outside)?;
                }
            }
            Condition::When(value) => value.validate(registry)?,
        }
        Ok(())
    }
}

/// A [`Condition`] plus an invert flag and optional fallback content.
#[derive(Clone, Debug, PartialEq)]
pub struct VisibilityCondition<F = ()> {
    condition: Condition,
    invert: bool,
    fallback: Option<F>,
}

impl VisibilityCondition {
    pub fn new(condition: Condition) -> Self {
        Self {
            condition,
            invert: false,
            fallback: None,
        }
    }

    pub fn above(boundary: Breakpoint) -> Self {
        Self::new(Condition::Above(boundary))
    }

    pub fn below(boundary: Breakpoint) -> Self {
        Self::new(Condition::Below(boundary))
    }

    pub fn between(lower: Breakpoint, upper: Breakpoint) -> Self {
        Self::new(Condition::Between(lower, upper))
    }

    pub fn only(targets: impl Into<BreakpointSet>) -> Self {
        Self::new(Condition::Only(targets.into()))
    }

    pub fn when(value: impl Into<Responsive<bool>>) -> Self {
        Self::new(Condition::When(value.into()))
    }

    /// Parses the named form used in markup, e.g. `between("sm", "lg")`.
    pub fn between_keys(registry: &BreakpointRegistry, lower: &str, upper: &str) -> Result<Self> {
        let condition = Self::between(registry.get(lower)?, registry.get(upper)?);
        condition.validate(registry)?;
        Ok(condition)
    }

    pub fn only_keys<'k>(
        registry: &BreakpointRegistry,
        keys: impl IntoIterator<Item = &'k str>,
    ) -> Result<Self> {
        let targets = keys
            .into_iter()
            .map(|key| registry.get(key))
            .collect::<Result<BreakpointSet>>()?;
        Ok(Self::only(targets))
    }
}

impl<F> VisibilityCondition<F> {
    pub fn inverted(mut self) -> Self {
        self.invert = !self.invert;
        self
    }

    pub fn invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Attaches the content shown while the condition is false.
    pub fn fallback<G>(self, fallback: G) -> VisibilityCondition<G> {
        VisibilityCondition {
            condition: self.condition,
            invert: self.invert,
            fallback: Some(fallback),
        }
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    pub fn is_inverted(&self) -> bool {
        self.invert
    }

    pub fn fallback_content(&self) -> Option<&F> {
        self.fallback.as_ref()
    }

    pub fn is_visible(&self, active: Breakpoint) -> bool {
        self.condition.evaluate(active) != self.invert
    }

    /// Picks what to render at `active`: `content`, the fallback, or nothing.
    pub fn select<'a, C>(&'a self, active: Breakpoint, content: &'a C) -> Rendered<'a, C, F> {
        if self.is_visible(active) {
            Rendered::Content(content)
        } else if let Some(fallback) = &self.fallback {
            Rendered::Fallback(fallback)
        } else {
            Rendered::Nothing
        }
    }

    pub fn validate(&self, registry: &BreakpointRegistry) -> Result<()> {
        self.condition.validate(registry)
    }
}

pub fn is_visible<F>(condition: &VisibilityCondition<F>, active: Breakpoint) -> bool {
    condition.is_visible(active)
}

#[derive(Debug, PartialEq, Eq)]
pub enum Rendered<'a, C, F> {
    Content(&'a C),
    Fallback(&'a F),
    Nothing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresenceChange {
    Mount,
    Unmount,
}

/// Remembers the last decision of a condition and reports when content has to be
/// mounted or unmounted.
///
/// Feed it breakpoints, not widths: it is meant to be driven by viewport
/// notifications and does no work between threshold crossings.
#[derive(Clone, Debug)]
pub struct Presence<F = ()> {
    condition: VisibilityCondition<F>,
    visible: bool,
}

impl<F> Presence<F> {
    pub fn new(condition: VisibilityCondition<F>, active: Breakpoint) -> Self {
        let visible = condition.is_visible(active);
        Self { condition, visible }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn condition(&self) -> &VisibilityCondition<F> {
        &self.condition
    }

    pub fn update(&mut self, active: Breakpoint) -> Option<PresenceChange> {
        let visible = self.condition.is_visible(active);
        if visible == self.visible {
            return None;
        }
        self.visible = visible;
        Some(if visible {
            PresenceChange::Mount
        } else {
            PresenceChange::Unmount
        })
    }
}
