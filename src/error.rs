use thiserror::Error;

/// Configuration errors raised while building registries, sidebars and conditions.
///
/// These always indicate a mistake in the calling layer and are reported at
/// construction or validation time, never while resolving values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("breakpoint registry must contain at least one breakpoint")]
    EmptyRegistry,
    #[error("breakpoint registry supports at most {max} breakpoints, got {count}")]
    TooManyBreakpoints { count: usize, max: usize },
    #[error("duplicate breakpoint key `{0}`")]
    DuplicateKey(String),
    #[error("breakpoint `{key}` has an invalid minimum width ({min_width})")]
    InvalidWidth { key: String, min_width: f64 },
    #[error("smallest breakpoint `{key}` must start at 0px, found {min_width}px")]
    MissingBase { key: String, min_width: f64 },
    #[error(
        "breakpoint `{key}` ({min_width}px) must be wider than the preceding `{previous}` ({previous_width}px)"
    )]
    NonMonotonic {
        key: String,
        min_width: f64,
        previous: String,
        previous_width: f64,
    },
    #[error("unknown breakpoint `{0}`")]
    UnknownBreakpoint(String),
    #[error("breakpoint #{ordinal} is outside a registry of {len} breakpoints")]
    BreakpointOutOfRange { ordinal: usize, len: usize },
    #[error("breakpoint range is empty: lower bound #{lower} is above upper bound #{upper}")]
    InvertedRange { lower: usize, upper: usize },
    #[error("viewport breakpoints are already configured for this thread")]
    AlreadyConfigured,
}

pub type Result<T, E = LayoutError> = std::result::Result<T, E>;
