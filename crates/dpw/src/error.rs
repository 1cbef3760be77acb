//! Error type shared by the engine, the input constructors and the presets.

use std::fmt;

use thiserror::Error;

/// One rejected input field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub field: &'static str,
    pub message: String,
}

impl Violation {
    pub(crate) fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Errors surfaced by the die-per-wafer engine.
#[derive(Debug, Error)]
pub enum DpwError {
    /// One or more parameters are out of range; every violation is listed.
    #[error("invalid parameters: {}", join_violations(.violations))]
    InvalidParameters { violations: Vec<Violation> },

    /// Text did not name a validation policy.
    #[error("unknown validation method {0:?} (expected center, corner, area or strict)")]
    UnknownPolicy(String),

    /// Text did not name a notch kind.
    #[error("unknown notch type {0:?} (expected none, v90 or flat)")]
    UnknownNotch(String),

    /// Preset lookup failed.
    #[error("unknown {kind} preset {name:?}; available: {available}")]
    UnknownPreset {
        kind: &'static str,
        name: String,
        available: String,
    },

    /// The candidate lattice exceeds the configured ceiling.
    #[error("candidate lattice has {count} positions, exceeding the limit of {limit}")]
    TooManyCandidates { count: usize, limit: usize },
}

impl DpwError {
    pub(crate) fn invalid(violations: Vec<Violation>) -> Self {
        Self::InvalidParameters { violations }
    }

    /// Violations carried by an `InvalidParameters` error (empty otherwise).
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::InvalidParameters { violations } => violations,
            _ => &[],
        }
    }
}

fn join_violations(v: &[Violation]) -> String {
    v.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, DpwError>;
