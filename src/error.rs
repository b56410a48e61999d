//! Error taxonomy for a matching run.
//!
//! Every failure is fatal for the run: validation and category errors are raised
//! before any matching work, engine invariant errors abort instead of returning a
//! partial assignment.

use thiserror::Error;

use crate::types::ParticipantId;

/// Coarse classification of a [`MatchError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum ErrorKind {
    /// Malformed input shape or configuration.
    Validation,
    /// An identity or preference string outside the recognized categories.
    UnknownCategory,
    /// Logic defect detected inside the engine.
    EngineInvariant,
}

/// Errors returned by the matching pipeline.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatchError {
    /// The three input arrays disagree on the population size.
    #[error("length mismatch: {field} has {actual} entries, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A score row does not have N columns.
    #[error("score matrix is not square: row {row} has {actual} columns, expected {expected}")]
    NotSquare {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// A score is negative, NaN or infinite.
    #[error("invalid score {value} at row {row}, column {col}")]
    InvalidScore { row: usize, col: usize, value: f64 },

    /// A caller-supplied partition does not split the population correctly.
    #[error("invalid partition: {reason}")]
    InvalidPartition { reason: String },

    /// Preference lists do not fit the partition they are run against.
    #[error("invalid preferences: {reason}")]
    InvalidPreferences { reason: String },

    /// The incompatibility penalty must be finite and non-negative.
    #[error("invalid incompatibility penalty {0}")]
    InvalidPenalty(f64),

    #[error("unknown category {value:?} at index {index}")]
    UnknownCategory { index: usize, value: String },

    /// A free proposer ran out of receivers to propose to.
    #[error("engine invariant violated: proposer {proposer} exhausted its preference list")]
    ProposerExhausted { proposer: ParticipantId },

    /// The final assignment does not cover every proposer.
    #[error("engine invariant violated: assignment has {actual} pairs, expected {expected}")]
    IncompleteAssignment { expected: usize, actual: usize },
}

impl MatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MatchError::LengthMismatch { .. }
            | MatchError::NotSquare { .. }
            | MatchError::InvalidScore { .. }
            | MatchError::InvalidPartition { .. }
            | MatchError::InvalidPreferences { .. }
            | MatchError::InvalidPenalty(_) => ErrorKind::Validation,
            MatchError::UnknownCategory { .. } => ErrorKind::UnknownCategory,
            MatchError::ProposerExhausted { .. } | MatchError::IncompleteAssignment { .. } => {
                ErrorKind::EngineInvariant
            }
        }
    }

    pub(crate) fn invalid_partition(reason: impl Into<String>) -> Self {
        MatchError::InvalidPartition {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_preferences(reason: impl Into<String>) -> Self {
        MatchError::InvalidPreferences {
            reason: reason.into(),
        }
    }
}
