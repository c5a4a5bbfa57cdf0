//! Error types for step execution and feature runs

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// An expectation step that did not hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionFailure {
    pub step: String,
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Step '{}' failed: expected {}, got {:?}",
            self.step, self.expected, self.actual
        )
    }
}

impl std::error::Error for AssertionFailure {}

#[derive(Error, Debug)]
pub enum StepError {
    #[error("Unrecognized step: '{phrase}'")]
    UnknownStep { phrase: String },

    #[error("Unknown field: '{name}'")]
    UnknownField { name: String },

    #[error("Unknown button: '{name}'")]
    UnknownButton { name: String },

    #[error("Unknown page: '{name}'")]
    UnknownPage { name: String },

    #[error("Cannot paste into the {field} field: the clipboard is empty")]
    EmptyClipboard { field: String },

    #[error(transparent)]
    Assertion(#[from] AssertionFailure),

    #[error("Fixture loading failed: {reason}")]
    Fixture { reason: String },

    #[error("Product store failed: {reason}")]
    Store { reason: String },

    #[error("Invalid step template '{pattern}': {source}")]
    InvalidTemplate {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Why a scenario stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    /// The step text uses a phrase, field, button or page the runner does
    /// not know.
    Vocabulary,
    /// An expectation did not hold.
    Assertion,
    /// Anything else: empty clipboard, store failures.
    Runtime,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailureKind::Vocabulary => "undefined step",
            FailureKind::Assertion => "assertion failed",
            FailureKind::Runtime => "step error",
        })
    }
}

impl StepError {
    /// Vocabulary errors mean the scenario text itself is wrong.
    pub fn is_vocabulary(&self) -> bool {
        matches!(
            self,
            StepError::UnknownStep { .. }
                | StepError::UnknownField { .. }
                | StepError::UnknownButton { .. }
                | StepError::UnknownPage { .. }
        )
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            StepError::Assertion(_) => FailureKind::Assertion,
            err if err.is_vocabulary() => FailureKind::Vocabulary,
            _ => FailureKind::Runtime,
        }
    }
}

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("Fixtures for scenario '{scenario}' could not be loaded: {reason}")]
    Fixture { scenario: String, reason: String },

    #[error("Step registry could not be built: {0}")]
    Registry(#[from] StepError),
}
