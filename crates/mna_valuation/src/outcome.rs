//! Per-item success or failure, kept side by side in a report.

use mna_core::types::{EngineError, EngineResult};
use serde::Serialize;

/// Result of one independent computation inside a larger run.
///
/// Serialises as `{"status": "completed", "result": ...}` or
/// `{"status": "failed", "error": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<T> {
    /// The computation produced a value
    Completed {
        /// The value
        result: T,
    },
    /// The computation failed with a typed error
    Failed {
        /// The error
        error: EngineError,
    },
}

impl<T> Outcome<T> {
    /// The value, if completed.
    pub fn result(&self) -> Option<&T> {
        match self {
            Outcome::Completed { result } => Some(result),
            Outcome::Failed { .. } => None,
        }
    }

    /// The error, if failed.
    pub fn error(&self) -> Option<&EngineError> {
        match self {
            Outcome::Completed { .. } => None,
            Outcome::Failed { error } => Some(error),
        }
    }

    /// Check if completed.
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed { .. })
    }

    /// Check if failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }

    /// Back into a `Result`.
    pub fn into_result(self) -> EngineResult<T> {
        match self {
            Outcome::Completed { result } => Ok(result),
            Outcome::Failed { error } => Err(error),
        }
    }
}

impl<T> From<EngineResult<T>> for Outcome<T> {
    fn from(result: EngineResult<T>) -> Self {
        match result {
            Ok(result) => Outcome::Completed { result },
            Err(error) => Outcome::Failed { error },
        }
    }
}
