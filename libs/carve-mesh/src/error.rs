//! # Geometry Errors
//!
//! Error types shared by every stage of the carve pipeline.

use thiserror::Error;

/// Errors that can occur in the boolean/segmentation pipeline.
///
/// Empty results (zero-triangle boolean output, zero islands from an empty
/// mesh) are valid successes and never map to one of these variants.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// The boolean kernel could not produce a result.
    ///
    /// Non-manifold or degenerate input, or an internal numeric failure.
    /// The in-progress edit is abandoned; callers must not retry
    /// automatically.
    #[error("evaluation failed: {message}")]
    EvaluationFailed { message: String },

    /// A worker lane crashed or produced a malformed response.
    ///
    /// Recoverable: the lane can be recreated and the same request retried.
    #[error("worker unavailable: {message}")]
    WorkerUnavailable { message: String },

    /// The caller supplied input violating the buffer invariants.
    ///
    /// A programming error in the orchestrator, not a runtime condition to
    /// recover from. Fatal to the call, not to the process.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl GeometryError {
    /// Creates an evaluation-failed error.
    pub fn evaluation_failed(message: impl Into<String>) -> Self {
        Self::EvaluationFailed {
            message: message.into(),
        }
    }

    /// Creates a worker-unavailable error.
    pub fn worker_unavailable(message: impl Into<String>) -> Self {
        Self::WorkerUnavailable {
            message: message.into(),
        }
    }

    /// Creates an invalid-input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}
