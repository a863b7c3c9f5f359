//! Error types for lamina

use crate::check::CheckFailure;
use crate::control::OpFamily;
use thiserror::Error;

/// Result type alias using lamina's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building control trees or dispatching
/// operations
///
/// The taxonomy is closed and fail-fast: every error is propagated unchanged
/// to the original caller. The dispatch engine never retries and never
/// substitutes a fallback variant. Output operands written by chunks that
/// completed before a failure are NOT rolled back.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration while constructing a blocksize policy or
    /// control tree (e.g., a zero blocksize, or a child tree whose storage
    /// tag does not match what the parent variant invokes)
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration {
        /// What was wrong with the requested configuration
        reason: String,
    },

    /// Operand compatibility check failed before dispatch
    ///
    /// Carries the operation family that ran the check and the first
    /// predicate that failed (checks short-circuit).
    #[error("Validation failed in '{op}': {check}")]
    Validation {
        /// Operation family whose check routine rejected the operands
        op: OpFamily,
        /// The predicate that failed
        check: CheckFailure,
    },

    /// Lifecycle misuse: finalize without a prior init, or a second init
    /// of an already-registered control tree
    #[error("Lifecycle precondition violated: {reason}")]
    PreconditionViolation {
        /// Description of the misuse
        reason: String,
    },

    /// Operand storage representation does not match the control node's
    /// declared representation
    #[error("Invalid state in '{op}': {reason}")]
    InvalidState {
        /// Operation family being dispatched
        op: OpFamily,
        /// Description of the mismatch
        reason: String,
    },

    /// Shape mismatch between operands, or between a view request and the
    /// backing buffer
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },
}

impl Error {
    /// Create an invalid configuration error
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    /// Create a validation error for an operation family
    pub fn validation(op: OpFamily, check: CheckFailure) -> Self {
        Self::Validation { op, check }
    }

    /// Create a lifecycle precondition error
    pub fn precondition(reason: impl Into<String>) -> Self {
        Self::PreconditionViolation {
            reason: reason.into(),
        }
    }

    /// Create an invalid state error for an operation family
    pub fn invalid_state(op: OpFamily, reason: impl Into<String>) -> Self {
        Self::InvalidState {
            op,
            reason: reason.into(),
        }
    }

    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: &[usize], got: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }
}
