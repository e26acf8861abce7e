//! # Domain Errors
//!
//! Error types for the transform pipeline. A failed reversal affects only
//! the payload being reversed.

use super::descriptor::TransformKind;
use thiserror::Error;

/// Which side of a step a byte count refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeCheck {
    /// Size of the data the step produced.
    Output,
    /// Size of the data the step consumed.
    Input,
}

/// Transform pipeline error types.
#[derive(Debug, Error)]
pub enum TransformError {
    /// No handler registered for the algorithm id.
    #[error("Unsupported transform: no handler for algorithm {algorithm_id:?}")]
    UnsupportedTransform {
        /// The unknown id
        algorithm_id: String,
    },

    /// Descriptor numbering is not a contiguous `1..=n`.
    #[error("Transform order violation: {0}")]
    OrderViolation(String),

    /// Descriptor kind differs from the registered handler's kind.
    #[error("Transform {algorithm_id:?} is registered as {handler}, descriptor says {descriptor}")]
    KindMismatch {
        /// Algorithm id
        algorithm_id: String,
        /// Kind recorded in the descriptor
        descriptor: TransformKind,
        /// Kind of the registered handler
        handler: TransformKind,
    },

    /// Recorded byte count differs from the actual one.
    #[error("Size mismatch at step {order} ({algorithm_id}): {check:?} expected {expected} bytes, got {actual}")]
    SizeMismatch {
        /// Step order
        order: u32,
        /// Algorithm id
        algorithm_id: String,
        /// Which count
        check: SizeCheck,
        /// Recorded count
        expected: u64,
        /// Actual count
        actual: u64,
    },

    /// The algorithm itself failed.
    #[error("Transform {algorithm_id:?} failed: {reason}")]
    Failed {
        /// Algorithm id
        algorithm_id: String,
        /// Backend message
        reason: String,
    },

    /// A required parameter is missing or invalid.
    #[error("Transform {algorithm_id:?}: invalid parameter {param:?}: {reason}")]
    InvalidParameter {
        /// Algorithm id
        algorithm_id: String,
        /// Parameter name
        param: String,
        /// What was wrong
        reason: String,
    },
}
