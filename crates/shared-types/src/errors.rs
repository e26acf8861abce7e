//! Error types shared across subsystems.

use thiserror::Error;

/// Failure converting text to the single-byte wire charset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextError {
    /// A character outside ISO-8859-1.
    #[error("character {ch:?} at position {position} is not representable in ISO-8859-1")]
    Unrepresentable { ch: char, position: usize },
}
