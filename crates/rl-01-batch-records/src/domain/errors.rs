//! # Domain Errors
//!
//! Error types for the batch record codec, plus the validation error model
//! shared by embedded error blocks and the business-rule validator.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Code of the informational entry the service appends to its trailer.
pub const INFO_ONLY_CODE: &str = "NCSZH10";

/// One violation reported against a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Fixed error token, e.g. `DSVV010`.
    pub code: String,
    /// Short message.
    pub message: String,
    /// Long-form description (only present in `DBFL` blocks).
    pub description: Option<String>,
}

impl ValidationError {
    /// Create an entry without long-form description.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            description: None,
        }
    }

    /// Parse `"CODE message"`, tolerating a leading `DBFE` block tag.
    ///
    /// Validators return their findings in this shape; a string without any
    /// whitespace is taken as a bare code.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix("DBFE").unwrap_or(raw).trim();
        match raw.split_once(char::is_whitespace) {
            Some((code, message)) => Self::new(code, message.trim()),
            None => Self::new(raw, ""),
        }
    }

    /// False for purely informational entries.
    pub fn is_error(&self) -> bool {
        self.code != INFO_ONLY_CODE
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            write!(f, "\n{description}")?;
        }
        Ok(())
    }
}

/// Every violation found in one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    /// Build from raw validator messages.
    pub fn from_messages<S: AsRef<str>>(messages: &[S]) -> Self {
        Self(messages.iter().map(|m| ValidationError::parse(m.as_ref())).collect())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no violation was found.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the entries.
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s)", self.0.len())?;
        for error in &self.0 {
            write!(f, "\n  {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Batch codec error types.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Record stream does not have the expected shape or content.
    #[error("Malformed batch file at line {line}: {reason}")]
    Malformed {
        /// 1-based line number (after blank lines are dropped)
        line: usize,
        /// What was wrong
        reason: String,
    },

    /// A value does not fit its field.
    #[error("Invalid {record}.{field}: {reason}")]
    InvalidField {
        /// Record tag
        record: &'static str,
        /// Field name
        field: &'static str,
        /// What was wrong
        reason: String,
    },

    /// The business-rule validator rejected the encoded records.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
}

impl BatchError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        BatchError::Malformed {
            line,
            reason: reason.into(),
        }
    }
}
