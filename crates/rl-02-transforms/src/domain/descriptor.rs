//! # Transform Descriptors
//!
//! A descriptor records one applied step with enough detail to undo it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Algorithm parameters, carried verbatim between apply and reverse.
pub type TransformParams = BTreeMap<String, String>;

/// Capability family of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransformKind {
    /// compress / decompress
    Compression,
    /// encrypt / decrypt
    Encryption,
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformKind::Compression => write!(f, "compression"),
            TransformKind::Encryption => write!(f, "encryption"),
        }
    }
}

/// A step requested by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformStep {
    /// Registered algorithm id.
    pub algorithm_id: String,
    /// Parameters passed to the handler.
    pub params: TransformParams,
}

impl TransformStep {
    /// Step without parameters.
    pub fn new(algorithm_id: impl Into<String>) -> Self {
        Self {
            algorithm_id: algorithm_id.into(),
            params: TransformParams::new(),
        }
    }

    /// Add a parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// One applied step.
///
/// `order` numbers the steps `1..=n` in application order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformDescriptor {
    /// 1-based position in the application order.
    pub order: u32,
    /// Capability family.
    pub kind: TransformKind,
    /// Registered algorithm id.
    pub algorithm_id: String,
    /// Parameters the step was applied with.
    pub params: TransformParams,
    /// Byte count before the step, if recorded.
    pub input_bytes: Option<u64>,
    /// Byte count after the step, if recorded.
    pub output_bytes: Option<u64>,
}

impl fmt::Display for TransformDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} {}", self.order, self.kind, self.algorithm_id)
    }
}
