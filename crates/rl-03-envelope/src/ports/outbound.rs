//! # Outbound Ports
//!
//! Structural (schema) validation of built envelopes.

use std::sync::Mutex;

use crate::domain::{MessageKind, TransportDirection};

/// Checks a serialized envelope against the structural rules of its kind.
///
/// Implementations typically wrap an XSD validator.
pub trait StructuralValidator: Send + Sync {
    /// Validate `document`. `Err` carries the violation message.
    fn validate(
        &self,
        document: &[u8],
        kind: MessageKind,
        direction: TransportDirection,
        is_test: bool,
    ) -> Result<(), String>;
}

/// Validator that accepts every document.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllValidator;

impl StructuralValidator for AcceptAllValidator {
    fn validate(
        &self,
        _document: &[u8],
        _kind: MessageKind,
        _direction: TransportDirection,
        _is_test: bool,
    ) -> Result<(), String> {
        Ok(())
    }
}

/// Mock validator recording every call.
#[derive(Debug, Default)]
pub struct MockStructuralValidator {
    /// Reject every document with this message.
    pub reject_with: Option<String>,
    calls: Mutex<Vec<(MessageKind, TransportDirection, bool)>>,
}

impl MockStructuralValidator {
    /// Accepting mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejecting mock.
    pub fn rejecting(message: impl Into<String>) -> Self {
        Self {
            reject_with: Some(message.into()),
            ..Self::default()
        }
    }

    /// Recorded `(kind, direction, is_test)` triples.
    pub fn calls(&self) -> Vec<(MessageKind, TransportDirection, bool)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl StructuralValidator for MockStructuralValidator {
    fn validate(
        &self,
        _document: &[u8],
        kind: MessageKind,
        direction: TransportDirection,
        is_test: bool,
    ) -> Result<(), String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((kind, direction, is_test));
        }
        match &self.reject_with {
            Some(message) => Err(message.clone()),
            None => Ok(()),
        }
    }
}
