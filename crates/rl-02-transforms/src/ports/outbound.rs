//! # Outbound Ports
//!
//! Algorithm implementations are supplied from outside the pipeline.

use crate::domain::{TransformError, TransformKind, TransformParams};

/// One invertible algorithm - outbound port.
///
/// `reverse(apply(x, p), p) == x` must hold for every input the handler
/// accepts.
pub trait TransformHandler: Send + Sync {
    /// Capability family.
    fn kind(&self) -> TransformKind;

    /// Compress or encrypt.
    fn apply(&self, data: &[u8], params: &TransformParams) -> Result<Vec<u8>, TransformError>;

    /// Decompress or decrypt.
    fn reverse(&self, data: &[u8], params: &TransformParams) -> Result<Vec<u8>, TransformError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

const MOCK_MAGIC: &[u8] = b"MZ";

/// Mock handler.
///
/// As compression it frames the data with a two-byte magic and rejects
/// input without it; as encryption it XORs every byte with `key`. The two
/// do not commute, so reversing them out of order fails.
#[derive(Debug, Clone)]
pub struct MockTransform {
    /// Capability family.
    pub kind: TransformKind,
    /// XOR key (encryption only).
    pub key: u8,
    /// Should `reverse` fail?
    pub should_fail: bool,
}

impl MockTransform {
    /// Mock compression.
    pub fn compression() -> Self {
        Self {
            kind: TransformKind::Compression,
            key: 0,
            should_fail: false,
        }
    }

    /// Mock encryption with the given key.
    pub fn encryption(key: u8) -> Self {
        Self {
            kind: TransformKind::Encryption,
            key,
            should_fail: false,
        }
    }

    fn fail(&self, reason: &str) -> TransformError {
        TransformError::Failed {
            algorithm_id: format!("mock-{}", self.kind),
            reason: reason.to_string(),
        }
    }
}

impl TransformHandler for MockTransform {
    fn kind(&self) -> TransformKind {
        self.kind
    }

    fn apply(&self, data: &[u8], _params: &TransformParams) -> Result<Vec<u8>, TransformError> {
        Ok(match self.kind {
            TransformKind::Compression => [MOCK_MAGIC, data].concat(),
            TransformKind::Encryption => data.iter().map(|b| b ^ self.key).collect(),
        })
    }

    fn reverse(&self, data: &[u8], _params: &TransformParams) -> Result<Vec<u8>, TransformError> {
        if self.should_fail {
            return Err(self.fail("mock failure"));
        }
        match self.kind {
            TransformKind::Compression => data
                .strip_prefix(MOCK_MAGIC)
                .map(<[u8]>::to_vec)
                .ok_or_else(|| self.fail("missing magic")),
            TransformKind::Encryption => Ok(data.iter().map(|b| b ^ self.key).collect()),
        }
    }
}
