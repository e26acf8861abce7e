//! Crypto error types.

use thiserror::Error;

/// Backend operation errors.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption failed (wrong key, tampered or truncated input)
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// Invalid key length
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Sealed input shorter than its nonce prefix
    #[error("Sealed payload too short: need at least {minimum} bytes, got {actual}")]
    Truncated {
        /// Minimum length (nonce + tag)
        minimum: usize,
        /// Actual length
        actual: usize,
    },

    /// Compression stream error
    #[error("Compression failed: {0}")]
    CompressionFailed(#[source] std::io::Error),

    /// Decompression stream error (not gzip, corrupt or truncated)
    #[error("Decompression failed: {0}")]
    DecompressionFailed(#[source] std::io::Error),
}
