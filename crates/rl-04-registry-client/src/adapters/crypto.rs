//! Transform handlers backed by `shared-crypto`.

use rl_02_transforms::{
    TransformError, TransformHandler, TransformKind, TransformParams, TransformRegistry,
};
use shared_crypto::{gzip_compress, gzip_decompress, open, seal, Cipher, CryptoError, SecretKey, GZIP_ID};
use std::sync::Arc;

fn failed(algorithm_id: &str, e: CryptoError) -> TransformError {
    TransformError::Failed {
        algorithm_id: algorithm_id.to_string(),
        reason: e.to_string(),
    }
}

/// gzip compression.
#[derive(Debug, Clone, Copy, Default)]
pub struct GzipHandler;

impl TransformHandler for GzipHandler {
    fn kind(&self) -> TransformKind {
        TransformKind::Compression
    }

    fn apply(&self, data: &[u8], _params: &TransformParams) -> Result<Vec<u8>, TransformError> {
        gzip_compress(data).map_err(|e| failed(GZIP_ID, e))
    }

    fn reverse(&self, data: &[u8], _params: &TransformParams) -> Result<Vec<u8>, TransformError> {
        gzip_decompress(data).map_err(|e| failed(GZIP_ID, e))
    }
}

/// AEAD encryption under a fixed key.
#[derive(Debug, Clone)]
pub struct AeadHandler {
    cipher: Cipher,
    key: SecretKey,
}

impl AeadHandler {
    /// Handler sealing with `cipher` under `key`.
    pub fn new(cipher: Cipher, key: SecretKey) -> Self {
        Self { cipher, key }
    }
}

impl TransformHandler for AeadHandler {
    fn kind(&self) -> TransformKind {
        TransformKind::Encryption
    }

    fn apply(&self, data: &[u8], _params: &TransformParams) -> Result<Vec<u8>, TransformError> {
        seal(self.cipher, &self.key, data).map_err(|e| failed(self.cipher.id(), e))
    }

    fn reverse(&self, data: &[u8], _params: &TransformParams) -> Result<Vec<u8>, TransformError> {
        open(self.cipher, &self.key, data).map_err(|e| failed(self.cipher.id(), e))
    }
}

/// Registry with gzip and, given a key, both AEAD ciphers.
pub fn default_registry(key: Option<SecretKey>) -> TransformRegistry {
    let registry = TransformRegistry::new().with(GZIP_ID, Arc::new(GzipHandler));
    match key {
        Some(key) => [Cipher::XChaCha20Poly1305, Cipher::Aes256Gcm]
            .into_iter()
            .fold(registry, |registry, cipher| {
                registry.with(cipher.id(), Arc::new(AeadHandler::new(cipher, key.clone())))
            }),
        None => registry,
    }
}
