//! # Symmetric Encryption
//!
//! Provides XChaCha20-Poly1305 (default) and AES-256-GCM payload sealing.
//!
//! A sealed payload is `nonce || ciphertext || tag`. The nonce is random per
//! call and travels with the data, so `open` needs only the key.
//!
//! ## Security Properties
//!
//! - **XChaCha20-Poly1305**: 192-bit nonce, constant-time ARX design
//! - **AES-GCM**: 96-bit nonce; use only with AES-NI hardware acceleration

use crate::CryptoError;
use aes_gcm::Aes256Gcm;
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use zeroize::Zeroize;

const KEY_LEN: usize = 32;
const TAG_LEN: usize = 16;

/// Secret key (256-bit).
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretKey([u8; KEY_LEN]);

impl SecretKey {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Create from a slice, checking its length.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidKeyLength` unless `bytes` is 32 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; KEY_LEN] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength {
                expected: KEY_LEN,
                actual: bytes.len(),
            })?;
        Ok(Self(arr))
    }

    /// Generate random key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
        Self(bytes)
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

/// Cipher selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Cipher {
    /// XChaCha20-Poly1305 (default, side-channel immune)
    #[default]
    XChaCha20Poly1305,
    /// AES-256-GCM (use with AES-NI only)
    Aes256Gcm,
}

impl Cipher {
    /// Algorithm id under which this cipher is registered.
    pub fn id(&self) -> &'static str {
        match self {
            Cipher::XChaCha20Poly1305 => "xchacha20-poly1305",
            Cipher::Aes256Gcm => "aes-256-gcm",
        }
    }

    /// Resolve an algorithm id.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "xchacha20-poly1305" => Some(Cipher::XChaCha20Poly1305),
            "aes-256-gcm" => Some(Cipher::Aes256Gcm),
            _ => None,
        }
    }

    /// Nonce length in bytes.
    pub fn nonce_len(&self) -> usize {
        match self {
            Cipher::XChaCha20Poly1305 => 24,
            Cipher::Aes256Gcm => 12,
        }
    }
}

/// Encrypt `plaintext`, returning `nonce || ciphertext || tag`.
///
/// # Errors
///
/// Returns `CryptoError::EncryptionFailed` if encryption fails.
pub fn seal(cipher: Cipher, key: &SecretKey, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let mut nonce = vec![0u8; cipher.nonce_len()];
    rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut nonce);

    let ciphertext = match cipher {
        Cipher::XChaCha20Poly1305 => XChaCha20Poly1305::new(key.as_bytes().into())
            .encrypt(XNonce::from_slice(&nonce), plaintext),
        Cipher::Aes256Gcm => Aes256Gcm::new(key.as_bytes().into())
            .encrypt(aes_gcm::Nonce::from_slice(&nonce), plaintext),
    }
    .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    nonce.extend_from_slice(&ciphertext);
    Ok(nonce)
}

/// Decrypt a payload produced by [`seal`].
///
/// # Errors
///
/// Returns `CryptoError::Truncated` if the input cannot hold a nonce and tag,
/// and `CryptoError::DecryptionFailed` on a wrong key or tampered data.
pub fn open(cipher: Cipher, key: &SecretKey, sealed: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let minimum = cipher.nonce_len() + TAG_LEN;
    if sealed.len() < minimum {
        return Err(CryptoError::Truncated {
            minimum,
            actual: sealed.len(),
        });
    }
    let (nonce, ciphertext) = sealed.split_at(cipher.nonce_len());

    match cipher {
        Cipher::XChaCha20Poly1305 => XChaCha20Poly1305::new(key.as_bytes().into())
            .decrypt(XNonce::from_slice(nonce), ciphertext),
        Cipher::Aes256Gcm => Aes256Gcm::new(key.as_bytes().into())
            .decrypt(aes_gcm::Nonce::from_slice(nonce), ciphertext),
    }
    .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_open_roundtrip() {
        let key = SecretKey::generate();
        let plaintext = b"Hello, Registry-Link!";

        for cipher in [Cipher::XChaCha20Poly1305, Cipher::Aes256Gcm] {
            let sealed = seal(cipher, &key, plaintext).unwrap();
            assert_eq!(sealed.len(), cipher.nonce_len() + plaintext.len() + TAG_LEN);
            assert_eq!(open(cipher, &key, &sealed).unwrap(), plaintext);
        }
    }

    #[test]
    fn test_wrong_key_fails() {
        let key1 = SecretKey::generate();
        let key2 = SecretKey::generate();

        let sealed = seal(Cipher::default(), &key1, b"Secret message").unwrap();
        let result = open(Cipher::default(), &key2, &sealed);

        assert!(matches!(result, Err(CryptoError::DecryptionFailed(_))));
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let key = SecretKey::generate();

        let mut sealed = seal(Cipher::Aes256Gcm, &key, b"Secret message").unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0xFF; // Tamper

        assert!(open(Cipher::Aes256Gcm, &key, &sealed).is_err());
    }

    #[test]
    fn test_truncated_input() {
        let key = SecretKey::generate();
        let result = open(Cipher::XChaCha20Poly1305, &key, &[0u8; 10]);
        assert!(matches!(
            result,
            Err(CryptoError::Truncated { minimum: 40, actual: 10 })
        ));
    }

    #[test]
    fn test_nonce_is_fresh_per_seal() {
        let key = SecretKey::generate();
        let a = seal(Cipher::default(), &key, b"same").unwrap();
        let b = seal(Cipher::default(), &key, b"same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_key_from_slice() {
        assert!(SecretKey::from_slice(&[7u8; 32]).is_ok());
        assert!(matches!(
            SecretKey::from_slice(&[7u8; 16]),
            Err(CryptoError::InvalidKeyLength { expected: 32, actual: 16 })
        ));
    }

    #[test]
    fn test_cipher_ids() {
        for cipher in [Cipher::XChaCha20Poly1305, Cipher::Aes256Gcm] {
            assert_eq!(Cipher::from_id(cipher.id()), Some(cipher));
        }
        assert_eq!(Cipher::from_id("rot13"), None);
    }
}
