//! # Shared Crypto - Payload Transform Backends
//!
//! Default algorithm implementations behind the payload transform pipeline.
//! The pipeline itself only knows algorithm ids; these are the bytes-in,
//! bytes-out primitives an embedding application registers under those ids.
//!
//! ## Components
//!
//! | Module | Algorithm | Algorithm id |
//! |--------|-----------|--------------|
//! | `compression` | gzip (DEFLATE) | `gzip` |
//! | `symmetric` | XChaCha20-Poly1305 | `xchacha20-poly1305` |
//! | `symmetric` | AES-256-GCM | `aes-256-gcm` |
//!
//! ## Security Properties
//!
//! - **XChaCha20**: 192-bit nonce, random per message, constant-time
//! - **Sealed format**: `nonce || ciphertext || tag`, so a sealed payload is
//!   self-contained and reversible with the key alone

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod compression;
pub mod errors;
pub mod symmetric;

// Re-exports
pub use compression::{gzip_compress, gzip_decompress, GZIP_ID};
pub use errors::CryptoError;
pub use symmetric::{open, seal, Cipher, SecretKey};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
