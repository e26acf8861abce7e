//! # Compression
//!
//! gzip via `flate2`.

use crate::CryptoError;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};

/// Algorithm id under which gzip is registered.
pub const GZIP_ID: &str = "gzip";

/// Compress `data` into a gzip member.
///
/// # Errors
///
/// Returns `CryptoError::CompressionFailed` on stream errors.
pub fn gzip_compress(data: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2 + 32), Compression::default());
    encoder
        .write_all(data)
        .map_err(CryptoError::CompressionFailed)?;
    encoder.finish().map_err(CryptoError::CompressionFailed)
}

/// Decompress a gzip member.
///
/// # Errors
///
/// Returns `CryptoError::DecompressionFailed` if `data` is not valid gzip.
pub fn gzip_decompress(data: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let mut decoder = GzDecoder::new(data);
    let mut out = Vec::with_capacity(data.len() * 2);
    decoder
        .read_to_end(&mut out)
        .map_err(CryptoError::DecompressionFailed)?;
    Ok(out)
}
