//! ISO-8859-1 helpers.
//!
//! Latin-1 maps bytes 0x00..=0xFF one-to-one onto the code points
//! U+0000..=U+00FF, so conversion needs no lookup table.

use crate::errors::TextError;

/// Encode `text` as ISO-8859-1, rejecting anything above U+00FF.
pub fn encode_latin1(text: &str) -> Result<Vec<u8>, TextError> {
    text.chars()
        .enumerate()
        .map(|(position, ch)| {
            u8::try_from(u32::from(ch)).map_err(|_| TextError::Unrepresentable { ch, position })
        })
        .collect()
}

/// Decode ISO-8859-1 bytes. Never fails.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Encode `text` as ISO-8859-1, writing characters above U+00FF as XML
/// numeric character references.
pub fn escape_to_latin1(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for ch in text.chars() {
        match u8::try_from(u32::from(ch)) {
            Ok(b) => out.push(b),
            Err(_) => out.extend_from_slice(format!("&#{};", u32::from(ch)).as_bytes()),
        }
    }
    out
}

/// True if every character of `text` is representable in ISO-8859-1.
pub fn is_latin1(text: &str) -> bool {
    text.chars().all(|c| u32::from(c) <= 0xFF)
}
