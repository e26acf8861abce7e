//! Text encodings of transported files.

use serde::{Deserialize, Serialize};
use shared_types::decode_latin1;
use std::fmt;

use super::errors::EnvelopeError;

/// Encoding of a file as announced by its data container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TextEncoding {
    /// ISO-8859-1, id `I1`.
    #[default]
    Latin1,
    /// UTF-8.
    Utf8,
}

impl TextEncoding {
    /// Wire id.
    pub fn id(&self) -> &'static str {
        match self {
            TextEncoding::Latin1 => "I1",
            TextEncoding::Utf8 => "UTF-8",
        }
    }

    /// Resolve a wire id. Accepts common spellings of both encodings.
    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim().to_ascii_uppercase().as_str() {
            "I1" | "ISO-8859-1" | "LATIN1" => Some(TextEncoding::Latin1),
            "UTF-8" | "UTF8" => Some(TextEncoding::Utf8),
            _ => None,
        }
    }

    /// Decode `bytes` as text.
    pub fn decode(&self, bytes: &[u8]) -> Result<String, EnvelopeError> {
        match self {
            TextEncoding::Latin1 => Ok(decode_latin1(bytes)),
            TextEncoding::Utf8 => String::from_utf8(bytes.to_vec()).map_err(|e| {
                EnvelopeError::Encoding {
                    encoding: self.id().to_string(),
                    reason: e.to_string(),
                }
            }),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
