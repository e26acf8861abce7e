//! # Response Model
//!
//! A parsed response envelope and the per-package decode result.

use chrono::{DateTime, Utc};
use rl_01_batch_records::{BatchRecordCodec, InboundBatch};
use rl_02_transforms::TransformDescriptor;
use shared_types::{any_error, Flag, FlagWeight};

use super::encoding::TextEncoding;
use super::errors::EnvelopeError;
use super::message::DataContainer;

/// A plug-in attached to a response package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackagePlugin {
    /// File metadata.
    DataSource(DataContainer),
    /// Steps applied to the package data.
    DataTransforms(Vec<TransformDescriptor>),
    /// Any other plug-in, by element name.
    Other(String),
    /// A known plug-in whose content could not be read.
    Invalid {
        /// Element name.
        name: String,
        /// Why it could not be read.
        reason: String,
    },
}

/// One result package of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// Response id of the package.
    pub response_id: String,
    /// Package timestamp.
    pub timestamp: Option<DateTime<Utc>>,
    /// Package-level flags.
    pub flags: Vec<Flag>,
    /// Plug-ins in document order.
    pub plugins: Vec<PackagePlugin>,
    /// Base64 data as transmitted, still transformed.
    pub data: Option<String>,
}

impl Package {
    /// True if any package flag is Error weight.
    pub fn is_error(&self) -> bool {
        any_error(&self.flags)
    }
}

/// A parsed response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseEnvelope {
    /// Response id from the header.
    pub response_id: String,
    /// Response timestamp.
    pub timestamp: Option<DateTime<Utc>>,
    /// Aggregate weight of the header report.
    pub highest_weight: Option<FlagWeight>,
    /// Header flags.
    pub flags: Vec<Flag>,
    /// Result packages, possibly empty.
    pub packages: Vec<Package>,
}

impl ResponseEnvelope {
    /// True if every header flag has `code`. False without flags.
    pub fn all_flags_are(&self, code: &str) -> bool {
        !self.flags.is_empty() && self.flags.iter().all(|f| f.code == code)
    }

    /// Header flag codes in document order.
    pub fn flag_codes(&self) -> Vec<&str> {
        self.flags.iter().map(|f| f.code.as_str()).collect()
    }
}

/// The decoded form of one package.
///
/// `content` and `text` are present iff the package carries no Error flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    /// Response id of the package.
    pub response_id: String,
    /// Package timestamp.
    pub timestamp: Option<DateTime<Utc>>,
    /// Package flags.
    pub flags: Vec<Flag>,
    /// True if any flag is Error weight.
    pub is_error: bool,
    /// File name from the data source, if announced.
    pub file_name: Option<String>,
    /// File creation time from the data source.
    pub file_created: Option<DateTime<Utc>>,
    /// Encoding of `content`.
    pub encoding: TextEncoding,
    /// Plain bytes after reversing all transforms.
    pub content: Option<Vec<u8>>,
    /// `content` decoded per `encoding`.
    pub text: Option<String>,
}

impl PackageInfo {
    /// Parse the content as an inbound batch file.
    ///
    /// # Errors
    ///
    /// `MissingContent` for error packages, otherwise the codec's error.
    pub fn decode_batch(&self, codec: &BatchRecordCodec) -> Result<InboundBatch, EnvelopeError> {
        let text = self
            .text
            .as_deref()
            .ok_or_else(|| EnvelopeError::MissingContent {
                response_id: self.response_id.clone(),
            })?;
        Ok(codec.decode_inbound(text)?)
    }
}
