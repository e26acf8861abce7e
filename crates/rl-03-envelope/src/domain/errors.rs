//! Error types for envelope building, parsing and package decoding.

use rl_01_batch_records::BatchError;
use rl_02_transforms::TransformError;
use shared_types::{describe_flags, Flag};
use thiserror::Error;

use super::message::MessageKind;

/// The service reported an Error-weight outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("service reported an error: {}", describe_flags(.flags))]
pub struct ProtocolError {
    /// All flags of the failing report.
    pub flags: Vec<Flag>,
}

/// Envelope errors.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// The body is not well-formed XML.
    #[error("unparsable response body: {reason}")]
    UnparsableBody {
        /// Parser message.
        reason: String,
        /// Body as received, lossily decoded.
        body: String,
    },

    /// The service answered with an error report.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A built document was rejected by the structural validator.
    #[error("{kind} envelope failed structural validation: {reason}")]
    Structural {
        /// Envelope kind.
        kind: MessageKind,
        /// Validator message.
        reason: String,
    },

    /// Well-formed XML missing a required element or attribute.
    #[error("malformed envelope: {element}: {reason}")]
    Malformed {
        /// Element path or name.
        element: String,
        /// What is wrong.
        reason: String,
    },

    /// XML serialization failed.
    #[error("xml write failed: {0}")]
    Write(String),

    /// A request was assembled from invalid arguments.
    #[error("invalid {field}: {reason}")]
    InvalidArgument {
        /// Argument name.
        field: &'static str,
        /// What is wrong.
        reason: String,
    },

    /// A package plug-in this client does not understand.
    #[error("unsupported package plug-in: {0}")]
    UnsupportedPlugin(String),

    /// A package plug-in whose content could not be read.
    #[error("invalid package plug-in {plugin}: {reason}")]
    InvalidPlugin {
        /// Element name.
        plugin: String,
        /// Why it could not be read.
        reason: String,
    },

    /// Unknown or undecodable text encoding.
    #[error("cannot decode {encoding} content: {reason}")]
    Encoding {
        /// Encoding id.
        encoding: String,
        /// Decoder message.
        reason: String,
    },

    /// Package data is not valid base64.
    #[error("invalid base64 data: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Reversing the package transforms failed.
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// The package has no decoded content.
    #[error("package {response_id} has no content")]
    MissingContent {
        /// Package response id.
        response_id: String,
    },

    /// Decoded content is not a valid batch file.
    #[error(transparent)]
    Batch(#[from] BatchError),
}

impl EnvelopeError {
    pub(crate) fn malformed(element: impl Into<String>, reason: impl Into<String>) -> Self {
        EnvelopeError::Malformed {
            element: element.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn write<E: std::fmt::Display>(e: E) -> Self {
        EnvelopeError::Write(e.to_string())
    }
}
