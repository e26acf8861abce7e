//! # Response Parser
//!
//! ## Processing Flow
//!
//! 1. Parse the body; anything not well-formed is `UnparsableBody`
//! 2. Structural validation against the answered request kind, skipped for
//!    `XMLError` documents
//! 3. An `XMLError` root becomes a `ProtocolError` with its flags
//! 4. Read header and packages; an Error-weight header report becomes a
//!    `ProtocolError`

use std::sync::Arc;
use tracing::{debug, warn};

use crate::algorithms::response::XML_ERROR_ROOT;
use crate::algorithms::{parse_document, read_document, ResponseDocument};
use crate::domain::{
    EnvelopeError, MessageKind, ProtocolError, ResponseEnvelope, TransportDirection,
};
use crate::ports::{AcceptAllValidator, StructuralValidator};
use shared_types::{describe_flags, FlagWeight};

/// Parses response bodies.
#[derive(Clone)]
pub struct ResponseParser {
    validator: Arc<dyn StructuralValidator>,
    is_test: bool,
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ResponseParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseParser")
            .field("is_test", &self.is_test)
            .finish_non_exhaustive()
    }
}

impl ResponseParser {
    /// Parser without structural validation.
    pub fn new() -> Self {
        Self {
            validator: Arc::new(AcceptAllValidator),
            is_test: false,
        }
    }

    /// Parser validating responses with `validator`.
    pub fn with_validator(validator: Arc<dyn StructuralValidator>, is_test: bool) -> Self {
        Self { validator, is_test }
    }

    /// Parse the response to a request of `kind`.
    ///
    /// # Errors
    ///
    /// - `UnparsableBody` if the body is not XML
    /// - `Protocol` for an error document or an Error-weight header report
    /// - `Structural` if the validator rejects the body
    /// - `Malformed` if required elements are missing
    pub fn parse(&self, body: &[u8], kind: MessageKind) -> Result<ResponseEnvelope, EnvelopeError> {
        let root = parse_document(body)?;

        if root.name != XML_ERROR_ROOT {
            self.validator
                .validate(body, kind, TransportDirection::Response, self.is_test)
                .map_err(|reason| EnvelopeError::Structural { kind, reason })?;
        }

        let response = match read_document(&root)? {
            ResponseDocument::Response(response) => response,
            ResponseDocument::XmlError(flags) => {
                warn!("[rl-03] {} answered with error document: {}", kind, describe_flags(&flags));
                return Err(ProtocolError { flags }.into());
            }
        };

        if response.highest_weight == Some(FlagWeight::Error) {
            warn!(
                "[rl-03] {} response {} reported errors: {}",
                kind,
                response.response_id,
                describe_flags(&response.flags)
            );
            return Err(ProtocolError {
                flags: response.flags,
            }
            .into());
        }

        debug!(
            "[rl-03] Parsed {} response {} ({} flags, {} packages)",
            kind,
            response.response_id,
            response.flags.len(),
            response.packages.len()
        );
        Ok(response)
    }
}
