//! # RL-03 Envelope
//!
//! Request envelopes, response parsing and package decoding.
//!
//! **Subsystem ID:** 03
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Every exchange with the registry service is an XML envelope in
//! ISO-8859-1. This crate builds the three request kinds (deliver, query,
//! acknowledge), parses responses into flags and packages, and recovers the
//! file carried by each package.
//!
//! ## Failure Classes
//!
//! | Condition | Error |
//! |-----------|-------|
//! | Body is not XML | `EnvelopeError::UnparsableBody` |
//! | `XMLError` document | `EnvelopeError::Protocol` |
//! | Header report of Error weight | `EnvelopeError::Protocol` |
//! | Validator rejects a document | `EnvelopeError::Structural` |
//!
//! Package-level errors never fail a whole response; each package is decoded
//! on its own by [`PackageDecoder`].
//!
//! ## Module Structure
//!
//! ```text
//! rl-03-envelope/
//! ├── domain/          # Request/response model, profiles, errors
//! ├── algorithms/      # XML writer, element tree, component codecs
//! ├── ports/           # StructuralValidator
//! ├── application/     # EnvelopeBuilder, ResponseParser, PackageDecoder
//! └── fixtures         # Response documents for tests
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod application;
pub mod domain;
#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;
pub mod ports;

// Re-exports
pub use algorithms::{parse_document, Element};
pub use application::{
    data_container_name, EnvelopeBuilder, EnvelopeParties, PackageDecoder, ResponseParser,
    MAX_FILE_NUMBER,
};
pub use domain::{
    ApplicationInfo, DataContainer, EnvelopeError, MessageKind, Package, PackageInfo,
    PackagePlugin, ProtocolError, ProtocolProfile, RequestBody, RequestEnvelope, RequestHeader,
    ResponseEnvelope, SerializedEnvelope, TextEncoding, TransportDirection,
};
pub use ports::{AcceptAllValidator, MockStructuralValidator, StructuralValidator};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
