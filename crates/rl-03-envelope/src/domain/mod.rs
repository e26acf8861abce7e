//! # Domain Module
//!
//! Envelope model, response model, profiles and errors.

pub mod encoding;
pub mod errors;
pub mod message;
pub mod profile;
pub mod response;
pub mod vocabulary;

pub use encoding::TextEncoding;
pub use errors::{EnvelopeError, ProtocolError};
pub use message::{
    ApplicationInfo, DataContainer, MessageKind, RequestBody, RequestEnvelope, RequestHeader,
    SerializedEnvelope, TransportDirection,
};
pub use profile::ProtocolProfile;
pub use response::{Package, PackageInfo, PackagePlugin, ResponseEnvelope};
