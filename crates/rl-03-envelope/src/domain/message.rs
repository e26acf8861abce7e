//! # Request Model
//!
//! In-memory form of the three request envelopes before serialization.

use chrono::{DateTime, Utc};
use rl_02_transforms::TransformDescriptor;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::encoding::TextEncoding;

/// The three request kinds, as named by the structural validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    /// Deliver a batch file.
    SupplyData,
    /// Query for processing results.
    GetProcessingResult,
    /// Acknowledge consumed results.
    AcknowledgeProcessingResult,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::SupplyData => write!(f, "SupplyData"),
            MessageKind::GetProcessingResult => write!(f, "GetProcessingResult"),
            MessageKind::AcknowledgeProcessingResult => write!(f, "AcknowledgeProcessingResult"),
        }
    }
}

/// Which side of the exchange a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportDirection {
    /// Client to service.
    Request,
    /// Service to client.
    Response,
}

/// Manufacturer and product announced in every request header.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApplicationInfo {
    /// Software manufacturer.
    pub manufacturer: String,
    /// Product name.
    pub product: String,
}

/// Header fields shared by all request kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHeader {
    /// Sending organization.
    pub sender_id: String,
    /// Receiving organization.
    pub receiver_id: String,
    /// Unique request id.
    pub request_id: String,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
    /// Application announced to the service.
    pub application: ApplicationInfo,
    /// Procedure code.
    pub procedure: String,
    /// Data type URI.
    pub data_type: String,
    /// Scenario URI.
    pub scenario: String,
}

/// Metadata of a delivered or returned file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataContainer {
    /// Logical file name.
    pub name: String,
    /// Creation time, if announced.
    pub created: Option<DateTime<Utc>>,
    /// Text encoding of the file content.
    pub encoding: TextEncoding,
}

/// Kind-specific body of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// Transformed batch file.
    Payload {
        /// Transformed bytes, base64-encoded on the wire.
        data: Vec<u8>,
        /// Steps applied to the data.
        transforms: Vec<TransformDescriptor>,
        /// File metadata.
        container: DataContainer,
        /// SMTP contact of the sender.
        contact_email: String,
    },
    /// Result query.
    Query {
        /// Only responses with an id greater than this are returned.
        cursor: String,
        /// Procedure the results must belong to.
        procedure: String,
    },
    /// Receipt confirmation.
    Acknowledge {
        /// Response ids being confirmed.
        response_ids: Vec<String>,
    },
}

/// A request envelope before serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestEnvelope {
    /// Profile URI of the root element.
    pub profile_uri: String,
    /// Common header.
    pub header: RequestHeader,
    /// Kind-specific body.
    pub body: RequestBody,
}

impl RequestEnvelope {
    /// The request kind implied by the body.
    pub fn kind(&self) -> MessageKind {
        match self.body {
            RequestBody::Payload { .. } => MessageKind::SupplyData,
            RequestBody::Query { .. } => MessageKind::GetProcessingResult,
            RequestBody::Acknowledge { .. } => MessageKind::AcknowledgeProcessingResult,
        }
    }
}

/// A serialized, validated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedEnvelope {
    /// Request kind.
    pub kind: MessageKind,
    /// Request id from the header.
    pub request_id: String,
    /// ISO-8859-1 XML document.
    pub bytes: Vec<u8>,
}
