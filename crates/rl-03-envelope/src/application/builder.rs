//! # Envelope Builder
//!
//! Assembles deliver, query and acknowledge envelopes, serializes them and
//! runs the structural validator before anything is sent.

use chrono::{DateTime, Utc};
use rl_02_transforms::TransformDescriptor;
use std::sync::Arc;
use tracing::debug;

use crate::algorithms::write_request;
use crate::domain::vocabulary::{
    DATA_TYPE_CONFIRMATION, DATA_TYPE_DATA_REQUEST, SCENARIO_WITH_ACKNOWLEDGEMENT,
    SCENARIO_WITH_RESPONSE,
};
use crate::domain::{
    ApplicationInfo, DataContainer, EnvelopeError, ProtocolProfile, RequestBody, RequestEnvelope,
    RequestHeader, SerializedEnvelope, TextEncoding, TransportDirection,
};
use crate::ports::{AcceptAllValidator, StructuralValidator};

/// Highest file number representable in a container name.
pub const MAX_FILE_NUMBER: u32 = 999_999;

/// Container name of a delivered batch file: `TDSV0` or `EDSV0` plus the
/// six-digit file number.
pub fn data_container_name(is_test: bool, file_number: u32) -> String {
    let prefix = if is_test { 'T' } else { 'E' };
    format!("{prefix}DSV0{file_number:06}")
}

/// Fixed parties and settings of every envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeParties {
    /// Sending organization.
    pub sender_id: String,
    /// Receiving organization.
    pub receiver_id: String,
    /// SMTP contact of the sender.
    pub contact_email: String,
    /// Application announced in the header.
    pub application: ApplicationInfo,
    /// Test environment.
    pub is_test: bool,
}

/// Builds validated request envelopes.
#[derive(Clone)]
pub struct EnvelopeBuilder {
    profile: ProtocolProfile,
    parties: EnvelopeParties,
    validator: Arc<dyn StructuralValidator>,
}

impl std::fmt::Debug for EnvelopeBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvelopeBuilder")
            .field("profile", &self.profile.name)
            .field("parties", &self.parties)
            .finish_non_exhaustive()
    }
}

impl EnvelopeBuilder {
    /// Builder accepting every document structurally.
    pub fn new(profile: ProtocolProfile, parties: EnvelopeParties) -> Self {
        Self {
            profile,
            parties,
            validator: Arc::new(AcceptAllValidator),
        }
    }

    /// Replace the structural validator.
    pub fn with_validator(mut self, validator: Arc<dyn StructuralValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// The active profile.
    pub fn profile(&self) -> &ProtocolProfile {
        &self.profile
    }

    /// The fixed parties.
    pub fn parties(&self) -> &EnvelopeParties {
        &self.parties
    }

    fn header(
        &self,
        request_id: &str,
        timestamp: DateTime<Utc>,
        procedure: &str,
        data_type: &str,
        scenario: &str,
    ) -> Result<RequestHeader, EnvelopeError> {
        if request_id.trim().is_empty() {
            return Err(EnvelopeError::InvalidArgument {
                field: "request_id",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(RequestHeader {
            sender_id: self.parties.sender_id.clone(),
            receiver_id: self.parties.receiver_id.clone(),
            request_id: request_id.to_string(),
            timestamp,
            application: self.parties.application.clone(),
            procedure: procedure.to_string(),
            data_type: data_type.to_string(),
            scenario: scenario.to_string(),
        })
    }

    /// Deliver envelope for an already transformed batch file.
    pub fn deliver_envelope(
        &self,
        request_id: &str,
        timestamp: DateTime<Utc>,
        file_number: u32,
        payload: &[u8],
        transforms: &[TransformDescriptor],
    ) -> Result<RequestEnvelope, EnvelopeError> {
        if file_number > MAX_FILE_NUMBER {
            return Err(EnvelopeError::InvalidArgument {
                field: "file_number",
                reason: format!("{file_number} exceeds {MAX_FILE_NUMBER}"),
            });
        }
        Ok(RequestEnvelope {
            profile_uri: self.profile.profile_uri.clone(),
            header: self.header(
                request_id,
                timestamp,
                &self.profile.deliver_procedure,
                &self.profile.deliver_data_type,
                SCENARIO_WITH_ACKNOWLEDGEMENT,
            )?,
            body: RequestBody::Payload {
                data: payload.to_vec(),
                transforms: transforms.to_vec(),
                container: DataContainer {
                    name: data_container_name(self.parties.is_test, file_number),
                    created: Some(timestamp),
                    encoding: TextEncoding::Latin1,
                },
                contact_email: self.parties.contact_email.clone(),
            },
        })
    }

    /// Query envelope for responses after `cursor`.
    pub fn query_envelope(
        &self,
        request_id: &str,
        timestamp: DateTime<Utc>,
        cursor: &str,
    ) -> Result<RequestEnvelope, EnvelopeError> {
        if cursor.trim().is_empty() {
            return Err(EnvelopeError::InvalidArgument {
                field: "cursor",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(RequestEnvelope {
            profile_uri: self.profile.profile_uri.clone(),
            header: self.header(
                request_id,
                timestamp,
                &self.profile.query_procedure,
                DATA_TYPE_DATA_REQUEST,
                SCENARIO_WITH_RESPONSE,
            )?,
            body: RequestBody::Query {
                cursor: cursor.to_string(),
                procedure: self.profile.result_procedure.clone(),
            },
        })
    }

    /// Acknowledge envelope for `response_ids`.
    pub fn acknowledge_envelope(
        &self,
        request_id: &str,
        timestamp: DateTime<Utc>,
        response_ids: &[String],
    ) -> Result<RequestEnvelope, EnvelopeError> {
        if response_ids.is_empty() {
            return Err(EnvelopeError::InvalidArgument {
                field: "response_ids",
                reason: "nothing to acknowledge".to_string(),
            });
        }
        Ok(RequestEnvelope {
            profile_uri: self.profile.profile_uri.clone(),
            header: self.header(
                request_id,
                timestamp,
                &self.profile.acknowledge_procedure,
                DATA_TYPE_CONFIRMATION,
                SCENARIO_WITH_ACKNOWLEDGEMENT,
            )?,
            body: RequestBody::Acknowledge {
                response_ids: response_ids.to_vec(),
            },
        })
    }

    /// Build a deliver envelope.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a file number above [`MAX_FILE_NUMBER`],
    /// `Structural` if the validator rejects the document.
    pub fn build_deliver(
        &self,
        request_id: &str,
        timestamp: DateTime<Utc>,
        file_number: u32,
        payload: &[u8],
        transforms: &[TransformDescriptor],
    ) -> Result<SerializedEnvelope, EnvelopeError> {
        let envelope = self.deliver_envelope(request_id, timestamp, file_number, payload, transforms)?;
        self.serialize(&envelope)
    }

    /// Build a query envelope.
    pub fn build_query(
        &self,
        request_id: &str,
        timestamp: DateTime<Utc>,
        cursor: &str,
    ) -> Result<SerializedEnvelope, EnvelopeError> {
        let envelope = self.query_envelope(request_id, timestamp, cursor)?;
        self.serialize(&envelope)
    }

    /// Build an acknowledge envelope.
    pub fn build_acknowledge(
        &self,
        request_id: &str,
        timestamp: DateTime<Utc>,
        response_ids: &[String],
    ) -> Result<SerializedEnvelope, EnvelopeError> {
        let envelope = self.acknowledge_envelope(request_id, timestamp, response_ids)?;
        self.serialize(&envelope)
    }

    /// Serialize and structurally validate `envelope`.
    pub fn serialize(&self, envelope: &RequestEnvelope) -> Result<SerializedEnvelope, EnvelopeError> {
        let kind = envelope.kind();
        let bytes = write_request(envelope)?;
        self.validator
            .validate(&bytes, kind, TransportDirection::Request, self.parties.is_test)
            .map_err(|reason| EnvelopeError::Structural { kind, reason })?;

        debug!(
            "[rl-03] Built {} envelope {} ({} bytes)",
            kind,
            envelope.header.request_id,
            bytes.len()
        );
        Ok(SerializedEnvelope {
            kind,
            request_id: envelope.header.request_id.clone(),
            bytes,
        })
    }
}
