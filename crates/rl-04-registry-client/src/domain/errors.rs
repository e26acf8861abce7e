//! Error types for the registry client.

use rl_01_batch_records::{BatchError, ValidationError, ValidationErrors};
use rl_02_transforms::TransformError;
use rl_03_envelope::{EnvelopeError, ProtocolError};
use std::time::Duration;
use thiserror::Error;

/// Failures of a single HTTP round trip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The service answered with a non-success status.
    #[error("HTTP {status} {reason}")]
    Status {
        /// Status code.
        status: u16,
        /// Reason phrase.
        reason: String,
        /// Response body, lossily decoded.
        body: String,
    },

    /// The body is not a parsable XML document.
    #[error("unparsable response body: {reason}")]
    UnparsableBody {
        /// Parser message.
        reason: String,
        /// Body as received.
        body: String,
    },

    /// Connection, TLS or timeout failure.
    #[error("network error: {0}")]
    Network(String),

    /// The call was cancelled.
    #[error("request cancelled")]
    Cancelled,
}

/// Registry client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Business-rule or field validation of the batch file failed.
    #[error(transparent)]
    Validation(ValidationErrors),

    /// HTTP or body-level transport failure.
    #[error(transparent)]
    Transport(TransportError),

    /// The service reported an Error-weight outcome.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A batch file does not have the expected shape.
    #[error("malformed batch file: {0}")]
    MalformedBatchFile(String),

    /// No handler is registered for an algorithm id.
    #[error("unsupported transform: {algorithm_id}")]
    UnsupportedTransform {
        /// The unknown id.
        algorithm_id: String,
    },

    /// Applying or reversing a transform failed.
    #[error(transparent)]
    Transform(TransformError),

    /// Results did not arrive within the poll bound.
    #[error("no result after {attempts} queries in {elapsed:?}")]
    PollTimeout {
        /// Time since the first query.
        elapsed: Duration,
        /// Queries sent.
        attempts: u32,
    },

    /// Envelope construction or structural validation failed.
    #[error(transparent)]
    Envelope(EnvelopeError),

    /// The operation was cancelled.
    #[error("operation cancelled")]
    Cancelled,

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<TransportError> for ClientError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Cancelled => ClientError::Cancelled,
            other => ClientError::Transport(other),
        }
    }
}

impl From<ValidationErrors> for ClientError {
    fn from(e: ValidationErrors) -> Self {
        ClientError::Validation(e)
    }
}

impl From<BatchError> for ClientError {
    fn from(e: BatchError) -> Self {
        match e {
            BatchError::Validation(errors) => ClientError::Validation(errors),
            BatchError::InvalidField {
                record,
                field,
                reason,
            } => ClientError::Validation(ValidationErrors(vec![ValidationError::new(
                field,
                format!("{record}: {reason}"),
            )])),
            malformed @ BatchError::Malformed { .. } => {
                ClientError::MalformedBatchFile(malformed.to_string())
            }
        }
    }
}

impl From<TransformError> for ClientError {
    fn from(e: TransformError) -> Self {
        match e {
            TransformError::UnsupportedTransform { algorithm_id } => {
                ClientError::UnsupportedTransform { algorithm_id }
            }
            other => ClientError::Transform(other),
        }
    }
}

impl From<EnvelopeError> for ClientError {
    fn from(e: EnvelopeError) -> Self {
        match e {
            EnvelopeError::UnparsableBody { reason, body } => {
                ClientError::Transport(TransportError::UnparsableBody { reason, body })
            }
            EnvelopeError::Protocol(p) => ClientError::Protocol(p),
            EnvelopeError::Transform(t) => t.into(),
            EnvelopeError::Batch(b) => b.into(),
            other => ClientError::Envelope(other),
        }
    }
}

impl ClientError {
    /// True for failures worth retrying the whole operation later.
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Transport(TransportError::Network(_)) | ClientError::PollTimeout { .. } => true,
            ClientError::Transport(TransportError::Status { status, .. }) => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{Flag, FlagWeight};

    #[test]
    fn test_unparsable_body_is_a_transport_error() {
        let err: ClientError = EnvelopeError::UnparsableBody {
            reason: "eof".into(),
            body: "<html>".into(),
        }
        .into();
        assert!(matches!(
            err,
            ClientError::Transport(TransportError::UnparsableBody { body, .. }) if body == "<html>"
        ));
    }

    #[test]
    fn test_nested_conversions() {
        let err: ClientError = EnvelopeError::Transform(TransformError::UnsupportedTransform {
            algorithm_id: "lz4".into(),
        })
        .into();
        assert!(matches!(err, ClientError::UnsupportedTransform { algorithm_id } if algorithm_id == "lz4"));

        let err: ClientError = EnvelopeError::Protocol(ProtocolError {
            flags: vec![Flag::new("E1", "x", FlagWeight::Error)],
        })
        .into();
        assert!(matches!(err, ClientError::Protocol(_)));

        let err: ClientError = TransportError::Cancelled.into();
        assert!(matches!(err, ClientError::Cancelled));
    }

    #[test]
    fn test_batch_errors() {
        let err: ClientError = BatchError::Malformed {
            line: 3,
            reason: "expected NCSZ".into(),
        }
        .into();
        assert!(matches!(&err, ClientError::MalformedBatchFile(m) if m.contains("line 3")));

        let err: ClientError = BatchError::InvalidField {
            record: "DSVV",
            field: "FMNA",
            reason: "too long".into(),
        }
        .into();
        match err {
            ClientError::Validation(errors) => assert_eq!(errors.0[0].code, "FMNA"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_is_transient() {
        assert!(ClientError::Transport(TransportError::Network("reset".into())).is_transient());
        assert!(ClientError::Transport(TransportError::Status {
            status: 503,
            reason: "Service Unavailable".into(),
            body: String::new(),
        })
        .is_transient());
        assert!(!ClientError::Cancelled.is_transient());
    }
}
