//! # Inbound Ports
//!
//! API trait defining what the registry client can do.

use async_trait::async_trait;
use rl_03_envelope::ResponseEnvelope;
use shared_types::Subject;
use tokio_util::sync::CancellationToken;

use crate::domain::{ClientError, DeliveryReceipt, LookupOutcome};

/// Registry lookup API - inbound port.
#[async_trait]
pub trait RegistryLookupApi: Send + Sync {
    /// Encode, transform and deliver a batch file for `subjects`.
    async fn deliver(
        &self,
        subjects: &[Subject],
        file_number: u32,
        cancel: &CancellationToken,
    ) -> Result<DeliveryReceipt, ClientError>;

    /// Query for results newer than `cursor`.
    async fn query(
        &self,
        cursor: &str,
        cancel: &CancellationToken,
    ) -> Result<ResponseEnvelope, ClientError>;

    /// Confirm receipt of `response_ids`.
    async fn acknowledge(
        &self,
        response_ids: &[String],
        cancel: &CancellationToken,
    ) -> Result<ResponseEnvelope, ClientError>;

    /// Deliver, poll until results are final, decode and acknowledge.
    async fn lookup(
        &self,
        subjects: &[Subject],
        file_number: u32,
        cancel: &CancellationToken,
    ) -> Result<LookupOutcome, ClientError>;
}
