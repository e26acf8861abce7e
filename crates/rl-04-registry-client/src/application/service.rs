//! # Registry Client Service
//!
//! Facade over batch encoding, payload transforms, envelopes, transport and
//! polling.
//!
//! ## Lookup flow
//!
//! ```text
//! Sending ──► Polling ──► Decoding ──► Acknowledging ──► Done
//!    │           │            │              │
//!    └───────────┴────────────┴──────────────┴──► Failed
//! ```
//!
//! Decoding and Acknowledging are skipped when the poll loop ends without
//! results or nothing decoded.

use async_trait::async_trait;
use chrono::{Local, Utc};
use rl_01_batch_records::{expected_record_count, BatchRecordCodec, BatchRequest, RecordValidator};
use rl_02_transforms::{TransformPipeline, TransformRegistry};
use rl_03_envelope::{
    EnvelopeBuilder, EnvelopeError, EnvelopeParties, PackageDecoder, PackageInfo,
    ResponseEnvelope, ResponseParser, SerializedEnvelope, StructuralValidator,
};
use shared_crypto::SecretKey;
use shared_types::Subject;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::polling::PollingController;
use crate::adapters::{default_registry, HttpTransport};
use crate::config::ClientConfig;
use crate::domain::{
    ClientError, ClientIdentity, DeliveryReceipt, LookupOutcome, LookupState, PackageFailure,
    PollDecision,
};
use crate::ports::{RegistryLookupApi, Transport};

/// Registry lookup client.
///
/// Holds no mutable state after construction; calls may run concurrently.
pub struct RegistryClient<T: Transport> {
    config: ClientConfig,
    identity: ClientIdentity,
    codec: BatchRecordCodec,
    builder: EnvelopeBuilder,
    parser: ResponseParser,
    decoder: PackageDecoder,
    poller: PollingController,
    transport: T,
}

impl<T: Transport> std::fmt::Debug for RegistryClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryClient")
            .field("endpoint", &self.config.endpoint())
            .field("sender", &self.identity.sender.organization_id)
            .field("poller", &self.poller)
            .finish_non_exhaustive()
    }
}

impl RegistryClient<HttpTransport> {
    /// Client over HTTP with the default transform handlers.
    ///
    /// Without `key` only gzip is registered, so `config.transforms` must
    /// not name a cipher.
    pub fn connect(
        config: ClientConfig,
        identity: ClientIdentity,
        key: Option<SecretKey>,
    ) -> Result<Self, ClientError> {
        let transport = HttpTransport::new(&config)?;
        Self::new(config, identity, transport, default_registry(key))
    }
}

impl<T: Transport> RegistryClient<T> {
    /// Create a client.
    ///
    /// # Errors
    ///
    /// `ClientError::Config` if the configuration is invalid or names a
    /// transform without a registered handler.
    pub fn new(
        config: ClientConfig,
        identity: ClientIdentity,
        transport: T,
        registry: TransformRegistry,
    ) -> Result<Self, ClientError> {
        config.validate()?;
        for step in &config.transforms {
            registry
                .get(&step.algorithm_id)
                .map_err(|e| ClientError::Config(e.to_string()))?;
        }

        let parties = EnvelopeParties {
            sender_id: identity.sender.organization_id.clone(),
            receiver_id: config.receiver_id.clone(),
            contact_email: identity.sender.email.clone(),
            application: config.application.clone(),
            is_test: config.is_test(),
        };
        let builder = EnvelopeBuilder::new(config.profile.clone(), parties);
        let poller = PollingController::new(
            config.poll_interval(),
            config.poll_timeout(),
            config.poll.policy.clone(),
        );

        info!(
            "[rl-04] Registry client for {} ({} profile, sender {})",
            config.endpoint(),
            config.profile.name,
            identity.sender.organization_id
        );

        Ok(Self {
            parser: ResponseParser::new(),
            decoder: PackageDecoder::new(TransformPipeline::new(registry)),
            codec: BatchRecordCodec::new(),
            builder,
            poller,
            config,
            identity,
            transport,
        })
    }

    /// Run `validator` on every outbound batch file.
    pub fn with_record_validator(mut self, validator: Arc<dyn RecordValidator>) -> Self {
        self.codec = BatchRecordCodec::with_validator(validator);
        self
    }

    /// Validate request and response documents with `validator`.
    pub fn with_structural_validator(mut self, validator: Arc<dyn StructuralValidator>) -> Self {
        self.builder = self.builder.with_validator(validator.clone());
        self.parser = ResponseParser::with_validator(validator, self.config.is_test());
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The batch codec, also used to decode result files.
    pub fn codec(&self) -> &BatchRecordCodec {
        &self.codec
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Encode, transform and deliver a batch file for `subjects`.
    ///
    /// # Errors
    ///
    /// `Validation` if a field does not fit or business rules reject the
    /// file, `Transform` if a step fails, and every round-trip error.
    pub async fn deliver(
        &self,
        subjects: &[Subject],
        file_number: u32,
        cancel: &CancellationToken,
    ) -> Result<DeliveryReceipt, ClientError> {
        let request = BatchRequest {
            sender: &self.identity.sender,
            company: &self.identity.company,
            receiver_id: &self.config.receiver_id,
            registration: &self.config.registration,
            file_number,
            created: Local::now().naive_local(),
            subjects,
        };
        let encoded = self.codec.encode_outbound(&request)?;
        let (payload, descriptors) = self
            .decoder
            .pipeline()
            .apply(&encoded.bytes, &self.config.transforms)?;

        let envelope = self.builder.build_deliver(
            &new_request_id(),
            Utc::now(),
            file_number,
            &payload,
            &descriptors,
        )?;
        let response = self.round_trip(&envelope, cancel).await?;

        info!(
            "[rl-04] Delivered file {} ({} subjects) as {}",
            file_number,
            subjects.len(),
            response.response_id
        );
        Ok(DeliveryReceipt {
            request_id: envelope.request_id,
            response_id: response.response_id,
            flags: response.flags,
            record_count: expected_record_count(subjects.len()),
        })
    }

    /// Query for results newer than `cursor`.
    pub async fn query(
        &self,
        cursor: &str,
        cancel: &CancellationToken,
    ) -> Result<ResponseEnvelope, ClientError> {
        let envelope = self
            .builder
            .build_query(&new_request_id(), Utc::now(), cursor)?;
        self.round_trip(&envelope, cancel).await
    }

    /// Confirm receipt of `response_ids`.
    pub async fn acknowledge(
        &self,
        response_ids: &[String],
        cancel: &CancellationToken,
    ) -> Result<ResponseEnvelope, ClientError> {
        let envelope = self
            .builder
            .build_acknowledge(&new_request_id(), Utc::now(), response_ids)?;
        let response = self.round_trip(&envelope, cancel).await?;
        info!("[rl-04] Acknowledged {}", response_ids.join(", "));
        Ok(response)
    }

    /// Decode every package of `response`, keeping failures apart.
    pub fn decode_packages(
        &self,
        response: &ResponseEnvelope,
    ) -> (Vec<PackageInfo>, Vec<PackageFailure>) {
        let mut decoded = Vec::new();
        let mut failures = Vec::new();
        for (package, result) in response
            .packages
            .iter()
            .zip(self.decoder.decode_response(response))
        {
            match result {
                Ok(info) => decoded.push(info),
                Err(error) => failures.push(PackageFailure {
                    response_id: package.response_id.clone(),
                    error,
                }),
            }
        }
        (decoded, failures)
    }

    /// Deliver, poll until results are final, decode and acknowledge.
    ///
    /// Results are decoded only if every header flag of the final answer is
    /// the success code. Every decoded package, error packages included, is
    /// acknowledged; packages that failed to decode are not.
    pub async fn lookup(
        &self,
        subjects: &[Subject],
        file_number: u32,
        cancel: &CancellationToken,
    ) -> Result<LookupOutcome, ClientError> {
        let mut states = vec![LookupState::Sending];
        match self.run_lookup(subjects, file_number, cancel, &mut states).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                let from = states.last().copied().unwrap_or(LookupState::Sending);
                warn!("[rl-04] Lookup {} -> {}: {}", from, LookupState::Failed, e);
                Err(e)
            }
        }
    }

    async fn run_lookup(
        &self,
        subjects: &[Subject],
        file_number: u32,
        cancel: &CancellationToken,
        states: &mut Vec<LookupState>,
    ) -> Result<LookupOutcome, ClientError> {
        let receipt = self.deliver(subjects, file_number, cancel).await?;
        let cursor = cursor_before(&receipt.response_id)?;

        transition(states, LookupState::Polling);
        let poll = self
            .poller
            .poll(cancel, |attempt| {
                debug!("[rl-04] Query {} for responses > {}", attempt, cursor);
                self.query(&cursor, cancel)
            })
            .await?;

        let (packages, failures) = if poll.decision == PollDecision::Completed {
            transition(states, LookupState::Decoding);
            self.decode_packages(&poll.response)
        } else {
            (Vec::new(), Vec::new())
        };

        let acknowledged: Vec<String> = packages.iter().map(|p| p.response_id.clone()).collect();
        if !acknowledged.is_empty() {
            transition(states, LookupState::Acknowledging);
            self.acknowledge(&acknowledged, cancel).await?;
        }

        transition(states, LookupState::Done);
        Ok(LookupOutcome {
            delivery_response_id: receipt.response_id,
            cursor,
            flags: poll.response.flags,
            decision: poll.decision,
            attempts: poll.attempts,
            packages,
            failures,
            acknowledged,
            states: std::mem::take(states),
        })
    }

    async fn round_trip(
        &self,
        envelope: &SerializedEnvelope,
        cancel: &CancellationToken,
    ) -> Result<ResponseEnvelope, ClientError> {
        if cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }
        debug!("[rl-04] Sending {} {}", envelope.kind, envelope.request_id);
        let body = self.transport.send(envelope.bytes.clone(), cancel).await?;
        Ok(self.parser.parse(&body, envelope.kind)?)
    }
}

#[async_trait]
impl<T: Transport> RegistryLookupApi for RegistryClient<T> {
    async fn deliver(
        &self,
        subjects: &[Subject],
        file_number: u32,
        cancel: &CancellationToken,
    ) -> Result<DeliveryReceipt, ClientError> {
        RegistryClient::deliver(self, subjects, file_number, cancel).await
    }

    async fn query(
        &self,
        cursor: &str,
        cancel: &CancellationToken,
    ) -> Result<ResponseEnvelope, ClientError> {
        RegistryClient::query(self, cursor, cancel).await
    }

    async fn acknowledge(
        &self,
        response_ids: &[String],
        cancel: &CancellationToken,
    ) -> Result<ResponseEnvelope, ClientError> {
        RegistryClient::acknowledge(self, response_ids, cancel).await
    }

    async fn lookup(
        &self,
        subjects: &[Subject],
        file_number: u32,
        cancel: &CancellationToken,
    ) -> Result<LookupOutcome, ClientError> {
        RegistryClient::lookup(self, subjects, file_number, cancel).await
    }
}

fn new_request_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn transition(states: &mut Vec<LookupState>, next: LookupState) {
    if let Some(from) = states.last() {
        debug!("[rl-04] Lookup {} -> {}", from, next);
    }
    states.push(next);
}

/// Cursor selecting every response after `response_id`: its numeric
/// predecessor.
///
/// # Errors
///
/// `ClientError::Envelope` if `response_id` is not a decimal number.
pub fn cursor_before(response_id: &str) -> Result<String, ClientError> {
    let id: u128 = response_id
        .trim()
        .parse()
        .map_err(|e| EnvelopeError::Malformed {
            element: "ResponseID".to_string(),
            reason: format!("{response_id:?} is not numeric: {e}"),
        })?;
    Ok(id.saturating_sub(1).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransportError;
    use crate::ports::MockTransport;
    use chrono::NaiveDate;
    use rl_02_transforms::TransformStep;
    use rl_03_envelope::fixtures::{xml_error, PackageFixture, ResponseFixture};
    use rl_03_envelope::{DataContainer, MockStructuralValidator, TextEncoding};
    use shared_types::{Company, Flag, FlagWeight, Salutation, Sender, Sex};
    use std::time::Duration;

    fn identity() -> ClientIdentity {
        ClientIdentity {
            sender: Sender {
                organization_id: "12345678".into(),
                name: "Lohnbüro Beispiel".into(),
                street: "Hauptstr. 1".into(),
                postal_code: "12345".into(),
                city: "Berlin".into(),
                contact_person: "Erika Mustermann".into(),
                contact_salutation: Salutation::Female,
                phone: "030 123456".into(),
                fax: String::new(),
                email: "lohn@example.org".into(),
            },
            company: Company {
                organization_id: "87654321".into(),
                name: "Beispiel GmbH".into(),
                street: "Nebenweg 2".into(),
                postal_code: "12345".into(),
                city: "Berlin".into(),
            },
        }
    }

    fn subjects() -> Vec<Subject> {
        (1..=2)
            .map(|id| Subject {
                id,
                personnel_number: format!("{id:02}"),
                surname: "Presley".into(),
                given_name: "Elvis".into(),
                birth_name: None,
                birth_date: NaiveDate::from_ymd_opt(1930, 5, 6).unwrap(),
                birth_place: None,
                sex: Sex::Male,
                postal_code: "12345".into(),
                city: "Berlin".into(),
            })
            .collect()
    }

    fn client(transport: MockTransport) -> RegistryClient<MockTransport> {
        RegistryClient::new(
            ClientConfig::for_testing(),
            identity(),
            transport,
            default_registry(None),
        )
        .unwrap()
    }

    fn gzip_package(response_id: &str, text: &str) -> PackageFixture {
        let (data, descriptors) = TransformPipeline::new(default_registry(None))
            .apply(text.as_bytes(), &[TransformStep::new(shared_crypto::GZIP_ID)])
            .unwrap();
        PackageFixture::new(response_id)
            .data_source(DataContainer {
                name: "TDSV0000001".into(),
                created: None,
                encoding: TextEncoding::Latin1,
            })
            .transforms(descriptors)
            .data(data)
    }

    fn request_text(transport: &MockTransport, index: usize) -> String {
        String::from_utf8_lossy(&transport.requests()[index]).into_owned()
    }

    #[test]
    fn test_cursor_before() {
        assert_eq!(cursor_before("1000").unwrap(), "999");
        assert_eq!(cursor_before("0").unwrap(), "0");
        assert_eq!(
            cursor_before("340282366920938463463374607431768211455").unwrap(),
            "340282366920938463463374607431768211454"
        );
        assert!(matches!(cursor_before("abc"), Err(ClientError::Envelope(_))));
    }

    proptest::proptest! {
        #[test]
        fn prop_cursor_is_predecessor(id in 1u64..) {
            let cursor = cursor_before(&id.to_string()).unwrap();
            proptest::prop_assert_eq!(cursor, (id - 1).to_string());
        }
    }

    #[test]
    fn test_new_rejects_unregistered_transform() {
        let mut config = ClientConfig::for_testing();
        config.transforms.push(TransformStep::new("xchacha20-poly1305"));
        let err = RegistryClient::new(config, identity(), MockTransport::new(), default_registry(None))
            .unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[tokio::test]
    async fn test_deliver_sends_envelope() {
        let transport = MockTransport::new().reply(ResponseFixture::accepted("1000").to_xml());
        let client = client(transport);

        let receipt = client
            .deliver(&subjects(), 1, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(receipt.response_id, "1000");
        assert_eq!(receipt.record_count, 3);
        assert_eq!(receipt.request_id.len(), 32);

        let sent = request_text(client.transport(), 0);
        assert!(sent.contains("TDSV0000001"));
        assert!(sent.contains(&receipt.request_id));
        assert!(sent.contains("gzip"));
    }

    #[tokio::test]
    async fn test_error_weight_header_is_protocol_error() {
        let body = ResponseFixture::new("1000")
            .flag("E12", "invalid sender", FlagWeight::Error)
            .to_xml();
        let client = client(MockTransport::new().reply(body));

        let err = client
            .deliver(&subjects(), 1, &CancellationToken::new())
            .await
            .unwrap_err();
        match err {
            ClientError::Protocol(p) => assert_eq!(p.flags[0].code, "E12"),
            other => panic!("expected Protocol, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_xml_error_document_is_protocol_error() {
        let body = xml_error(&[Flag::new("X01", "schema", FlagWeight::Error)]);
        let client = client(MockTransport::new().reply(body));
        let err = client
            .query("999", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Protocol(_)));
    }

    #[tokio::test]
    async fn test_unparsable_body_is_transport_error() {
        let client = client(MockTransport::new().reply("<<not xml"));
        let err = client
            .query("999", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::Transport(TransportError::UnparsableBody { .. })
        ));
    }

    #[tokio::test]
    async fn test_status_error_passes_through() {
        let client = client(MockTransport::new().fail(TransportError::Status {
            status: 500,
            reason: "Internal Server Error".into(),
            body: String::new(),
        }));
        let err = client
            .query("999", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::Transport(TransportError::Status { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_structural_rejection() {
        let client = client(MockTransport::new())
            .with_structural_validator(Arc::new(MockStructuralValidator::rejecting("bad order")));
        let err = client
            .query("999", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Envelope(EnvelopeError::Structural { .. })));
        assert_eq!(client.transport().request_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_lookup() {
        let transport = MockTransport::new()
            .reply(ResponseFixture::accepted("1000").to_xml())
            .reply(ResponseFixture::pending("1001").to_xml())
            .reply(
                ResponseFixture::completed("1002")
                    .package(gzip_package("2001", "result file"))
                    .package(
                        PackageFixture::new("2002").flag("E30", "rejected", FlagWeight::Error),
                    )
                    .package(PackageFixture::new("2003").plugin("xplg:Signatures"))
                    .to_xml(),
            )
            .reply(ResponseFixture::accepted("1003").to_xml());
        let client = client(transport);

        let outcome = client
            .lookup(&subjects(), 1, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome.delivery_response_id, "1000");
        assert_eq!(outcome.cursor, "999");
        assert_eq!(outcome.attempts, 2);
        assert_eq!(outcome.decision, PollDecision::Completed);
        assert_eq!(outcome.packages.len(), 2);
        assert_eq!(outcome.packages[0].text.as_deref(), Some("result file"));
        assert!(outcome.packages[1].is_error);
        assert!(outcome.packages[1].content.is_none());
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].response_id, "2003");
        assert_eq!(outcome.acknowledged, vec!["2001".to_string(), "2002".to_string()]);
        assert!(!outcome.is_complete());
        assert_eq!(
            outcome.states,
            vec![
                LookupState::Sending,
                LookupState::Polling,
                LookupState::Decoding,
                LookupState::Acknowledging,
                LookupState::Done,
            ]
        );

        let transport = client.transport();
        assert_eq!(transport.request_count(), 4);
        assert!(request_text(transport, 1).contains("999"));
        assert!(request_text(transport, 2).contains("999"));
        let ack = request_text(transport, 3);
        assert!(ack.contains("ConfirmationOfReceipt"));
        assert!(ack.contains("2001") && ack.contains("2002"));
        assert!(!ack.contains("2003"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_success_flags_decode_nothing() {
        let transport = MockTransport::new()
            .reply(ResponseFixture::accepted("1000").to_xml())
            .reply(
                ResponseFixture::completed("1001")
                    .flag("W20", "partial", FlagWeight::Warning)
                    .package(gzip_package("2001", "ignored"))
                    .to_xml(),
            );
        let client = client(transport);

        let outcome = client
            .lookup(&subjects(), 1, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(outcome.decision, PollDecision::Finished);
        assert!(outcome.packages.is_empty());
        assert!(outcome.acknowledged.is_empty());
        assert_eq!(
            outcome.states,
            vec![LookupState::Sending, LookupState::Polling, LookupState::Done]
        );
        assert_eq!(client.transport().request_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookup_times_out_after_bound() {
        let transport = MockTransport::new()
            .reply(ResponseFixture::accepted("1000").to_xml())
            .then_always(ResponseFixture::pending("1001").to_xml());
        let client = client(transport);
        let started = tokio::time::Instant::now();

        let err = client
            .lookup(&subjects(), 1, &CancellationToken::new())
            .await
            .unwrap_err();
        match err {
            ClientError::PollTimeout { elapsed, .. } => {
                assert!(elapsed > Duration::from_secs(10));
            }
            other => panic!("expected PollTimeout, got {other:?}"),
        }
        assert!(started.elapsed() > Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookup_cancelled_while_polling() {
        let transport = MockTransport::new()
            .reply(ResponseFixture::accepted("1000").to_xml())
            .then_always(ResponseFixture::pending("1001").to_xml());
        let client = client(transport);
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(2500)).await;
            trigger.cancel();
        });

        let err = client.lookup(&subjects(), 1, &cancel).await.unwrap_err();
        assert!(matches!(err, ClientError::Cancelled));
        // deliver + queries at 0, 1 and 2 s
        assert_eq!(client.transport().request_count(), 4);
    }

    #[tokio::test]
    async fn test_lookup_through_api_trait() {
        let transport = MockTransport::new()
            .reply(ResponseFixture::accepted("1000").to_xml())
            .reply(ResponseFixture::completed("1001").to_xml());
        let api: Arc<dyn RegistryLookupApi> = Arc::new(client(transport));
        let outcome = api
            .lookup(&subjects(), 7, &CancellationToken::new())
            .await
            .unwrap();
        assert!(outcome.is_complete());
        assert!(outcome.packages.is_empty());
    }
}
