//! # Lookup Flow
//!
//! `RegistryClient` over `HttpTransport` against a scripted local server.
//!
//! ## Flow Tested
//!
//! 1. **Deliver**: encoded, compressed and encrypted file in a deliver envelope
//! 2. **Poll**: queries with the cursor derived from the deliver response id
//! 3. **Decode**: result package reversed and parsed as an inbound file
//! 4. **Acknowledge**: consumed package ids confirmed in one envelope

use rl_01_batch_records::{BatchFile, BatchRecordCodec, LookupStatus};
use rl_02_transforms::{TransformPipeline, TransformStep};
use rl_03_envelope::fixtures::{PackageFixture, ResponseFixture};
use rl_03_envelope::{DataContainer, TextEncoding};
use rl_04_registry_client::{
    default_registry, ClientConfig, ClientError, Environment, LookupState, PollDecision,
    RegistryClient, TransportError,
};
use shared_crypto::{Cipher, SecretKey, GZIP_ID};
use tokio_util::sync::CancellationToken;

use super::fixtures::{encode_request, identity, result_file, subjects, ScriptedServer};

fn config(endpoint: &str) -> ClientConfig {
    let mut config = ClientConfig::for_testing();
    config.environment = Environment::Production;
    config.endpoint = Some(endpoint.to_string());
    config.transforms = vec![
        TransformStep::new(GZIP_ID),
        TransformStep::new(Cipher::XChaCha20Poly1305.id()),
    ];
    config
}

#[tokio::test]
async fn test_lookup_over_http() {
    let key = SecretKey::generate();
    let codec = BatchRecordCodec::new();

    // What the service returns for two subjects, sealed with the shared key.
    let result = result_file(&codec, &encode_request(&codec, &subjects(2), 1));
    let plain = codec.encode(&BatchFile::Inbound(result)).unwrap();
    let (sealed, descriptors) = TransformPipeline::new(default_registry(Some(key.clone())))
        .apply(
            &plain,
            &[
                TransformStep::new(GZIP_ID),
                TransformStep::new(Cipher::XChaCha20Poly1305.id()),
            ],
        )
        .unwrap();

    let server = ScriptedServer::start(vec![
        ("200 OK", ResponseFixture::accepted("5000").to_xml()),
        ("200 OK", ResponseFixture::pending("5001").to_xml()),
        (
            "200 OK",
            ResponseFixture::completed("5002")
                .package(
                    PackageFixture::new("6001")
                        .data_source(DataContainer {
                            name: "EDSV0000001".into(),
                            created: None,
                            encoding: TextEncoding::Latin1,
                        })
                        .transforms(descriptors)
                        .data(sealed),
                )
                .to_xml(),
        ),
        ("200 OK", ResponseFixture::accepted("5003").to_xml()),
    ])
    .await;

    let client = RegistryClient::connect(config(&server.endpoint), identity(), Some(key)).unwrap();
    let outcome = client
        .lookup(&subjects(2), 1, &CancellationToken::new())
        .await
        .unwrap();

    assert!(outcome.is_complete());
    assert_eq!(outcome.delivery_response_id, "5000");
    assert_eq!(outcome.cursor, "4999");
    assert_eq!(outcome.attempts, 2);
    assert_eq!(outcome.acknowledged, vec!["6001".to_string()]);
    assert_eq!(outcome.states.last(), Some(&LookupState::Done));

    let package = &outcome.packages[0];
    assert_eq!(package.file_name.as_deref(), Some("EDSV0000001"));
    let batch = package.decode_batch(client.codec()).unwrap();
    assert_eq!(batch.details.len(), 2);
    assert!(batch.details.iter().all(|d| d.status == LookupStatus::Unique));

    let requests = server.requests();
    assert_eq!(requests.len(), 4);
    assert!(requests[0].contains("EDSV0000001"));
    assert!(requests[0].contains("xchacha20-poly1305"));
    assert!(requests[1].contains("4999"));
    assert!(requests[3].contains("6001"));
}

#[tokio::test]
async fn test_pending_then_other_flag_finishes_without_ack() {
    let server = ScriptedServer::start(vec![
        ("200 OK", ResponseFixture::accepted("5000").to_xml()),
        ("200 OK", ResponseFixture::pending("5001").flag("W40", "partial", shared_types::FlagWeight::Warning).to_xml()),
    ])
    .await;

    let mut config = config(&server.endpoint);
    config.transforms = vec![TransformStep::new(GZIP_ID)];
    let client = RegistryClient::connect(config, identity(), None).unwrap();

    let outcome = client
        .lookup(&subjects(1), 2, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(outcome.decision, PollDecision::Finished);
    assert!(outcome.packages.is_empty());
    assert_eq!(server.requests().len(), 2);
}

#[tokio::test]
async fn test_service_error_status() {
    let server = ScriptedServer::start(vec![(
        "503 Service Unavailable",
        b"maintenance".to_vec(),
    )])
    .await;
    let client = RegistryClient::connect(config(&server.endpoint), identity(), Some(SecretKey::generate()))
        .unwrap();

    let err = client
        .deliver(&subjects(1), 1, &CancellationToken::new())
        .await
        .unwrap_err();
    match err {
        ClientError::Transport(TransportError::Status { status, body, .. }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("expected HTTP status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_cipher_without_key_is_config_error() {
    let err = RegistryClient::connect(config("http://127.0.0.1:9/dsvv/rest"), identity(), None).unwrap_err();
    assert!(matches!(err, ClientError::Config(_)));
}
