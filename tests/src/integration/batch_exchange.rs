//! # Batch Exchange
//!
//! RL-01 files travelling through RL-02 transforms and RL-03 envelopes.
//!
//! ## Flows Tested
//!
//! 1. **Outbound layout**: two subjects in test mode produce the request framing
//! 2. **Result package**: a gzip + XChaCha20 result file inside a response
//!    envelope decodes back into typed detail records
//! 3. **Failure isolation**: a package that fails to decrypt does not affect
//!    its siblings

use proptest::prelude::*;
use rl_01_batch_records::{BatchFile, BatchRecordCodec, LookupStatus, RecordTag};
use rl_02_transforms::{TransformKind, TransformPipeline, TransformStep};
use rl_03_envelope::fixtures::{PackageFixture, ResponseFixture};
use rl_03_envelope::{
    data_container_name, DataContainer, EnvelopeError, MessageKind, PackageDecoder,
    PackagePlugin, ResponseParser, TextEncoding,
};
use rl_04_registry_client::{default_registry, ClientError};
use shared_crypto::{Cipher, SecretKey, GZIP_ID};

use super::fixtures::{encode_request, result_file, subjects};

fn compress_then_encrypt() -> Vec<TransformStep> {
    vec![
        TransformStep::new(GZIP_ID),
        TransformStep::new(Cipher::XChaCha20Poly1305.id()),
    ]
}

// =============================================================================
// OUTBOUND
// =============================================================================

#[test]
fn test_two_subjects_request_framing() {
    let codec = BatchRecordCodec::new();
    let encoded = encode_request(&codec, &subjects(2), 1);

    let tags: Vec<&str> = encoded.records.iter().map(|r| &r[..4]).collect();
    assert_eq!(
        tags,
        vec![
            RecordTag::Vosz.as_str(),
            RecordTag::Dsko.as_str(),
            RecordTag::Dsvv.as_str(),
            RecordTag::Dsvv.as_str(),
            RecordTag::Ncsz.as_str(),
        ]
    );
    assert!(encoded.bytes.ends_with(b"\r\n"));

    let decoded = codec
        .decode_outbound(&shared_types::decode_latin1(&encoded.bytes))
        .unwrap();
    assert_eq!(decoded.trailer.record_count, 3);
    assert_eq!(decoded.header.file_number, 1);
    assert_eq!(data_container_name(true, 1), "TDSV0000001");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_trailer_counts_details_plus_header(n in 1u64..40) {
        let codec = BatchRecordCodec::new();
        let encoded = encode_request(&codec, &subjects(n), 7);
        let decoded = codec
            .decode_outbound(&shared_types::decode_latin1(&encoded.bytes))
            .unwrap();
        prop_assert_eq!(decoded.details.len() as u64, n);
        prop_assert_eq!(u64::from(decoded.trailer.record_count), n + 1);
    }
}

// =============================================================================
// INBOUND
// =============================================================================

#[test]
fn test_encrypted_result_package_decodes_to_records() {
    let codec = BatchRecordCodec::new();
    let key = SecretKey::generate();
    let pipeline = TransformPipeline::new(default_registry(Some(key.clone())));

    let request = encode_request(&codec, &subjects(2), 1);
    let result = result_file(&codec, &request);
    let plain = codec.encode(&BatchFile::Inbound(result.clone())).unwrap();
    let (sealed, descriptors) = pipeline.apply(&plain, &compress_then_encrypt()).unwrap();

    let body = ResponseFixture::completed("1002")
        .package(
            PackageFixture::new("2001")
                .data_source(DataContainer {
                    name: "EDSV0000001".into(),
                    created: None,
                    encoding: TextEncoding::Latin1,
                })
                .transforms(descriptors)
                .data(sealed),
        )
        .to_xml();

    let response = ResponseParser::new()
        .parse(&body, MessageKind::GetProcessingResult)
        .unwrap();
    let package = &response.packages[0];
    let recorded = package
        .plugins
        .iter()
        .find_map(|p| match p {
            PackagePlugin::DataTransforms(steps) => Some(steps.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(recorded[0].kind, TransformKind::Compression);
    assert_eq!(recorded[1].kind, TransformKind::Encryption);

    let info = PackageDecoder::new(pipeline).decode_package(package).unwrap();
    assert_eq!(info.file_name.as_deref(), Some("EDSV0000001"));
    assert!(!info.is_error);
    assert_eq!(info.content.as_deref(), Some(plain.as_slice()));

    let decoded = info.decode_batch(&codec).unwrap();
    assert_eq!(decoded, result);
    assert!(decoded
        .details
        .iter()
        .all(|d| d.status == LookupStatus::Unique && d.assigned_id.is_some()));
}

#[test]
fn test_undecryptable_package_fails_alone() {
    let codec = BatchRecordCodec::new();
    let sender_side = TransformPipeline::new(default_registry(Some(SecretKey::generate())));
    let receiver_side = TransformPipeline::new(default_registry(Some(SecretKey::generate())));

    let request = encode_request(&codec, &subjects(1), 3);
    let plain = codec
        .encode(&BatchFile::Inbound(result_file(&codec, &request)))
        .unwrap();
    let (sealed, descriptors) = sender_side.apply(&plain, &compress_then_encrypt()).unwrap();

    let body = ResponseFixture::completed("1002")
        .package(PackageFixture::new("2001").transforms(descriptors).data(sealed))
        .package(PackageFixture::new("2002").data(plain.clone()))
        .to_xml();
    let response = ResponseParser::new()
        .parse(&body, MessageKind::GetProcessingResult)
        .unwrap();

    let results = PackageDecoder::new(receiver_side).decode_response(&response);
    assert!(matches!(results[0], Err(EnvelopeError::Transform(_))));
    let untouched = results[1].as_ref().unwrap();
    assert_eq!(untouched.content.as_deref(), Some(plain.as_slice()));
}

#[test]
fn test_result_without_final_trailer_is_malformed_batch() {
    let codec = BatchRecordCodec::new();
    let request = encode_request(&codec, &subjects(2), 1);
    let text = shared_types::decode_latin1(
        &codec
            .encode(&BatchFile::Inbound(result_file(&codec, &request)))
            .unwrap(),
    );
    let lines: Vec<&str> = text.split("\r\n").filter(|l| !l.is_empty()).collect();
    let truncated = lines[..lines.len() - 1].join("\r\n");

    let body = ResponseFixture::completed("1002")
        .package(PackageFixture::new("2001").data(shared_types::encode_latin1(&truncated).unwrap()))
        .to_xml();
    let response = ResponseParser::new()
        .parse(&body, MessageKind::GetProcessingResult)
        .unwrap();
    let info = PackageDecoder::default()
        .decode_package(&response.packages[0])
        .unwrap();

    let err: ClientError = info.decode_batch(&codec).unwrap_err().into();
    assert!(matches!(err, ClientError::MalformedBatchFile(_)));
}
