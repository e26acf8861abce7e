//! # Registry-Link Subsystem Benchmarks
//!
//! | Subsystem | Operation |
//! |-----------|-----------|
//! | rl-01 Batch Records | encode and decode a request file |
//! | rl-02 Transforms | gzip + XChaCha20-Poly1305 apply and reverse |
//! | rl-03 Envelope | build a deliver envelope, parse a result response |

use chrono::{NaiveDate, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rl_01_batch_records::{BatchRecordCodec, BatchRequest, ProductRegistration};
use rl_02_transforms::{TransformPipeline, TransformStep};
use rl_03_envelope::fixtures::{PackageFixture, ResponseFixture};
use rl_03_envelope::{
    ApplicationInfo, EnvelopeBuilder, EnvelopeParties, MessageKind, ProtocolProfile,
    ResponseParser,
};
use rl_04_registry_client::default_registry;
use shared_crypto::{Cipher, SecretKey, GZIP_ID};
use shared_types::{Company, Sender, Sex, Subject};

fn subjects(n: u64) -> Vec<Subject> {
    (1..=n)
        .map(|id| Subject {
            id,
            personnel_number: format!("{id:06}"),
            surname: "Schmidt".into(),
            given_name: "Anna".into(),
            birth_name: Some("Weber".into()),
            birth_date: NaiveDate::from_ymd_opt(1980, 1, 15).unwrap_or_default(),
            birth_place: None,
            sex: Sex::Female,
            postal_code: "20095".into(),
            city: "Hamburg".into(),
        })
        .collect()
}

fn encode(codec: &BatchRecordCodec, subjects: &[Subject]) -> Vec<u8> {
    let sender = Sender {
        organization_id: "12345678".into(),
        name: "Lohnbüro".into(),
        email: "lohn@example.org".into(),
        ..Sender::default()
    };
    let company = Company {
        organization_id: "87654321".into(),
        name: "Beispiel GmbH".into(),
        ..Company::default()
    };
    let registration = ProductRegistration {
        product_id: "1234567".into(),
        module_id: "7654321".into(),
    };
    codec
        .encode_outbound(&BatchRequest {
            sender: &sender,
            company: &company,
            receiver_id: "66667777",
            registration: &registration,
            file_number: 1,
            created: Utc::now().naive_local(),
            subjects,
        })
        .map(|encoded| encoded.bytes)
        .unwrap_or_default()
}

// ============================================================================
// RL-01: Batch Records
// ============================================================================

fn bench_batch_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("rl-01-batch-records");
    let codec = BatchRecordCodec::new();

    for n in [1u64, 100, 1_000] {
        let subjects = subjects(n);
        group.throughput(Throughput::Elements(n));
        group.bench_with_input(BenchmarkId::new("encode_outbound", n), &subjects, |b, s| {
            b.iter(|| encode(&codec, black_box(s)))
        });

        let text = shared_types::decode_latin1(&encode(&codec, &subjects));
        group.bench_with_input(BenchmarkId::new("decode_outbound", n), &text, |b, t| {
            b.iter(|| codec.decode_outbound(black_box(t)))
        });
    }
    group.finish();
}

// ============================================================================
// RL-02: Transforms
// ============================================================================

fn bench_transforms(c: &mut Criterion) {
    let mut group = c.benchmark_group("rl-02-transforms");
    let pipeline = TransformPipeline::new(default_registry(Some(SecretKey::generate())));
    let steps = [
        TransformStep::new(GZIP_ID),
        TransformStep::new(Cipher::XChaCha20Poly1305.id()),
    ];
    let raw = encode(&BatchRecordCodec::new(), &subjects(1_000));
    group.throughput(Throughput::Bytes(raw.len() as u64));

    group.bench_function("apply", |b| b.iter(|| pipeline.apply(black_box(&raw), &steps)));

    if let Ok((sealed, descriptors)) = pipeline.apply(&raw, &steps) {
        group.bench_function("reverse", |b| {
            b.iter(|| pipeline.reverse(black_box(&sealed), &descriptors))
        });
    }
    group.finish();
}

// ============================================================================
// RL-03: Envelopes
// ============================================================================

fn bench_envelopes(c: &mut Criterion) {
    let mut group = c.benchmark_group("rl-03-envelope");
    let builder = EnvelopeBuilder::new(
        ProtocolProfile::deuev(),
        EnvelopeParties {
            sender_id: "12345678".into(),
            receiver_id: "66667777".into(),
            contact_email: "lohn@example.org".into(),
            application: ApplicationInfo::default(),
            is_test: true,
        },
    );
    let payload = encode(&BatchRecordCodec::new(), &subjects(100));

    group.bench_function("build_deliver", |b| {
        b.iter(|| builder.build_deliver("bench", Utc::now(), 1, black_box(&payload), &[]))
    });

    let body = ResponseFixture::completed("1002")
        .package(PackageFixture::new("2001").data(payload.clone()))
        .package(PackageFixture::new("2002").data(payload.clone()))
        .to_xml();
    let parser = ResponseParser::new();
    group.bench_function("parse_response", |b| {
        b.iter(|| parser.parse(black_box(&body), MessageKind::GetProcessingResult))
    });
    group.finish();
}

criterion_group!(benches, bench_batch_codec, bench_transforms, bench_envelopes);
criterion_main!(benches);
