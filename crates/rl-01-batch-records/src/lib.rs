//! # RL-01 Batch Records
//!
//! Fixed-width record codec for lookup request and result files.
//!
//! **Subsystem ID:** 01
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! A lookup file is a stream of CRLF-terminated, ISO-8859-1, fixed-width
//! records:
//!
//! | Framing | Records |
//! |---------|---------|
//! | Outbound | `VOSZ` → `DSKO` → N × `DSVV` → `NCSZ` |
//! | Inbound | `VOSZ` → `VOSZ` → N × `DSVV` → `NCSZ` → `NCSZ` |
//!
//! Every trailer counts its detail records plus the header. Records flagged
//! as rejected carry `DBFE`/`DBFL` error blocks after their fixed part.
//!
//! ## Module Structure
//!
//! ```text
//! rl-01-batch-records/
//! ├── domain/          # Record types, framings, errors, invariants
//! ├── algorithms/      # Schema table, field formatting, record layout
//! ├── ports/           # RecordValidator (business rules)
//! └── application/     # BatchRecordCodec
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod application;
pub mod domain;
pub mod ports;

// Re-exports
pub use algorithms::{schemas, FieldKind, RecordSchema};
pub use application::BatchRecordCodec;
pub use domain::{
    expected_record_count, BatchError, BatchFile, BatchHeader, BatchRequest, BatchTrailer,
    DetailRecord, Direction, EncodedBatch, ExtendedHeader, InboundBatch, LookupStatus,
    OutboundBatch, ProductRegistration, RecordTag, ValidationError, ValidationErrors,
    INFO_ONLY_CODE,
};
pub use ports::{MockRecordValidator, RecordValidator};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
