//! # Record Entities
//!
//! Typed forms of the four record types and of the two file framings.
//!
//! The outbound and inbound framings are distinct types sharing
//! [`DetailRecord`]; a stream is read as one or the other according to
//! [`Direction`], never as a loose list of optional records.

use super::errors::ValidationError;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use shared_types::Sex;

/// Procedure marker of the batch header and trailer (`VFMM`).
pub const EMPLOYER_PROCEDURE_MARKER: &str = "AGTRV";

/// Procedure of the extended header (`VF`).
pub const REPORTING_PROCEDURE: &str = "DEUEV";

/// Four-character record type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordTag {
    /// Batch header.
    Vosz,
    /// Extended header with company and contact data.
    Dsko,
    /// Detail record, one per subject.
    Dsvv,
    /// Batch trailer with the record count.
    Ncsz,
}

impl RecordTag {
    /// Tag as written at the start of each record.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordTag::Vosz => "VOSZ",
            RecordTag::Dsko => "DSKO",
            RecordTag::Dsvv => "DSVV",
            RecordTag::Ncsz => "NCSZ",
        }
    }

    /// Resolve a tag.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "VOSZ" => Some(RecordTag::Vosz),
            "DSKO" => Some(RecordTag::Dsko),
            "DSVV" => Some(RecordTag::Dsvv),
            "NCSZ" => Some(RecordTag::Ncsz),
            _ => None,
        }
    }
}

/// Which framing a stream uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Request file produced by the sender.
    Outbound,
    /// Result file returned by the service.
    Inbound,
}

/// Result status of a detail record (`KENNZRM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LookupStatus {
    /// Request not yet processed (value sent by the sender).
    #[default]
    Initial,
    /// No identifier found.
    NoResult,
    /// Exactly one identifier found; see `assigned_id`.
    Unique,
    /// Several candidates; no identifier assigned.
    Ambiguous,
}

impl LookupStatus {
    /// Single-digit wire code.
    pub fn code(&self) -> u8 {
        match self {
            LookupStatus::Initial => 0,
            LookupStatus::NoResult => 1,
            LookupStatus::Unique => 2,
            LookupStatus::Ambiguous => 3,
        }
    }

    /// Resolve a wire code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(LookupStatus::Initial),
            1 => Some(LookupStatus::NoResult),
            2 => Some(LookupStatus::Unique),
            3 => Some(LookupStatus::Ambiguous),
            _ => None,
        }
    }
}

/// Batch header (`VOSZ`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchHeader {
    /// Procedure marker (`VFMM`).
    pub procedure_marker: String,
    /// Sender organization id (`ABSN`).
    pub sender_id: String,
    /// Receiver organization id (`EPNR`).
    pub receiver_id: String,
    /// Creation time (`ED`).
    pub created: NaiveDateTime,
    /// File number (`DTNR`).
    pub file_number: u32,
    /// Sender name (`NAAB`).
    pub sender_name: String,
    /// Error blocks trailing the record.
    pub errors: Vec<ValidationError>,
}

/// Extended header (`DSKO`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedHeader {
    /// Procedure (`VF`).
    pub procedure: String,
    /// Sender organization id (`ABSN`).
    pub sender_id: String,
    /// Receiver organization id (`EPNR`).
    pub receiver_id: String,
    /// Creation time (`ED`).
    pub created: NaiveDateTime,
    /// Organization the lookup is made for (`ABSNER`).
    pub company_id: String,
    /// Registered product id (`PRODID`).
    pub product_id: String,
    /// Registered module id (`MODID`).
    pub module_id: String,
    /// Company name (`NAME1`).
    pub company_name: String,
    /// Company postal code (`PLZ`).
    pub postal_code: String,
    /// Company city (`ORT`).
    pub city: String,
    /// Company street (`STR`).
    pub street: String,
    /// Contact salutation code (`ANRAP`).
    pub contact_salutation: String,
    /// Contact name (`NAMEAP`).
    pub contact_name: String,
    /// Contact phone (`TELAP`).
    pub phone: String,
    /// Contact fax (`FAXAP`).
    pub fax: String,
    /// Contact e-mail (`EMAILAP`).
    pub email: String,
    /// Error blocks trailing the record.
    pub errors: Vec<ValidationError>,
}

/// Detail record (`DSVV`), shared by both framings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRecord {
    /// Sender organization id (`ABSN`).
    pub sender_id: String,
    /// Receiver organization id (`EPNR`).
    pub receiver_id: String,
    /// Creation time (`ED`).
    pub created: NaiveDateTime,
    /// Result status (`KENNZRM`).
    pub status: LookupStatus,
    /// Organization the subject works for (`BBNRVU`).
    pub company_id: String,
    /// Caller-side record id, echoed back (`DSID`).
    pub record_id: String,
    /// Personnel number (`AZVU`).
    pub personnel_number: String,
    /// Transfer marker (`MMUEB`), always 1 on requests.
    pub transfer_marker: u8,
    /// Identifier assigned by the service (`VSNR`).
    pub assigned_id: Option<String>,
    /// Surname (`FMNA`).
    pub surname: String,
    /// Given name (`VONA`).
    pub given_name: String,
    /// Birth date (`GBDT`).
    pub birth_date: NaiveDate,
    /// Birth name (`GBNA`).
    pub birth_name: Option<String>,
    /// Birth place (`GBOT`).
    pub birth_place: Option<String>,
    /// Sex (`GE`).
    pub sex: Sex,
    /// Postal code (`PLZ`).
    pub postal_code: String,
    /// City (`ORT`).
    pub city: String,
    /// Error blocks trailing the record.
    pub errors: Vec<ValidationError>,
}

impl DetailRecord {
    /// True if any trailing block is a real error.
    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(ValidationError::is_error)
    }
}

/// Batch trailer (`NCSZ`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchTrailer {
    /// Procedure marker (`VFMM`).
    pub procedure_marker: String,
    /// Sender organization id (`ABSN`).
    pub sender_id: String,
    /// Receiver organization id (`EPNR`).
    pub receiver_id: String,
    /// Creation time (`ED`).
    pub created: NaiveDateTime,
    /// File number (`DTNR`).
    pub file_number: u32,
    /// Number of records counted by this trailer (`ZLSZ`).
    pub record_count: u32,
    /// Error blocks trailing the record.
    pub errors: Vec<ValidationError>,
}

/// `VOSZ` → `DSKO` → N × `DSVV` → `NCSZ`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundBatch {
    /// Batch header.
    pub header: BatchHeader,
    /// Extended header.
    pub extended: ExtendedHeader,
    /// Detail records.
    pub details: Vec<DetailRecord>,
    /// Trailer.
    pub trailer: BatchTrailer,
}

/// `VOSZ`(service) → `VOSZ`(echoed sender) → N × `DSVV` →
/// `NCSZ`(echoed sender) → `NCSZ`(service).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundBatch {
    /// Header added by the service.
    pub service_header: BatchHeader,
    /// The sender's original header.
    pub sender_header: BatchHeader,
    /// Detail records carrying result status.
    pub details: Vec<DetailRecord>,
    /// The sender's original trailer.
    pub sender_trailer: BatchTrailer,
    /// Trailer added by the service.
    pub service_trailer: BatchTrailer,
}

impl InboundBatch {
    /// Every error block in the file, in record order.
    pub fn all_errors(&self) -> impl Iterator<Item = &ValidationError> {
        self.service_header
            .errors
            .iter()
            .chain(&self.sender_header.errors)
            .chain(self.details.iter().flat_map(|d| d.errors.iter()))
            .chain(&self.sender_trailer.errors)
            .chain(&self.service_trailer.errors)
    }
}

/// A decoded batch file in either framing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchFile {
    /// Request framing.
    Outbound(OutboundBatch),
    /// Result framing.
    Inbound(InboundBatch),
}

impl BatchFile {
    /// Framing of this file.
    pub fn direction(&self) -> Direction {
        match self {
            BatchFile::Outbound(_) => Direction::Outbound,
            BatchFile::Inbound(_) => Direction::Inbound,
        }
    }

    /// Detail records, whatever the framing.
    pub fn details(&self) -> &[DetailRecord] {
        match self {
            BatchFile::Outbound(batch) => &batch.details,
            BatchFile::Inbound(batch) => &batch.details,
        }
    }
}

/// Product registration carried in the extended header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRegistration {
    /// Registered product id.
    pub product_id: String,
    /// Registered module id.
    pub module_id: String,
}

/// Everything needed to encode one outbound request file.
#[derive(Debug, Clone)]
pub struct BatchRequest<'a> {
    /// The submitting party.
    pub sender: &'a shared_types::Sender,
    /// The company the lookup is made for.
    pub company: &'a shared_types::Company,
    /// Receiving organization id.
    pub receiver_id: &'a str,
    /// Product registration.
    pub registration: &'a ProductRegistration,
    /// File number.
    pub file_number: u32,
    /// Creation time (local, as written into the records).
    pub created: NaiveDateTime,
    /// Subjects, one detail record each.
    pub subjects: &'a [shared_types::Subject],
}

/// Result of `encode_outbound`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBatch {
    /// Record lines without terminators, in file order.
    pub records: Vec<String>,
    /// ISO-8859-1 bytes, every record CRLF-terminated.
    pub bytes: Vec<u8>,
}
