//! # Batch Record Codec
//!
//! Encodes outbound request files and decodes both framings.
//!
//! ## Outbound encoding
//!
//! 1. Build typed records from identity, company and subjects
//! 2. Render each record against its schema (strict field checks)
//! 3. Drop blank lines, hand header + detail lines to the business-rule
//!    validator as one unit
//! 4. Join as CRLF-terminated ISO-8859-1 bytes
//!
//! Nothing is returned unless every step succeeds, so no partially valid
//! file can reach the transport layer.

use crate::algorithms::{
    read_detail, read_extended, read_header, read_trailer, write_detail, write_extended,
    write_header, write_trailer,
};
use crate::domain::{
    expected_record_count, invariant_record_count, BatchError, BatchFile, BatchHeader,
    BatchRequest, BatchTrailer, DetailRecord, Direction, EncodedBatch, ExtendedHeader,
    InboundBatch, LookupStatus, OutboundBatch, RecordTag, ValidationErrors,
    EMPLOYER_PROCEDURE_MARKER, REPORTING_PROCEDURE,
};
use crate::ports::RecordValidator;
use std::sync::Arc;
use tracing::{debug, info, warn};

const LINE_END: &str = "\r\n";

/// Fixed-width batch record codec.
#[derive(Clone, Default)]
pub struct BatchRecordCodec {
    validator: Option<Arc<dyn RecordValidator>>,
}

impl std::fmt::Debug for BatchRecordCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchRecordCodec")
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

impl BatchRecordCodec {
    /// Codec without business-rule validation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Codec running `validator` on every outbound file.
    pub fn with_validator(validator: Arc<dyn RecordValidator>) -> Self {
        Self {
            validator: Some(validator),
        }
    }

    /// Build the typed outbound file for a request.
    pub fn build_outbound(&self, request: &BatchRequest<'_>) -> OutboundBatch {
        let sender = request.sender;
        let company = request.company;
        let created_day = request.created.date().and_time(chrono::NaiveTime::default());

        let header = BatchHeader {
            procedure_marker: EMPLOYER_PROCEDURE_MARKER.to_string(),
            sender_id: sender.organization_id.clone(),
            receiver_id: request.receiver_id.to_string(),
            created: created_day,
            file_number: request.file_number,
            sender_name: sender.name.clone(),
            errors: vec![],
        };

        let extended = ExtendedHeader {
            procedure: REPORTING_PROCEDURE.to_string(),
            sender_id: sender.organization_id.clone(),
            receiver_id: request.receiver_id.to_string(),
            created: request.created,
            company_id: company.organization_id.clone(),
            product_id: request.registration.product_id.clone(),
            module_id: request.registration.module_id.clone(),
            company_name: company.name.clone(),
            postal_code: company.postal_code.clone(),
            city: company.city.clone(),
            street: company.street.clone(),
            contact_salutation: sender.contact_salutation.code().to_string(),
            contact_name: sender.contact_person.clone(),
            phone: sender.phone.clone(),
            fax: sender.fax.clone(),
            email: sender.email.clone(),
            errors: vec![],
        };

        let details: Vec<DetailRecord> = request
            .subjects
            .iter()
            .map(|subject| DetailRecord {
                sender_id: sender.organization_id.clone(),
                receiver_id: request.receiver_id.to_string(),
                created: request.created,
                status: LookupStatus::Initial,
                company_id: company.organization_id.clone(),
                record_id: subject.id.to_string(),
                personnel_number: subject.personnel_number.clone(),
                transfer_marker: 1,
                assigned_id: None,
                surname: subject.surname.clone(),
                given_name: subject.given_name.clone(),
                birth_date: subject.birth_date,
                birth_name: subject.birth_name.clone(),
                birth_place: subject.birth_place.clone(),
                sex: subject.sex,
                postal_code: subject.postal_code.clone(),
                city: subject.city.clone(),
                errors: vec![],
            })
            .collect();

        let trailer = BatchTrailer {
            procedure_marker: EMPLOYER_PROCEDURE_MARKER.to_string(),
            sender_id: sender.organization_id.clone(),
            receiver_id: request.receiver_id.to_string(),
            created: created_day,
            file_number: request.file_number,
            record_count: expected_record_count(details.len()),
            errors: vec![],
        };

        OutboundBatch {
            header,
            extended,
            details,
            trailer,
        }
    }

    /// Encode and validate an outbound request file.
    ///
    /// # Errors
    ///
    /// - `BatchError::InvalidField` if a value does not fit its field
    /// - `BatchError::Validation` with every violation the business-rule
    ///   validator reported
    pub fn encode_outbound(&self, request: &BatchRequest<'_>) -> Result<EncodedBatch, BatchError> {
        let batch = self.build_outbound(request);
        let records: Vec<String> = render_outbound(&batch)?
            .into_iter()
            .filter(|line| !line.trim().is_empty())
            .collect();

        self.validate(&records)?;

        let bytes = join_records(&records)?;
        info!(
            "[rl-01] Encoded file {} with {} detail record(s), {} bytes",
            request.file_number,
            batch.details.len(),
            bytes.len()
        );
        Ok(EncodedBatch { records, bytes })
    }

    fn validate(&self, records: &[String]) -> Result<(), BatchError> {
        let Some(validator) = &self.validator else {
            return Ok(());
        };
        // header, extended header, details..., trailer
        let Some(header) = records.first() else {
            return Ok(());
        };
        let details = records
            .get(2..records.len().saturating_sub(1))
            .unwrap_or_default();

        let messages = validator.validate(header, details);
        if messages.is_empty() {
            debug!("[rl-01] Business-rule validation passed for {} detail(s)", details.len());
            return Ok(());
        }

        let errors = ValidationErrors::from_messages(&messages);
        warn!("[rl-01] Business-rule validation rejected the file: {}", errors);
        Err(BatchError::Validation(errors))
    }

    /// Encode a typed file of either framing without business-rule checks.
    ///
    /// Used to produce service-side result files and for round trips.
    pub fn encode(&self, file: &BatchFile) -> Result<Vec<u8>, BatchError> {
        let records = match file {
            BatchFile::Outbound(batch) => render_outbound(batch)?,
            BatchFile::Inbound(batch) => render_inbound(batch)?,
        };
        join_records(&records)
    }

    /// Decode `text` in the given framing.
    pub fn decode(&self, text: &str, direction: Direction) -> Result<BatchFile, BatchError> {
        match direction {
            Direction::Outbound => self.decode_outbound(text).map(BatchFile::Outbound),
            Direction::Inbound => self.decode_inbound(text).map(BatchFile::Inbound),
        }
    }

    /// Decode a request file: `VOSZ`, `DSKO`, `DSVV`*, `NCSZ`.
    ///
    /// # Errors
    ///
    /// `BatchError::Malformed` on any shape or content violation.
    pub fn decode_outbound(&self, text: &str) -> Result<OutboundBatch, BatchError> {
        let mut lines = Lines::new(text);

        let (no, line) = lines.expect(RecordTag::Vosz)?;
        let header = read_header(line, no)?;
        let (no, line) = lines.expect(RecordTag::Dsko)?;
        let extended = read_extended(line, no)?;
        let details = lines.details()?;
        let (no, line) = lines.expect(RecordTag::Ncsz)?;
        let trailer = read_trailer(line, no)?;
        lines.end()?;

        check_count(&trailer, &details, no)?;
        debug!("[rl-01] Decoded outbound file with {} detail(s)", details.len());
        Ok(OutboundBatch {
            header,
            extended,
            details,
            trailer,
        })
    }

    /// Decode a result file: `VOSZ`, `VOSZ`, `DSVV`*, `NCSZ`, `NCSZ`.
    ///
    /// The echoed sender trailer is checked against the detail count; the
    /// service trailer counts the service's own envelope records.
    ///
    /// # Errors
    ///
    /// `BatchError::Malformed` on any shape or content violation, including
    /// a missing second trailer.
    pub fn decode_inbound(&self, text: &str) -> Result<InboundBatch, BatchError> {
        let mut lines = Lines::new(text);

        let (no, line) = lines.expect(RecordTag::Vosz)?;
        let service_header = read_header(line, no)?;
        let (no, line) = lines.expect(RecordTag::Vosz)?;
        let sender_header = read_header(line, no)?;
        let details = lines.details()?;
        let (no, line) = lines.expect(RecordTag::Ncsz)?;
        let sender_trailer = read_trailer(line, no)?;
        check_count(&sender_trailer, &details, no)?;
        let (no, line) = lines.expect(RecordTag::Ncsz)?;
        let service_trailer = read_trailer(line, no)?;
        lines.end()?;

        debug!("[rl-01] Decoded inbound file with {} detail(s)", details.len());
        Ok(InboundBatch {
            service_header,
            sender_header,
            details,
            sender_trailer,
            service_trailer,
        })
    }
}

fn render_outbound(batch: &OutboundBatch) -> Result<Vec<String>, BatchError> {
    let mut records = Vec::with_capacity(batch.details.len() + 3);
    records.push(write_header(&batch.header)?);
    records.push(write_extended(&batch.extended)?);
    for detail in &batch.details {
        records.push(write_detail(detail)?);
    }
    records.push(write_trailer(&batch.trailer)?);
    Ok(records)
}

fn render_inbound(batch: &InboundBatch) -> Result<Vec<String>, BatchError> {
    let mut records = Vec::with_capacity(batch.details.len() + 4);
    records.push(write_header(&batch.service_header)?);
    records.push(write_header(&batch.sender_header)?);
    for detail in &batch.details {
        records.push(write_detail(detail)?);
    }
    records.push(write_trailer(&batch.sender_trailer)?);
    records.push(write_trailer(&batch.service_trailer)?);
    Ok(records)
}

fn join_records(records: &[String]) -> Result<Vec<u8>, BatchError> {
    let mut text = String::with_capacity(records.iter().map(|r| r.len() + 2).sum());
    for record in records {
        text.push_str(record);
        text.push_str(LINE_END);
    }
    // Field writers already reject non-Latin-1 input.
    shared_types::encode_latin1(&text).map_err(|e| BatchError::InvalidField {
        record: "file",
        field: "text",
        reason: e.to_string(),
    })
}

fn check_count(trailer: &BatchTrailer, details: &[DetailRecord], line: usize) -> Result<(), BatchError> {
    if invariant_record_count(trailer, details) {
        return Ok(());
    }
    Err(BatchError::malformed(
        line,
        format!(
            "trailer counts {} record(s), file has {} detail record(s) plus header",
            trailer.record_count,
            details.len()
        ),
    ))
}

/// Non-blank lines with their 1-based position.
struct Lines<'t> {
    lines: std::iter::Peekable<std::iter::Enumerate<std::vec::IntoIter<&'t str>>>,
    last: usize,
}

impl<'t> Lines<'t> {
    fn new(text: &'t str) -> Self {
        let kept: Vec<&str> = text
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .filter(|l| !l.trim().is_empty())
            .collect();
        Self {
            lines: kept.into_iter().enumerate().peekable(),
            last: 0,
        }
    }

    fn peek_tag(&mut self) -> Option<&'t str> {
        self.lines.peek().map(|&(_, l)| l.get(..4).unwrap_or(l))
    }

    fn expect(&mut self, tag: RecordTag) -> Result<(usize, &'t str), BatchError> {
        match self.lines.next() {
            Some((i, line)) => {
                self.last = i + 1;
                let found = line.get(..4).unwrap_or(line);
                if found != tag.as_str() {
                    return Err(BatchError::malformed(
                        self.last,
                        format!("expected {} record, found {found:?}", tag.as_str()),
                    ));
                }
                Ok((self.last, line))
            }
            None => Err(BatchError::malformed(
                self.last + 1,
                format!("expected {} record, found end of file", tag.as_str()),
            )),
        }
    }

    fn details(&mut self) -> Result<Vec<DetailRecord>, BatchError> {
        let mut details = Vec::new();
        while self.peek_tag() == Some(RecordTag::Dsvv.as_str()) {
            let (no, line) = self.expect(RecordTag::Dsvv)?;
            details.push(read_detail(line, no)?);
        }
        Ok(details)
    }

    fn end(&mut self) -> Result<(), BatchError> {
        match self.lines.next() {
            None => Ok(()),
            Some((i, line)) => Err(BatchError::malformed(
                i + 1,
                format!("unexpected record after trailer: {:?}", line.get(..4).unwrap_or(line)),
            )),
        }
    }
}
