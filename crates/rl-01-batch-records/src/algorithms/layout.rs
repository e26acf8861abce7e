//! # Record Layout
//!
//! Conversion between the typed records and their line form.

use super::fields::{RecordReader, RecordWriter};
use super::schema::schemas;
use crate::domain::{
    BatchError, BatchHeader, BatchTrailer, DetailRecord, ExtendedHeader, LookupStatus, RecordTag,
};
use shared_types::Sex;

/// Render a batch header.
pub fn write_header(header: &BatchHeader) -> Result<String, BatchError> {
    let mut w = RecordWriter::new(schemas().get(RecordTag::Vosz));
    w.text("VFMM", &header.procedure_marker)?
        .text("ABSN", &header.sender_id)?
        .text("EPNR", &header.receiver_id)?
        .timestamp("ED", &header.created)?
        .numeric("DTNR", u64::from(header.file_number))?
        .text("NAAB", &header.sender_name)?;
    w.finish(&header.errors)
}

/// Read a batch header.
pub fn read_header(line: &str, line_no: usize) -> Result<BatchHeader, BatchError> {
    let r = RecordReader::new(schemas().get(RecordTag::Vosz), line, line_no)?;
    Ok(BatchHeader {
        procedure_marker: r.text("VFMM")?,
        sender_id: r.text("ABSN")?,
        receiver_id: r.text("EPNR")?,
        created: r.timestamp("ED")?,
        file_number: r.numeric_u32("DTNR")?,
        sender_name: r.text("NAAB")?,
        errors: r.errors()?,
    })
}

/// Render an extended header.
pub fn write_extended(ext: &ExtendedHeader) -> Result<String, BatchError> {
    let mut w = RecordWriter::new(schemas().get(RecordTag::Dsko));
    w.text("VF", &ext.procedure)?
        .text("ABSN", &ext.sender_id)?
        .text("EPNR", &ext.receiver_id)?
        .timestamp("ED", &ext.created)?
        .text("ABSNER", &ext.company_id)?
        .text("PRODID", &ext.product_id)?
        .text("MODID", &ext.module_id)?
        .text("NAME1", &ext.company_name)?
        .text("PLZ", &ext.postal_code)?
        .text("ORT", &ext.city)?
        .text("STR", &ext.street)?
        .text("ANRAP", &ext.contact_salutation)?
        .text("NAMEAP", &ext.contact_name)?
        .text("TELAP", &ext.phone)?
        .text("FAXAP", &ext.fax)?
        .text("EMAILAP", &ext.email)?;
    w.finish(&ext.errors)
}

/// Read an extended header.
pub fn read_extended(line: &str, line_no: usize) -> Result<ExtendedHeader, BatchError> {
    let r = RecordReader::new(schemas().get(RecordTag::Dsko), line, line_no)?;
    Ok(ExtendedHeader {
        procedure: r.text("VF")?,
        sender_id: r.text("ABSN")?,
        receiver_id: r.text("EPNR")?,
        created: r.timestamp("ED")?,
        company_id: r.text("ABSNER")?,
        product_id: r.text("PRODID")?,
        module_id: r.text("MODID")?,
        company_name: r.text("NAME1")?,
        postal_code: r.text("PLZ")?,
        city: r.text("ORT")?,
        street: r.text("STR")?,
        contact_salutation: r.text("ANRAP")?,
        contact_name: r.text("NAMEAP")?,
        phone: r.text("TELAP")?,
        fax: r.text("FAXAP")?,
        email: r.text("EMAILAP")?,
        errors: r.errors()?,
    })
}

/// Render a detail record.
pub fn write_detail(detail: &DetailRecord) -> Result<String, BatchError> {
    let mut w = RecordWriter::new(schemas().get(RecordTag::Dsvv));
    w.text("ABSN", &detail.sender_id)?
        .text("EPNR", &detail.receiver_id)?
        .timestamp("ED", &detail.created)?
        .numeric("KENNZRM", u64::from(detail.status.code()))?
        .text("BBNRVU", &detail.company_id)?
        .text("DSID", &detail.record_id)?
        .text("AZVU", &detail.personnel_number)?
        .numeric("MMUEB", u64::from(detail.transfer_marker))?
        .opt_text("VSNR", detail.assigned_id.as_deref())?
        .text("FMNA", &detail.surname)?
        .text("VONA", &detail.given_name)?
        .date("GBDT", &detail.birth_date)?
        .opt_text("GBNA", detail.birth_name.as_deref())?
        .opt_text("GBOT", detail.birth_place.as_deref())?
        .text("GE", detail.sex.code())?
        .text("PLZ", &detail.postal_code)?
        .text("ORT", &detail.city)?;
    w.finish(&detail.errors)
}

/// Read a detail record.
pub fn read_detail(line: &str, line_no: usize) -> Result<DetailRecord, BatchError> {
    let r = RecordReader::new(schemas().get(RecordTag::Dsvv), line, line_no)?;

    let status_code = r.numeric_u8("KENNZRM")?;
    let status = LookupStatus::from_code(status_code).ok_or_else(|| {
        BatchError::malformed(line_no, format!("DSVV.KENNZRM: unknown status {status_code}"))
    })?;
    let sex_code = r.text("GE")?;
    let sex = Sex::from_code(&sex_code).ok_or_else(|| {
        BatchError::malformed(line_no, format!("DSVV.GE: unknown sex {sex_code:?}"))
    })?;

    Ok(DetailRecord {
        sender_id: r.text("ABSN")?,
        receiver_id: r.text("EPNR")?,
        created: r.timestamp("ED")?,
        status,
        company_id: r.text("BBNRVU")?,
        record_id: r.text("DSID")?,
        personnel_number: r.text("AZVU")?,
        transfer_marker: r.numeric_u8("MMUEB")?,
        assigned_id: r.opt_text("VSNR")?,
        surname: r.text("FMNA")?,
        given_name: r.text("VONA")?,
        birth_date: r.date("GBDT")?,
        birth_name: r.opt_text("GBNA")?,
        birth_place: r.opt_text("GBOT")?,
        sex,
        postal_code: r.text("PLZ")?,
        city: r.text("ORT")?,
        errors: r.errors()?,
    })
}

/// Render a batch trailer.
pub fn write_trailer(trailer: &BatchTrailer) -> Result<String, BatchError> {
    let mut w = RecordWriter::new(schemas().get(RecordTag::Ncsz));
    w.text("VFMM", &trailer.procedure_marker)?
        .text("ABSN", &trailer.sender_id)?
        .text("EPNR", &trailer.receiver_id)?
        .timestamp("ED", &trailer.created)?
        .numeric("DTNR", u64::from(trailer.file_number))?
        .numeric("ZLSZ", u64::from(trailer.record_count))?;
    w.finish(&trailer.errors)
}

/// Read a batch trailer.
pub fn read_trailer(line: &str, line_no: usize) -> Result<BatchTrailer, BatchError> {
    let r = RecordReader::new(schemas().get(RecordTag::Ncsz), line, line_no)?;
    Ok(BatchTrailer {
        procedure_marker: r.text("VFMM")?,
        sender_id: r.text("ABSN")?,
        receiver_id: r.text("EPNR")?,
        created: r.timestamp("ED")?,
        file_number: r.numeric_u32("DTNR")?,
        record_count: r.numeric_u32("ZLSZ")?,
        errors: r.errors()?,
    })
}
