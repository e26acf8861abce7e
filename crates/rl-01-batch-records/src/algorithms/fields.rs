//! # Field Formatting
//!
//! Writes and reads single records against a [`RecordSchema`].
//!
//! Writing is strict: values wider than their field and characters outside
//! ISO-8859-1 are rejected instead of truncated or replaced. Reading is
//! strict about the fixed part and about the number of error blocks.

use super::schema::{
    FieldKind, FieldSpec, RecordSchema, ERROR_BLOCK_TAG, ERROR_DESCRIPTION_WIDTH,
    ERROR_TEXT_WIDTH, LONG_ERROR_BLOCK_TAG, MAX_ERROR_BLOCKS, TAG_WIDTH,
};
use crate::domain::{BatchError, ValidationError};
use chrono::{NaiveDate, NaiveDateTime, Timelike};

const DATE_FORMAT: &str = "%Y%m%d";
const SECONDS_FORMAT: &str = "%Y%m%d%H%M%S";

/// Render a timestamp as `yyyyMMddHHmmss` + six fraction digits.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    let micros = (ts.nanosecond() / 1_000).min(999_999);
    format!("{}{:06}", ts.format(SECONDS_FORMAT), micros)
}

/// Parse a 20-character timestamp.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if raw.len() != 20 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (seconds, fraction) = raw.split_at(14);
    let micros: u32 = fraction.parse().ok()?;
    NaiveDateTime::parse_from_str(seconds, SECONDS_FORMAT)
        .ok()?
        .with_nanosecond(micros * 1_000)
}

/// Builds one record line.
pub struct RecordWriter<'s> {
    schema: &'s RecordSchema,
    values: Vec<Option<String>>,
}

impl<'s> RecordWriter<'s> {
    /// Start a record of the given layout.
    pub fn new(schema: &'s RecordSchema) -> Self {
        Self {
            schema,
            values: vec![None; schema.fields.len()],
        }
    }

    fn invalid(&self, field: &'static str, reason: impl Into<String>) -> BatchError {
        BatchError::InvalidField {
            record: self.schema.tag.as_str(),
            field,
            reason: reason.into(),
        }
    }

    fn spec(&self, name: &'static str, kind: FieldKind) -> Result<(usize, &'s FieldSpec), BatchError> {
        let (index, spec) = self
            .schema
            .field(name)
            .ok_or_else(|| self.invalid(name, "no such field"))?;
        if spec.kind != kind {
            return Err(self.invalid(name, format!("field is {:?}, not {:?}", spec.kind, kind)));
        }
        Ok((index, spec))
    }

    fn put(&mut self, index: usize, spec: &FieldSpec, value: String) -> Result<&mut Self, BatchError> {
        let len = value.chars().count();
        if len > spec.width {
            return Err(self.invalid(
                spec.name,
                format!("value has {len} characters, field holds {}", spec.width),
            ));
        }
        if !shared_types::is_latin1(&value) {
            return Err(self.invalid(spec.name, "value is not representable in ISO-8859-1"));
        }
        self.values[index] = Some(pad(spec, &value));
        Ok(self)
    }

    /// Set a text field.
    pub fn text(&mut self, name: &'static str, value: &str) -> Result<&mut Self, BatchError> {
        let (index, spec) = self.spec(name, FieldKind::Text)?;
        if value.contains(['\r', '\n']) {
            return Err(self.invalid(name, "value contains a line break"));
        }
        self.put(index, spec, value.to_string())
    }

    /// Set a text field that may be absent (written as spaces).
    pub fn opt_text(&mut self, name: &'static str, value: Option<&str>) -> Result<&mut Self, BatchError> {
        self.text(name, value.unwrap_or(""))
    }

    /// Set a numeric field.
    pub fn numeric(&mut self, name: &'static str, value: u64) -> Result<&mut Self, BatchError> {
        let (index, spec) = self.spec(name, FieldKind::Numeric)?;
        self.put(index, spec, value.to_string())
    }

    /// Set a date field.
    pub fn date(&mut self, name: &'static str, value: &NaiveDate) -> Result<&mut Self, BatchError> {
        let (index, spec) = self.spec(name, FieldKind::Date)?;
        self.put(index, spec, value.format(DATE_FORMAT).to_string())
    }

    /// Set a timestamp field.
    pub fn timestamp(&mut self, name: &'static str, value: &NaiveDateTime) -> Result<&mut Self, BatchError> {
        let (index, spec) = self.spec(name, FieldKind::Timestamp)?;
        self.put(index, spec, format_timestamp(value))
    }

    /// Render the record, appending one block per error entry and setting
    /// `FEKZ`/`FEAN` accordingly.
    pub fn finish(mut self, errors: &[ValidationError]) -> Result<String, BatchError> {
        if errors.len() > MAX_ERROR_BLOCKS {
            return Err(self.invalid(
                "FEAN",
                format!("{} error blocks, at most {MAX_ERROR_BLOCKS} allowed", errors.len()),
            ));
        }
        self.numeric("FEKZ", u64::from(!errors.is_empty()))?;
        self.numeric("FEAN", errors.len() as u64)?;

        let mut line = String::with_capacity(self.schema.width());
        line.push_str(self.schema.tag.as_str());
        for (spec, value) in self.schema.fields.iter().zip(&self.values) {
            match value {
                Some(v) => line.push_str(v),
                None => line.push_str(&blank(spec)),
            }
        }
        for error in errors {
            line.push_str(&self.error_block(error)?);
        }
        Ok(line)
    }

    fn error_block(&self, error: &ValidationError) -> Result<String, BatchError> {
        let fe = if error.message.is_empty() {
            error.code.clone()
        } else {
            format!("{} {}", error.code, error.message)
        };
        let fe = self.block_field("FE", &fe, ERROR_TEXT_WIDTH)?;
        match error.description.as_deref() {
            Some(description) => {
                let felang = self.block_field("FELANG", description, ERROR_DESCRIPTION_WIDTH)?;
                Ok(format!("{LONG_ERROR_BLOCK_TAG}{fe}{felang}"))
            }
            None => Ok(format!("{ERROR_BLOCK_TAG}{fe}")),
        }
    }

    fn block_field(&self, field: &'static str, value: &str, width: usize) -> Result<String, BatchError> {
        let len = value.chars().count();
        if len > width {
            return Err(self.invalid(field, format!("value has {len} characters, field holds {width}")));
        }
        if !shared_types::is_latin1(value) {
            return Err(self.invalid(field, "value is not representable in ISO-8859-1"));
        }
        Ok(format!("{value:<width$}"))
    }
}

fn pad(spec: &FieldSpec, value: &str) -> String {
    let width = spec.width;
    match spec.kind {
        FieldKind::Numeric => format!("{value:0>width$}"),
        FieldKind::Text | FieldKind::Date | FieldKind::Timestamp => format!("{value:<width$}"),
    }
}

fn blank(spec: &FieldSpec) -> String {
    match spec.kind {
        FieldKind::Numeric => "0".repeat(spec.width),
        FieldKind::Text | FieldKind::Date | FieldKind::Timestamp => " ".repeat(spec.width),
    }
}

/// Reads fields out of one record line.
pub struct RecordReader<'s> {
    schema: &'s RecordSchema,
    chars: Vec<char>,
    line: usize,
}

impl<'s> RecordReader<'s> {
    /// Check the tag and minimum width of `text`.
    pub fn new(schema: &'s RecordSchema, text: &str, line: usize) -> Result<Self, BatchError> {
        let chars: Vec<char> = text.chars().collect();
        let tag: String = chars.iter().take(TAG_WIDTH).collect();
        if tag != schema.tag.as_str() {
            return Err(BatchError::malformed(
                line,
                format!("expected {} record, found {tag:?}", schema.tag.as_str()),
            ));
        }
        if chars.len() < schema.width() {
            return Err(BatchError::malformed(
                line,
                format!(
                    "{} record has {} characters, expected at least {}",
                    schema.tag.as_str(),
                    chars.len(),
                    schema.width()
                ),
            ));
        }
        Ok(Self { schema, chars, line })
    }

    fn bad(&self, field: &str, reason: impl std::fmt::Display) -> BatchError {
        BatchError::malformed(
            self.line,
            format!("{}.{field}: {reason}", self.schema.tag.as_str()),
        )
    }

    fn raw(&self, name: &str) -> Result<String, BatchError> {
        let (_, spec) = self
            .schema
            .field(name)
            .ok_or_else(|| self.bad(name, "no such field"))?;
        Ok(self.chars[spec.offset..spec.offset + spec.width].iter().collect())
    }

    /// Text field with trailing padding removed.
    pub fn text(&self, name: &str) -> Result<String, BatchError> {
        Ok(self.raw(name)?.trim_end().to_string())
    }

    /// Text field, `None` when blank.
    pub fn opt_text(&self, name: &str) -> Result<Option<String>, BatchError> {
        let value = self.text(name)?;
        Ok((!value.trim().is_empty()).then_some(value))
    }

    /// Numeric field.
    pub fn numeric(&self, name: &str) -> Result<u64, BatchError> {
        let raw = self.raw(name)?;
        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(self.bad(name, format!("{raw:?} is not numeric")));
        }
        raw.parse().map_err(|e| self.bad(name, e))
    }

    /// Numeric field narrowed to `u32`.
    pub fn numeric_u32(&self, name: &str) -> Result<u32, BatchError> {
        let value = self.numeric(name)?;
        u32::try_from(value).map_err(|e| self.bad(name, e))
    }

    /// Numeric field narrowed to `u8`.
    pub fn numeric_u8(&self, name: &str) -> Result<u8, BatchError> {
        let value = self.numeric(name)?;
        u8::try_from(value).map_err(|e| self.bad(name, e))
    }

    /// Date field.
    pub fn date(&self, name: &str) -> Result<NaiveDate, BatchError> {
        let raw = self.raw(name)?;
        NaiveDate::parse_from_str(&raw, DATE_FORMAT)
            .map_err(|e| self.bad(name, format!("{raw:?}: {e}")))
    }

    /// Timestamp field.
    pub fn timestamp(&self, name: &str) -> Result<NaiveDateTime, BatchError> {
        let raw = self.raw(name)?;
        parse_timestamp(&raw).ok_or_else(|| self.bad(name, format!("{raw:?} is not a timestamp")))
    }

    /// Error blocks following the fixed part, as announced by `FEKZ`/`FEAN`.
    pub fn errors(&self) -> Result<Vec<ValidationError>, BatchError> {
        let flagged = self.numeric_u8("FEKZ")?;
        let count = usize::from(self.numeric_u8("FEAN")?);
        let tail = &self.chars[self.schema.width()..];

        match (flagged, count) {
            (0, 0) => {}
            (1, n) if n > 0 => {}
            _ => {
                return Err(self.bad(
                    "FEKZ",
                    format!("error flag {flagged} inconsistent with {count} error block(s)"),
                ))
            }
        }

        let mut errors = Vec::with_capacity(count);
        let mut pos = 0;
        for _ in 0..count {
            let tag: String = tail.iter().skip(pos).take(TAG_WIDTH).collect();
            pos += TAG_WIDTH;
            let long = match tag.as_str() {
                ERROR_BLOCK_TAG => false,
                LONG_ERROR_BLOCK_TAG => true,
                other => return Err(self.bad("FE", format!("expected error block, found {other:?}"))),
            };

            let fe = take(tail, pos, ERROR_TEXT_WIDTH);
            pos += ERROR_TEXT_WIDTH;
            let mut error = ValidationError::parse(&fe);
            if long {
                let description = take(tail, pos, ERROR_DESCRIPTION_WIDTH);
                pos += ERROR_DESCRIPTION_WIDTH;
                let description = description.trim_end();
                error.description = (!description.is_empty()).then(|| description.to_string());
            }
            errors.push(error);
        }

        let rest: String = tail.iter().skip(pos).collect();
        if !rest.trim().is_empty() {
            return Err(self.bad("FE", format!("unexpected data after error blocks: {rest:?}")));
        }
        Ok(errors)
    }
}

/// Up to `width` characters from `pos`; a short final block is accepted.
fn take(chars: &[char], pos: usize, width: usize) -> String {
    chars.iter().skip(pos).take(width).collect()
}
