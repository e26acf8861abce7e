//! # Record Schemas
//!
//! Static positional layout of every record type.
//!
//! Each record starts with its four-character tag followed by the fields
//! below in order. Widths are in characters; the file charset is ISO-8859-1
//! so characters and bytes coincide.
//!
//! The table is built once per process on first use and shared read-only
//! afterwards.

use crate::domain::RecordTag;
use std::sync::OnceLock;

/// Width of the record tag.
pub const TAG_WIDTH: usize = 4;

/// Tag of a short error block (`FE` only).
pub const ERROR_BLOCK_TAG: &str = "DBFE";

/// Tag of a long error block (`FE` + `FELANG`).
pub const LONG_ERROR_BLOCK_TAG: &str = "DBFL";

/// Width of the `FE` field of an error block ("CODE message").
pub const ERROR_TEXT_WIDTH: usize = 80;

/// Width of the `FELANG` field of a long error block.
pub const ERROR_DESCRIPTION_WIDTH: usize = 200;

/// Most error blocks one record can carry (`FEAN` is one digit).
pub const MAX_ERROR_BLOCKS: usize = 9;

/// How a field is padded and parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Digits, right-aligned, zero-padded.
    Numeric,
    /// Free text, left-aligned, space-padded.
    Text,
    /// `yyyyMMdd`.
    Date,
    /// `yyyyMMddHHmmss` followed by six fraction digits.
    Timestamp,
}

impl FieldKind {
    /// Fixed width for kinds that have one.
    pub fn fixed_width(&self) -> Option<usize> {
        match self {
            FieldKind::Date => Some(8),
            FieldKind::Timestamp => Some(20),
            FieldKind::Numeric | FieldKind::Text => None,
        }
    }
}

/// One positional field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name as used in the record definitions.
    pub name: &'static str,
    /// Offset from the start of the record, tag included.
    pub offset: usize,
    /// Width in characters.
    pub width: usize,
    /// Padding and parsing rule.
    pub kind: FieldKind,
}

/// Layout of one record type.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    /// Record tag.
    pub tag: RecordTag,
    /// Fields in positional order.
    pub fields: Vec<FieldSpec>,
}

impl RecordSchema {
    fn new(tag: RecordTag, layout: &[(&'static str, usize, FieldKind)]) -> Self {
        let mut offset = TAG_WIDTH;
        let fields = layout
            .iter()
            .map(|&(name, width, kind)| {
                let spec = FieldSpec {
                    name,
                    offset,
                    width,
                    kind,
                };
                offset += width;
                spec
            })
            .collect();
        Self { tag, fields }
    }

    /// Width of the fixed part of the record (tag plus all fields).
    pub fn width(&self) -> usize {
        self.fields
            .last()
            .map_or(TAG_WIDTH, |f| f.offset + f.width)
    }

    /// Index and spec of a field.
    pub fn field(&self, name: &str) -> Option<(usize, &FieldSpec)> {
        self.fields.iter().enumerate().find(|(_, f)| f.name == name)
    }
}

/// All record schemas.
#[derive(Debug)]
pub struct SchemaTable {
    vosz: RecordSchema,
    dsko: RecordSchema,
    dsvv: RecordSchema,
    ncsz: RecordSchema,
}

impl SchemaTable {
    /// Schema of a record type.
    pub fn get(&self, tag: RecordTag) -> &RecordSchema {
        match tag {
            RecordTag::Vosz => &self.vosz,
            RecordTag::Dsko => &self.dsko,
            RecordTag::Dsvv => &self.dsvv,
            RecordTag::Ncsz => &self.ncsz,
        }
    }
}

static SCHEMAS: OnceLock<SchemaTable> = OnceLock::new();

/// The process-wide schema table, built on first access.
pub fn schemas() -> &'static SchemaTable {
    SCHEMAS.get_or_init(|| {
        tracing::debug!("[rl-01] Building record schema table");
        build_schemas()
    })
}

fn build_schemas() -> SchemaTable {
    use FieldKind::{Date, Numeric, Text, Timestamp};

    SchemaTable {
        vosz: RecordSchema::new(
            RecordTag::Vosz,
            &[
                ("VFMM", 5, Text),
                ("ABSN", 15, Text),
                ("EPNR", 15, Text),
                ("ED", 20, Timestamp),
                ("FEKZ", 1, Numeric),
                ("FEAN", 1, Numeric),
                ("DTNR", 7, Numeric),
                ("NAAB", 30, Text),
            ],
        ),
        dsko: RecordSchema::new(
            RecordTag::Dsko,
            &[
                ("VF", 5, Text),
                ("ABSN", 15, Text),
                ("EPNR", 15, Text),
                ("ED", 20, Timestamp),
                ("FEKZ", 1, Numeric),
                ("FEAN", 1, Numeric),
                ("ABSNER", 15, Text),
                ("PRODID", 7, Text),
                ("MODID", 7, Text),
                ("NAME1", 30, Text),
                ("PLZ", 10, Text),
                ("ORT", 34, Text),
                ("STR", 33, Text),
                ("ANRAP", 1, Text),
                ("NAMEAP", 30, Text),
                ("TELAP", 20, Text),
                ("FAXAP", 20, Text),
                ("EMAILAP", 70, Text),
            ],
        ),
        dsvv: RecordSchema::new(
            RecordTag::Dsvv,
            &[
                ("ABSN", 15, Text),
                ("EPNR", 15, Text),
                ("ED", 20, Timestamp),
                ("FEKZ", 1, Numeric),
                ("FEAN", 1, Numeric),
                ("KENNZRM", 1, Numeric),
                ("BBNRVU", 15, Text),
                ("DSID", 20, Text),
                ("AZVU", 20, Text),
                ("MMUEB", 1, Numeric),
                ("VSNR", 12, Text),
                ("FMNA", 30, Text),
                ("VONA", 30, Text),
                ("GBDT", 8, Date),
                ("GBNA", 30, Text),
                ("GBOT", 34, Text),
                ("GE", 1, Text),
                ("PLZ", 10, Text),
                ("ORT", 34, Text),
            ],
        ),
        ncsz: RecordSchema::new(
            RecordTag::Ncsz,
            &[
                ("VFMM", 5, Text),
                ("ABSN", 15, Text),
                ("EPNR", 15, Text),
                ("ED", 20, Timestamp),
                ("FEKZ", 1, Numeric),
                ("FEAN", 1, Numeric),
                ("DTNR", 7, Numeric),
                ("ZLSZ", 9, Numeric),
            ],
        ),
    }
}
