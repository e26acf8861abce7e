//! # Algorithms Module
//!
//! Record schemas, field formatting and per-record layout.

pub mod fields;
pub mod layout;
pub mod schema;

pub use fields::{format_timestamp, parse_timestamp, RecordReader, RecordWriter};
pub use layout::{
    read_detail, read_extended, read_header, read_trailer, write_detail, write_extended,
    write_header, write_trailer,
};
pub use schema::{schemas, FieldKind, FieldSpec, RecordSchema, SchemaTable};
