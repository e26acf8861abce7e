//! # Application Module
//!
//! Builder, parser and package decoder services.

pub mod builder;
pub mod decoder;
pub mod parser;

pub use builder::{data_container_name, EnvelopeBuilder, EnvelopeParties, MAX_FILE_NUMBER};
pub use decoder::PackageDecoder;
pub use parser::ResponseParser;
