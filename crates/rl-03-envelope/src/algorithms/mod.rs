//! # Algorithms Module
//!
//! XML reading and writing for the envelope format.

pub mod components;
pub mod dom;
pub mod request;
pub mod response;
pub mod writer;

pub use dom::{parse_document, Element};
pub use request::write_request;
pub use response::{read_document, ResponseDocument};
pub use writer::XmlWriter;
