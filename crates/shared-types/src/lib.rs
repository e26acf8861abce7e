//! # Shared Types Crate
//!
//! This crate contains the domain entities, status flags and text helpers
//! shared by every Registry-Link subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Identity, subject and flag types are defined
//!   here and nowhere else.
//! - **Immutable Inputs**: Identities and subjects are supplied by the caller
//!   and never mutated by the client.
//! - **Wire Charset**: Both wire formats (batch records and XML envelopes) are
//!   ISO-8859-1; the `text` module owns that conversion.

pub mod entities;
pub mod errors;
pub mod flags;
pub mod text;

pub use entities::*;
pub use errors::*;
pub use flags::*;
pub use text::{decode_latin1, encode_latin1, escape_to_latin1, is_latin1};
