//! # Domain Module
//!
//! Core domain types for the batch record codec.

pub mod errors;
pub mod invariants;
pub mod records;

pub use errors::*;
pub use invariants::*;
pub use records::*;
