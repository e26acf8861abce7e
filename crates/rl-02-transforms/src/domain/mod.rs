//! # Domain Module
//!
//! Core domain types for the transform pipeline.

pub mod descriptor;
pub mod errors;

pub use descriptor::*;
pub use errors::*;
