//! # Domain Module
//!
//! Client entities, poll policy and errors.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
