//! # Ports Module
//!
//! Dependencies the codec consumes but does not implement.

pub mod outbound;

pub use outbound::*;
