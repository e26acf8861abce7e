//! # Ports Module
//!
//! Algorithm handler port.

pub mod outbound;

pub use outbound::*;
