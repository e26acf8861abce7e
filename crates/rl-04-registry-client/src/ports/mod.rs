//! # Ports Module
//!
//! Inbound API and outbound transport.

pub mod inbound;
pub mod outbound;

pub use inbound::RegistryLookupApi;
pub use outbound::{MockTransport, Transport};
