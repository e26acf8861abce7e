//! # Adapters
//!
//! reqwest transport and shared-crypto transform handlers.

pub mod crypto;
pub mod http;

pub use crypto::{default_registry, AeadHandler, GzipHandler};
pub use http::{HttpTransport, XML_CONTENT_TYPE};
