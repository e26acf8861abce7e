//! # RL-04 Registry Client
//!
//! Asynchronous client for the registry lookup service: delivers batch
//! files, polls for results, decodes result packages and acknowledges them.
//!
//! **Subsystem ID:** 04
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//! **Status:** Production-Ready
//!
//! ## Purpose
//!
//! Tie the subsystems together behind one facade:
//! - RL-01 encodes the subjects as a fixed-width batch file
//! - RL-02 compresses and encrypts it
//! - RL-03 wraps it in a deliver envelope and parses every answer
//! - this crate sends envelopes over HTTP and drives the poll loop
//!
//! ## Error Taxonomy
//!
//! | Variant | Raised when |
//! |---------|-------------|
//! | `Validation` | a field does not fit or business rules reject the file |
//! | `Transport` | non-2xx status, network failure, unparsable body |
//! | `Protocol` | the service reports an Error-weight outcome |
//! | `MalformedBatchFile` | a result file lacks its framing records |
//! | `UnsupportedTransform` | no handler for an algorithm id |
//! | `PollTimeout` | results still pending after the poll bound |
//! | `Cancelled` | the caller's token fired |
//!
//! ## Module Structure
//!
//! ```text
//! rl-04-registry-client/
//! ├── domain/          # Identity, poll policy, outcomes, errors
//! ├── ports/           # RegistryLookupApi (inbound), Transport (outbound)
//! ├── adapters/        # reqwest transport, shared-crypto transform handlers
//! ├── application/     # PollingController, RegistryClient
//! ├── telemetry.rs     # tracing-subscriber setup
//! └── config.rs        # ClientConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;

// Re-exports
pub use adapters::{default_registry, AeadHandler, GzipHandler, HttpTransport};
pub use application::{cursor_before, PollResult, PollingController, RegistryClient};
pub use config::{ClientConfig, Environment, LogConfig, PollConfig};
pub use domain::{
    ClientError, ClientIdentity, DeliveryReceipt, LookupOutcome, LookupState, PackageFailure,
    PollDecision, PollPolicy, TransportError,
};
pub use ports::{MockTransport, RegistryLookupApi, Transport};
pub use telemetry::init_tracing;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
