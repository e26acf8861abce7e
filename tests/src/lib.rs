//! # Registry-Link Test Suite
//!
//! Unified test crate for scenarios spanning several subsystems.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Codec and transform throughput
//! └── src/integration/
//!     ├── fixtures.rs       # Identities, subjects, scripted HTTP server
//!     ├── batch_exchange.rs # RL-01 + RL-02 + RL-03: files in and out of envelopes
//!     └── lookup_flow.rs    # RL-04 over HTTP: deliver, poll, decode, acknowledge
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p rl-tests
//!
//! # By category
//! cargo test -p rl-tests integration::batch_exchange::
//! cargo test -p rl-tests integration::lookup_flow::
//!
//! # Benchmarks
//! cargo bench -p rl-tests
//! ```

pub mod integration;
