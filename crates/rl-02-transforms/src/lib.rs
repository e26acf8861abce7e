//! # RL-02 Transforms
//!
//! Ordered, reversible payload transforms (compression, encryption).
//!
//! **Subsystem ID:** 02
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Payloads are compressed and encrypted before delivery and arrive
//! compressed and encrypted in result packages. The pipeline applies a
//! caller-chosen list of steps and records one [`TransformDescriptor`] per
//! step; reversal walks those descriptors backwards.
//!
//! The pipeline knows algorithms only by id. Implementations are plugged in
//! through the [`TransformHandler`] port.
//!
//! ## Module Structure
//!
//! ```text
//! rl-02-transforms/
//! ├── domain/          # TransformDescriptor, TransformStep, errors
//! ├── algorithms/      # Reversal ordering
//! ├── ports/           # TransformHandler
//! └── application/     # TransformRegistry, TransformPipeline
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod application;
pub mod domain;
pub mod ports;

// Re-exports
pub use algorithms::reversal_plan;
pub use application::{TransformPipeline, TransformRegistry};
pub use domain::{
    SizeCheck, TransformDescriptor, TransformError, TransformKind, TransformParams, TransformStep,
};
pub use ports::{MockTransform, TransformHandler};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
