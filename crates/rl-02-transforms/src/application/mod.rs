//! # Application Module
//!
//! Handler registry and the pipeline service.

pub mod pipeline;
pub mod registry;

pub use pipeline::TransformPipeline;
pub use registry::TransformRegistry;
