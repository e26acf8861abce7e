//! # Ports Module

pub mod outbound;

pub use outbound::{AcceptAllValidator, MockStructuralValidator, StructuralValidator};
