//! # Application Module
//!
//! The codec service tying schemas, layout and validation together.

pub mod codec;

pub use codec::BatchRecordCodec;
