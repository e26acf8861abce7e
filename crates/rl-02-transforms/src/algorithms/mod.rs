//! # Algorithms Module
//!
//! Reversal ordering rules.

pub mod ordering;

pub use ordering::reversal_plan;
