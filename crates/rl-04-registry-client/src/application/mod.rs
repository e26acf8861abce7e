//! # Application Layer
//!
//! Poll loop and the client facade.

pub mod polling;
pub mod service;

pub use polling::{PollResult, PollingController};
pub use service::{cursor_before, RegistryClient};
