//! # Transform Registry
//!
//! Explicit list of `(algorithm id, handler)` pairs.

use crate::domain::TransformError;
use crate::ports::TransformHandler;
use std::sync::Arc;

/// Handlers keyed by algorithm id.
#[derive(Clone, Default)]
pub struct TransformRegistry {
    handlers: Vec<(String, Arc<dyn TransformHandler>)>,
}

impl std::fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.handlers.iter().map(|(id, h)| (id, h.kind())))
            .finish()
    }
}

impl TransformRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `algorithm_id`, replacing any previous one.
    pub fn register(&mut self, algorithm_id: impl Into<String>, handler: Arc<dyn TransformHandler>) {
        let algorithm_id = algorithm_id.into();
        match self.handlers.iter_mut().find(|(id, _)| *id == algorithm_id) {
            Some(slot) => slot.1 = handler,
            None => self.handlers.push((algorithm_id, handler)),
        }
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, algorithm_id: impl Into<String>, handler: Arc<dyn TransformHandler>) -> Self {
        self.register(algorithm_id, handler);
        self
    }

    /// Handler for `algorithm_id`.
    ///
    /// # Errors
    ///
    /// `TransformError::UnsupportedTransform` if none is registered.
    pub fn get(&self, algorithm_id: &str) -> Result<&Arc<dyn TransformHandler>, TransformError> {
        self.handlers
            .iter()
            .find(|(id, _)| id == algorithm_id)
            .map(|(_, h)| h)
            .ok_or_else(|| TransformError::UnsupportedTransform {
                algorithm_id: algorithm_id.to_string(),
            })
    }

    /// Registered ids in registration order.
    pub fn algorithm_ids(&self) -> impl Iterator<Item = &str> {
        self.handlers.iter().map(|(id, _)| id.as_str())
    }
}
