//! # Transform Pipeline
//!
//! Applies steps in caller order and reverses them in exactly the opposite
//! order, as recorded in the descriptors.
//!
//! ## Reversal checks
//!
//! 1. Numbering is contiguous `1..=n`
//! 2. Every algorithm id has a handler of the recorded kind
//! 3. Recorded byte counts match before and after each inverse step

use super::registry::TransformRegistry;
use crate::algorithms::reversal_plan;
use crate::domain::{SizeCheck, TransformDescriptor, TransformError, TransformStep};
use tracing::debug;

/// Ordered, reversible transform pipeline.
#[derive(Debug, Clone, Default)]
pub struct TransformPipeline {
    registry: TransformRegistry,
}

impl TransformPipeline {
    /// Pipeline over the given handlers.
    pub fn new(registry: TransformRegistry) -> Self {
        Self { registry }
    }

    /// The handler registry.
    pub fn registry(&self) -> &TransformRegistry {
        &self.registry
    }

    /// Apply `steps` in order.
    ///
    /// Returns the transformed bytes and one descriptor per step, numbered
    /// from 1, with input and output byte counts recorded.
    ///
    /// # Errors
    ///
    /// `TransformError::UnsupportedTransform` for an unknown id, or the
    /// handler's own error.
    pub fn apply(
        &self,
        raw: &[u8],
        steps: &[TransformStep],
    ) -> Result<(Vec<u8>, Vec<TransformDescriptor>), TransformError> {
        let mut data = raw.to_vec();
        let mut descriptors = Vec::with_capacity(steps.len());

        for (order, step) in (1u32..).zip(steps) {
            let handler = self.registry.get(&step.algorithm_id)?;
            let output = handler.apply(&data, &step.params)?;
            debug!(
                "[rl-02] Applied step {} {} ({} -> {} bytes)",
                order,
                step.algorithm_id,
                data.len(),
                output.len()
            );
            descriptors.push(TransformDescriptor {
                order,
                kind: handler.kind(),
                algorithm_id: step.algorithm_id.clone(),
                params: step.params.clone(),
                input_bytes: Some(data.len() as u64),
                output_bytes: Some(output.len() as u64),
            });
            data = output;
        }

        Ok((data, descriptors))
    }

    /// Undo the steps recorded in `descriptors`.
    ///
    /// # Errors
    ///
    /// - `TransformError::OrderViolation` for duplicate or missing orders
    /// - `TransformError::UnsupportedTransform` for an unknown id
    /// - `TransformError::KindMismatch` if the handler has another kind
    /// - `TransformError::SizeMismatch` if a recorded count is wrong
    pub fn reverse(
        &self,
        data: &[u8],
        descriptors: &[TransformDescriptor],
    ) -> Result<Vec<u8>, TransformError> {
        let plan = reversal_plan(descriptors)?;

        let mut data = data.to_vec();
        for descriptor in plan {
            let handler = self.registry.get(&descriptor.algorithm_id)?;
            if handler.kind() != descriptor.kind {
                return Err(TransformError::KindMismatch {
                    algorithm_id: descriptor.algorithm_id.clone(),
                    descriptor: descriptor.kind,
                    handler: handler.kind(),
                });
            }

            check_size(descriptor, SizeCheck::Output, descriptor.output_bytes, data.len())?;
            data = handler.reverse(&data, &descriptor.params)?;
            check_size(descriptor, SizeCheck::Input, descriptor.input_bytes, data.len())?;

            debug!("[rl-02] Reversed step {} ({} bytes)", descriptor, data.len());
        }

        Ok(data)
    }
}

fn check_size(
    descriptor: &TransformDescriptor,
    check: SizeCheck,
    expected: Option<u64>,
    actual: usize,
) -> Result<(), TransformError> {
    match expected {
        Some(expected) if expected != actual as u64 => Err(TransformError::SizeMismatch {
            order: descriptor.order,
            algorithm_id: descriptor.algorithm_id.clone(),
            check,
            expected,
            actual: actual as u64,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransformKind;
    use crate::ports::MockTransform;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn pipeline() -> TransformPipeline {
        TransformPipeline::new(
            TransformRegistry::new()
                .with("zip", Arc::new(MockTransform::compression()))
                .with("xor", Arc::new(MockTransform::encryption(0xA5))),
        )
    }

    fn steps() -> Vec<TransformStep> {
        vec![TransformStep::new("zip"), TransformStep::new("xor").with_param("key", "k1")]
    }

    #[test]
    fn test_descriptors_record_order_and_sizes() {
        let (out, descriptors) = pipeline().apply(b"hello", &steps()).unwrap();

        assert_eq!(out.len(), 7);
        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[0].order, 1);
        assert_eq!(descriptors[0].kind, TransformKind::Compression);
        assert_eq!(descriptors[0].input_bytes, Some(5));
        assert_eq!(descriptors[0].output_bytes, Some(7));
        assert_eq!(descriptors[1].order, 2);
        assert_eq!(descriptors[1].params.get("key").map(String::as_str), Some("k1"));
    }

    #[test]
    fn test_reverse_accepts_grouped_descriptors() {
        let p = pipeline();
        let (out, mut descriptors) = p.apply(b"hello", &steps()).unwrap();
        descriptors.reverse();
        assert_eq!(p.reverse(&out, &descriptors).unwrap(), b"hello");
    }

    #[test]
    fn test_swapped_orders_fail_instead_of_corrupting() {
        let p = pipeline();
        let (out, mut descriptors) = p.apply(b"hello", &steps()).unwrap();
        descriptors[0].order = 2;
        descriptors[1].order = 1;
        // Sizes no longer line up with the wrong order.
        assert!(p.reverse(&out, &descriptors).is_err());
    }

    #[test]
    fn test_swapped_orders_without_sizes_still_fail() {
        let p = pipeline();
        let (out, mut descriptors) = p.apply(b"hello", &steps()).unwrap();
        for d in &mut descriptors {
            d.input_bytes = None;
            d.output_bytes = None;
        }
        descriptors[0].order = 2;
        descriptors[1].order = 1;
        let err = p.reverse(&out, &descriptors).unwrap_err();
        assert!(matches!(err, TransformError::Failed { .. }));
    }

    #[test]
    fn test_unknown_algorithm() {
        let err = pipeline().apply(b"x", &[TransformStep::new("lz4")]).unwrap_err();
        assert!(matches!(err, TransformError::UnsupportedTransform { .. }));

        let p = pipeline();
        let (out, mut descriptors) = p.apply(b"hello", &steps()).unwrap();
        descriptors[1].algorithm_id = "rot13".into();
        let err = p.reverse(&out, &descriptors).unwrap_err();
        assert!(matches!(err, TransformError::UnsupportedTransform { algorithm_id } if algorithm_id == "rot13"));
    }

    #[test]
    fn test_kind_mismatch() {
        let p = pipeline();
        let (out, mut descriptors) = p.apply(b"hello", &steps()).unwrap();
        descriptors[1].kind = TransformKind::Compression;
        assert!(matches!(
            p.reverse(&out, &descriptors),
            Err(TransformError::KindMismatch { .. })
        ));
    }

    #[test]
    fn test_size_mismatch() {
        let p = pipeline();
        let (out, mut descriptors) = p.apply(b"hello", &steps()).unwrap();
        descriptors[1].output_bytes = Some(99);
        assert!(matches!(
            p.reverse(&out, &descriptors),
            Err(TransformError::SizeMismatch { order: 2, check: SizeCheck::Output, .. })
        ));
    }

    #[test]
    fn test_handler_failure_propagates() {
        let failing = MockTransform {
            should_fail: true,
            ..MockTransform::compression()
        };
        let p = TransformPipeline::new(TransformRegistry::new().with("zip", Arc::new(failing)));
        let (out, descriptors) = p.apply(b"abc", &[TransformStep::new("zip")]).unwrap();
        assert!(p.reverse(&out, &descriptors).is_err());
    }

    fn arb_steps() -> impl Strategy<Value = Vec<TransformStep>> {
        proptest::collection::vec(
            prop_oneof![Just(TransformStep::new("zip")), Just(TransformStep::new("xor"))],
            0..6,
        )
    }

    proptest! {
        #[test]
        fn prop_reverse_inverts_apply(
            data in proptest::collection::vec(any::<u8>(), 0..512),
            steps in arb_steps(),
        ) {
            let p = pipeline();
            let (out, descriptors) = p.apply(&data, &steps).unwrap();
            prop_assert_eq!(descriptors.len(), steps.len());
            prop_assert_eq!(p.reverse(&out, &descriptors).unwrap(), data);
        }
    }
}
