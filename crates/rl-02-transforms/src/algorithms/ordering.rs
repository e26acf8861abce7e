//! # Reversal Ordering
//!
//! Descriptors may arrive grouped by kind rather than in application order,
//! so they are sorted by `order` first. The numbering must then be exactly
//! `1..=n`; anything else is rejected instead of guessed at.

use crate::domain::{TransformDescriptor, TransformError};

/// Descriptors in the order they must be reversed (last applied first).
pub fn reversal_plan(
    descriptors: &[TransformDescriptor],
) -> Result<Vec<&TransformDescriptor>, TransformError> {
    let mut plan: Vec<&TransformDescriptor> = descriptors.iter().collect();
    plan.sort_by_key(|d| d.order);

    for (expected, descriptor) in (1u32..).zip(&plan) {
        if descriptor.order != expected {
            return Err(TransformError::OrderViolation(format!(
                "expected step {expected}, found step {} ({}) among {} descriptor(s)",
                descriptor.order,
                descriptor.algorithm_id,
                descriptors.len()
            )));
        }
    }

    plan.reverse();
    Ok(plan)
}
