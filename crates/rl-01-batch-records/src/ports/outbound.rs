//! # Outbound Ports
//!
//! Business-rule validation of encoded records, supplied by the embedding
//! application.

use std::sync::Mutex;

/// Business-rule validator - outbound port.
///
/// Receives the encoded batch header line and every detail line and returns
/// one message per violation, each shaped `"CODE message"`. An empty list
/// means the records may be sent.
pub trait RecordValidator: Send + Sync {
    /// Check the encoded records.
    fn validate(&self, header_record: &str, detail_records: &[String]) -> Vec<String>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock validator returning a fixed list of messages.
#[derive(Default)]
pub struct MockRecordValidator {
    /// Messages returned by every call.
    pub messages: Vec<String>,
    /// Number of detail lines seen per call.
    pub calls: Mutex<Vec<usize>>,
}

impl MockRecordValidator {
    /// Validator rejecting with the given messages.
    pub fn rejecting<S: Into<String>>(messages: impl IntoIterator<Item = S>) -> Self {
        Self {
            messages: messages.into_iter().map(Into::into).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Detail counts of all calls so far.
    pub fn calls(&self) -> Vec<usize> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl RecordValidator for MockRecordValidator {
    fn validate(&self, _header_record: &str, detail_records: &[String]) -> Vec<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(detail_records.len());
        }
        self.messages.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_accepts_by_default() {
        let v = MockRecordValidator::default();
        assert!(v.validate("VOSZ", &["DSVV".into()]).is_empty());
        assert_eq!(v.calls(), vec![1]);
    }

    #[test]
    fn test_mock_rejecting() {
        let v = MockRecordValidator::rejecting(["DSVV010 Geburtsdatum fehlt"]);
        assert_eq!(v.validate("VOSZ", &[]), vec!["DSVV010 Geburtsdatum fehlt"]);
    }
}
