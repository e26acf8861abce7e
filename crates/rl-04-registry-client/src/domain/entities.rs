//! # Domain Entities
//!
//! Identity, poll policy and the results of client operations.

use rl_03_envelope::{EnvelopeError, PackageInfo};
use serde::{Deserialize, Serialize};
use shared_types::{Company, Flag, Sender};
use std::fmt;

/// The submitting party and the company lookups are made for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientIdentity {
    /// Sender, also the envelope sender.
    pub sender: Sender,
    /// Company.
    pub company: Company,
}

/// Flag codes driving the poll loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollPolicy {
    /// Results not yet available.
    pub pending_code: String,
    /// Results available.
    pub success_code: String,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            pending_code: "E97".to_string(),
            success_code: "E98".to_string(),
        }
    }
}

/// How a query answer ends (or continues) the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollDecision {
    /// Every flag is the pending code; query again.
    Pending,
    /// Every flag is the success code; decode packages.
    Completed,
    /// Any other flag set; stop without decoding.
    Finished,
}

impl PollPolicy {
    /// Classify the header flags of a query answer.
    ///
    /// Polling continues while no flag carries a code other than the pending
    /// code. Packages are decoded only if all flags carry the success code.
    pub fn classify(&self, flags: &[Flag]) -> PollDecision {
        if flags.iter().all(|f| f.code == self.pending_code) {
            PollDecision::Pending
        } else if flags.iter().all(|f| f.code == self.success_code) {
            PollDecision::Completed
        } else {
            PollDecision::Finished
        }
    }
}

/// States of a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupState {
    /// Delivering the batch file.
    Sending,
    /// Querying for results.
    Polling,
    /// Decoding result packages.
    Decoding,
    /// Acknowledging decoded packages.
    Acknowledging,
    /// Finished.
    Done,
    /// Aborted by an error.
    Failed,
}

impl fmt::Display for LookupState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LookupState::Sending => "Sending",
            LookupState::Polling => "Polling",
            LookupState::Decoding => "Decoding",
            LookupState::Acknowledging => "Acknowledging",
            LookupState::Done => "Done",
            LookupState::Failed => "Failed",
        };
        f.write_str(name)
    }
}

/// Answer to a deliver request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    /// Request id sent.
    pub request_id: String,
    /// Response id assigned by the service.
    pub response_id: String,
    /// Header flags.
    pub flags: Vec<Flag>,
    /// Trailer record count of the delivered file.
    pub record_count: u32,
}

/// A package that could not be decoded.
#[derive(Debug)]
pub struct PackageFailure {
    /// Response id of the package.
    pub response_id: String,
    /// Why decoding failed.
    pub error: EnvelopeError,
}

/// Summary of a completed lookup.
#[derive(Debug)]
pub struct LookupOutcome {
    /// Response id of the delivery.
    pub delivery_response_id: String,
    /// Cursor used for every query.
    pub cursor: String,
    /// Header flags of the final query answer.
    pub flags: Vec<Flag>,
    /// How the poll loop ended.
    pub decision: PollDecision,
    /// Queries sent.
    pub attempts: u32,
    /// Decoded packages.
    pub packages: Vec<PackageInfo>,
    /// Packages that failed to decode.
    pub failures: Vec<PackageFailure>,
    /// Response ids confirmed in the acknowledge envelope.
    pub acknowledged: Vec<String>,
    /// States passed through, ending in `Done`.
    pub states: Vec<LookupState>,
}

impl LookupOutcome {
    /// True if results were decoded without failures.
    pub fn is_complete(&self) -> bool {
        self.decision == PollDecision::Completed && self.failures.is_empty()
    }
}
