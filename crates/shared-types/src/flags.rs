//! # Flag Model
//!
//! Weighted status codes attached to response envelopes and packages.
//!
//! A report carries an aggregate `highest_weight` plus the individual flags.
//! Weights are transmitted as URIs; unknown URIs are rejected by the parser
//! rather than silently downgraded.

use serde::{Deserialize, Serialize};
use std::fmt;

const WEIGHT_BASE: &str = "http://www.extra-standard.de/weight/";

/// Severity of a flag.
///
/// Ordering follows severity: `Info < Warning < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FlagWeight {
    Info,
    Warning,
    Error,
}

impl FlagWeight {
    /// The weight URI used on the wire.
    pub fn uri(&self) -> &'static str {
        match self {
            FlagWeight::Info => "http://www.extra-standard.de/weight/INFO",
            FlagWeight::Warning => "http://www.extra-standard.de/weight/WARNING",
            FlagWeight::Error => "http://www.extra-standard.de/weight/ERROR",
        }
    }

    /// Resolve a weight URI.
    pub fn from_uri(uri: &str) -> Option<Self> {
        match uri.trim().strip_prefix(WEIGHT_BASE)? {
            "INFO" => Some(FlagWeight::Info),
            "WARNING" => Some(FlagWeight::Warning),
            "ERROR" => Some(FlagWeight::Error),
            _ => None,
        }
    }
}

impl fmt::Display for FlagWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagWeight::Info => write!(f, "INFO"),
            FlagWeight::Warning => write!(f, "WARNING"),
            FlagWeight::Error => write!(f, "ERROR"),
        }
    }
}

/// A coded status message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    /// Status code, e.g. `E98`.
    pub code: String,
    /// Human-readable text.
    pub text: String,
    /// Severity.
    pub weight: FlagWeight,
}

impl Flag {
    pub fn new(code: impl Into<String>, text: impl Into<String>, weight: FlagWeight) -> Self {
        Self {
            code: code.into(),
            text: text.into(),
            weight,
        }
    }

    pub fn is_error(&self) -> bool {
        self.weight == FlagWeight::Error
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.weight, self.code, self.text)
    }
}

/// Highest weight among `flags`, or `None` for an empty set.
pub fn highest_weight(flags: &[Flag]) -> Option<FlagWeight> {
    flags.iter().map(|f| f.weight).max()
}

/// True if any flag carries `Error` weight.
pub fn any_error(flags: &[Flag]) -> bool {
    flags.iter().any(Flag::is_error)
}

/// Render a flag list for error messages.
pub fn describe_flags(flags: &[Flag]) -> String {
    if flags.is_empty() {
        return "no flags".to_string();
    }
    flags
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
