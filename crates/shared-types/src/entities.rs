//! # Core Domain Entities
//!
//! Identities of the parties taking part in a lookup exchange and the
//! subjects being looked up.
//!
//! ## Clusters
//!
//! - **Identity**: `Sender`, `Company`, `Salutation`
//! - **Lookup**: `Subject`, `Sex`

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Organization identifier (eight-digit establishment number).
pub type OrganizationId = String;

/// Salutation of the sender's contact person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Salutation {
    /// Addressed as "Herr".
    #[default]
    Male,
    /// Addressed as "Frau".
    Female,
}

impl Salutation {
    /// Single-letter code used in the extended header record.
    pub fn code(&self) -> &'static str {
        match self {
            Salutation::Male => "M",
            Salutation::Female => "W",
        }
    }
}

/// The party submitting the batch (online sender).
///
/// Supplied once at client construction; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Sender {
    /// Establishment number of the sender.
    pub organization_id: OrganizationId,
    /// Name of the sender (first name line).
    pub name: String,
    /// Street and house number.
    pub street: String,
    /// Postal code.
    pub postal_code: String,
    /// City.
    pub city: String,
    /// Contact person for queries about this batch.
    pub contact_person: String,
    /// Salutation of the contact person.
    pub contact_salutation: Salutation,
    /// Contact phone number.
    pub phone: String,
    /// Contact fax number (may be empty).
    pub fax: String,
    /// Contact e-mail; also sent as the SMTP endpoint of the envelope.
    pub email: String,
}

/// The company on whose behalf the lookup is made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Company {
    /// Establishment number of the company.
    pub organization_id: OrganizationId,
    /// Company name.
    pub name: String,
    /// Street and house number.
    pub street: String,
    /// Postal code.
    pub postal_code: String,
    /// City.
    pub city: String,
}

// =============================================================================
// CLUSTER B: LOOKUP
// =============================================================================

/// Sex of a subject as carried in the birth data block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    /// Male ("M").
    Male,
    /// Female ("W").
    Female,
}

impl Sex {
    /// Single-letter code used in detail records.
    pub fn code(&self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "W",
        }
    }

    /// Parse the single-letter code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "M" => Some(Sex::Male),
            "W" => Some(Sex::Female),
            _ => None,
        }
    }
}

/// One lookup subject (one detail record per subject).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Caller-side numeric id; echoed back in the result record.
    pub id: u64,
    /// Personnel number at the company.
    pub personnel_number: String,
    /// Surname.
    pub surname: String,
    /// Given name.
    pub given_name: String,
    /// Birth name, if different from the surname.
    pub birth_name: Option<String>,
    /// Date of birth.
    pub birth_date: NaiveDate,
    /// Place of birth.
    pub birth_place: Option<String>,
    /// Sex.
    pub sex: Sex,
    /// Postal code of the current address.
    pub postal_code: String,
    /// City of the current address.
    pub city: String,
}
