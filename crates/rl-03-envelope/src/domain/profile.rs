//! # Protocol Profiles
//!
//! Procedure and data-type codes are fixed per profile, not per call.

use serde::{Deserialize, Serialize};

/// Constants of one protocol profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolProfile {
    /// Short name for logs and configuration.
    pub name: String,
    /// `profile` attribute of the root element.
    pub profile_uri: String,
    /// Procedure of deliver envelopes.
    pub deliver_procedure: String,
    /// Procedure of query envelopes.
    pub query_procedure: String,
    /// Procedure of acknowledge envelopes.
    pub acknowledge_procedure: String,
    /// Data type of deliver envelopes.
    pub deliver_data_type: String,
    /// Procedure predicate queries filter results by.
    pub result_procedure: String,
}

impl ProtocolProfile {
    /// Reporting-procedure profile (default).
    pub fn deuev() -> Self {
        const PROCEDURE: &str = "http://www.extra-standard.pde/procedures/DEUEV";
        Self {
            name: "deuev".to_string(),
            profile_uri: "http://www.extra-standard.de/profile/DEUEV/2.0".to_string(),
            deliver_procedure: PROCEDURE.to_string(),
            query_procedure: PROCEDURE.to_string(),
            acknowledge_procedure: PROCEDURE.to_string(),
            deliver_data_type: "http://www.extra-standard.de/datatypes/VSNRAnfrage".to_string(),
            result_procedure: "DSV".to_string(),
        }
    }

    /// Health-insurance delivery-server profile.
    pub fn gkv() -> Self {
        Self {
            name: "gkv".to_string(),
            deliver_procedure: "DUA".to_string(),
            query_procedure: "DeliveryServer".to_string(),
            acknowledge_procedure: "DeliveryServer".to_string(),
            ..Self::deuev()
        }
    }

    /// Resolve a profile by name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "deuev" => Some(Self::deuev()),
            "gkv" => Some(Self::gkv()),
            _ => None,
        }
    }
}

impl Default for ProtocolProfile {
    fn default() -> Self {
        Self::deuev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_differ_in_procedures_only() {
        let deuev = ProtocolProfile::deuev();
        let gkv = ProtocolProfile::gkv();
        assert_eq!(gkv.profile_uri, deuev.profile_uri);
        assert_eq!(gkv.deliver_procedure, "DUA");
        assert_eq!(gkv.query_procedure, "DeliveryServer");
        assert_ne!(deuev.query_procedure, gkv.query_procedure);
    }

    #[test]
    fn test_by_name() {
        assert_eq!(ProtocolProfile::by_name("GKV"), Some(ProtocolProfile::gkv()));
        assert_eq!(ProtocolProfile::by_name("x"), None);
        assert_eq!(ProtocolProfile::default(), ProtocolProfile::deuev());
    }
}
