//! Wire types for the backend conflict-check endpoint.

#[cfg(feature = "native")]
mod client;

#[cfg(feature = "native")]
pub use client::ConflictClient;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CheckError;

/// Payload of `POST /check-conflicts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictRequest {
    #[serde(rename = "doctorA_medicines")]
    pub doctor_a_medicines: Vec<String>,

    #[serde(rename = "doctorB_medicines")]
    pub doctor_b_medicines: Vec<String>,

    /// Omitted from the payload when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub user_allergies: Vec<String>,

    /// Login session the backend records the analysis under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Overall risk assigned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}

/// A drug-drug interaction, e.g. pair `"aspirin + warfarin"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub pair: String,
    pub reason: String,
}

/// A prescribed medicine that matches one of the user's allergies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllergyConflict {
    pub medicine: String,
    pub allergy: String,
    pub reason: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Response of `POST /check-conflicts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictReport {
    #[serde(rename = "doctorA_medicines", default)]
    pub doctor_a_medicines: Vec<String>,

    #[serde(rename = "doctorB_medicines", default)]
    pub doctor_b_medicines: Vec<String>,

    #[serde(default)]
    pub interactions: Vec<Interaction>,

    #[serde(default)]
    pub allergy_conflicts: Vec<AllergyConflict>,

    #[serde(default)]
    pub user_allergies: Vec<String>,

    pub risk_level: RiskLevel,

    #[serde(default)]
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_analysis_saved: Option<bool>,
}

impl ConflictReport {
    /// Whether any interaction or allergy conflict was reported.
    pub fn has_conflicts(&self) -> bool {
        !self.interactions.is_empty() || !self.allergy_conflicts.is_empty()
    }

    /// Parse a successful response body.
    pub fn from_json(body: &str) -> Result<Self, CheckError> {
        serde_json::from_str(body).map_err(|e| CheckError::MalformedResponse(e.to_string()))
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Message for a failed response: the `error` field if present, else the body.
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) if body.trim().is_empty() => "empty response".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_omits_empty_fields() {
        let request = ConflictRequest {
            doctor_a_medicines: vec!["metformin".to_string()],
            doctor_b_medicines: vec!["ibuprofen".to_string()],
            user_allergies: Vec::new(),
            session_id: None,
        };

        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"doctorA_medicines":["metformin"],"doctorB_medicines":["ibuprofen"]}"#
        );
    }

    #[test]
    fn test_request_with_allergies() {
        let request = ConflictRequest {
            doctor_a_medicines: vec!["aspirin".to_string()],
            doctor_b_medicines: vec!["warfarin".to_string()],
            user_allergies: vec!["nsaid".to_string()],
            session_id: Some("s-1".to_string()),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["user_allergies"][0], "nsaid");
        assert_eq!(value["session_id"], "s-1");
    }

    #[test]
    fn test_parse_report() {
        let body = r#"{
            "doctorA_medicines": ["aspirin"],
            "doctorB_medicines": ["warfarin"],
            "interactions": [
                {"pair": "aspirin + warfarin", "reason": "Increased bleeding risk."}
            ],
            "allergy_conflicts": [
                {"medicine": "aspirin", "allergy": "NSAID", "reason": "Aspirin is an NSAID.",
                 "type": "user_allergy_dataset_match"}
            ],
            "user_allergies": ["NSAID"],
            "risk_level": "HIGH",
            "message": "CRITICAL: Both drug interactions and allergy conflicts detected."
        }"#;

        let report = ConflictReport::from_json(body).unwrap();
        assert_eq!(report.risk_level, RiskLevel::High);
        assert_eq!(report.interactions[0].pair, "aspirin + warfarin");
        assert_eq!(
            report.allergy_conflicts[0].kind.as_deref(),
            Some("user_allergy_dataset_match")
        );
        assert!(report.has_conflicts());
        assert_eq!(report.user_analysis_saved, None);
    }

    #[test]
    fn test_parse_report_without_conflicts() {
        let report = ConflictReport::from_json(r#"{"risk_level": "LOW"}"#).unwrap();
        assert!(!report.has_conflicts());
        assert_eq!(report.risk_level.to_string(), "LOW");
    }

    #[test]
    fn test_parse_report_rejects_unknown_risk() {
        assert!(matches!(
            ConflictReport::from_json(r#"{"risk_level": "EXTREME"}"#),
            Err(CheckError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            error_message(r#"{"error": "Medicine lists must be arrays"}"#),
            "Medicine lists must be arrays"
        );
        assert_eq!(error_message("Bad Gateway\n"), "Bad Gateway");
        assert_eq!(error_message(""), "empty response");
    }
}
