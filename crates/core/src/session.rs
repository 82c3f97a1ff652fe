//! The authenticated technician session.
//!
//! Credential acquisition and storage belong to an external
//! collaborator (the login flow). This module only models the value
//! that flow hands over: a bearer token plus the technician profile it
//! was issued for. The session is passed explicitly into every network
//! call rather than living in process-wide state, which keeps the
//! protocol layer testable.

use serde::{Deserialize, Serialize};

/// Profile of the logged-in technician, as the backend serves it.
///
/// Wire keys are PascalCase on this endpoint, unlike the task records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Technician {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "ServiceManId")]
    pub technician_id: String,
    #[serde(rename = "ServiceManName")]
    pub name: String,
    #[serde(rename = "Email", default)]
    pub email: String,
    #[serde(rename = "ContactNumber", default)]
    pub contact_number: String,
    #[serde(rename = "BranchName", default)]
    pub branch_name: String,
}

/// An authenticated session: the bearer credential and, when known,
/// the technician it belongs to.
#[derive(Debug, Clone)]
pub struct AuthSession {
    token: String,
    technician: Option<Technician>,
}

impl AuthSession {
    /// Session from a bare token (profile not yet fetched).
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            technician: None,
        }
    }

    /// Attach the technician profile delivered at login.
    pub fn with_technician(mut self, technician: Technician) -> Self {
        self.technician = Some(technician);
        self
    }

    /// The raw bearer token for the `Authorization` header.
    pub fn bearer_token(&self) -> &str {
        &self.token
    }

    pub fn technician(&self) -> Option<&Technician> {
        self.technician.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn technician_parses_pascal_case_wire_keys() {
        let json = r#"{
            "_id": "64aa00",
            "ServiceManId": "SM-12",
            "ServiceManName": "A. Rao",
            "Email": "a.rao@example.com",
            "ContactNumber": "9000000002",
            "BranchName": "Pune"
        }"#;

        let technician: Technician = serde_json::from_str(json).expect("profile should parse");
        assert_eq!(technician.technician_id, "SM-12");
        assert_eq!(technician.branch_name, "Pune");
    }

    #[test]
    fn session_exposes_token_and_optional_profile() {
        let session = AuthSession::new("jwt-abc");
        assert_eq!(session.bearer_token(), "jwt-abc");
        assert!(session.technician().is_none());

        let technician: Technician = serde_json::from_str(
            r#"{"_id": "x", "ServiceManId": "SM-1", "ServiceManName": "B"}"#,
        )
        .expect("minimal profile should parse");
        let session = session.with_technician(technician);
        assert_eq!(session.technician().map(|t| t.technician_id.as_str()), Some("SM-1"));
    }
}
