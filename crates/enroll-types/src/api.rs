use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Role;

// -- Navigation --

/// Where the presentation layer should send the user after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RedirectTarget {
    VerifyAccount,
    SignIn,
}

impl RedirectTarget {
    pub fn path(self) -> &'static str {
        match self {
            RedirectTarget::VerifyAccount => "/verify-account",
            RedirectTarget::SignIn => "/sign-in",
        }
    }
}

// -- Operation outcomes --

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<RedirectTarget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Recovery aid for unverified accounts: with no delivery channel,
    /// the stored code is handed straight back to the caller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<RedirectTarget>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetRequestOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetOutcome {
    pub success: bool,
    pub message: String,
}

// -- Session --

/// The active signed-in session. One per store; owned by the session
/// manager, never written by anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub signed_in_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_targets_render_route_paths() {
        assert_eq!(RedirectTarget::VerifyAccount.path(), "/verify-account");
        assert_eq!(RedirectTarget::SignIn.path(), "/sign-in");
    }

    #[test]
    fn absent_outcome_extras_are_omitted() {
        let outcome = RegisterOutcome {
            success: false,
            message: "Email already in use".into(),
            redirect_to: None,
            role: None,
        };
        let value = serde_json::to_value(&outcome).unwrap();
        assert!(value.get("redirectTo").is_none());
        assert!(value.get("role").is_none());
    }
}
