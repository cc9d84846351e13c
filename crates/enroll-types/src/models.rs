use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Account role. Each role owns its own record collection, so the same
/// email may exist once per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    Donor,
}

impl Role {
    /// Store key of the collection holding this role's records.
    pub fn collection_key(self) -> &'static str {
        match self {
            Role::Teacher => "teachers",
            Role::Donor => "donors",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Role::Teacher => "Teacher",
            Role::Donor => "Donor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Teacher => write!(f, "teacher"),
            Role::Donor => write!(f, "donor"),
        }
    }
}

/// A required field failed its shape check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value for field `{field}`")]
pub struct ValidationError {
    pub field: &'static str,
}

/// Role-specific profile extension carried by an account record.
pub trait RoleProfile: Clone + fmt::Debug + Serialize + DeserializeOwned {
    const ROLE: Role;

    fn validate(&self) -> Result<(), ValidationError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherProfile {
    pub region: String,
    pub city: String,
    pub school: String,
    pub grade: String,
}

impl RoleProfile for TeacherProfile {
    const ROLE: Role = Role::Teacher;

    fn validate(&self) -> Result<(), ValidationError> {
        require("region", &self.region)?;
        require("city", &self.city)?;
        require("school", &self.school)?;
        require("grade", &self.grade)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonorProfile {
    pub country: String,
    pub region: String,
    pub city: String,
}

impl RoleProfile for DonorProfile {
    const ROLE: Role = Role::Donor;

    fn validate(&self) -> Result<(), ValidationError> {
        require("country", &self.country)?;
        require("region", &self.region)?;
        require("city", &self.city)
    }
}

/// A stored account. Records persist as camelCase JSON; `resetCode` is
/// only present while a password reset is outstanding, while
/// `verificationCode` stays in the record as an explicit null once the
/// account is verified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord<P> {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub verification_status: bool,
    pub verification_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_code: Option<String>,
    #[serde(flatten)]
    pub profile: P,
}

/// Sign-up input: profile fields plus a password, no verification state.
#[derive(Debug, Clone)]
pub struct NewAccount<P> {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub profile: P,
}

impl<P> NewAccount<P> {
    /// Assemble the stored record for a freshly registered, unverified
    /// account.
    pub fn into_pending(self, verification_code: String) -> AccountRecord<P> {
        AccountRecord {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone_number: self.phone_number,
            password: self.password,
            verification_status: false,
            verification_code: Some(verification_code),
            reset_code: None,
            profile: self.profile,
        }
    }
}

impl<P: RoleProfile> AccountRecord<P> {
    /// Check the full record shape: email format, non-empty required
    /// strings, and a 4-digit verification code on unverified accounts.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("firstName", &self.first_name)?;
        require("lastName", &self.last_name)?;
        if !valid_email(&self.email) {
            return Err(ValidationError { field: "email" });
        }
        require("phoneNumber", &self.phone_number)?;
        require("password", &self.password)?;
        match &self.verification_code {
            Some(code) if !valid_code(code) => {
                return Err(ValidationError {
                    field: "verificationCode",
                });
            }
            None if !self.verification_status => {
                return Err(ValidationError {
                    field: "verificationCode",
                });
            }
            _ => {}
        }
        self.profile.validate()
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError { field })
    } else {
        Ok(())
    }
}

/// Basic email format check.
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email))
}

/// Verification and reset codes are exactly four ASCII digits.
pub fn valid_code(code: &str) -> bool {
    code.len() == 4 && code.chars().all(|c| c.is_ascii_digit())
}
