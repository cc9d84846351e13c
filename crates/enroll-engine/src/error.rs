use thiserror::Error;

use enroll_types::models::{Role, ValidationError};

/// Failure raised inside an operation. Every variant is converted into
/// a `{ success: false, message }` outcome at the operation boundary;
/// none of them cross it as an error.
#[derive(Debug, Error)]
pub enum FlowError {
    /// Record shape violation on input.
    #[error("Invalid input data")]
    Validation(#[from] ValidationError),

    /// Another account in the same role collection already owns the email.
    #[error("Email already in use")]
    EmailInUse,

    /// No record for the email in the addressed role collection.
    #[error("User not found")]
    UserNotFound,

    /// No record for the email in any role collection.
    #[error("Email not found")]
    EmailNotFound,

    /// Submitted verification code does not match the stored one.
    #[error("Invalid verification code")]
    CodeMismatch,

    /// No credential match; deliberately silent about which field was wrong.
    #[error("Invalid email or password")]
    CredentialMismatch,

    /// Reset refused: unknown email or wrong reset code, reported as one
    /// opaque condition.
    #[error("Invalid email or verification code")]
    ResetMismatch,

    /// Credentials matched but the account has not been verified yet.
    #[error("Please verify your account")]
    Unverified {
        role: Role,
        verification_code: Option<String>,
    },

    /// Store-layer failure; surfaced as a per-operation generic message.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
