use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error};

use enroll_db::Store;
use enroll_db::repository::Repository;
use enroll_types::api::{
    RedirectTarget, RegisterOutcome, ResetOutcome, ResetRequestOutcome, SignInOutcome,
    VerifyOutcome,
};
use enroll_types::models::{DonorProfile, NewAccount, Role, RoleProfile, TeacherProfile};

use crate::codes;
use crate::error::FlowError;

pub struct EngineConfig {
    /// Length of the artificial round-trip wrapped around store access.
    pub network_delay: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            network_delay: Duration::from_millis(1000),
        }
    }
}

/// The account operations, layered over the local store. One instance
/// per store; operations run as single uninterrupted units of work that
/// suspend only at the simulated-network boundary.
pub struct Engine {
    store: Arc<Store>,
    config: EngineConfig,
}

impl Engine {
    pub fn new(store: Arc<Store>) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    pub fn with_config(store: Arc<Store>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// One artificial network round-trip; the only suspend point in any
    /// operation.
    async fn network_delay(&self) {
        tokio::time::sleep(self.config.network_delay).await;
    }

    // -- Registration --

    pub async fn register<P: RoleProfile>(&self, account: NewAccount<P>) -> RegisterOutcome {
        let role = P::ROLE;
        match self.try_register(account).await {
            Ok(code) => RegisterOutcome {
                success: true,
                message: format!(
                    "{} signed up successfully. Please verify your account. \
                     Your verification code is {}",
                    role.display_name(),
                    code
                ),
                redirect_to: Some(RedirectTarget::VerifyAccount),
                role: Some(role),
            },
            Err(err) => RegisterOutcome {
                success: false,
                message: failure_message(&err, "An error occurred during sign-up"),
                redirect_to: None,
                role: None,
            },
        }
    }

    async fn try_register<P: RoleProfile>(
        &self,
        account: NewAccount<P>,
    ) -> Result<String, FlowError> {
        let code = codes::generate_code();
        let record = account.into_pending(code.clone());
        record.validate()?;

        self.network_delay().await;

        // The uniqueness check runs after the delay: two overlapping
        // registrations can both pass it before either writes. Accepted
        // single-writer weakness of the local store.
        let repo = Repository::<P>::new(&self.store);
        if repo.find_by_email(&record.email)?.is_some() {
            return Err(FlowError::EmailInUse);
        }
        repo.insert(record)?;

        debug!("{} account registered", P::ROLE);
        Ok(code)
    }

    // -- Sign-in --

    pub async fn sign_in(&self, email: &str, password: &str) -> SignInOutcome {
        match self.try_sign_in(email, password).await {
            Ok(role) => SignInOutcome {
                success: true,
                message: format!("{} signed in successfully", role.display_name()),
                role: Some(role),
                verification_code: None,
            },
            Err(FlowError::Unverified {
                role,
                verification_code,
            }) => SignInOutcome {
                success: false,
                message: "Please verify your account".into(),
                role: Some(role),
                verification_code,
            },
            Err(err) => SignInOutcome {
                success: false,
                message: failure_message(&err, "An error occurred during sign-in"),
                role: None,
                verification_code: None,
            },
        }
    }

    async fn try_sign_in(&self, email: &str, password: &str) -> Result<Role, FlowError> {
        self.network_delay().await;

        // Teacher collection is always consulted before donors.
        if let Some(role) = self.credential_match::<TeacherProfile>(email, password)? {
            return Ok(role);
        }
        if let Some(role) = self.credential_match::<DonorProfile>(email, password)? {
            return Ok(role);
        }
        Err(FlowError::CredentialMismatch)
    }

    fn credential_match<P: RoleProfile>(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Role>, FlowError> {
        let repo = Repository::<P>::new(&self.store);
        let records = repo.load()?;
        let Some(record) = records
            .iter()
            .find(|r| r.email == email && r.password == password)
        else {
            return Ok(None);
        };

        if !record.verification_status {
            return Err(FlowError::Unverified {
                role: P::ROLE,
                verification_code: record.verification_code.clone(),
            });
        }
        Ok(Some(P::ROLE))
    }

    // -- Verification --

    pub async fn verify(&self, email: &str, role: Role, code: &str) -> VerifyOutcome {
        let result = match role {
            Role::Teacher => self.try_verify::<TeacherProfile>(email, code).await,
            Role::Donor => self.try_verify::<DonorProfile>(email, code).await,
        };
        match result {
            Ok(()) => VerifyOutcome {
                success: true,
                message: "Account verified successfully".into(),
                redirect_to: Some(RedirectTarget::SignIn),
            },
            Err(err) => VerifyOutcome {
                success: false,
                message: failure_message(&err, "An error occurred during verification"),
                redirect_to: None,
            },
        }
    }

    async fn try_verify<P: RoleProfile>(&self, email: &str, code: &str) -> Result<(), FlowError> {
        let repo = Repository::<P>::new(&self.store);
        let mut records = repo.load()?;
        let Some(record) = records.iter_mut().find(|r| r.email == email) else {
            return Err(FlowError::UserNotFound);
        };

        // A verified account's stored code is null, so re-verification
        // lands here as well.
        if record.verification_code.as_deref() != Some(code) {
            return Err(FlowError::CodeMismatch);
        }

        record.verification_status = true;
        record.verification_code = None;
        repo.save(&records)?;

        debug!("{} account verified", P::ROLE);
        Ok(())
    }

    // -- Password reset --

    pub async fn request_password_reset(&self, email: &str) -> ResetRequestOutcome {
        match self.try_request_reset(email).await {
            Ok(code) => ResetRequestOutcome {
                success: true,
                message: format!("To reset your password, please use this code: {code}"),
                reset_code: Some(code),
            },
            Err(err) => ResetRequestOutcome {
                success: false,
                message: failure_message(&err, "An error occurred during password reset request"),
                reset_code: None,
            },
        }
    }

    async fn try_request_reset(&self, email: &str) -> Result<String, FlowError> {
        self.network_delay().await;

        let code = codes::generate_code();

        // Only the collection containing the match is rewritten.
        let teachers = Repository::<TeacherProfile>::new(&self.store);
        if teachers.update(email, |r| r.reset_code = Some(code.clone()))? {
            return Ok(code);
        }
        let donors = Repository::<DonorProfile>::new(&self.store);
        if donors.update(email, |r| r.reset_code = Some(code.clone()))? {
            return Ok(code);
        }
        Err(FlowError::EmailNotFound)
    }

    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> ResetOutcome {
        match self.try_reset_password(email, code, new_password).await {
            Ok(()) => ResetOutcome {
                success: true,
                message: "Password reset successfully".into(),
            },
            Err(err) => ResetOutcome {
                success: false,
                message: failure_message(&err, "An error occurred during password reset"),
            },
        }
    }

    async fn try_reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), FlowError> {
        self.network_delay().await;

        if self
            .complete_reset_in::<TeacherProfile>(email, code, new_password)?
            .is_some()
        {
            return Ok(());
        }
        if self
            .complete_reset_in::<DonorProfile>(email, code, new_password)?
            .is_some()
        {
            return Ok(());
        }

        // Unknown email reports the same opaque condition as a bad code.
        Err(FlowError::ResetMismatch)
    }

    /// Try to complete a reset inside one role collection. `None` means
    /// the email is not in this collection and the next one should be
    /// searched; a present record with a wrong or absent reset code is
    /// terminal.
    fn complete_reset_in<P: RoleProfile>(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<Option<()>, FlowError> {
        let repo = Repository::<P>::new(&self.store);
        let mut records = repo.load()?;
        let Some(record) = records.iter_mut().find(|r| r.email == email) else {
            return Ok(None);
        };

        if record.reset_code.as_deref() != Some(code) {
            return Err(FlowError::ResetMismatch);
        }

        record.password = new_password.to_string();
        record.reset_code = None;
        repo.save(&records)?;

        debug!("{} password reset completed", P::ROLE);
        Ok(Some(()))
    }
}

/// Render a flow failure for the caller. Business failures carry their
/// own message; store failures are logged and collapsed into the
/// operation's generic message.
fn failure_message(err: &FlowError, fallback: &str) -> String {
    if let FlowError::Store(inner) = err {
        error!("{fallback}: {inner:#}");
        return fallback.to_string();
    }
    err.to_string()
}
