use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use enroll_db::Store;
use enroll_types::api::Session;
use enroll_types::models::Role;

const SESSION_KEY: &str = "session";

/// Single owner of the signed-in state. Consumers ask it instead of
/// reading the store directly; sign-in/out chrome only needs
/// `is_authenticated`.
pub struct SessionManager {
    store: Arc<Store>,
}

impl SessionManager {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub fn login(&self, role: Role, email: &str) -> Result<Session> {
        let session = Session {
            id: Uuid::new_v4(),
            email: email.to_string(),
            role,
            signed_in_at: Utc::now(),
        };
        self.store
            .put(SESSION_KEY, &serde_json::to_string(&session)?)?;
        debug!("session opened for {}", session.email);
        Ok(session)
    }

    pub fn logout(&self) -> Result<()> {
        self.store.delete(SESSION_KEY)?;
        debug!("session closed");
        Ok(())
    }

    pub fn current_session(&self) -> Result<Option<Session>> {
        match self.store.get(SESSION_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_session()
            .map(|session| session.is_some())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> SessionManager {
        SessionManager::new(Arc::new(Store::open_in_memory().unwrap()))
    }

    #[test]
    fn login_persists_a_readable_session() {
        let sessions = manager();
        assert!(!sessions.is_authenticated());

        let opened = sessions.login(Role::Teacher, "ani@example.com").unwrap();
        let current = sessions.current_session().unwrap().unwrap();

        assert_eq!(current, opened);
        assert_eq!(current.role, Role::Teacher);
        assert!(sessions.is_authenticated());
    }

    #[test]
    fn logout_clears_the_session() {
        let sessions = manager();
        sessions.login(Role::Donor, "narek@example.com").unwrap();
        sessions.logout().unwrap();

        assert_eq!(sessions.current_session().unwrap(), None);
        assert!(!sessions.is_authenticated());
    }

    #[test]
    fn a_new_login_replaces_the_previous_session() {
        let sessions = manager();
        let first = sessions.login(Role::Teacher, "ani@example.com").unwrap();
        let second = sessions.login(Role::Donor, "narek@example.com").unwrap();

        let current = sessions.current_session().unwrap().unwrap();
        assert_eq!(current, second);
        assert_ne!(current.id, first.id);
    }
}
