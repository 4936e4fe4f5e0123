//! User accounts and the single login session.
//!
//! Secrets are compared as plain text. The service answers role questions for the
//! menu layer but enforces nothing itself.

use super::reported;
use crate::error::{ClinicError, ClinicResult, EntityKind};
use crate::models::{Role, Session, User};
use crate::notify::Notifier;
use crate::repositories::UserRepository;
use crate::validation::required_text;
use clinic_types::UserId;
use std::sync::Arc;

pub struct AuthenticationService {
    repo: UserRepository,
    current: Option<Session>,
    notifier: Arc<dyn Notifier>,
}

impl AuthenticationService {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            repo: UserRepository::new(),
            current: None,
            notifier,
        }
    }

    /// Creates an active account.
    ///
    /// # Errors
    ///
    /// - `ClinicError::DuplicateUsername` if the name is taken
    /// - `ClinicError::InvalidInput` for an empty username or secret
    pub fn register_user(&mut self, username: &str, secret: &str, role: Role) -> ClinicResult<UserId> {
        let result = self.try_register(username, secret, role);
        reported(self.notifier.as_ref(), "register user", result)
    }

    fn try_register(&mut self, username: &str, secret: &str, role: Role) -> ClinicResult<UserId> {
        let username = required_text("username", username)?;
        if secret.is_empty() {
            return Err(ClinicError::InvalidInput("password cannot be empty".into()));
        }
        if self.repo.find_by_username(username.as_str()).is_some() {
            return Err(ClinicError::DuplicateUsername(username.into_inner()));
        }

        let id = self.repo.allocate_id()?;
        self.notifier
            .info(&format!("User {username} registered with role {role}"));
        self.repo.add(User {
            id,
            username,
            password_secret: secret.to_string(),
            role,
            active: true,
        });
        Ok(id)
    }

    /// Starts a session, replacing any current one.
    ///
    /// # Errors
    ///
    /// - `ClinicError::InvalidCredentials` for an unknown user or wrong secret
    /// - `ClinicError::InactiveUser` if the credentials match a deactivated account
    ///
    /// A failed attempt leaves the current session untouched.
    pub fn login(&mut self, username: &str, secret: &str) -> ClinicResult<Session> {
        let result = self.authenticate(username, secret);
        if let Ok(session) = &result {
            self.current = Some(session.clone());
            self.notifier
                .info(&format!("User {} logged in", session.username));
        }
        reported(self.notifier.as_ref(), "login", result)
    }

    fn authenticate(&self, username: &str, secret: &str) -> ClinicResult<Session> {
        let user = self
            .repo
            .find_by_username(username)
            .filter(|u| u.secret_matches(secret))
            .ok_or(ClinicError::InvalidCredentials)?;
        if !user.active {
            return Err(ClinicError::InactiveUser(user.username.to_string()));
        }

        Ok(Session {
            user_id: user.id,
            username: user.username.to_string(),
            role: user.role,
        })
    }

    /// Ends the current session, returning it if there was one.
    pub fn logout(&mut self) -> Option<Session> {
        let session = self.current.take();
        if let Some(session) = &session {
            self.notifier
                .info(&format!("User {} logged out", session.username));
        }
        session
    }

    pub fn current_session(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }

    /// True iff someone is logged in with exactly `role`.
    pub fn has_role(&self, role: Role) -> bool {
        self.current.as_ref().is_some_and(|s| s.role == role)
    }

    /// Activates or deactivates an account. Deactivating the logged-in user ends the
    /// session.
    pub fn set_active(&mut self, id: UserId, active: bool) -> ClinicResult<()> {
        let result = match self.repo.get_by_id_mut(id) {
            Some(user) => {
                user.active = active;
                Ok(())
            }
            None => Err(ClinicError::not_found(EntityKind::User, id)),
        };
        if result.is_ok() {
            if !active && self.current.as_ref().is_some_and(|s| s.user_id == id) {
                self.current = None;
            }
            let state = if active { "activated" } else { "deactivated" };
            self.notifier.info(&format!("User {id} {state}"));
        }
        reported(self.notifier.as_ref(), "set user active", result)
    }

    /// Replaces the secret after checking the old one.
    pub fn change_secret(&mut self, id: UserId, old: &str, new: &str) -> ClinicResult<()> {
        let result = self.try_change_secret(id, old, new);
        reported(self.notifier.as_ref(), "change password", result)
    }

    fn try_change_secret(&mut self, id: UserId, old: &str, new: &str) -> ClinicResult<()> {
        if new.is_empty() {
            return Err(ClinicError::InvalidInput("password cannot be empty".into()));
        }
        let user = self
            .repo
            .get_by_id_mut(id)
            .ok_or_else(|| ClinicError::not_found(EntityKind::User, id))?;
        if !user.secret_matches(old) {
            return Err(ClinicError::InvalidCredentials);
        }

        user.password_secret = new.to_string();
        self.notifier.info(&format!("Password changed for user {id}"));
        Ok(())
    }

    pub fn get(&self, id: UserId) -> Option<&User> {
        self.repo.get_by_id(id)
    }

    pub fn list_users(&self) -> Vec<User> {
        self.repo.get_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;

    fn service() -> AuthenticationService {
        AuthenticationService::new(Arc::new(RecordingNotifier::new()))
    }

    #[test]
    fn test_register_rejects_duplicate_username() {
        let mut auth = service();
        auth.register_user("admin", "s3cret", Role::Admin).unwrap();

        assert_eq!(
            auth.register_user("admin", "other", Role::Reception),
            Err(ClinicError::DuplicateUsername("admin".into()))
        );
        assert_eq!(auth.list_users().len(), 1);
    }

    #[test]
    fn test_login_sets_single_session() {
        let mut auth = service();
        auth.register_user("admin", "s3cret", Role::Admin).unwrap();
        auth.register_user("desk", "front", Role::Reception).unwrap();

        auth.login("admin", "s3cret").unwrap();
        assert!(auth.has_role(Role::Admin));

        let session = auth.login("desk", "front").unwrap();
        assert_eq!(auth.current_session(), Some(&session));
        assert!(auth.has_role(Role::Reception));
        assert!(!auth.has_role(Role::Admin));
    }

    #[test]
    fn test_wrong_secret_and_unknown_user_look_the_same() {
        let mut auth = service();
        auth.register_user("admin", "s3cret", Role::Admin).unwrap();

        assert_eq!(auth.login("admin", "nope"), Err(ClinicError::InvalidCredentials));
        assert_eq!(auth.login("ghost", "s3cret"), Err(ClinicError::InvalidCredentials));
        assert!(!auth.is_logged_in());
    }

    #[test]
    fn test_failed_login_keeps_existing_session() {
        let mut auth = service();
        auth.register_user("admin", "s3cret", Role::Admin).unwrap();
        auth.login("admin", "s3cret").unwrap();

        assert!(auth.login("admin", "wrong").is_err());
        assert!(auth.has_role(Role::Admin));
    }

    #[test]
    fn test_inactive_user_cannot_login() {
        let mut auth = service();
        let id = auth.register_user("doc", "pw", Role::Doctor).unwrap();
        auth.set_active(id, false).unwrap();

        assert_eq!(
            auth.login("doc", "pw"),
            Err(ClinicError::InactiveUser("doc".into()))
        );
    }

    #[test]
    fn test_deactivating_current_user_ends_session() {
        let mut auth = service();
        let id = auth.register_user("doc", "pw", Role::Doctor).unwrap();
        auth.login("doc", "pw").unwrap();

        auth.set_active(id, false).unwrap();
        assert!(!auth.is_logged_in());
        assert!(!auth.has_role(Role::Doctor));
    }

    #[test]
    fn test_logout_clears_session() {
        let mut auth = service();
        auth.register_user("admin", "s3cret", Role::Admin).unwrap();
        auth.login("admin", "s3cret").unwrap();

        let ended = auth.logout().unwrap();
        assert_eq!(ended.username, "admin");
        assert!(!auth.has_role(Role::Admin));
        assert!(auth.logout().is_none());
    }

    #[test]
    fn test_change_secret_requires_old_secret() {
        let mut auth = service();
        let id = auth.register_user("admin", "old", Role::Admin).unwrap();

        assert_eq!(
            auth.change_secret(id, "wrong", "new"),
            Err(ClinicError::InvalidCredentials)
        );
        auth.change_secret(id, "old", "new").unwrap();
        assert!(auth.login("admin", "old").is_err());
        assert!(auth.login("admin", "new").is_ok());
    }
}
