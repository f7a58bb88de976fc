//! Email and password verification.

use std::sync::Arc;

use tracing::debug;

use warden_core::result::AppResult;
use warden_database::UserStore;
use warden_entity::user::User;

use crate::password::PasswordHasher;

/// Outcome of a credential check.
#[derive(Debug, Clone)]
pub enum Verification {
    /// Email and password match.
    Accepted(User),
    /// Unknown email or wrong password. `known_user` is set when the email matched.
    Rejected { known_user: Option<i64> },
}

/// Checks an email/password pair against the user store. Read-only.
#[derive(Clone)]
pub struct CredentialVerifier {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
}

impl std::fmt::Debug for CredentialVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialVerifier").finish_non_exhaustive()
    }
}

impl CredentialVerifier {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self {
            users,
            hasher: PasswordHasher::new(),
        }
    }

    /// Verifies `password` for the user registered under `email`.
    ///
    /// Account status is not checked here.
    pub async fn verify(&self, email: &str, password: &str) -> AppResult<Verification> {
        let Some(user) = self.users.find_by_email(email.trim()).await? else {
            // Same cost as a mismatch on a known account.
            self.hasher.verify_decoy(password);
            debug!("Credential check for unknown email");
            return Ok(Verification::Rejected { known_user: None });
        };

        if self.hasher.verify(password, &user.password_hash)? {
            Ok(Verification::Accepted(user))
        } else {
            debug!(user_id = user.id, "Password mismatch");
            Ok(Verification::Rejected {
                known_user: Some(user.id),
            })
        }
    }
}
