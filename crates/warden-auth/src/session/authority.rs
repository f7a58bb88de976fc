//! The session authority. Every active session in the system is created,
//! checked and invalidated here.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use warden_core::config::{AuthConfig, SessionConfig};
use warden_core::error::{AppError, ErrorKind};
use warden_core::result::AppResult;
use warden_database::Stores;
use warden_entity::activity::{ActivityLog, ActivityType};
use warden_entity::permission::Permission;
use warden_entity::role::Role;
use warden_entity::session::{ActiveSession, NewSession, Session};
use warden_entity::user::User;

use crate::activity::ActivityRecorder;
use crate::credential::{CredentialVerifier, Verification};
use crate::error::AuthFailure;
use crate::jwt::{JwtDecoder, JwtEncoder};
use crate::principal::Principal;
use crate::token::token_digest;

/// Result of a successful login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutcome {
    /// The bearer token.
    pub token: String,
    /// When the token and its session expire.
    pub expires_at: DateTime<Utc>,
    /// The authenticated user.
    pub user: User,
    /// The created session.
    #[serde(skip)]
    pub session: Session,
}

/// Current state of the caller's account.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub user: User,
    pub role: Option<Role>,
    pub permissions: Vec<Permission>,
    pub recent_sessions: Vec<Session>,
    pub recent_activity: Vec<ActivityLog>,
}

/// Issues, validates and revokes sessions.
///
/// A user holds at most one active session. Validation always re-reads the
/// session row and the user, so revocation and deactivation take effect on
/// the next request.
#[derive(Clone)]
pub struct SessionAuthority {
    stores: Stores,
    credentials: CredentialVerifier,
    encoder: JwtEncoder,
    decoder: JwtDecoder,
    activity: ActivityRecorder,
    admin_role: String,
    session_config: SessionConfig,
}

impl std::fmt::Debug for SessionAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionAuthority")
            .field("encoder", &self.encoder)
            .field("admin_role", &self.admin_role)
            .field("session_config", &self.session_config)
            .finish()
    }
}

impl SessionAuthority {
    /// Creates an authority over `stores`.
    pub fn new(stores: Stores, auth: &AuthConfig, session: &SessionConfig) -> Self {
        Self {
            credentials: CredentialVerifier::new(stores.users.clone()),
            activity: ActivityRecorder::new(stores.activity.clone()),
            encoder: JwtEncoder::new(auth),
            decoder: JwtDecoder::new(auth),
            admin_role: auth.admin_role.clone(),
            session_config: session.clone(),
            stores,
        }
    }

    /// Performs the login flow:
    ///
    /// 1. Verify credentials (failed attempts on a known email are recorded)
    /// 2. Reject inactive accounts
    /// 3. Sign a token and atomically insert its session, unless another is active
    /// 4. Update last login and record the success
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
    ) -> AppResult<LoginOutcome> {
        let mut user = match self.credentials.verify(email, password).await? {
            Verification::Accepted(user) => user,
            Verification::Rejected { known_user } => {
                if let Some(user_id) = known_user {
                    self.activity
                        .record(
                            user_id,
                            ActivityType::LoginFailed,
                            "Failed login attempt",
                            ip_address,
                        )
                        .await;
                }
                warn!(user_id = ?known_user, "Login rejected: invalid credentials");
                return Err(AuthFailure::InvalidCredentials.into());
            }
        };

        if !user.is_active {
            warn!(user_id = user.id, "Login rejected: account inactive");
            return Err(AuthFailure::AccountInactive.into());
        }

        let now = Utc::now();
        let session_id = Uuid::new_v4();
        let issued = self.encoder.issue(&user, session_id, now)?;

        let session = self
            .stores
            .sessions
            .create_exclusive(&NewSession {
                id: session_id,
                user_id: user.id,
                token_hash: token_digest(&issued.token),
                ip_address: ip_address.map(str::to_owned),
                user_agent: user_agent.map(str::to_owned),
                created_at: now,
                expires_at: issued.expires_at,
            })
            .await
            .map_err(|e| match e.kind {
                ErrorKind::SessionConflict => {
                    warn!(user_id = user.id, "Login rejected: active session exists");
                    AppError::from(AuthFailure::SessionConflict)
                }
                _ => e,
            })?;

        if let Err(e) = self.stores.users.touch_last_login(user.id, now).await {
            warn!(user_id = user.id, error = %e, "Failed to update last login");
        } else {
            user.last_login = Some(now);
        }

        self.activity
            .record(
                user.id,
                ActivityType::LoginSuccess,
                "User logged in successfully",
                ip_address,
            )
            .await;

        info!(user_id = user.id, session_id = %session.id, "Login successful");

        Ok(LoginOutcome {
            token: issued.token,
            expires_at: issued.expires_at,
            user,
            session,
        })
    }

    /// Validates a bearer token and resolves the caller.
    pub async fn validate(&self, token: &str) -> AppResult<Principal> {
        let claims = self.decoder.decode(token)?;
        let user_id = claims.user_id()?;
        let token_hash = token_digest(token);

        let session = self
            .stores
            .sessions
            .find_active(user_id, &token_hash, Utc::now())
            .await?
            .ok_or(AuthFailure::SessionInvalidated)?;

        let user = self
            .stores
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthFailure::SessionInvalidated)?;

        if !user.is_active {
            return Err(AuthFailure::AccountInactive.into());
        }

        Ok(Principal {
            user_id: user.id,
            role_id: user.role_id,
            role_name: user.role_name,
            username: user.username,
            email: user.email,
            session_id: session.id,
            token_hash,
        })
    }

    /// Expires the caller's session. Returns the number of sessions updated,
    /// which is zero when it was already expired.
    pub async fn logout(&self, principal: &Principal, ip_address: Option<&str>) -> AppResult<u64> {
        let updated = self
            .stores
            .sessions
            .expire_by_token(principal.user_id, &principal.token_hash, Utc::now())
            .await?;

        self.activity
            .record(
                principal.user_id,
                ActivityType::Logout,
                "User logged out",
                ip_address,
            )
            .await;

        info!(user_id = principal.user_id, session_id = %principal.session_id, updated, "Logout");
        Ok(updated)
    }

    /// Expires every active session of `target_user_id` on behalf of an
    /// administrator. The actor's own session is spared.
    pub async fn admin_terminate(
        &self,
        actor: &Principal,
        target_user_id: i64,
        ip_address: Option<&str>,
    ) -> AppResult<u64> {
        if !actor.has_role(&self.admin_role) {
            return Err(AuthFailure::Forbidden.into());
        }

        let terminated = self
            .stores
            .sessions
            .expire_for_user(target_user_id, Some(&actor.token_hash), Utc::now())
            .await?;

        self.activity
            .record(
                actor.user_id,
                ActivityType::TerminateUserSessions,
                format!("Terminated {terminated} active session(s) of user {target_user_id}"),
                ip_address,
            )
            .await;

        info!(
            actor_id = actor.user_id,
            target_user_id, terminated, "Sessions terminated by administrator"
        );
        Ok(terminated)
    }

    /// Expires every active session of a user. Used when an account is deactivated.
    pub async fn expire_all_for_user(&self, user_id: i64) -> AppResult<u64> {
        let expired = self
            .stores
            .sessions
            .expire_for_user(user_id, None, Utc::now())
            .await?;
        if expired > 0 {
            info!(user_id, expired, "Expired sessions of user");
        }
        Ok(expired)
    }

    /// Every active session with its owner, newest first.
    pub async fn list_active(&self) -> AppResult<Vec<ActiveSession>> {
        self.stores.sessions.list_active(Utc::now()).await
    }

    /// Reloads the caller's account: user, role, permissions, recent sessions
    /// and recent activity.
    pub async fn refetch(&self, principal: &Principal) -> AppResult<SessionSnapshot> {
        let user = self
            .stores
            .users
            .find_by_id(principal.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if !user.is_active {
            return Err(AuthFailure::AccountInactive.into());
        }

        let role = self.stores.roles.find_by_id(user.role_id).await?;
        let permissions = self.stores.permissions.list_for_role(user.role_id).await?;
        let recent_sessions = self
            .stores
            .sessions
            .recent_for_user(user.id, self.session_config.recent_sessions_limit)
            .await?;
        let recent_activity = self
            .stores
            .activity
            .recent_for_user(user.id, self.session_config.recent_activity_limit)
            .await?;

        Ok(SessionSnapshot {
            user,
            role,
            permissions,
            recent_sessions,
            recent_activity,
        })
    }

    /// Deletes every session row of a user. Fails with not-found when the
    /// user has none.
    pub async fn purge_user_sessions(
        &self,
        actor: &Principal,
        user_id: i64,
        ip_address: Option<&str>,
    ) -> AppResult<u64> {
        let deleted = self.stores.sessions.delete_for_user(user_id).await?;
        if deleted == 0 {
            return Err(AppError::not_found("No sessions found for this user"));
        }

        self.activity
            .record(
                actor.user_id,
                ActivityType::DeleteUserSessions,
                format!("Deleted {deleted} session(s) of user {user_id}"),
                ip_address,
            )
            .await;

        info!(actor_id = actor.user_id, user_id, deleted, "Session rows deleted");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use warden_core::types::pagination::PageRequest;
    use warden_entity::activity::ActivityFilter;

    use super::*;
    use crate::test_support::Fixture;

    async fn activity_types(fx: &Fixture) -> Vec<ActivityType> {
        fx.stores
            .activity
            .list(&ActivityFilter::default(), &PageRequest::new(1, 100))
            .await
            .unwrap()
            .items
            .into_iter()
            .map(|e| e.activity_type)
            .collect()
    }

    #[tokio::test]
    async fn test_login_validate_logout() {
        let fx = Fixture::new().await;
        let user = fx.user("alice", "Sales", true).await;
        let authority = fx.authority();

        let outcome = authority
            .login("alice@example.com", Fixture::PASSWORD, Some("10.0.0.1"), Some("curl"))
            .await
            .unwrap();
        assert_eq!(outcome.user.id, user.id);
        assert!(outcome.user.last_login.is_some());
        assert_eq!(outcome.session.token_hash, token_digest(&outcome.token));

        let principal = authority.validate(&outcome.token).await.unwrap();
        assert_eq!(principal.user_id, user.id);
        assert_eq!(principal.role_name, "Sales");
        assert_eq!(principal.session_id, outcome.session.id);

        assert_eq!(authority.logout(&principal, None).await.unwrap(), 1);
        assert_eq!(authority.logout(&principal, None).await.unwrap(), 0);

        let err = authority.validate(&outcome.token).await.unwrap_err();
        assert_eq!(err.code(), "SESSION_INVALIDATED");

        let types = activity_types(&fx).await;
        assert!(types.contains(&ActivityType::LoginSuccess));
        assert!(types.contains(&ActivityType::Logout));
    }

    #[tokio::test]
    async fn test_second_login_conflicts_until_logout() {
        let fx = Fixture::new().await;
        fx.user("bob", "Sales", true).await;
        let authority = fx.authority();

        let first = authority
            .login("bob@example.com", Fixture::PASSWORD, None, None)
            .await
            .unwrap();
        let err = authority
            .login("bob@example.com", Fixture::PASSWORD, None, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::SessionConflict);
        assert_eq!(err.code(), "SESSION_CONFLICT");

        let principal = authority.validate(&first.token).await.unwrap();
        authority.logout(&principal, None).await.unwrap();

        let second = authority
            .login("bob@example.com", Fixture::PASSWORD, None, None)
            .await
            .unwrap();
        assert_ne!(first.token, second.token);
        assert!(authority.validate(&second.token).await.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_credentials_are_uniform() {
        let fx = Fixture::new().await;
        let user = fx.user("carol", "Sales", true).await;
        let authority = fx.authority();

        let wrong = authority
            .login("carol@example.com", "nope", None, None)
            .await
            .unwrap_err();
        let unknown = authority
            .login("ghost@example.com", "nope", None, None)
            .await
            .unwrap_err();
        assert_eq!(wrong.code(), "INVALID_CREDENTIALS");
        assert_eq!(wrong.message, unknown.message);
        assert_eq!(wrong.kind, unknown.kind);

        let logs = fx
            .stores
            .activity
            .recent_for_user(user.id, 10)
            .await
            .unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].activity_type, ActivityType::LoginFailed);
    }

    #[tokio::test]
    async fn test_inactive_user_cannot_login_or_validate() {
        let fx = Fixture::new().await;
        fx.user("dave", "Sales", false).await;
        let authority = fx.authority();
        let err = authority
            .login("dave@example.com", Fixture::PASSWORD, None, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::AccountInactive);

        let erin = fx.user("erin", "Sales", true).await;
        let outcome = authority
            .login("erin@example.com", Fixture::PASSWORD, None, None)
            .await
            .unwrap();
        fx.stores.users.set_active(erin.id, false).await.unwrap();
        let err = authority.validate(&outcome.token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::AccountInactive);
    }

    #[tokio::test]
    async fn test_validate_rejects_garbage_and_foreign_tokens() {
        let fx = Fixture::new().await;
        fx.user("frank", "Sales", true).await;
        let authority = fx.authority();
        assert_eq!(
            authority.validate("not-a-token").await.unwrap_err().code(),
            "INVALID_TOKEN"
        );

        let other = SessionAuthority::new(
            fx.stores.clone(),
            &AuthConfig {
                jwt_secret: "another-secret-another-secret-1234".to_string(),
                ..fx.auth.clone()
            },
            &SessionConfig::default(),
        );
        let outcome = other
            .login("frank@example.com", Fixture::PASSWORD, None, None)
            .await
            .unwrap();
        assert_eq!(
            authority.validate(&outcome.token).await.unwrap_err().code(),
            "INVALID_TOKEN"
        );
    }

    #[tokio::test]
    async fn test_validate_reports_expired_token() {
        let fx = Fixture::new().await;
        let user = fx.user("grace", "Sales", true).await;
        let authority = fx.authority();

        let stale = JwtEncoder::new(&fx.auth)
            .issue(&user, Uuid::new_v4(), Utc::now() - chrono::Duration::hours(48))
            .unwrap();
        assert_eq!(
            authority.validate(&stale.token).await.unwrap_err().code(),
            "TOKEN_EXPIRED"
        );
    }

    #[tokio::test]
    async fn test_admin_terminate() {
        let fx = Fixture::new().await;
        fx.user("root", "ADMIN", true).await;
        fx.user("gina", "Sales", true).await;
        let authority = fx.authority();

        let admin = authority
            .login("root@example.com", Fixture::PASSWORD, None, None)
            .await
            .unwrap();
        let target = authority
            .login("gina@example.com", Fixture::PASSWORD, None, None)
            .await
            .unwrap();
        let admin_principal = authority.validate(&admin.token).await.unwrap();
        let target_principal = authority.validate(&target.token).await.unwrap();

        let err = authority
            .admin_terminate(&target_principal, admin_principal.user_id, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

        let count = authority
            .admin_terminate(&admin_principal, target_principal.user_id, None)
            .await
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(
            authority.validate(&target.token).await.unwrap_err().code(),
            "SESSION_INVALIDATED"
        );

        let own = authority
            .admin_terminate(&admin_principal, admin_principal.user_id, None)
            .await
            .unwrap();
        assert_eq!(own, 0);
        assert!(authority.validate(&admin.token).await.is_ok());
        assert!(activity_types(&fx).await.contains(&ActivityType::TerminateUserSessions));
    }

    #[tokio::test]
    async fn test_refetch_and_purge() {
        let fx = Fixture::new().await;
        let user = fx.user("hank", "Sales", true).await;
        let authority = fx.authority();
        let outcome = authority
            .login("hank@example.com", Fixture::PASSWORD, None, None)
            .await
            .unwrap();
        let principal = authority.validate(&outcome.token).await.unwrap();

        let snapshot = authority.refetch(&principal).await.unwrap();
        assert_eq!(snapshot.user.id, user.id);
        assert_eq!(snapshot.role.map(|r| r.name), Some("Sales".to_string()));
        assert_eq!(snapshot.recent_sessions.len(), 1);
        assert!(!snapshot.recent_activity.is_empty());

        assert_eq!(authority.list_active().await.unwrap().len(), 1);
        assert_eq!(
            authority
                .purge_user_sessions(&principal, user.id, None)
                .await
                .unwrap(),
            1
        );
        let err = authority
            .purge_user_sessions(&principal, user.id, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(authority.list_active().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_logging_failure_does_not_block_login() {
        let memory = warden_database::MemoryStore::new();
        let mut fx = Fixture::new().await;
        fx.stores = Stores::from_memory(memory.clone());
        fx.user("ivan", "Sales", true).await;
        memory.set_fail_activity_writes(true);

        let outcome = fx
            .authority()
            .login("ivan@example.com", Fixture::PASSWORD, None, None)
            .await;
        assert!(outcome.is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_logins_yield_one_session() {
        let fx = Fixture::new().await;
        fx.user("judy", "Sales", true).await;
        let authority = Arc::new(fx.authority());

        let mut handles = Vec::new();
        for _ in 0..8 {
            let authority = Arc::clone(&authority);
            handles.push(tokio::spawn(async move {
                authority
                    .login("judy@example.com", Fixture::PASSWORD, None, None)
                    .await
            }));
        }

        let mut ok = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => ok += 1,
                Err(e) => assert_eq!(e.kind, ErrorKind::SessionConflict),
            }
        }
        assert_eq!(ok, 1);
        assert_eq!(authority.list_active().await.unwrap().len(), 1);
    }
}
