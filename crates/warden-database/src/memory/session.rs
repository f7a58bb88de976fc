use async_trait::async_trait;
use chrono::{DateTime, Utc};

use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_entity::session::{ActiveSession, NewSession, Session};

use super::MemoryStore;
use crate::store::SessionStore;

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create_exclusive(&self, data: &NewSession) -> AppResult<Session> {
        let mut state = self.state.lock().await;
        if !state.users.contains_key(&data.user_id) {
            return Err(AppError::not_found("User not found"));
        }

        let now = data.created_at;
        let has_active = state
            .sessions
            .values()
            .any(|s| s.user_id == data.user_id && s.is_active_at(now));
        if has_active {
            return Err(AppError::session_conflict(
                "An active session already exists. Please logout from other devices first.",
            ));
        }

        let session = Session {
            id: data.id,
            user_id: data.user_id,
            token_hash: data.token_hash.clone(),
            ip_address: data.ip_address.clone(),
            user_agent: data.user_agent.clone(),
            created_at: data.created_at,
            expires_at: data.expires_at,
        };
        state.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn find_active(
        &self,
        user_id: i64,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Session>> {
        let state = self.state.lock().await;
        Ok(state
            .sessions
            .values()
            .find(|s| s.user_id == user_id && s.token_hash == token_hash && s.is_active_at(now))
            .cloned())
    }

    async fn expire_by_token(
        &self,
        user_id: i64,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let mut count = 0;
        for session in state.sessions.values_mut() {
            if session.user_id == user_id
                && session.token_hash == token_hash
                && session.is_active_at(now)
            {
                session.expires_at = now;
                count += 1;
            }
        }
        Ok(count)
    }

    async fn expire_for_user(
        &self,
        user_id: i64,
        except_token_hash: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        if self.session_expiry_fails() {
            return Err(AppError::database("session store unavailable"));
        }
        let mut state = self.state.lock().await;
        let mut count = 0;
        for session in state.sessions.values_mut() {
            let spared = except_token_hash.is_some_and(|hash| session.token_hash == hash);
            if session.user_id == user_id && session.is_active_at(now) && !spared {
                session.expires_at = now;
                count += 1;
            }
        }
        Ok(count)
    }

    async fn list_active(&self, now: DateTime<Utc>) -> AppResult<Vec<ActiveSession>> {
        let state = self.state.lock().await;
        let mut active: Vec<ActiveSession> = state
            .sessions
            .values()
            .filter(|s| s.is_active_at(now))
            .filter_map(|s| {
                let owner = state.users.get(&s.user_id)?;
                Some(ActiveSession {
                    id: s.id,
                    user_id: s.user_id,
                    username: owner.username.clone(),
                    email: owner.email.clone(),
                    ip_address: s.ip_address.clone(),
                    user_agent: s.user_agent.clone(),
                    created_at: s.created_at,
                    expires_at: s.expires_at,
                })
            })
            .collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(active)
    }

    async fn recent_for_user(&self, user_id: i64, limit: u32) -> AppResult<Vec<Session>> {
        let state = self.state.lock().await;
        let mut sessions: Vec<Session> = state
            .sessions
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        sessions.truncate(limit as usize);
        Ok(sessions)
    }

    async fn delete_for_user(&self, user_id: i64) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let before = state.sessions.len();
        state.sessions.retain(|_, s| s.user_id != user_id);
        Ok((before - state.sessions.len()) as u64)
    }
}
