use async_trait::async_trait;
use chrono::{DateTime, Utc};

use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_core::types::SortDirection;
use warden_core::types::pagination::{PageRequest, PageResponse};
use warden_entity::user::{CreateUser, UpdateUser, User, UserFilter, UserSortField};

use super::{MemoryState, MemoryStore, paginate};
use crate::store::UserStore;

fn touched(state: &mut MemoryState, id: i64, f: impl FnOnce(&mut User)) -> Option<User> {
    let user = state.users.get_mut(&id)?;
    f(user);
    user.updated_at = Utc::now();
    let user = user.clone();
    Some(state.hydrate(&user))
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.get(&id).map(|u| state.hydrate(u)))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .map(|u| state.hydrate(u)))
    }

    async fn list(&self, filter: &UserFilter, page: &PageRequest) -> AppResult<PageResponse<User>> {
        let state = self.state.lock().await;
        let mut users: Vec<User> = state
            .users
            .values()
            .filter(|u| filter.matches(u))
            .map(|u| state.hydrate(u))
            .collect();

        users.sort_by(|a, b| {
            let ordering = match filter.sort_by {
                UserSortField::CreatedAt => a.created_at.cmp(&b.created_at),
                UserSortField::Username => a.username.cmp(&b.username),
                UserSortField::Email => a.email.cmp(&b.email),
                UserSortField::LastLogin => a.last_login.cmp(&b.last_login),
            }
            .then(a.id.cmp(&b.id));
            match filter.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        Ok(paginate(users, page))
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let mut state = self.state.lock().await;
        if !state.roles.contains_key(&data.role_id) {
            return Err(AppError::not_found("Role not found"));
        }
        if state.users.values().any(|u| u.username == data.username) {
            return Err(
                AppError::conflict(format!("Username '{}' already exists", data.username))
                    .with_details(serde_json::json!({ "conflictField": "username" })),
            );
        }
        if state.users.values().any(|u| u.email == data.email) {
            return Err(AppError::conflict("Email already in use")
                .with_details(serde_json::json!({ "conflictField": "email" })));
        }

        let id = MemoryState::next_id(&mut state.next_user_id);
        let now = Utc::now();
        let user = User {
            id,
            username: data.username.clone(),
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            first_name: data.first_name.clone(),
            last_name: data.last_name.clone(),
            is_active: true,
            last_login: None,
            role_id: data.role_id,
            role_name: String::new(),
            profile_image: None,
            created_at: now,
            updated_at: now,
        };
        let hydrated = state.hydrate(&user);
        state.users.insert(id, user);
        Ok(hydrated)
    }

    async fn update_profile(&self, id: i64, data: &UpdateUser) -> AppResult<Option<User>> {
        let mut state = self.state.lock().await;
        Ok(touched(&mut state, id, |user| {
            if let Some(first_name) = &data.first_name {
                user.first_name = first_name.clone();
            }
            if let Some(last_name) = &data.last_name {
                user.last_name = last_name.clone();
            }
            if let Some(active) = data.is_active {
                user.is_active = active;
            }
        }))
    }

    async fn set_role(&self, id: i64, role_id: i64) -> AppResult<Option<User>> {
        let mut state = self.state.lock().await;
        if !state.roles.contains_key(&role_id) {
            return Err(AppError::not_found("Role not found"));
        }
        Ok(touched(&mut state, id, |user| user.role_id = role_id))
    }

    async fn set_active(&self, id: i64, active: bool) -> AppResult<Option<User>> {
        let mut state = self.state.lock().await;
        Ok(touched(&mut state, id, |user| user.is_active = active))
    }

    async fn touch_last_login(&self, id: i64, at: DateTime<Utc>) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if let Some(user) = state.users.get_mut(&id) {
            user.last_login = Some(at);
        }
        Ok(())
    }

    async fn count_by_role(&self, role_id: i64) -> AppResult<u64> {
        let state = self.state.lock().await;
        Ok(state.users.values().filter(|u| u.role_id == role_id).count() as u64)
    }
}
