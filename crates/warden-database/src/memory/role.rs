use async_trait::async_trait;
use chrono::Utc;

use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_core::types::pagination::{PageRequest, PageResponse};
use warden_entity::role::{CreateRole, Role, UpdateRole};

use super::{MemoryState, MemoryStore, paginate};
use crate::store::RoleStore;

fn name_taken(state: &MemoryState, name: &str, except: Option<i64>) -> bool {
    state
        .roles
        .values()
        .any(|r| r.name == name && Some(r.id) != except)
}

fn duplicate(name: &str) -> AppError {
    AppError::conflict(format!("Role '{name}' already exists"))
        .with_details(serde_json::json!({ "conflictField": "name" }))
}

#[async_trait]
impl RoleStore for MemoryStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Role>> {
        Ok(self.state.lock().await.roles.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let state = self.state.lock().await;
        Ok(state.roles.values().find(|r| r.is_named(name)).cloned())
    }

    async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<Role>> {
        let state = self.state.lock().await;
        let mut roles: Vec<Role> = state.roles.values().cloned().collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(paginate(roles, page))
    }

    async fn create(&self, data: &CreateRole) -> AppResult<Role> {
        let mut state = self.state.lock().await;
        if name_taken(&state, &data.name, None) {
            return Err(duplicate(&data.name));
        }
        let now = Utc::now();
        let role = Role {
            id: MemoryState::next_id(&mut state.next_role_id),
            name: data.name.clone(),
            description: data.description.clone(),
            created_at: now,
            updated_at: now,
        };
        state.roles.insert(role.id, role.clone());
        Ok(role)
    }

    async fn update(&self, id: i64, data: &UpdateRole) -> AppResult<Option<Role>> {
        let mut state = self.state.lock().await;
        if let Some(name) = &data.name {
            if name_taken(&state, name, Some(id)) {
                return Err(duplicate(name));
            }
        }
        let Some(role) = state.roles.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &data.name {
            role.name = name.clone();
        }
        if let Some(description) = &data.description {
            role.description = Some(description.clone());
        }
        role.updated_at = Utc::now();
        Ok(Some(role.clone()))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        if state.users.values().any(|u| u.role_id == id) {
            return Err(AppError::conflict(
                "Role is still assigned to one or more users",
            ));
        }
        let removed = state.roles.remove(&id).is_some();
        if removed {
            state.role_permissions.retain(|(role_id, _), _| *role_id != id);
        }
        Ok(removed)
    }
}
