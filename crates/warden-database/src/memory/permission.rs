use async_trait::async_trait;
use chrono::Utc;

use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_core::types::pagination::{PageRequest, PageResponse};
use warden_entity::permission::{CreatePermission, Permission, RolePermission, UpdatePermission};

use super::{MemoryState, MemoryStore, paginate};
use crate::store::PermissionStore;

fn name_taken(state: &MemoryState, name: &str, except: Option<i64>) -> bool {
    state
        .permissions
        .values()
        .any(|p| p.name == name && Some(p.id) != except)
}

fn duplicate(name: &str) -> AppError {
    AppError::conflict(format!("Permission '{name}' already exists"))
        .with_details(serde_json::json!({ "conflictField": "name" }))
}

fn ensure_pair_exists(state: &MemoryState, role_id: i64, permission_id: i64) -> AppResult<()> {
    if !state.roles.contains_key(&role_id) {
        return Err(AppError::not_found("Role not found"));
    }
    if !state.permissions.contains_key(&permission_id) {
        return Err(AppError::not_found("Permission not found"));
    }
    Ok(())
}

#[async_trait]
impl PermissionStore for MemoryStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Permission>> {
        Ok(self.state.lock().await.permissions.get(&id).cloned())
    }

    async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<Permission>> {
        let state = self.state.lock().await;
        let mut items: Vec<Permission> = state.permissions.values().cloned().collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(paginate(items, page))
    }

    async fn create(&self, data: &CreatePermission) -> AppResult<Permission> {
        let mut state = self.state.lock().await;
        if name_taken(&state, &data.name, None) {
            return Err(duplicate(&data.name));
        }
        let now = Utc::now();
        let permission = Permission {
            id: MemoryState::next_id(&mut state.next_permission_id),
            name: data.name.clone(),
            description: data.description.clone(),
            created_at: now,
            updated_at: now,
        };
        state.permissions.insert(permission.id, permission.clone());
        Ok(permission)
    }

    async fn update(&self, id: i64, data: &UpdatePermission) -> AppResult<Option<Permission>> {
        let mut state = self.state.lock().await;
        if let Some(name) = &data.name {
            if name_taken(&state, name, Some(id)) {
                return Err(duplicate(name));
            }
        }
        let Some(permission) = state.permissions.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &data.name {
            permission.name = name.clone();
        }
        if let Some(description) = &data.description {
            permission.description = Some(description.clone());
        }
        permission.updated_at = Utc::now();
        Ok(Some(permission.clone()))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let removed = state.permissions.remove(&id).is_some();
        if removed {
            state.role_permissions.retain(|(_, permission_id), _| *permission_id != id);
        }
        Ok(removed)
    }

    async fn list_for_role(&self, role_id: i64) -> AppResult<Vec<Permission>> {
        let state = self.state.lock().await;
        let mut items: Vec<Permission> = state
            .role_permissions
            .keys()
            .filter(|(r, _)| *r == role_id)
            .filter_map(|(_, p)| state.permissions.get(p).cloned())
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    async fn role_has_permission(&self, role_id: i64, permission_name: &str) -> AppResult<bool> {
        let state = self.state.lock().await;
        Ok(state
            .role_permissions
            .keys()
            .filter(|(r, _)| *r == role_id)
            .filter_map(|(_, p)| state.permissions.get(p))
            .any(|p| p.name == permission_name))
    }

    async fn assign(&self, role_id: i64, permission_id: i64) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        ensure_pair_exists(&state, role_id, permission_id)?;
        if state.role_permissions.contains_key(&(role_id, permission_id)) {
            return Ok(false);
        }
        state
            .role_permissions
            .insert((role_id, permission_id), Utc::now());
        Ok(true)
    }

    async fn revoke(&self, role_id: i64, permission_id: i64) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        Ok(state
            .role_permissions
            .remove(&(role_id, permission_id))
            .is_some())
    }

    async fn list_assignments(&self) -> AppResult<Vec<RolePermission>> {
        let state = self.state.lock().await;
        let mut pairs: Vec<RolePermission> = state
            .role_permissions
            .iter()
            .filter_map(|((role_id, permission_id), created_at)| {
                let role = state.roles.get(role_id)?;
                let permission = state.permissions.get(permission_id)?;
                Some(RolePermission {
                    role_id: role.id,
                    role_name: role.name.clone(),
                    permission_id: permission.id,
                    permission_name: permission.name.clone(),
                    created_at: *created_at,
                })
            })
            .collect();
        pairs.sort_by(|a, b| {
            a.role_name
                .cmp(&b.role_name)
                .then_with(|| a.permission_name.cmp(&b.permission_name))
        });
        Ok(pairs)
    }
}
