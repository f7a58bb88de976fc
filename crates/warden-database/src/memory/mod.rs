//! In-memory implementation of every storage trait.
//!
//! All state sits behind one Tokio mutex, so each trait call is atomic
//! with respect to every other call. That makes
//! [`SessionStore::create_exclusive`](crate::store::SessionStore::create_exclusive)
//! race-free without transactions. Suitable for tests and single-node tooling.

mod activity;
mod permission;
mod role;
mod session;
mod user;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use warden_core::types::pagination::{PageRequest, PageResponse};
use warden_entity::activity::ActivityLog;
use warden_entity::permission::Permission;
use warden_entity::role::Role;
use warden_entity::session::Session;
use warden_entity::user::User;

/// Tables held by the in-memory store.
#[derive(Debug, Default)]
struct MemoryState {
    users: BTreeMap<i64, User>,
    roles: BTreeMap<i64, Role>,
    permissions: BTreeMap<i64, Permission>,
    role_permissions: BTreeMap<(i64, i64), DateTime<Utc>>,
    sessions: BTreeMap<Uuid, Session>,
    activity: Vec<ActivityLog>,
    next_user_id: i64,
    next_role_id: i64,
    next_permission_id: i64,
}

impl MemoryState {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }

    /// Copy of a user with the current role name filled in.
    fn hydrate(&self, user: &User) -> User {
        let mut user = user.clone();
        if let Some(role) = self.roles.get(&user.role_id) {
            user.role_name = role.name.clone();
        }
        user
    }
}

/// Shared in-memory database.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    fail_activity_writes: Arc<AtomicBool>,
    fail_session_expiry: Arc<AtomicBool>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every activity-log append fail, to exercise best-effort logging.
    pub fn set_fail_activity_writes(&self, fail: bool) {
        self.fail_activity_writes.store(fail, Ordering::SeqCst);
    }

    fn activity_writes_fail(&self) -> bool {
        self.fail_activity_writes.load(Ordering::SeqCst)
    }

    /// Make bulk session expiry for a user fail.
    pub fn set_fail_session_expiry(&self, fail: bool) {
        self.fail_session_expiry.store(fail, Ordering::SeqCst);
    }

    fn session_expiry_fails(&self) -> bool {
        self.fail_session_expiry.load(Ordering::SeqCst)
    }
}

/// Slice an already ordered list into one page.
fn paginate<T>(items: Vec<T>, page: &PageRequest) -> PageResponse<T> {
    let total = items.len() as u64;
    let items = items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect();
    PageResponse::new(items, page, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate_slices() {
        let page = PageRequest::new(2, 2);
        let result = paginate(vec![1, 2, 3, 4, 5], &page);
        assert_eq!(result.items, vec![3, 4]);
        assert_eq!(result.total_items, 5);
        assert_eq!(result.total_pages, 3);
    }
}
