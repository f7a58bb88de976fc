//! Shared fixtures for service tests.

use warden_auth::password::PasswordHasher;
use warden_auth::{PermissionGraph, SessionAuthority};
use warden_core::config::{AuthConfig, SessionConfig};
use warden_database::{MemoryStore, Stores};
use warden_entity::role::{CreateRole, Role};
use warden_entity::user::{CreateUser, User};

use crate::context::RequestContext;
use crate::permission::PermissionService;
use crate::role::RoleService;
use crate::user::AdminUserService;

pub struct Harness {
    pub stores: Stores,
    pub memory: MemoryStore,
    pub auth: AuthConfig,
    pub authority: SessionAuthority,
    pub admin_ctx: RequestContext,
    hash: String,
}

impl Harness {
    pub const PASSWORD: &'static str = "Vq8#zLm2!pRt";

    /// Stores with one logged-in administrator.
    pub async fn new() -> Self {
        let memory = MemoryStore::new();
        let stores = Stores::from_memory(memory.clone());
        let auth = AuthConfig {
            jwt_secret: "service-test-secret-service-test!!".to_string(),
            ..AuthConfig::default()
        };
        let authority = SessionAuthority::new(stores.clone(), &auth, &SessionConfig::default());
        let hash = PasswordHasher::new().hash(Self::PASSWORD).unwrap();

        let mut harness = Self {
            admin_ctx: placeholder_ctx(),
            stores,
            memory,
            auth,
            authority,
            hash,
        };
        let (_, token) = harness.logged_in("admin", "ADMIN").await;
        let principal = harness.authority.validate(&token).await.unwrap();
        harness.admin_ctx = RequestContext::new(principal, Some("127.0.0.1".to_string()), None);
        harness
    }

    pub fn graph(&self) -> PermissionGraph {
        PermissionGraph::new(self.stores.roles.clone(), self.stores.permissions.clone())
    }

    pub fn users(&self) -> AdminUserService {
        AdminUserService::new(self.stores.clone(), self.authority.clone(), &self.auth)
    }

    pub fn roles(&self) -> RoleService {
        RoleService::new(self.stores.clone(), self.graph())
    }

    pub fn permissions(&self) -> PermissionService {
        PermissionService::new(self.stores.clone(), self.graph())
    }

    pub async fn role(&self, name: &str) -> Role {
        if let Some(role) = self.stores.roles.find_by_name(name).await.unwrap() {
            return role;
        }
        self.stores
            .roles
            .create(&CreateRole {
                name: name.to_string(),
                description: None,
            })
            .await
            .unwrap()
    }

    /// Creates an active user with `role` and logs it in.
    pub async fn logged_in(&self, username: &str, role: &str) -> (User, String) {
        let role = self.role(role).await;
        let user = self
            .stores
            .users
            .create(&CreateUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password_hash: self.hash.clone(),
                first_name: username.to_string(),
                last_name: "Test".to_string(),
                role_id: role.id,
            })
            .await
            .unwrap();
        let outcome = self
            .authority
            .login(&user.email, Self::PASSWORD, None, None)
            .await
            .unwrap();
        (user, outcome.token)
    }
}

fn placeholder_ctx() -> RequestContext {
    RequestContext::new(
        warden_auth::Principal {
            user_id: 0,
            role_id: 0,
            role_name: String::new(),
            username: String::new(),
            email: String::new(),
            session_id: uuid::Uuid::nil(),
            token_hash: String::new(),
        },
        None,
        None,
    )
}
