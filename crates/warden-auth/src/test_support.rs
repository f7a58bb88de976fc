//! Shared fixtures for unit tests.

use warden_core::config::{AuthConfig, SessionConfig};
use warden_database::Stores;
use warden_entity::role::{CreateRole, Role};
use warden_entity::user::{CreateUser, User};

use crate::password::PasswordHasher;
use crate::session::SessionAuthority;

pub struct Fixture {
    pub stores: Stores,
    pub auth: AuthConfig,
    hash: String,
}

impl Fixture {
    pub const PASSWORD: &'static str = "Vq8#zLm2!pRt";

    pub async fn new() -> Self {
        let hash = PasswordHasher::new().hash(Self::PASSWORD).unwrap();
        Self {
            stores: Stores::in_memory(),
            auth: AuthConfig {
                jwt_secret: "unit-test-secret-unit-test-secret!".to_string(),
                ..AuthConfig::default()
            },
            hash,
        }
    }

    pub fn authority(&self) -> SessionAuthority {
        SessionAuthority::new(self.stores.clone(), &self.auth, &SessionConfig::default())
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

    pub async fn user(&self, username: &str, role: &str, active: bool) -> User {
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
        if active {
            user
        } else {
            self.stores
                .users
                .set_active(user.id, false)
                .await
                .unwrap()
                .unwrap()
        }
    }
}
