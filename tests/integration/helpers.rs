//! Shared test helpers for integration tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use warden_api::AppState;
use warden_auth::PasswordHasher;
use warden_core::config::AppConfig;
use warden_database::{MemoryStore, Stores};
use warden_entity::permission::CreatePermission;
use warden_entity::role::{CreateRole, Role};
use warden_entity::user::{CreateUser, User};

/// Password every seeded account uses.
pub const PASSWORD: &str = "Vq8#zLm2!pRt";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Backing store, for direct seeding and fault injection
    pub memory: MemoryStore,
    /// Store handles over `memory`
    pub stores: Stores,
    /// Application config
    pub config: AppConfig,
    hash: String,
}

impl TestApp {
    /// Create a new test application over an empty in-memory store
    pub async fn new() -> Self {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "database": { "url": "postgres://unused" },
            "auth": { "jwt_secret": "integration-test-secret-0123456789abcdef" },
        }))
        .expect("Failed to build test config");

        let memory = MemoryStore::new();
        let stores = Stores::from_memory(memory.clone());
        let state = AppState::new(config.clone(), stores.clone(), None);
        let router = warden_api::build_app(state);

        let hash = PasswordHasher::new()
            .hash(PASSWORD)
            .expect("Failed to hash password");

        Self {
            router,
            memory,
            stores,
            config,
            hash,
        }
    }

    /// Find or create a role by exact name
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
            .expect("Failed to create role")
    }

    /// Create an active user `{username}@example.com` holding `role`
    pub async fn create_user(&self, username: &str, role: &str) -> User {
        let role = self.role(role).await;
        self.stores
            .users
            .create(&CreateUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password_hash: self.hash.clone(),
                first_name: username.to_string(),
                last_name: "Tester".to_string(),
                role_id: role.id,
            })
            .await
            .expect("Failed to create user")
    }

    /// Create a permission and attach it to `role`
    pub async fn grant(&self, role: &str, permission: &str) {
        let role = self.role(role).await;
        let permission = self
            .stores
            .permissions
            .create(&CreatePermission {
                name: permission.to_string(),
                description: None,
            })
            .await
            .expect("Failed to create permission");
        self.stores
            .permissions
            .assign(role.id, permission.id)
            .await
            .expect("Failed to assign permission");
    }

    /// Log in and return the raw login response
    pub async fn try_login(&self, username: &str) -> TestResponse {
        let body = serde_json::json!({
            "email": format!("{username}@example.com"),
            "password": PASSWORD,
        });
        self.request("POST", "/api/sessions/login", Some(body), None)
            .await
    }

    /// Login and return the bearer token
    pub async fn login(&self, username: &str) -> String {
        let response = self.try_login(username).await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        response.body["data"]["token"]
            .as_str()
            .expect("No token in login response")
            .to_string()
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .header("X-Forwarded-For", "203.0.113.7");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `error` code of an error body
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}
