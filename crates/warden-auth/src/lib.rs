//! # warden-auth
//!
//! Authentication and authorization core for Warden.
//!
//! ## Modules
//!
//! - `credential`: email/password verification against stored Argon2id hashes
//! - `session`: login, validation, logout and administrative session control
//! - `rbac`: the role/permission graph
//! - `gate`: per-request authorization against a [`Requirement`]
//! - `activity`: best-effort activity recording
//! - `jwt`: signed session tokens
//! - `password`: hashing and password policy

pub mod activity;
pub mod credential;
pub mod error;
pub mod gate;
pub mod jwt;
pub mod password;
pub mod principal;
pub mod rbac;
pub mod session;
pub mod token;

pub use activity::ActivityRecorder;
pub use credential::{CredentialVerifier, Verification};
pub use error::AuthFailure;
pub use gate::{AccessGate, Requirement};
pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
pub use principal::Principal;
pub use rbac::PermissionGraph;
pub use session::{LoginOutcome, SessionAuthority, SessionSnapshot};

#[cfg(test)]
pub(crate) mod test_support;
