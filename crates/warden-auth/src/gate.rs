//! Per-request authorization.

use tracing::debug;

use warden_core::result::AppResult;

use crate::error::AuthFailure;
use crate::principal::Principal;
use crate::rbac::PermissionGraph;
use crate::session::SessionAuthority;

/// What a route demands of its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// Any valid session.
    Authenticated,
    /// A role whose name matches one of these, ignoring case.
    AnyRole(Vec<String>),
    /// A role holding this exact permission name.
    Permission(String),
}

impl Requirement {
    /// Shorthand for [`Requirement::AnyRole`].
    pub fn roles<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AnyRole(names.into_iter().map(Into::into).collect())
    }
}

/// Validates the caller's token, then checks the requirement.
#[derive(Debug, Clone)]
pub struct AccessGate {
    authority: SessionAuthority,
    graph: PermissionGraph,
}

impl AccessGate {
    pub fn new(authority: SessionAuthority, graph: PermissionGraph) -> Self {
        Self { authority, graph }
    }

    /// Resolves the caller for `token` and enforces `requirement`.
    ///
    /// A missing token, bad token or dead session is an authentication
    /// failure. A role or permission mismatch is an authorization failure.
    pub async fn authorize(
        &self,
        token: Option<&str>,
        requirement: &Requirement,
    ) -> AppResult<Principal> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthFailure::MissingToken)?;

        let principal = self.authority.validate(token).await?;

        let allowed = match requirement {
            Requirement::Authenticated => true,
            Requirement::AnyRole(roles) => principal.has_any_role(roles),
            Requirement::Permission(name) => {
                self.graph.has_permission(principal.role_id, name).await?
            }
        };

        if !allowed {
            debug!(
                user_id = principal.user_id,
                role = %principal.role_name,
                requirement = ?requirement,
                "Access denied"
            );
            return Err(AuthFailure::Forbidden.into());
        }

        Ok(principal)
    }
}
