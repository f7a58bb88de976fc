//! Access-gate middleware: authenticates the bearer token, enforces the
//! route's [`Requirement`], and leaves a [`RequestContext`] for handlers.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};
use tracing::debug;

use warden_auth::Requirement;
use warden_service::RequestContext;

use crate::error::ApiError;
use crate::extractors::ClientInfo;
use crate::state::AppState;

/// State handed to [`gate`]: the app plus the requirement of the routes it guards.
#[derive(Debug, Clone)]
pub struct GateState {
    pub app: AppState,
    pub requirement: Arc<Requirement>,
}

impl GateState {
    pub fn new(app: AppState, requirement: Requirement) -> Self {
        Self {
            app,
            requirement: Arc::new(requirement),
        }
    }
}

/// Rejects the request unless the caller satisfies the requirement.
pub async fn gate(
    State(gate): State<GateState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let bearer = request.headers().typed_get::<Authorization<Bearer>>();
    let token = bearer.as_ref().map(|auth| auth.token());

    let principal = gate.app.gate.authorize(token, &gate.requirement).await?;

    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client = ClientInfo::from_headers(request.headers(), peer);

    debug!(
        user_id = principal.user_id,
        session_id = %principal.session_id,
        path = %request.uri().path(),
        "Request authorized"
    );

    request.extensions_mut().insert(RequestContext::new(
        principal,
        client.ip_address,
        client.user_agent,
    ));

    Ok(next.run(request).await)
}
