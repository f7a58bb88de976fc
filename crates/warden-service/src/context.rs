//! Request context carrying the authenticated caller and client details.

use chrono::{DateTime, Utc};

use warden_auth::Principal;

/// Context for the current authenticated request.
///
/// Built by the access gate and passed into service methods so that
/// every operation knows *who* is acting and from *where*.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The validated caller.
    pub principal: Principal,
    /// Client address, from `x-forwarded-for` or the socket.
    pub ip_address: Option<String>,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    pub fn new(principal: Principal, ip_address: Option<String>, user_agent: Option<String>) -> Self {
        Self {
            principal,
            ip_address,
            user_agent,
            request_time: Utc::now(),
        }
    }

    /// The caller's user ID.
    pub fn user_id(&self) -> i64 {
        self.principal.user_id
    }

    /// Client address as a borrowed string.
    pub fn ip(&self) -> Option<&str> {
        self.ip_address.as_deref()
    }
}
