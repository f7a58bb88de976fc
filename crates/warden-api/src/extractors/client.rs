//! Client address and user agent of a request.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;
use axum_extra::headers::{HeaderMapExt, UserAgent};

/// Where a request came from.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    /// First `x-forwarded-for` hop, else the socket peer.
    pub ip_address: Option<String>,
    /// User-Agent header value.
    pub user_agent: Option<String>,
}

impl ClientInfo {
    /// Reads client details from headers, falling back to the peer address.
    pub fn from_headers(headers: &HeaderMap, peer: Option<SocketAddr>) -> Self {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_owned);

        Self {
            ip_address: forwarded.or_else(|| peer.map(|addr| addr.ip().to_string())),
            user_agent: headers
                .typed_get::<UserAgent>()
                .map(|ua| ua.as_str().to_owned()),
        }
    }

    pub fn ip(&self) -> Option<&str> {
        self.ip_address.as_deref()
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }
}

impl<S> FromRequestParts<S> for ClientInfo
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        Ok(Self::from_headers(&parts.headers, peer))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_forwarded_for_takes_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        headers.insert("user-agent", HeaderValue::from_static("curl/8.0"));

        let info = ClientInfo::from_headers(&headers, None);
        assert_eq!(info.ip(), Some("203.0.113.9"));
        assert_eq!(info.user_agent(), Some("curl/8.0"));
    }

    #[test]
    fn test_falls_back_to_peer() {
        let peer: SocketAddr = "192.0.2.4:5555".parse().unwrap();
        let info = ClientInfo::from_headers(&HeaderMap::new(), Some(peer));
        assert_eq!(info.ip(), Some("192.0.2.4"));
        assert_eq!(info.user_agent(), None);
    }
}
