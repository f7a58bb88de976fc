//! Typed authentication and authorization failures.

use thiserror::Error;

use warden_core::error::{AppError, ErrorKind};

/// Why a credential, token or session was rejected.
///
/// Each variant carries a coarse reason code; callers see the code but
/// never which internal lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
    /// No bearer token was presented.
    #[error("Access token required")]
    MissingToken,
    /// Signature, issuer or structure check failed.
    #[error("Invalid token")]
    InvalidToken,
    /// The token is past its expiry.
    #[error("Token expired")]
    TokenExpired,
    /// The token is intact but its session is gone or expired.
    #[error("Session has been invalidated or expired")]
    SessionInvalidated,
    /// Unknown email or wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,
    /// The account is deactivated.
    #[error("Account is inactive")]
    AccountInactive,
    /// The user already holds an active session.
    #[error("An active session already exists. Please logout from other devices first.")]
    SessionConflict,
    /// Authenticated, but the role or permission does not match.
    #[error("Unauthorized access")]
    Forbidden,
}

impl AuthFailure {
    /// The reason code reported to clients.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MissingToken => "MISSING_TOKEN",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::SessionInvalidated => "SESSION_INVALIDATED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::AccountInactive => "ACCOUNT_INACTIVE",
            Self::SessionConflict => "SESSION_CONFLICT",
            Self::Forbidden => "FORBIDDEN",
        }
    }

    /// The error category this failure belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingToken
            | Self::InvalidToken
            | Self::TokenExpired
            | Self::SessionInvalidated
            | Self::InvalidCredentials => ErrorKind::Authentication,
            Self::AccountInactive => ErrorKind::AccountInactive,
            Self::SessionConflict => ErrorKind::SessionConflict,
            Self::Forbidden => ErrorKind::Authorization,
        }
    }
}

impl From<AuthFailure> for AppError {
    fn from(failure: AuthFailure) -> Self {
        AppError::new(failure.kind(), failure.to_string()).with_reason(failure.reason())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_failures_share_kind() {
        for failure in [
            AuthFailure::MissingToken,
            AuthFailure::InvalidToken,
            AuthFailure::TokenExpired,
            AuthFailure::SessionInvalidated,
        ] {
            let err = AppError::from(failure);
            assert_eq!(err.kind, ErrorKind::Authentication);
            assert_eq!(err.code(), failure.reason());
        }
    }

    #[test]
    fn test_forbidden_is_authorization() {
        let err = AppError::from(AuthFailure::Forbidden);
        assert_eq!(err.kind, ErrorKind::Authorization);
        assert_eq!(err.message, "Unauthorized access");
    }
}
