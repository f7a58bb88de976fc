//! PostgreSQL repository implementations of the storage traits.

pub mod activity;
pub mod permission;
pub mod role;
pub mod session;
pub mod user;

pub use activity::ActivityLogRepository;
pub use permission::PermissionRepository;
pub use role::RoleRepository;
pub use session::SessionRepository;
pub use user::UserRepository;

use warden_core::error::{AppError, ErrorKind};

/// Wrap a driver error with a context message.
pub(crate) fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, context, e)
}

/// Name of the violated constraint, if the error carries one.
pub(crate) fn violated_constraint(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint(),
        _ => None,
    }
}

/// Escape `LIKE` metacharacters and wrap the term for a substring match.
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("jdoe"), "%jdoe%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
