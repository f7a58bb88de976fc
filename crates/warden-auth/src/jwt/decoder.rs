//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use warden_core::config::AuthConfig;

use super::claims::Claims;
use crate::error::AuthFailure;

/// Verifies signature, issuer and expiry of session tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5;
        validation.set_issuer(&[config.jwt_issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and verifies a token string.
    pub fn decode(&self, token: &str) -> Result<Claims, AuthFailure> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthFailure::TokenExpired,
                _ => AuthFailure::InvalidToken,
            })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use warden_entity::user::User;

    use super::*;
    use crate::jwt::JwtEncoder;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            ..AuthConfig::default()
        }
    }

    fn user() -> User {
        let now = Utc::now();
        User {
            id: 7,
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            password_hash: String::new(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            is_active: true,
            last_login: None,
            role_id: 1,
            role_name: "Sales".to_string(),
            profile_image: None,
            created_at: now,
            updated_at: now,
        }
    }

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_issue_then_decode() {
        let session_id = Uuid::new_v4();
        let issued = JwtEncoder::new(&config(SECRET))
            .issue(&user(), session_id, Utc::now())
            .unwrap();

        let claims = JwtDecoder::new(&config(SECRET)).decode(&issued.token).unwrap();
        assert_eq!(claims.user_id(), Ok(7));
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.session_id(), session_id);
        assert_eq!(claims.role, "Sales");
    }

    #[test]
    fn test_tokens_are_unique() {
        let encoder = JwtEncoder::new(&config(SECRET));
        let now = Utc::now();
        let a = encoder.issue(&user(), Uuid::new_v4(), now).unwrap();
        let b = encoder.issue(&user(), Uuid::new_v4(), now).unwrap();
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn test_expired_token() {
        let issued = JwtEncoder::new(&config(SECRET))
            .issue(&user(), Uuid::new_v4(), Utc::now() - Duration::hours(48))
            .unwrap();
        let err = JwtDecoder::new(&config(SECRET))
            .decode(&issued.token)
            .unwrap_err();
        assert_eq!(err, AuthFailure::TokenExpired);
    }

    #[test]
    fn test_non_numeric_subject_is_invalid() {
        let claims = Claims {
            sub: "jdoe".to_string(),
            sid: Uuid::new_v4(),
            role: "Sales".to_string(),
            email: "jdoe@example.com".to_string(),
            iss: "warden".to_string(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
            jti: Uuid::new_v4(),
        };
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let decoded = JwtDecoder::new(&config(SECRET)).decode(&token).unwrap();
        assert_eq!(decoded.user_id(), Err(AuthFailure::InvalidToken));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let issued = JwtEncoder::new(&config(SECRET))
            .issue(&user(), Uuid::new_v4(), Utc::now())
            .unwrap();
        let err = JwtDecoder::new(&config("ffffffffffffffffffffffffffffffff"))
            .decode(&issued.token)
            .unwrap_err();
        assert_eq!(err, AuthFailure::InvalidToken);
        assert_eq!(
            JwtDecoder::new(&config(SECRET)).decode("garbage").unwrap_err(),
            AuthFailure::InvalidToken
        );
    }
}
