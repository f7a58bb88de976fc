//! Password policy enforcement for new passwords.

use serde_json::json;

use warden_core::config::AuthConfig;
use warden_core::error::AppError;

/// Validates password strength against configured policies.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    min_length: usize,
    min_score: u8,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
            min_score: config.password_min_score.min(4),
        }
    }

    /// Validates a password against all configured policies.
    ///
    /// Every violated rule is reported under the `password` field.
    pub fn validate(&self, password: &str, user_inputs: &[&str]) -> Result<(), AppError> {
        let mut problems = Vec::new();

        if password.chars().count() < self.min_length {
            problems.push(format!(
                "Password must be at least {} characters long",
                self.min_length
            ));
        }
        if !password.chars().any(char::is_uppercase) {
            problems.push("Password must contain at least one uppercase letter".to_string());
        }
        if !password.chars().any(char::is_lowercase) {
            problems.push("Password must contain at least one lowercase letter".to_string());
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            problems.push("Password must contain at least one digit".to_string());
        }
        if !password.chars().any(|c| !c.is_alphanumeric()) {
            problems.push("Password must contain at least one special character".to_string());
        }

        if problems.is_empty() {
            let estimate = zxcvbn::zxcvbn(password, user_inputs);
            if (estimate.score() as u8) < self.min_score {
                problems.push(
                    "Password is too weak. Please use a stronger password with more entropy."
                        .to_string(),
                );
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation("Password does not meet the policy")
                .with_details(json!({ "password": problems })))
        }
    }
}
