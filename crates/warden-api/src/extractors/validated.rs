//! JSON body extractor that runs `validator` rules.

use axum::Json;
use axum::extract::{FromRequest, Request};
use axum::extract::rejection::JsonRejection;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use validator::{Validate, ValidationErrors};

use warden_core::error::AppError;

use crate::error::ApiError;

/// A JSON body that deserialized and passed its validation rules.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_error)?;
        value.validate().map_err(validation_error)?;
        Ok(Self(value))
    }
}

fn rejection_error(rejection: JsonRejection) -> ApiError {
    AppError::validation(rejection.body_text()).into()
}

/// Converts field errors into `{"field": ["message", ...]}` details.
pub fn validation_error(errors: ValidationErrors) -> ApiError {
    let mut fields = Map::new();
    for (field, errs) in errors.field_errors() {
        let messages: Vec<Value> = errs
            .iter()
            .map(|e| match &e.message {
                Some(message) => Value::String(message.to_string()),
                None => Value::String(format!("Invalid value ({})", e.code)),
            })
            .collect();
        fields.insert(field.to_string(), Value::Array(messages));
    }

    AppError::validation("Validation failed")
        .with_details(json!(fields))
        .into()
}
