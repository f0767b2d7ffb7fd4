use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use serde::Serialize;
use validator::{Validate, ValidationErrors};

use crate::errors::AppError;

/// One entry of the `{"errors": [...]}` list returned with a 400.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<&'static str>,
}

impl FieldError {
    /// An error tied to a field of the request body.
    pub fn body(param: &str, msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            param: Some(param.to_string()),
            location: Some("body"),
        }
    }

    /// An error with no associated field.
    pub fn message(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            param: None,
            location: None,
        }
    }
}

/// Flattens `validator` output into a field error list, ordered by field name
/// so responses are stable.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |e| {
                let msg = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {field}"));
                FieldError::body(&field, msg)
            })
        })
        .collect()
}

/// JSON body extractor that runs `validator` rules before the handler sees
/// the value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Login {
        #[validate(email(message = "Please include a valid email"))]
        email: String,
        #[validate(required(message = "Password required"))]
        password: Option<String>,
    }

    #[test]
    fn test_field_errors_are_sorted_and_located_in_body() {
        let login = Login {
            email: "not-an-email".to_string(),
            password: None,
        };
        let errors = field_errors(&login.validate().unwrap_err());

        assert_eq!(
            errors,
            vec![
                FieldError::body("email", "Please include a valid email"),
                FieldError::body("password", "Password required"),
            ]
        );
    }

    #[test]
    fn test_message_error_serializes_without_param() {
        let json = serde_json::to_value(FieldError::message("Invalid Credentials")).unwrap();
        assert_eq!(json, serde_json::json!({ "msg": "Invalid Credentials" }));
    }
}
