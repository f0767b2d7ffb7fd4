use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::auth::password::HashError;
use crate::auth::token::TokenError;
use crate::store::StoreError;
use crate::validation::{field_errors, FieldError};

pub const NO_PROFILE: &str = "There is no profile for this user";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Invalid Credentials")]
    InvalidCredentials,

    #[error("User already exists")]
    UserExists,

    #[error("There is no profile for this user")]
    NoProfile,

    #[error("No token, authorization denied")]
    MissingToken,

    #[error("Token is not valid")]
    InvalidToken,

    #[error("No Github profile found")]
    GithubNotFound,

    #[error("Malformed id: {0}")]
    MalformedId(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Password hash error: {0}")]
    Hash(#[from] HashError),
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(field_errors(&errors))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(vec![FieldError::message(rejection.body_text())])
    }
}

fn error_list(status: StatusCode, errors: Vec<FieldError>) -> Response {
    (status, Json(json!({ "errors": errors }))).into_response()
}

fn message(status: StatusCode, msg: &str) -> Response {
    (status, Json(json!({ "msg": msg }))).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => error_list(StatusCode::BAD_REQUEST, errors),
            AppError::InvalidCredentials | AppError::UserExists => error_list(
                StatusCode::BAD_REQUEST,
                vec![FieldError::message(self.to_string())],
            ),
            AppError::NoProfile => message(StatusCode::BAD_REQUEST, NO_PROFILE),
            AppError::MissingToken | AppError::InvalidToken => {
                message(StatusCode::UNAUTHORIZED, &self.to_string())
            }
            AppError::GithubNotFound => message(StatusCode::NOT_FOUND, &self.to_string()),
            AppError::MalformedId(_)
            | AppError::Store(_)
            | AppError::Token(_)
            | AppError::Hash(_) => {
                tracing::error!("{self}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server Error").into_response()
            }
        }
    }
}
