use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::users::model::Role;

/// Single violated field reported by request validation.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// API error taxonomy. Every handler failure funnels through here and is
/// rendered as a structured JSON response.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("no token provided")]
    NoToken,
    #[error("invalid token")]
    InvalidToken,
    #[error("user not found")]
    UserNotFound,
    #[error("forbidden")]
    Forbidden { required: Vec<Role>, actual: Role },
    #[error("email already in use")]
    EmailInUse,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("missing configuration: {0}")]
    Configuration(&'static str),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials
            | ApiError::NoToken
            | ApiError::InvalidToken
            | ApiError::UserNotFound => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::EmailInUse => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Configuration(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation(errors) => json!({ "errors": errors }),
            ApiError::InvalidCredentials => json!({ "message": "Invalid credentials" }),
            ApiError::NoToken => json!({ "message": "No token provided" }),
            ApiError::InvalidToken => json!({ "message": "Invalid token" }),
            ApiError::UserNotFound => json!({ "message": "User not found" }),
            ApiError::Forbidden { required, actual } => json!({
                "success": false,
                "message": "You do not have permission to perform this action.",
                "requiredRoles": required,
                "userRole": actual,
            }),
            ApiError::EmailInUse => json!({ "message": "Email already in use" }),
            ApiError::NotFound(what) => json!({ "message": format!("{what} not found") }),
            ApiError::Configuration(what) => {
                error!(what, "missing configuration");
                json!({ "message": format!("Server misconfigured: {what}") })
            }
            ApiError::Internal(err) => {
                error!(error = %err, "internal server error");
                json!({ "message": "Server error" })
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Internal(anyhow::Error::new(err))
    }
}

/// True when the store rejected an insert on a unique constraint, which the
/// register/registration paths surface as a 409 instead of a 500.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(
            ApiError::Validation(vec![]).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InvalidCredentials.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::NoToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::UserNotFound.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::Forbidden {
                required: vec![Role::Admin],
                actual: Role::Member
            }
            .status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(ApiError::EmailInUse.status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::NotFound("Session").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Configuration("GOOGLE_CLIENT_ID").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn forbidden_payload_names_required_and_actual_roles() {
        let err = ApiError::Forbidden {
            required: vec![Role::Admin, Role::Manager],
            actual: Role::Member,
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn external_verification_failures_surface_as_server_errors() {
        let err = ApiError::from(anyhow::anyhow!("Google credential verification failed"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_collects_multiple_fields() {
        let err = ApiError::Validation(vec![
            FieldError::new("name", "Name is required"),
            FieldError::new("password", "Password min 6"),
        ]);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
