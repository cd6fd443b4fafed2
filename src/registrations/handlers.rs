use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::{info, instrument};

use crate::{
    auth::{extractors::CurrentUser, validation::is_valid_email},
    error::{is_unique_violation, ApiError, FieldError},
    registrations::repo::{CreateRegistrationRequest, Registration},
    state::AppState,
    users::model::Role,
};

pub fn registration_routes() -> Router<AppState> {
    Router::new()
        .route("/registrations", post(create).get(list_all))
        .route("/registrations/me", get(mine))
}

/// The token is optional here: a valid bearer token links the registration
/// to the caller, anything else leaves it anonymous.
#[instrument(skip(state, current, payload))]
pub async fn create(
    State(state): State<AppState>,
    current: Option<CurrentUser>,
    Json(payload): Json<CreateRegistrationRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    if !is_valid_email(payload.email.trim()) {
        return Err(ApiError::Validation(vec![FieldError::new(
            "email",
            "Valid email is required",
        )]));
    }

    let user_id = current.as_ref().map(|c| c.user.id);
    let registration = Registration::create(&state.db, user_id, &payload)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::EmailInUse
            } else {
                e.into()
            }
        })?;

    info!(registration_id = %registration.id, linked = user_id.is_some(), "registration created");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "registration": registration })),
    ))
}

#[instrument(skip(state, current), fields(user_id = %current.user.id))]
pub async fn mine(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let registrations = Registration::list_by_user(&state.db, current.user.id).await?;
    Ok(Json(json!({ "registrations": registrations })))
}

#[instrument(skip(state, current))]
pub async fn list_all(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    current.require_role(&[Role::Admin, Role::Manager])?;
    let registrations = Registration::list_all(&state.db).await?;
    Ok(Json(json!({ "registrations": registrations })))
}
