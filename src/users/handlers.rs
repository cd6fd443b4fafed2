use axum::{
    extract::{Path, State},
    routing::{get, patch},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::extractors::CurrentUser,
    error::{ApiError, FieldError},
    state::AppState,
    users::model::{Role, User, UserSummary},
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list))
        .route("/users/:id/role", patch(update_role))
}

#[instrument(skip(state, current))]
pub async fn list(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    current.require_role(&[Role::Admin, Role::Manager])?;

    let users = User::list_all(&state.db).await?;
    // Managers get the reduced view without linked-identity fields
    if current.role() == Role::Manager {
        let users: Vec<UserSummary> = users.iter().map(UserSummary::from).collect();
        return Ok(Json(json!({ "users": users })));
    }
    Ok(Json(json!({ "users": users })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

#[instrument(skip(state, current, payload))]
pub async fn update_role(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRoleRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    current.require_role(&[Role::Admin])?;

    let new_role = Role::parse(&payload.role)
        .ok_or_else(|| ApiError::Validation(vec![FieldError::new("role", "Invalid role")]))?;

    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    if user.role == new_role {
        return Ok(Json(json!({ "user": user })));
    }

    // Single in-place update: email and password hash are untouched
    let updated = User::update_role(&state.db, id, new_role)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    info!(user_id = %id, from = %user.role, to = %new_role, "user role changed");
    if new_role == Role::Admin {
        warn!(user_id = %id, granted_by = %current.user.id, "admin role granted");
    }
    Ok(Json(json!({ "user": updated })))
}
