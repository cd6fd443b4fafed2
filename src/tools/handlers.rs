use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::{info, instrument};

use crate::{
    auth::extractors::CurrentUser,
    error::ApiError,
    state::AppState,
    tools::repo::{CreateToolsRequest, ToolsConfirmation},
    users::model::Role,
};

pub fn tools_routes() -> Router<AppState> {
    Router::new()
        .route("/tools", post(create).get(list_all))
        .route("/tools/me", get(mine))
}

#[instrument(skip(state, current, payload), fields(user_id = %current.user.id))]
pub async fn create(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<CreateToolsRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let tools = ToolsConfirmation::create(&state.db, current.user.id, &payload).await?;
    info!(tools_id = %tools.id, "tools confirmation created");
    Ok((StatusCode::CREATED, Json(json!({ "tools": tools }))))
}

#[instrument(skip(state, current), fields(user_id = %current.user.id))]
pub async fn mine(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let tools = ToolsConfirmation::list_by_user(&state.db, current.user.id).await?;
    Ok(Json(json!({ "tools": tools })))
}

#[instrument(skip(state, current))]
pub async fn list_all(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    current.require_role(&[Role::Admin, Role::Manager])?;
    let tools = ToolsConfirmation::list_all(&state.db).await?;
    Ok(Json(json!({ "tools": tools })))
}
