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
    error::{ApiError, FieldError},
    feedback::repo::{CreateFeedbackRequest, Feedback},
    state::AppState,
    users::model::Role,
};

pub fn feedback_routes() -> Router<AppState> {
    Router::new()
        .route("/feedback", post(create).get(list_all))
        .route("/feedback/me", get(mine))
}

#[instrument(skip(state, current, payload), fields(user_id = %current.user.id))]
pub async fn create(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<CreateFeedbackRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    if let Some(rating) = payload.rating {
        if !(1..=5).contains(&rating) {
            return Err(ApiError::Validation(vec![FieldError::new(
                "rating",
                "Rating must be between 1 and 5",
            )]));
        }
    }

    let feedback = Feedback::create(&state.db, current.user.id, &payload).await?;
    info!(feedback_id = %feedback.id, "feedback created");
    Ok((StatusCode::CREATED, Json(json!({ "feedback": feedback }))))
}

#[instrument(skip(state, current), fields(user_id = %current.user.id))]
pub async fn mine(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let feedback = Feedback::list_by_user(&state.db, current.user.id).await?;
    Ok(Json(json!({ "feedback": feedback })))
}

#[instrument(skip(state, current))]
pub async fn list_all(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    current.require_role(&[Role::Admin, Role::Manager])?;
    let feedback = Feedback::list_all(&state.db).await?;
    Ok(Json(json!({ "feedback": feedback })))
}
