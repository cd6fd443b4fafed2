use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::extractors::CurrentUser,
    bookings::{
        dto::{CreateBookingRequest, UpdateStatusRequest},
        repo_types::{Booking, BookingStatus},
    },
    error::{ApiError, FieldError},
    state::AppState,
    users::model::Role,
};

pub fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", post(create).get(list_all))
        .route("/bookings/me", get(mine))
        .route("/bookings/:id/status", patch(update_status))
}

#[instrument(skip(state, current, payload), fields(user_id = %current.user.id))]
pub async fn create(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let booking =
        Booking::create(&state.db, current.user.id, &current.user.name, &payload).await?;
    info!(booking_id = %booking.id, "booking created");
    Ok((StatusCode::CREATED, Json(json!({ "booking": booking }))))
}

#[instrument(skip(state, current), fields(user_id = %current.user.id))]
pub async fn mine(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let bookings = Booking::list_by_user(&state.db, current.user.id).await?;
    Ok(Json(json!({ "bookings": bookings })))
}

#[instrument(skip(state, current))]
pub async fn list_all(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    current.require_role(&[Role::Admin, Role::Manager])?;
    let bookings = Booking::list_all(&state.db).await?;
    Ok(Json(json!({ "bookings": bookings })))
}

#[instrument(skip(state, current, payload))]
pub async fn update_status(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    current.require_role(&[Role::Admin, Role::Manager])?;

    let status = BookingStatus::parse(&payload.status).ok_or_else(|| {
        ApiError::Validation(vec![FieldError::new(
            "status",
            "Invalid status. Must be one of: pending, approved, rejected",
        )])
    })?;

    let booking = Booking::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Booking"))?;

    // Approvals and rejections are final
    if booking.status != BookingStatus::Pending {
        return Err(ApiError::Validation(vec![FieldError::new(
            "status",
            format!(
                "Cannot update status from {} to {}",
                booking.status.as_str(),
                status.as_str()
            ),
        )]));
    }

    let booking = Booking::update_status(&state.db, id, status)
        .await?
        .ok_or(ApiError::NotFound("Booking"))?;

    info!(booking_id = %id, status = status.as_str(), "booking status updated");
    Ok(Json(json!({
        "booking": booking,
        "message": format!("Booking {} successfully", status.as_str()),
    })))
}
