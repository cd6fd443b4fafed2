use axum::{
    extract::{Path, Query, State},
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::extractors::CurrentUser,
    error::{ApiError, FieldError},
    sessions::{
        model::{Session, SessionStatus, SessionView},
        repo::{Page, SessionFilter, SessionSummary},
    },
    state::AppState,
    users::model::Role,
};

pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", get(list).delete(delete_many))
        .route("/sessions/summary", get(summary))
        .route("/sessions/:id", delete(delete_one))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub status: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub page: Option<i64>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<i64>,
}

fn parse_bound(field: &'static str, value: &str) -> Result<OffsetDateTime, ApiError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|_| {
        ApiError::Validation(vec![FieldError::new(field, "Expected an RFC 3339 timestamp")])
    })
}

#[instrument(skip(state, current))]
pub async fn list(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    current.require_role(&[Role::Admin])?;

    let filter = SessionFilter {
        q: query.q.filter(|q| !q.is_empty()),
        // Unknown status values are ignored rather than rejected
        status: query.status.as_deref().and_then(SessionStatus::parse),
        from: query
            .from
            .as_deref()
            .map(|v| parse_bound("from", v))
            .transpose()?,
        to: query
            .to
            .as_deref()
            .map(|v| parse_bound("to", v))
            .transpose()?,
    };
    let page = Page::clamped(query.page, query.page_size);

    let (items, total) = Session::list(&state.db, &filter, page).await?;
    let now = OffsetDateTime::now_utc();
    let items: Vec<SessionView> = items
        .into_iter()
        .map(|session| SessionView::at(session, now))
        .collect();

    Ok(Json(json!({
        "items": items,
        "total": total,
        "page": page.page,
        "pageSize": page.page_size,
    })))
}

#[instrument(skip(state, current))]
pub async fn summary(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<SessionSummary>, ApiError> {
    current.require_role(&[Role::Admin])?;
    let summary = Session::summary(&state.db, state.local_offset).await?;
    Ok(Json(summary))
}

#[instrument(skip(state, current))]
pub async fn delete_one(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    current.require_role(&[Role::Admin])?;

    // A malformed id cannot match anything
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::NotFound("Session"))?;
    if !Session::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Session"));
    }
    info!(session_id = %id, "session deleted");
    Ok(Json(json!({ "message": "Session deleted successfully" })))
}

#[derive(Debug, Deserialize)]
pub struct DeleteManyRequest {
    #[serde(default)]
    pub ids: Vec<String>,
}

#[instrument(skip(state, current, payload))]
pub async fn delete_many(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<DeleteManyRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    current.require_role(&[Role::Admin])?;

    if payload.ids.is_empty() {
        return Err(ApiError::Validation(vec![FieldError::new(
            "ids",
            "No session IDs provided",
        )]));
    }

    // Unparseable ids simply never match
    let ids: Vec<Uuid> = payload
        .ids
        .iter()
        .filter_map(|id| Uuid::parse_str(id).ok())
        .collect();

    let deleted = Session::delete_many(&state.db, &ids).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Session"));
    }

    info!(deleted, "sessions bulk-deleted");
    Ok(Json(json!({
        "message": format!("{deleted} session(s) deleted successfully"),
        "deletedCount": deleted,
    })))
}
