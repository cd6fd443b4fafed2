use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Member feedback / maintenance report.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Feedback {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub rating: Option<i32>,
    pub comments: Option<String>,
    pub maintenance_type: Option<String>,
    pub photo_url: Option<String>,
    pub hours_volunteered: Option<f64>,
    pub urgency: Option<String>,
    pub contact_method: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateFeedbackRequest {
    pub rating: Option<i32>,
    pub comments: Option<String>,
    pub maintenance_type: Option<String>,
    pub photo_url: Option<String>,
    pub hours_volunteered: Option<f64>,
    pub urgency: Option<String>,
    pub contact_method: Option<String>,
}

const FEEDBACK_COLUMNS: &str = "id, user_id, rating, comments, maintenance_type, photo_url, hours_volunteered, urgency, contact_method, created_at, updated_at";

impl Feedback {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        payload: &CreateFeedbackRequest,
    ) -> anyhow::Result<Feedback> {
        let row = sqlx::query_as::<_, Feedback>(&format!(
            r#"
            INSERT INTO feedback (user_id, rating, comments, maintenance_type, photo_url,
                                  hours_volunteered, urgency, contact_method)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {FEEDBACK_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(payload.rating)
        .bind(&payload.comments)
        .bind(&payload.maintenance_type)
        .bind(&payload.photo_url)
        .bind(payload.hours_volunteered)
        .bind(&payload.urgency)
        .bind(&payload.contact_method)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Feedback>> {
        let rows = sqlx::query_as::<_, Feedback>(&format!(
            "SELECT {FEEDBACK_COLUMNS} FROM feedback WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<Feedback>> {
        let rows = sqlx::query_as::<_, Feedback>(&format!(
            "SELECT {FEEDBACK_COLUMNS} FROM feedback ORDER BY created_at DESC"
        ))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
