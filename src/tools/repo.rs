use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Tool check-out confirmation captured from the orientation form.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ToolsConfirmation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub orientation_date: Option<String>,
    pub orientation_time: Option<String>,
    pub tool_pickup_location: Option<String>,
    pub wheelbarrow: Option<bool>,
    pub hoe: Option<bool>,
    pub rake: Option<bool>,
    pub shovel: Option<bool>,
    pub gloves: Option<String>,
    pub safety_waiver_accepted: Option<bool>,
    pub remarks: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateToolsRequest {
    pub orientation_date: Option<String>,
    pub orientation_time: Option<String>,
    pub tool_pickup_location: Option<String>,
    pub wheelbarrow: Option<bool>,
    pub hoe: Option<bool>,
    pub rake: Option<bool>,
    pub shovel: Option<bool>,
    pub gloves: Option<String>,
    pub safety_waiver_accepted: Option<bool>,
    pub remarks: Option<String>,
}

const TOOLS_COLUMNS: &str = "id, user_id, orientation_date, orientation_time, tool_pickup_location, wheelbarrow, hoe, rake, shovel, gloves, safety_waiver_accepted, remarks, created_at, updated_at";

impl ToolsConfirmation {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        payload: &CreateToolsRequest,
    ) -> anyhow::Result<ToolsConfirmation> {
        let row = sqlx::query_as::<_, ToolsConfirmation>(&format!(
            r#"
            INSERT INTO tools_confirmations (user_id, orientation_date, orientation_time,
                                             tool_pickup_location, wheelbarrow, hoe, rake, shovel,
                                             gloves, safety_waiver_accepted, remarks)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {TOOLS_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(&payload.orientation_date)
        .bind(&payload.orientation_time)
        .bind(&payload.tool_pickup_location)
        .bind(payload.wheelbarrow)
        .bind(payload.hoe)
        .bind(payload.rake)
        .bind(payload.shovel)
        .bind(&payload.gloves)
        .bind(payload.safety_waiver_accepted)
        .bind(&payload.remarks)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<ToolsConfirmation>> {
        let rows = sqlx::query_as::<_, ToolsConfirmation>(&format!(
            "SELECT {TOOLS_COLUMNS} FROM tools_confirmations WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<ToolsConfirmation>> {
        let rows = sqlx::query_as::<_, ToolsConfirmation>(&format!(
            "SELECT {TOOLS_COLUMNS} FROM tools_confirmations ORDER BY created_at DESC"
        ))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
