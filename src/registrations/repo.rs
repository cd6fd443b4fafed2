use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Member-registration form record. Linked to a user when the submission
/// carried a valid token, anonymous otherwise.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Registration {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub member_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub experience: Option<String>,
    pub preferred_time: Option<String>,
    pub emergency_name: Option<String>,
    pub emergency_phone: Option<String>,
    pub consent: Option<bool>,
    pub newsletter: Option<bool>,
    pub id_proof_url: Option<String>,
    pub garden_rules_accepted: Option<bool>,
    pub tools_training: Option<String>,
    pub disability_support: Option<String>,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateRegistrationRequest {
    pub member_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub experience: Option<String>,
    pub preferred_time: Option<String>,
    pub emergency_name: Option<String>,
    pub emergency_phone: Option<String>,
    pub consent: Option<bool>,
    pub newsletter: Option<bool>,
    pub id_proof_url: Option<String>,
    pub garden_rules_accepted: Option<bool>,
    pub tools_training: Option<String>,
    pub disability_support: Option<String>,
    pub notes: Option<String>,
}

const REGISTRATION_COLUMNS: &str = "id, user_id, member_name, email, phone, address, city, state, pincode, age, gender, experience, preferred_time, emergency_name, emergency_phone, consent, newsletter, id_proof_url, garden_rules_accepted, tools_training, disability_support, notes, created_at, updated_at";

impl Registration {
    pub async fn create(
        db: &PgPool,
        user_id: Option<Uuid>,
        payload: &CreateRegistrationRequest,
    ) -> Result<Registration, sqlx::Error> {
        sqlx::query_as::<_, Registration>(&format!(
            r#"
            INSERT INTO registrations (user_id, member_name, email, phone, address, city, state,
                                       pincode, age, gender, experience, preferred_time,
                                       emergency_name, emergency_phone, consent, newsletter,
                                       id_proof_url, garden_rules_accepted, tools_training,
                                       disability_support, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                    $18, $19, $20, $21)
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(&payload.member_name)
        .bind(payload.email.trim().to_lowercase())
        .bind(&payload.phone)
        .bind(&payload.address)
        .bind(&payload.city)
        .bind(&payload.state)
        .bind(&payload.pincode)
        .bind(payload.age)
        .bind(&payload.gender)
        .bind(&payload.experience)
        .bind(&payload.preferred_time)
        .bind(&payload.emergency_name)
        .bind(&payload.emergency_phone)
        .bind(payload.consent)
        .bind(payload.newsletter)
        .bind(&payload.id_proof_url)
        .bind(payload.garden_rules_accepted)
        .bind(&payload.tools_training)
        .bind(&payload.disability_support)
        .bind(&payload.notes)
        .fetch_one(db)
        .await
    }

    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Registration>> {
        let rows = sqlx::query_as::<_, Registration>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<Registration>> {
        let rows = sqlx::query_as::<_, Registration>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations ORDER BY created_at DESC"
        ))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
