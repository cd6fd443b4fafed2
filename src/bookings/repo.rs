use sqlx::PgPool;
use uuid::Uuid;

use crate::bookings::dto::CreateBookingRequest;
use crate::bookings::repo_types::{Booking, BookingStatus};

const BOOKING_COLUMNS: &str = "id, user_id, member_name, plot_id, plot_size, start_date, end_date, crop_type, watering_freq, compost, irrigation_slot, shared, tool_kit, water_access, notes, status, created_at, updated_at";

impl Booking {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        member_name: &str,
        payload: &CreateBookingRequest,
    ) -> anyhow::Result<Booking> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            r#"
            INSERT INTO bookings (user_id, member_name, plot_id, plot_size, start_date, end_date,
                                  crop_type, watering_freq, compost, irrigation_slot, shared,
                                  tool_kit, water_access, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(member_name)
        .bind(&payload.plot_id)
        .bind(&payload.plot_size)
        .bind(&payload.start_date)
        .bind(&payload.end_date)
        .bind(&payload.crop_type)
        .bind(&payload.watering_freq)
        .bind(&payload.compost)
        .bind(&payload.irrigation_slot)
        .bind(&payload.shared)
        .bind(&payload.tool_kit)
        .bind(&payload.water_access)
        .bind(&payload.notes)
        .fetch_one(db)
        .await?;
        Ok(booking)
    }

    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Booking>> {
        let rows = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<Booking>> {
        let rows = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY created_at DESC"
        ))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(booking)
    }

    pub async fn update_status(
        db: &PgPool,
        id: Uuid,
        status: BookingStatus,
    ) -> anyhow::Result<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            r#"
            UPDATE bookings SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(db)
        .await?;
        Ok(booking)
    }
}
