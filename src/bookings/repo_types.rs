use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Plot-booking workflow state; transitions are only allowed out of Pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Approved,
    Rejected,
}

impl BookingStatus {
    pub fn parse(s: &str) -> Option<BookingStatus> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "approved" => Some(BookingStatus::Approved),
            "rejected" => Some(BookingStatus::Rejected),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Approved => "approved",
            BookingStatus::Rejected => "rejected",
        }
    }
}

/// Plot booking record. The form fields are free-form text captured as-is.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub member_name: Option<String>,
    pub plot_id: Option<String>,
    pub plot_size: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub crop_type: Option<String>,
    pub watering_freq: Option<String>,
    pub compost: Option<String>,
    pub irrigation_slot: Option<String>,
    pub shared: Option<String>,
    pub tool_kit: Option<String>,
    pub water_access: Option<String>,
    pub notes: Option<String>,
    pub status: BookingStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_is_lowercase_only() {
        assert_eq!(BookingStatus::parse("pending"), Some(BookingStatus::Pending));
        assert_eq!(
            BookingStatus::parse("approved"),
            Some(BookingStatus::Approved)
        );
        assert_eq!(
            BookingStatus::parse("rejected"),
            Some(BookingStatus::Rejected)
        );
        assert_eq!(BookingStatus::parse("Approved"), None);
        assert_eq!(BookingStatus::parse("cancelled"), None);
    }
}
