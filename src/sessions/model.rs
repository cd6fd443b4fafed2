use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{OffsetDateTime, UtcOffset};
use uuid::Uuid;

/// Session lifecycle: opened `Active` at login, flipped exactly once at
/// logout. Deletable only by admins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "session_status", rename_all = "PascalCase")]
pub enum SessionStatus {
    Active,
    LoggedOut,
}

impl SessionStatus {
    pub fn parse(s: &str) -> Option<SessionStatus> {
        match s {
            "Active" => Some(SessionStatus::Active),
            "LoggedOut" => Some(SessionStatus::LoggedOut),
            _ => None,
        }
    }
}

/// Login/logout ledger entry. Username and email are snapshots taken at
/// login time, deliberately denormalized.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub login_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub logout_at: Option<OffsetDateTime>,
    pub status: SessionStatus,
    pub auth_method: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Session {
    /// Whole seconds between login and logout (or now for open sessions),
    /// floored at zero. Computed at query time, never stored.
    pub fn duration_sec(&self, now: OffsetDateTime) -> i64 {
        let end = self.logout_at.unwrap_or(now);
        (end - self.login_at).whole_seconds().max(0)
    }
}

/// List item: the ledger entry plus its derived duration.
#[derive(Debug, Serialize)]
pub struct SessionView {
    #[serde(flatten)]
    pub session: Session,
    #[serde(rename = "durationSec")]
    pub duration_sec: i64,
}

impl SessionView {
    pub fn at(session: Session, now: OffsetDateTime) -> Self {
        let duration_sec = session.duration_sec(now);
        Self {
            session,
            duration_sec,
        }
    }
}

/// Midnight of `now`'s day in the given offset, used by the summary's
/// "today" bucket. The offset is resolved once at startup (it is
/// indeterminate after the runtime spawns threads) and carried in
/// `AppState`.
pub fn local_midnight(now: OffsetDateTime, offset: UtcOffset) -> OffsetDateTime {
    now.to_offset(offset).replace_time(time::Time::MIDNIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn session(login_at: OffsetDateTime, logout_at: Option<OffsetDateTime>) -> Session {
        Session {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            username: "alice".into(),
            email: "alice@x.com".into(),
            login_at,
            logout_at,
            status: if logout_at.is_some() {
                SessionStatus::LoggedOut
            } else {
                SessionStatus::Active
            },
            auth_method: Some("password".into()),
            created_at: login_at,
        }
    }

    #[test]
    fn duration_uses_logout_when_closed() {
        let login = OffsetDateTime::now_utc();
        let s = session(login, Some(login + Duration::seconds(90)));
        assert_eq!(s.duration_sec(login + Duration::hours(5)), 90);
    }

    #[test]
    fn duration_uses_now_while_active() {
        let login = OffsetDateTime::now_utc();
        let s = session(login, None);
        assert_eq!(s.duration_sec(login + Duration::seconds(42)), 42);
    }

    #[test]
    fn duration_floors_at_zero() {
        let login = OffsetDateTime::now_utc();
        let s = session(login, Some(login - Duration::seconds(10)));
        assert_eq!(s.duration_sec(login), 0);
    }

    #[test]
    fn duration_truncates_to_whole_seconds() {
        let login = OffsetDateTime::now_utc();
        let s = session(login, Some(login + Duration::milliseconds(1700)));
        assert_eq!(s.duration_sec(login), 1);
    }

    #[test]
    fn local_midnight_is_start_of_day() {
        let midnight = local_midnight(OffsetDateTime::now_utc(), UtcOffset::UTC);
        assert_eq!(midnight.time(), time::Time::MIDNIGHT);
    }

    #[test]
    fn local_midnight_buckets_by_local_day() {
        use time::macros::datetime;

        let offset = UtcOffset::from_hms(5, 30, 0).expect("offset");
        // 23:00 UTC is already the next day at +05:30
        let midnight = local_midnight(datetime!(2026-02-01 23:00 UTC), offset);
        assert_eq!(midnight, datetime!(2026-02-02 00:00 +05:30));
        assert_eq!(midnight.offset(), offset);
    }

    #[test]
    fn status_parse() {
        assert_eq!(SessionStatus::parse("Active"), Some(SessionStatus::Active));
        assert_eq!(
            SessionStatus::parse("LoggedOut"),
            Some(SessionStatus::LoggedOut)
        );
        assert_eq!(SessionStatus::parse("active"), None);
    }

    #[test]
    fn view_serializes_duration_field() {
        let login = OffsetDateTime::now_utc();
        let view = SessionView::at(session(login, None), login + Duration::seconds(7));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["durationSec"], 7);
        assert_eq!(json["username"], "alice");
    }
}
