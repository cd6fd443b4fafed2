use serde::Serialize;
use sqlx::{PgPool, Postgres, QueryBuilder};
use time::{OffsetDateTime, UtcOffset};
use uuid::Uuid;

use crate::sessions::model::{local_midnight, Session, SessionStatus};
use crate::users::model::User;

const SESSION_COLUMNS: &str =
    "id, user_id, username, email, login_at, logout_at, status, auth_method, created_at";

#[derive(Debug, Default, Clone)]
pub struct SessionFilter {
    pub q: Option<String>,
    pub status: Option<SessionStatus>,
    pub from: Option<OffsetDateTime>,
    pub to: Option<OffsetDateTime>,
}

/// Pagination window; page floors at 1, pageSize clamps to [1, 100].
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub page: i64,
    pub page_size: i64,
}

impl Page {
    pub fn clamped(page: Option<i64>, page_size: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size.unwrap_or(10).clamp(1, 100),
        }
    }

    fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }
}

#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub total: i64,
    pub today: i64,
    pub active: i64,
    #[serde(rename = "uniqueUsers")]
    pub unique_users: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    total: i64,
    today: i64,
    active: i64,
    unique_users: i64,
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &SessionFilter) {
    if let Some(q) = &filter.q {
        let pattern = format!("%{}%", q);
        qb.push(" AND (username ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR email ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status);
    }
    if let Some(from) = filter.from {
        qb.push(" AND login_at >= ").push_bind(from);
    }
    if let Some(to) = filter.to {
        qb.push(" AND login_at <= ").push_bind(to);
    }
}

impl Session {
    /// Open a new `Active` ledger entry at login, snapshotting name/email.
    pub async fn open(db: &PgPool, user: &User, auth_method: &str) -> anyhow::Result<Session> {
        let session = sqlx::query_as::<_, Session>(&format!(
            r#"
            INSERT INTO sessions (user_id, username, email, status, auth_method)
            VALUES ($1, $2, $3, 'Active', $4)
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(auth_method)
        .fetch_one(db)
        .await?;
        Ok(session)
    }

    /// Close the most recently opened `Active` session for the user. Earlier
    /// `Active` orphans from concurrent logins are left untouched. Returns
    /// false when there was nothing to close, which is not an error.
    pub async fn close_latest_active(db: &PgPool, user_id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET status = 'LoggedOut', logout_at = now()
            WHERE id = (
                SELECT id FROM sessions
                WHERE user_id = $1 AND status = 'Active'
                ORDER BY login_at DESC
                LIMIT 1
            )
            "#,
        )
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list(
        db: &PgPool,
        filter: &SessionFilter,
        page: Page,
    ) -> anyhow::Result<(Vec<Session>, i64)> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE TRUE"
        ));
        push_filters(&mut qb, filter);
        qb.push(" ORDER BY login_at DESC LIMIT ")
            .push_bind(page.page_size)
            .push(" OFFSET ")
            .push_bind(page.offset());
        let items = qb.build_query_as::<Session>().fetch_all(db).await?;

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM sessions WHERE TRUE");
        push_filters(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(db).await?;

        Ok((items, total))
    }

    pub async fn summary(db: &PgPool, local_offset: UtcOffset) -> anyhow::Result<SessionSummary> {
        let today_start = local_midnight(OffsetDateTime::now_utc(), local_offset);
        let row = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE login_at >= $1) AS today,
                   COUNT(*) FILTER (WHERE status = 'Active') AS active,
                   COUNT(DISTINCT user_id) AS unique_users
            FROM sessions
            "#,
        )
        .bind(today_start)
        .fetch_one(db)
        .await?;
        Ok(SessionSummary {
            total: row.total,
            today: row.today,
            active: row.active,
            unique_users: row.unique_users,
        })
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Bulk hard-delete; returns the matched count. Partial matches succeed
    /// for the matched subset.
    pub async fn delete_many(db: &PgPool, ids: &[Uuid]) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = ANY($1)")
            .bind(ids)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults() {
        let page = Page::clamped(None, None);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 10);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn page_clamps_bounds() {
        let page = Page::clamped(Some(0), Some(0));
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 1);

        let page = Page::clamped(Some(-3), Some(1000));
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 100);
    }

    #[test]
    fn page_offset_follows_page() {
        let page = Page::clamped(Some(3), Some(25));
        assert_eq!(page.offset(), 50);
    }
}
