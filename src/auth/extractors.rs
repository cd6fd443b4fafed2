use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use crate::{
    auth::jwt::JwtKeys,
    error::ApiError,
    state::AppState,
    users::model::{Role, User},
};

/// The authenticated caller, resolved once per request from the bearer
/// token: verified claims plus the concrete store record (credential fields
/// are stripped on serialization). Typed replacement for attaching loose
/// fields to the request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
}

impl CurrentUser {
    pub fn role(&self) -> Role {
        self.user.role
    }

    /// Role allow-list check. Pure: no side effects beyond the error value.
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), ApiError> {
        if allowed.contains(&self.user.role) {
            Ok(())
        } else {
            Err(ApiError::Forbidden {
                required: allowed.to_vec(),
                actual: self.user.role,
            })
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::NoToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or(ApiError::NoToken)?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|_| {
            warn!("invalid or expired token");
            ApiError::InvalidToken
        })?;

        // The role in the token must still match the record. A token issued
        // before a role change no longer resolves (known staleness window).
        let user = User::find_by_id_and_role(&state.db, claims.sub, claims.role)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        Ok(CurrentUser { user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn current(role: Role) -> CurrentUser {
        CurrentUser {
            user: User {
                id: Uuid::new_v4(),
                name: "Test".into(),
                email: "test@x.com".into(),
                password_hash: None,
                google_id: None,
                picture: None,
                is_google_sign_in: false,
                role,
                created_at: OffsetDateTime::now_utc(),
                updated_at: OffsetDateTime::now_utc(),
            },
        }
    }

    #[test]
    fn require_role_allows_listed_roles() {
        assert!(current(Role::Admin)
            .require_role(&[Role::Admin, Role::Manager])
            .is_ok());
        assert!(current(Role::Manager)
            .require_role(&[Role::Admin, Role::Manager])
            .is_ok());
    }

    #[test]
    fn require_role_forbids_with_role_payload() {
        let err = current(Role::Member)
            .require_role(&[Role::Admin])
            .unwrap_err();
        match err {
            ApiError::Forbidden { required, actual } => {
                assert_eq!(required, vec![Role::Admin]);
                assert_eq!(actual, Role::Member);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
