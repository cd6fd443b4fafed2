use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, GoogleAuthRequest, LoginRequest, RegisterRequest},
        extractors::CurrentUser,
        google::GoogleVerifier,
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        validation::{validate_login, validate_register},
    },
    error::{is_unique_violation, ApiError, FieldError},
    sessions::model::Session,
    state::AppState,
    users::{
        model::{PublicUser, Role, User},
        repo::NewUser,
    },
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/google", post(google))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    let errors = validate_register(&payload);
    if !errors.is_empty() {
        warn!(email = %payload.email, "registration validation failed");
        return Err(ApiError::Validation(errors));
    }
    let role = Role::parse(&payload.role)
        .ok_or_else(|| ApiError::Validation(vec![FieldError::new("role", "Invalid role")]))?;

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::EmailInUse);
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(
        &state.db,
        NewUser {
            name: payload.name.trim(),
            email: &payload.email,
            password_hash: Some(&hash),
            google_id: None,
            picture: None,
            is_google_sign_in: false,
            role,
        },
    )
    .await
    .map_err(|e| {
        // Two concurrent registrations can race past the lookup above
        if is_unique_violation(&e) {
            ApiError::EmailInUse
        } else {
            e.into()
        }
    })?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, user.role)?;
    Session::open(&state.db, &user, "password").await?;

    info!(user_id = %user.id, email = %user.email, role = %user.role, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: PublicUser::from(&user),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    let errors = validate_login(&payload);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    // Unknown email and wrong password are deliberately the same error so
    // the response carries no enumeration signal.
    let user = match User::find_by_email(&state.db, &payload.email).await? {
        Some(user) => user,
        None => {
            warn!(email = %payload.email, "login unknown email");
            return Err(ApiError::InvalidCredentials);
        }
    };

    let hash = match &user.password_hash {
        Some(hash) => hash,
        None => {
            // Google-only account without a password
            warn!(user_id = %user.id, "password login for passwordless account");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !verify_password(&payload.password, hash)? {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, user.role)?;
    Session::open(&state.db, &user, "password").await?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(AuthResponse {
        token,
        user: PublicUser::from(&user),
    }))
}

#[instrument(skip(state, payload))]
pub async fn google(
    State(state): State<AppState>,
    Json(payload): Json<GoogleAuthRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    if payload.credential.trim().is_empty() {
        return Err(ApiError::Validation(vec![FieldError::new(
            "credential",
            "Google credential is required",
        )]));
    }

    let google_config = state
        .config
        .google
        .as_ref()
        .ok_or(ApiError::Configuration("GOOGLE_CLIENT_ID / GOOGLE_CLIENT_SECRET"))?;

    let identity = GoogleVerifier::new(google_config)
        .verify(payload.credential.trim())
        .await?;

    let (user, created) = match User::find_by_email(&state.db, &identity.email).await? {
        Some(user) if user.google_id.is_none() => {
            let user = User::attach_google_id(
                &state.db,
                user.id,
                &identity.google_id,
                identity.picture.as_deref(),
            )
            .await?;
            info!(user_id = %user.id, "google identity linked to existing account");
            (user, false)
        }
        Some(user) => (user, false),
        None => {
            // First Google sign-in: create a member with no password
            let name = identity.name.clone().unwrap_or_else(|| identity.email.clone());
            let user = User::create(
                &state.db,
                NewUser {
                    name: &name,
                    email: &identity.email,
                    password_hash: None,
                    google_id: Some(&identity.google_id),
                    picture: identity.picture.as_deref(),
                    is_google_sign_in: true,
                    role: Role::Member,
                },
            )
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    ApiError::EmailInUse
                } else {
                    e.into()
                }
            })?;
            info!(user_id = %user.id, email = %user.email, "user created via google sign-in");
            (user, true)
        }
    };

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, user.role)?;
    Session::open(&state.db, &user, "google").await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(AuthResponse {
            token,
            user: PublicUser::from(&user),
        }),
    ))
}

#[instrument(skip(state, current), fields(user_id = %current.user.id))]
pub async fn logout(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    // No open session is a no-op success, not an error
    let closed = Session::close_latest_active(&state.db, current.user.id).await?;
    info!(closed, "user logged out");
    Ok(Json(json!({ "ok": true })))
}

#[instrument(skip(current), fields(user_id = %current.user.id))]
pub async fn me(current: CurrentUser) -> Json<serde_json::Value> {
    Json(json!({ "user": PublicUser::from(&current.user) }))
}
