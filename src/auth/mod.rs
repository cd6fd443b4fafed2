use crate::state::AppState;
use axum::Router;

pub mod bootstrap;
mod dto;
pub(crate) mod extractors;
mod google;
pub mod handlers;
pub(crate) mod jwt;
pub(crate) mod password;
pub(crate) mod validation;

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
