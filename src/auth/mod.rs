use axum::Router;

use crate::state::AppState;

mod claims;
mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;
mod repo_types;

/// Name of the session cookie. The same token is also accepted as an
/// `Authorization: Bearer` header; the cookie wins when both are sent.
pub(crate) const COOKIE_NAME: &str = "token";

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::auth_routes())
        .merge(handlers::profile_routes())
}
