use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use crate::error::{ApiError, AuthFailure};
use crate::state::AppState;

use super::jwt::JwtKeys;
use super::repo::User;
use super::COOKIE_NAME;

/// Resolved identity of the authenticated caller, bound once per
/// request and threaded into handlers by value.
///
/// Extraction runs the full verification sequence: token lookup (cookie
/// first, then bearer header), signature/algorithm/expiry validation,
/// and a live re-check that the subject still exists. The store
/// round-trip is deliberate: deleting a user invalidates every
/// outstanding token at once.
pub struct AuthUser(pub i64);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers).ok_or(AuthFailure::NoToken)?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(&token)?;

        // A token can outlive its account; only live subjects pass.
        User::find_by_id(&state.db, claims.sub)
            .await?
            .ok_or(AuthFailure::SubjectNotFound)?;

        debug!(user_id = claims.sub, "request authenticated");
        Ok(AuthUser(claims.sub))
    }
}

/// Token lookup: the `token` cookie wins, then `Authorization: Bearer`.
pub(crate) fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(COOKIE_NAME) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
        .map(str::to_string)
}

fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, rest) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = rest.trim();
    (!token.is_empty()).then_some(token)
}
