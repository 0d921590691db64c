use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::error::{ApiError, ApiResult, AuthFailure};
use crate::state::AppState;

use super::dto::{AuthResponse, LoginRequest, PublicUser, RegisterRequest};
use super::extractors::AuthUser;
use super::jwt::JwtKeys;
use super::password::{hash_password, verify_password};
use super::repo::User;
use super::COOKIE_NAME;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/profile", get(profile))
}

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn validate_register(input: &RegisterRequest) -> Result<(), ApiError> {
    let username_len = input.username.chars().count();
    if !(3..=32).contains(&username_len) {
        return Err(ApiError::Validation(
            "username must be 3-32 characters".into(),
        ));
    }
    if input.email.len() > 254 || !is_valid_email(&input.email) {
        return Err(ApiError::Validation("invalid email".into()));
    }
    let password_len = input.password.chars().count();
    if !(8..=128).contains(&password_len) {
        return Err(ApiError::Validation(
            "password must be 8-128 characters".into(),
        ));
    }
    Ok(())
}

/// Session cookie carrying the token; its lifetime mirrors the token
/// expiry so the browser drops it when verification would anyway.
fn auth_cookie(token: &str, keys: &JwtKeys, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(COOKIE_NAME, token.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(secure);
    cookie.set_max_age(time::Duration::seconds(keys.ttl.as_secs() as i64));
    cookie
}

#[instrument(skip(state, jar, payload))]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(mut payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, CookieJar, Json<AuthResponse>)> {
    payload.username = payload.username.trim().to_string();
    payload.email = payload.email.trim().to_lowercase();
    validate_register(&payload)?;

    let hash = hash_password(&payload.password)?;

    // No pre-check for taken names: the partial unique indexes are the
    // authority, and their 23505 comes back to the client as 409.
    let user = User::create(&state.db, &payload.username, &payload.email, &hash).await?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;
    let jar = jar.add(auth_cookie(&token, &keys, state.config.cookie_secure));

    info!(user_id = user.id, username = %user.username, "user registered");
    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            user: user.into(),
            token,
        }),
    ))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(mut payload): Json<LoginRequest>,
) -> ApiResult<(CookieJar, Json<AuthResponse>)> {
    payload.username = payload.username.trim().to_string();

    // Unknown username and wrong password must be indistinguishable to
    // the caller. Lookup failure returns here and never reaches the
    // hash comparison.
    let user = User::find_by_username(&state.db, &payload.username)
        .await?
        .ok_or_else(|| {
            warn!(username = %payload.username, "login unknown username");
            ApiError::InvalidCredentials
        })?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;
    let jar = jar.add(auth_cookie(&token, &keys, state.config.cookie_secure));

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok((
        jar,
        Json(AuthResponse {
            user: user.into(),
            token,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<PublicUser>> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(AuthFailure::SubjectNotFound)?;
    Ok(Json(user.into()))
}
