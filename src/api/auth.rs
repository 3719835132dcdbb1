//! Session authentication endpoints
//!
//! Three endpoints under `/auth`:
//! - `POST /auth/up` creates an account and opens a session
//! - `POST /auth/in` opens a session for existing credentials
//! - `POST /auth/out` destroys the current session
//!
//! The session token travels in an HttpOnly `sid` cookie. Passwords are
//! hashed with Argon2id; the hash never leaves the server because the
//! response projector strips every unannotated field from the returned user.

use crate::api::users::User;
use crate::core::error::{ApiError, ApiResult, AuthError};
use crate::core::projection::Projector;
use crate::session::SessionStore;
use crate::storage::InMemoryStore;
use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router, extract::State};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// Name of the session cookie
const SESSION_COOKIE: &str = "sid";

/// Shared state for the auth endpoints
#[derive(Clone)]
pub struct AuthState {
    pub users: InMemoryStore<User>,
    pub sessions: Arc<dyn SessionStore>,
    pub projector: Arc<Projector>,
    /// Max-Age for the session cookie, in seconds
    pub session_max_age: i64,
}

/// Request body for `POST /auth/up`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Request body for `POST /auth/in`
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Build the auth router
pub fn auth_routes(state: AuthState) -> Router {
    Router::new()
        .route("/auth/up", post(sign_up))
        .route("/auth/in", post(sign_in))
        .route("/auth/out", post(sign_out))
        .with_state(state)
}

/// POST /auth/up
async fn sign_up(
    State(state): State<AuthState>,
    Json(data): Json<SignUpRequest>,
) -> ApiResult<impl IntoResponse> {
    if find_by_email(&state.users, &data.email)?.is_some() {
        return Err(AuthError::EmailTaken { email: data.email }.into());
    }

    if data.password != data.password_confirm {
        return Err(AuthError::PasswordMismatch.into());
    }

    let user = User::new(data.name, data.email, hash_password(&data.password)?);
    state.users.insert(user.clone())?;
    tracing::info!(user_id = %user.id, "user signed up");

    open_session(&state, &user).await
}

/// POST /auth/in
async fn sign_in(
    State(state): State<AuthState>,
    Json(data): Json<SignInRequest>,
) -> ApiResult<impl IntoResponse> {
    let user =
        find_by_email(&state.users, &data.email)?.ok_or(AuthError::InvalidCredentials)?;

    if !verify_password(&data.password, &user.password) {
        return Err(AuthError::InvalidCredentials.into());
    }

    tracing::info!(user_id = %user.id, "user signed in");
    open_session(&state, &user).await
}

/// POST /auth/out
async fn sign_out(
    State(state): State<AuthState>,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    let token = session_token(&headers).ok_or(AuthError::SessionRequired)?;

    state
        .sessions
        .get(&token)
        .await?
        .ok_or(AuthError::SessionRequired)?;

    state.sessions.destroy(&token).await?;

    let clear = format!("{}=; Path=/; HttpOnly; Max-Age=0", SESSION_COOKIE);
    Ok(([(header::SET_COOKIE, clear)], StatusCode::OK))
}

/// Open a session for the user and respond with the projected user body
async fn open_session(state: &AuthState, user: &User) -> ApiResult<impl IntoResponse + use<>> {
    let session = state.sessions.create(user.id).await?;
    let cookie = format!(
        "{}={}; Path=/; HttpOnly; Max-Age={}",
        SESSION_COOKIE, session.token, state.session_max_age
    );

    let raw = serde_json::to_value(user)
        .map_err(|e| ApiError::Internal(format!("failed to serialize user: {}", e)))?;
    let body: Value = state.projector.project(&raw);

    Ok(([(header::SET_COOKIE, cookie)], Json(body)))
}

fn find_by_email(users: &InMemoryStore<User>, email: &str) -> ApiResult<Option<User>> {
    Ok(users.all()?.into_iter().find(|u| u.email == email))
}

/// Extract the session token from the request's Cookie header
fn session_token(headers: &HeaderMap) -> Option<Uuid> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE {
            Uuid::parse_str(value.trim()).ok()
        } else {
            None
        }
    })
}

/// Hash a password with Argon2id and a fresh random salt
fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {}", e)))
}

/// Verify a password against a stored Argon2 hash
fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .and_then(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed))
        .is_ok()
}
