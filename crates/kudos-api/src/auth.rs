//! Cookie-session authentication.
//!
//! Sessions ride in an httpOnly cookie holding the session UUID; the store
//! owns expiry. Passwords are verified against the stored argon2 PHC string
//! on sign-in — an account with no stored hash cannot sign in.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  Json,
  extract::{FromRequestParts, State},
  http::{HeaderMap, StatusCode, header, request::Parts},
  response::IntoResponse,
};
use chrono::Duration;
use serde::Deserialize;
use uuid::Uuid;

use kudos_core::{store::RecognitionStore, user::User};

use crate::{AppState, error::ApiError, error::store_error};

/// Cookie carrying the session id.
pub const SESSION_COOKIE: &str = "kudos_session";

/// Sessions live for a week, like the browser flow they back.
pub const SESSION_TTL_DAYS: i64 = 7;

// ─── Cookie plumbing ─────────────────────────────────────────────────────────

/// Pull the session UUID out of the `Cookie` header, if present and
/// well-formed.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
  let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
  cookies.split(';').find_map(|pair| {
    let (name, value) = pair.trim().split_once('=')?;
    if name != SESSION_COOKIE {
      return None;
    }
    Uuid::parse_str(value.trim()).ok()
  })
}

fn session_cookie(session_id: Uuid) -> String {
  let max_age = Duration::days(SESSION_TTL_DAYS).num_seconds();
  format!(
    "{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}"
  )
}

fn clear_session_cookie() -> String {
  format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

// ─── Extractors ──────────────────────────────────────────────────────────────

/// The signed-in user; rejects with 401 when the session is missing,
/// unknown, or expired.
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<AppState<S>> for CurrentUser
where
  S: RecognitionStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let session_id =
      session_id_from_headers(&parts.headers).ok_or(ApiError::Unauthorized)?;
    let user = state
      .store
      .session_user(session_id)
      .await
      .map_err(store_error)?
      .ok_or(ApiError::Unauthorized)?;
    Ok(CurrentUser(user))
  }
}

/// A signed-in administrator; rejects with 403 for everyone else.
pub struct AdminUser(pub User);

impl<S> FromRequestParts<AppState<S>> for AdminUser
where
  S: RecognitionStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let CurrentUser(user) =
      CurrentUser::from_request_parts(parts, state).await?;
    if !user.is_admin {
      return Err(ApiError::Forbidden);
    }
    Ok(AdminUser(user))
  }
}

// ─── Handlers ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SignInBody {
  pub email:    String,
  pub password: String,
}

/// `POST /auth/signin` — body: `{"email": ..., "password": ...}`.
/// Sets the session cookie and returns the signed-in user.
pub async fn signin<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<SignInBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecognitionStore + Clone + Send + Sync + 'static,
{
  let credentials = state
    .store
    .credentials(&body.email)
    .await
    .map_err(store_error)?
    .ok_or(ApiError::Unauthorized)?;

  let hash = credentials.password_hash.ok_or(ApiError::Unauthorized)?;
  let parsed = PasswordHash::new(&hash).map_err(|_| ApiError::Unauthorized)?;
  Argon2::default()
    .verify_password(body.password.as_bytes(), &parsed)
    .map_err(|_| ApiError::Unauthorized)?;

  let session = state
    .store
    .create_session(credentials.user.id, Duration::days(SESSION_TTL_DAYS))
    .await
    .map_err(store_error)?;

  tracing::info!(user = %credentials.user.id, "signed in");
  Ok((
    [(header::SET_COOKIE, session_cookie(session.id))],
    Json(credentials.user),
  ))
}

/// `POST /auth/signout` — discards the session (if any) and clears the
/// cookie. Always succeeds.
pub async fn signout<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecognitionStore + Clone + Send + Sync + 'static,
{
  if let Some(session_id) = session_id_from_headers(&headers) {
    state
      .store
      .delete_session(session_id)
      .await
      .map_err(store_error)?;
  }
  Ok((
    StatusCode::NO_CONTENT,
    [(header::SET_COOKIE, clear_session_cookie())],
  ))
}

/// `GET /auth/me` — the signed-in user, or 401.
pub async fn me<S>(
  CurrentUser(user): CurrentUser,
) -> Result<Json<User>, ApiError>
where
  S: RecognitionStore + Clone + Send + Sync + 'static,
{
  Ok(Json(user))
}
