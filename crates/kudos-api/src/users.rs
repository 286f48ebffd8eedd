//! Handlers for `/users` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/users` | Optional `?q=<term>` roster search |
//! | `POST`  | `/users` | Admin only |
//! | `PATCH` | `/users/:id` | Admin only; partial update |

use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use rand_core::OsRng;
use serde::Deserialize;
use uuid::Uuid;

use kudos_core::{
  store::RecognitionStore,
  user::{NewUser, User, UserUpdate},
};

use crate::{
  AppState,
  auth::{AdminUser, CurrentUser},
  error::{ApiError, store_error},
};

// ─── List / search ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub q: Option<String>,
}

/// `GET /users[?q=<term>]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  _viewer: CurrentUser,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<User>>, ApiError>
where
  S: RecognitionStore + Clone + Send + Sync + 'static,
{
  let users = match params.q.as_deref().map(str::trim) {
    Some(term) if !term.is_empty() => {
      state.store.search_users(term).await.map_err(store_error)?
    }
    _ => state.store.list_users().await.map_err(store_error)?,
  };
  Ok(Json(users))
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:       String,
  pub email:      String,
  #[serde(default)]
  pub department: String,
  #[serde(default)]
  pub team:       String,
  #[serde(default)]
  pub area:       String,
  #[serde(default)]
  pub avatar:     String,
  pub birthday:   Option<NaiveDate>,
  #[serde(default)]
  pub is_admin:   bool,
  /// Plaintext; hashed before it reaches the store.
  pub password:   Option<String>,
}

/// `POST /users` — admin only.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  _admin: AdminUser,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecognitionStore + Clone + Send + Sync + 'static,
{
  if body.name.trim().is_empty() || body.email.trim().is_empty() {
    return Err(ApiError::BadRequest("name and email are required".into()));
  }

  let password_hash = match body.password.as_deref() {
    Some(password) => Some(hash_password(password)?),
    None => None,
  };

  let user = state
    .store
    .add_user(NewUser {
      name: body.name,
      email: body.email,
      department: body.department,
      team: body.team,
      area: body.area,
      avatar: body.avatar,
      birthday: body.birthday,
      is_admin: body.is_admin,
      password_hash,
    })
    .await
    .map_err(store_error)?;

  Ok((StatusCode::CREATED, Json(user)))
}

fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| ApiError::BadRequest(format!("unusable password: {e}")))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PATCH /users/:id` — admin only; body is any subset of the updatable
/// fields.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  _admin: AdminUser,
  Path(id): Path<Uuid>,
  Json(update): Json<UserUpdate>,
) -> Result<Json<User>, ApiError>
where
  S: RecognitionStore + Clone + Send + Sync + 'static,
{
  let user = state
    .store
    .update_user(id, update)
    .await
    .map_err(store_error)?
    .ok_or_else(|| ApiError::NotFound(format!("user {id} not found")))?;
  Ok(Json(user))
}
