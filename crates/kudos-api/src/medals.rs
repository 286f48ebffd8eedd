//! Handlers for `/medals` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/medals` | Newest first, comments joined |
//! | `POST` | `/medals` | Giver is the signed-in user |
//! | `POST` | `/medals/:id/like` | Toggles the viewer's like |
//! | `POST` | `/medals/:id/comments` | Appends a comment |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use kudos_core::{
  medal::{Comment, Medal, NewMedal},
  store::RecognitionStore,
};

use crate::{
  AppState,
  auth::CurrentUser,
  error::{ApiError, store_error},
};

/// `GET /medals`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  _viewer: CurrentUser,
) -> Result<Json<Vec<Medal>>, ApiError>
where
  S: RecognitionStore + Clone + Send + Sync + 'static,
{
  let medals = state.store.list_medals().await.map_err(store_error)?;
  Ok(Json(medals))
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub recipient_id: Uuid,
  pub value:        String,
  pub message:      String,
  #[serde(default = "default_public")]
  pub is_public:    bool,
}

fn default_public() -> bool { true }

/// `POST /medals` — the signed-in user gives a medal.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  CurrentUser(giver): CurrentUser,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecognitionStore + Clone + Send + Sync + 'static,
{
  if body.message.trim().is_empty() {
    return Err(ApiError::BadRequest("message is required".into()));
  }
  if body.recipient_id == giver.id {
    return Err(ApiError::BadRequest(
      "recognition must go to someone else".into(),
    ));
  }

  let medal = state
    .store
    .give_medal(NewMedal {
      giver_id:     giver.id,
      recipient_id: body.recipient_id,
      value:        body.value,
      message:      body.message,
      is_public:    body.is_public,
    })
    .await
    .map_err(store_error)?;

  Ok((StatusCode::CREATED, Json(medal)))
}

// ─── Like ────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct LikeResponse {
  pub liked: bool,
}

/// `POST /medals/:id/like`
pub async fn like<S>(
  State(state): State<AppState<S>>,
  CurrentUser(viewer): CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<Json<LikeResponse>, ApiError>
where
  S: RecognitionStore + Clone + Send + Sync + 'static,
{
  let liked = state
    .store
    .toggle_like(id, viewer.id)
    .await
    .map_err(store_error)?;
  Ok(Json(LikeResponse { liked }))
}

// ─── Comment ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CommentBody {
  pub message: String,
}

/// `POST /medals/:id/comments`
pub async fn comment<S>(
  State(state): State<AppState<S>>,
  CurrentUser(author): CurrentUser,
  Path(id): Path<Uuid>,
  Json(body): Json<CommentBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecognitionStore + Clone + Send + Sync + 'static,
{
  if body.message.trim().is_empty() {
    return Err(ApiError::BadRequest("message is required".into()));
  }

  let comment: Comment = state
    .store
    .add_comment(id, author.id, body.message)
    .await
    .map_err(store_error)?;

  Ok((StatusCode::CREATED, Json(comment)))
}
