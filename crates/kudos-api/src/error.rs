//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("authentication required")]
  Unauthorized,

  #[error("admin privileges required")]
  Forbidden,

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
      ApiError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

/// Map a store error onto an HTTP status.
///
/// Domain failures (unknown user/medal, taken email) ride inside backend
/// error types as sources; walking the chain turns them into the right
/// status instead of a blanket 500.
pub fn store_error<E>(err: E) -> ApiError
where
  E: std::error::Error + Send + Sync + 'static,
{
  let mut current: Option<&(dyn std::error::Error + 'static)> = Some(&err);
  while let Some(e) = current {
    if let Some(domain) = e.downcast_ref::<kudos_core::Error>() {
      return match domain {
        kudos_core::Error::UserNotFound(_)
        | kudos_core::Error::MedalNotFound(_) => {
          ApiError::NotFound(domain.to_string())
        }
        kudos_core::Error::EmailTaken(_) => {
          ApiError::Conflict(domain.to_string())
        }
      };
    }
    current = e.source();
  }
  ApiError::Store(Box::new(err))
}
