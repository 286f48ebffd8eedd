//! Handler for `/values`.

use axum::{Json, extract::State};

use kudos_core::{store::RecognitionStore, value::Value};

use crate::{
  AppState,
  auth::CurrentUser,
  error::{ApiError, store_error},
};

/// `GET /values`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  _viewer: CurrentUser,
) -> Result<Json<Vec<Value>>, ApiError>
where
  S: RecognitionStore + Clone + Send + Sync + 'static,
{
  let values = state.store.list_values().await.map_err(store_error)?;
  Ok(Json(values))
}
