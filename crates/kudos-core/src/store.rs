//! The `RecognitionStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g. `kudos-store-sqlite`).
//! Higher layers (`kudos-api`, `kudos-server`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  medal::{Comment, Medal, NewMedal},
  user::{NewUser, User, UserUpdate},
  value::Value,
};

// ─── Sessions ────────────────────────────────────────────────────────────────

/// An authenticated browser session. Expired rows are treated as absent by
/// [`RecognitionStore::session_user`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
  pub id:         Uuid,
  pub user_id:    Uuid,
  pub created_at: DateTime<Utc>,
  pub expires_at: DateTime<Utc>,
}

/// Sign-in material for one account: the roster entry plus its stored
/// password hash. Kept out of [`User`] so the hash never rides along into
/// serialised responses.
#[derive(Debug, Clone)]
pub struct Credentials {
  pub user:          User,
  /// Argon2 PHC string, if the account has a password set.
  pub password_hash: Option<String>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a kudos storage backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait RecognitionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Roster ────────────────────────────────────────────────────────────

  /// List every user, ordered by display name.
  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// Retrieve a user by id. Returns `None` if not found.
  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Retrieve the sign-in credentials for an email address.
  fn credentials<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Credentials>, Self::Error>> + Send + 'a;

  /// Case-insensitive substring search over name, department, team and
  /// area.
  fn search_users<'a>(
    &'a self,
    query: &'a str,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + 'a;

  /// Create and persist a new roster entry. The id is set by the store.
  fn add_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Apply a partial update. Returns the updated user, or `None` if the id
  /// is unknown.
  fn update_user(
    &self,
    id: Uuid,
    update: UserUpdate,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  // ── Values ────────────────────────────────────────────────────────────

  /// List the corporate values, ordered by name.
  fn list_values(
    &self,
  ) -> impl Future<Output = Result<Vec<Value>, Self::Error>> + Send + '_;

  // ── Medals ────────────────────────────────────────────────────────────

  /// List every medal, newest first, with participants and comments
  /// joined.
  fn list_medals(
    &self,
  ) -> impl Future<Output = Result<Vec<Medal>, Self::Error>> + Send + '_;

  /// Record a new recognition and return it fully joined. `created_at` is
  /// set by the store.
  fn give_medal(
    &self,
    input: NewMedal,
  ) -> impl Future<Output = Result<Medal, Self::Error>> + Send + '_;

  /// Append a comment to a medal. The author's display name is resolved
  /// and captured at write time.
  fn add_comment(
    &self,
    medal_id: Uuid,
    author_id: Uuid,
    message: String,
  ) -> impl Future<Output = Result<Comment, Self::Error>> + Send + '_;

  /// Toggle `user_id`'s like on a medal. Returns `true` when the medal is
  /// liked after the call, `false` when the like was removed.
  fn toggle_like(
    &self,
    medal_id: Uuid,
    user_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Sessions ──────────────────────────────────────────────────────────

  /// Open a session for `user_id`, valid for `ttl`.
  fn create_session(
    &self,
    user_id: Uuid,
    ttl: chrono::Duration,
  ) -> impl Future<Output = Result<Session, Self::Error>> + Send + '_;

  /// Resolve a session id to its user. Expired or unknown sessions yield
  /// `None`.
  fn session_user(
    &self,
    session_id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Discard a session. Unknown ids are a no-op.
  fn delete_session(
    &self,
    session_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
