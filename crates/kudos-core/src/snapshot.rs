//! Snapshot — the immutable input bundle for the analytics engine.
//!
//! A snapshot is borrowed read-only for the duration of one computation.
//! Providers assemble it from whatever backend they wrap; the engine never
//! performs I/O itself.

use std::convert::Infallible;
use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{medal::Medal, user::User, value::Value};

/// One consistent view of the platform's data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
  pub users:    Vec<User>,
  pub values:   Vec<Value>,
  /// Newest first, matching the feed order providers return.
  pub medals:   Vec<Medal>,
  pub taken_at: DateTime<Utc>,
}

impl Snapshot {
  /// Roster lookup by id. Linear scan — snapshots are request-sized.
  pub fn user(&self, id: Uuid) -> Option<&User> {
    self.users.iter().find(|u| u.id == id)
  }
}

// ─── Provider trait ──────────────────────────────────────────────────────────

/// Abstraction over whatever assembles a [`Snapshot`].
///
/// Two implementations ship in this workspace: the SQLite store and the
/// in-memory [`MemoryProvider`] below. Which one a binary uses is
/// configuration, never ambient global state.
pub trait SnapshotProvider: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn snapshot(
    &self,
  ) -> impl Future<Output = Result<Snapshot, Self::Error>> + Send + '_;
}

// ─── In-memory provider ──────────────────────────────────────────────────────

/// A provider that serves a fixed snapshot from memory. Used by the demo
/// mode and by engine tests that do not want a database.
#[derive(Debug, Clone)]
pub struct MemoryProvider {
  snapshot: Snapshot,
}

impl MemoryProvider {
  pub fn new(snapshot: Snapshot) -> Self { Self { snapshot } }

  /// A provider pre-loaded with the demo fixture, dated relative to `now`.
  pub fn demo(now: DateTime<Utc>) -> Self {
    Self::new(crate::fixture::demo_snapshot(now))
  }
}

impl SnapshotProvider for MemoryProvider {
  type Error = Infallible;

  async fn snapshot(&self) -> Result<Snapshot, Infallible> {
    Ok(self.snapshot.clone())
  }
}
