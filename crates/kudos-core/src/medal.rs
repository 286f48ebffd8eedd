//! Medal — the fundamental unit of peer recognition.
//!
//! A medal records one user commending another for exemplifying a named
//! corporate value. Likes and comments are appended after creation through
//! explicit store commands; nothing mutates a snapshot in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::Participant;

/// A recognition record, with its giver and recipient already joined.
///
/// The giver/recipient pair is not constrained: self-recognition is
/// discouraged at the edges but representable here, and every aggregation
/// must tolerate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medal {
  pub id:         Uuid,
  pub giver:      Participant,
  pub recipient:  Participant,
  /// Name of the corporate value this medal is tagged with.
  pub value:      String,
  pub message:    String,
  pub created_at: DateTime<Utc>,
  pub is_public:  bool,
  pub likes:      u32,
  /// Oldest first; owned by the medal, lifecycle bound to it.
  pub comments:   Vec<Comment>,
}

/// A comment on a medal. `author` is a display name — comments outlive
/// roster edits, so the name is captured at write time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
  pub id:         Uuid,
  pub author:     String,
  pub message:    String,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::RecognitionStore::give_medal`].
/// `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMedal {
  pub giver_id:     Uuid,
  pub recipient_id: Uuid,
  pub value:        String,
  pub message:      String,
  pub is_public:    bool,
}
