//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings in UTC (so lexicographic
//! comparison in SQL matches chronological order), calendar dates as
//! `YYYY-MM-DD`, and UUIDs as hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::warn;
use uuid::Uuid;

use kudos_core::{
  medal::{Comment, Medal},
  user::{Participant, User},
};

use crate::Result;

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── Timestamps ──────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| crate::Error::DateParse(e.to_string()))
}

// ─── Calendar dates ──────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

/// Birthdays are display data; a malformed column value drops to `None`
/// with a diagnostic instead of failing the row.
pub fn decode_birthday(raw: Option<String>) -> Option<NaiveDate> {
  let raw = raw?;
  match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
    Ok(d) => Some(d),
    Err(_) => {
      warn!(value = %raw, "ignoring malformed birthday column");
      None
    }
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:    String,
  pub email:      String,
  pub name:       String,
  pub department: String,
  pub team:       String,
  pub area:       String,
  pub avatar:     String,
  pub birthday:   Option<String>,
  pub is_admin:   bool,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:         decode_uuid(&self.user_id)?,
      name:       self.name,
      email:      self.email,
      department: self.department,
      team:       self.team,
      area:       self.area,
      avatar:     self.avatar,
      birthday:   decode_birthday(self.birthday),
      is_admin:   self.is_admin,
    })
  }
}

/// Raw strings from a `medals` row joined with both participant users.
pub struct RawMedal {
  pub medal_id:         String,
  pub giver_id:         String,
  pub giver_name:       String,
  pub giver_email:      String,
  pub giver_avatar:     String,
  pub recipient_id:     String,
  pub recipient_name:   String,
  pub recipient_email:  String,
  pub recipient_avatar: String,
  pub value_name:       String,
  pub message:          String,
  pub is_public:        bool,
  pub likes:            u32,
  pub created_at:       String,
}

impl RawMedal {
  /// Build the joined [`Medal`]; `comments` are stitched in by the caller.
  pub fn into_medal(self, comments: Vec<Comment>) -> Result<Medal> {
    Ok(Medal {
      id:         decode_uuid(&self.medal_id)?,
      giver:      Participant {
        id:     decode_uuid(&self.giver_id)?,
        name:   self.giver_name,
        email:  self.giver_email,
        avatar: self.giver_avatar,
      },
      recipient:  Participant {
        id:     decode_uuid(&self.recipient_id)?,
        name:   self.recipient_name,
        email:  self.recipient_email,
        avatar: self.recipient_avatar,
      },
      value:      self.value_name,
      message:    self.message,
      created_at: decode_dt(&self.created_at)?,
      is_public:  self.is_public,
      likes:      self.likes,
      comments,
    })
  }
}

/// Raw strings from a `medal_comments` row joined with its author.
pub struct RawComment {
  pub comment_id:  String,
  pub medal_id:    String,
  pub author_name: String,
  pub message:     String,
  pub created_at:  String,
}

impl RawComment {
  pub fn into_comment(self) -> Result<(Uuid, Comment)> {
    let medal_id = decode_uuid(&self.medal_id)?;
    Ok((medal_id, Comment {
      id:         decode_uuid(&self.comment_id)?,
      author:     self.author_name,
      message:    self.message,
      created_at: decode_dt(&self.created_at)?,
    }))
  }
}
