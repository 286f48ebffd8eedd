//! User — an employee on the recognition platform.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A full roster entry.
///
/// `birthday` is a plain calendar date; the year component only matters for
/// display. Adapters that read from external backends must normalise
/// missing or unparseable dates to `None` rather than failing the row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub id:         Uuid,
  pub name:       String,
  pub email:      String,
  pub department: String,
  pub team:       String,
  pub area:       String,
  pub avatar:     String,
  pub birthday:   Option<NaiveDate>,
  pub is_admin:   bool,
}

impl User {
  /// The slim projection embedded in a [`Medal`](crate::medal::Medal).
  pub fn participant(&self) -> Participant {
    Participant {
      id:     self.id,
      name:   self.name.clone(),
      email:  self.email.clone(),
      avatar: self.avatar.clone(),
    }
  }
}

/// The already-joined user shape a snapshot provider embeds into each medal.
/// Team and area are resolved against the roster when needed, not carried
/// here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
  pub id:     Uuid,
  pub name:   String,
  pub email:  String,
  pub avatar: String,
}

/// Input to [`crate::store::RecognitionStore::add_user`].
/// `id` is always assigned by the store; it is not accepted from callers.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub name:          String,
  pub email:         String,
  pub department:    String,
  pub team:          String,
  pub area:          String,
  pub avatar:        String,
  pub birthday:      Option<NaiveDate>,
  pub is_admin:      bool,
  /// Argon2 PHC string; `None` leaves the account without a password and
  /// therefore unable to sign in.
  pub password_hash: Option<String>,
}

/// Partial update for [`crate::store::RecognitionStore::update_user`].
/// The email is identity-bearing and cannot be changed through this path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
  pub name:       Option<String>,
  pub department: Option<String>,
  pub team:       Option<String>,
  pub area:       Option<String>,
  pub avatar:     Option<String>,
  pub birthday:   Option<NaiveDate>,
  pub is_admin:   Option<bool>,
}
