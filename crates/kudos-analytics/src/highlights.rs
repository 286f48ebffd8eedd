//! Monthly leaderboard.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use tracing::warn;

use kudos_core::{medal::Medal, user::User};

/// How many entries the podium view takes from the top of the ranking.
pub const PODIUM_SIZE: usize = 3;

/// One leaderboard row: a recipient and their count for the window.
#[derive(Debug, Clone, Serialize)]
pub struct HighlightEntry {
  pub user:              User,
  pub count:             u32,
  /// Earliest recognition inside the window; the tie-breaker.
  pub first_recognition: DateTime<Utc>,
}

/// Recipients of medals given in `today`'s calendar month, ranked by count
/// descending. Ties break on the earlier first recognition; entries equal
/// on both keys keep first-encounter order in the medal list (the sort is
/// stable).
///
/// Recipients missing from the roster are skipped with a diagnostic — a
/// ranking row that cannot be displayed has no use to the podium.
pub fn monthly_highlights(
  medals: &[Medal],
  users: &[User],
  today: NaiveDate,
) -> Vec<HighlightEntry> {
  let mut entries: Vec<HighlightEntry> = Vec::new();

  for medal in medals {
    let given = medal.created_at.date_naive();
    if given.year() != today.year() || given.month() != today.month() {
      continue;
    }

    let known = entries
      .iter()
      .position(|e| e.user.id == medal.recipient.id);
    match known {
      Some(i) => {
        let entry = &mut entries[i];
        entry.count += 1;
        if medal.created_at < entry.first_recognition {
          entry.first_recognition = medal.created_at;
        }
      }
      None => {
        let Some(user) = users.iter().find(|u| u.id == medal.recipient.id)
        else {
          warn!(
            medal = %medal.id,
            recipient = %medal.recipient.id,
            "skipping highlight for recipient missing from roster"
          );
          continue;
        };
        entries.push(HighlightEntry {
          user:              user.clone(),
          count:             1,
          first_recognition: medal.created_at,
        });
      }
    }
  }

  entries.sort_by(|a, b| {
    b.count
      .cmp(&a.count)
      .then(a.first_recognition.cmp(&b.first_recognition))
  });
  entries
}

/// Split a ranking into the podium (ranks 1–3) and the rest.
pub fn split_podium(
  entries: &[HighlightEntry],
) -> (&[HighlightEntry], &[HighlightEntry]) {
  entries.split_at(entries.len().min(PODIUM_SIZE))
}
