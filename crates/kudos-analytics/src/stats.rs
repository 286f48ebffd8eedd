//! Engagement statistics for the metrics panel.

use std::collections::HashSet;

use serde::Serialize;
use uuid::Uuid;

use kudos_core::{medal::Medal, user::User};

/// Platform-wide and viewer-relative counters.
#[derive(Debug, Clone, Serialize)]
pub struct EngagementSummary {
  /// Medals across the whole platform.
  pub total:              u32,
  /// Given by the viewer.
  pub sent:               u32,
  /// Received by the viewer.
  pub received:           u32,
  /// Distinct values the viewer has been recognised for.
  pub distinct_values:    u32,
  /// Share of users appearing as giver or recipient, in whole percent.
  pub participation_rate: u32,
}

pub fn engagement_summary(
  medals: &[Medal],
  users: &[User],
  viewer: Uuid,
) -> EngagementSummary {
  let sent = medals.iter().filter(|m| m.giver.id == viewer).count() as u32;
  let received =
    medals.iter().filter(|m| m.recipient.id == viewer).count() as u32;

  let distinct_values = medals
    .iter()
    .filter(|m| m.recipient.id == viewer)
    .map(|m| m.value.as_str())
    .collect::<HashSet<_>>()
    .len() as u32;

  let active: HashSet<Uuid> = medals
    .iter()
    .flat_map(|m| [m.giver.id, m.recipient.id])
    .collect();
  let participation_rate = if users.is_empty() {
    0
  } else {
    (100.0 * active.len() as f64 / users.len() as f64).round() as u32
  };

  EngagementSummary {
    total: medals.len() as u32,
    sent,
    received,
    distinct_values,
    participation_rate,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use kudos_core::user::Participant;

  fn user(n: u128) -> User {
    User {
      id:         Uuid::from_u128(n),
      name:       format!("user-{n}"),
      email:      format!("user-{n}@example.com"),
      department: String::new(),
      team:       String::new(),
      area:       String::new(),
      avatar:     String::new(),
      birthday:   None,
      is_admin:   false,
    }
  }

  fn medal(giver: u128, recipient: u128, value: &str) -> Medal {
    let participant = |n: u128| Participant {
      id:     Uuid::from_u128(n),
      name:   format!("user-{n}"),
      email:  format!("user-{n}@example.com"),
      avatar: String::new(),
    };
    Medal {
      id:         Uuid::new_v4(),
      giver:      participant(giver),
      recipient:  participant(recipient),
      value:      value.into(),
      message:    String::new(),
      created_at: "2025-06-01T10:00:00Z".parse().unwrap(),
      is_public:  true,
      likes:      0,
      comments:   Vec::new(),
    }
  }

  #[test]
  fn counts_viewer_and_platform_activity() {
    let users: Vec<User> = (1..=4).map(user).collect();
    let medals = vec![
      medal(1, 2, "Collaboration"),
      medal(2, 1, "Innovation"),
      medal(3, 1, "Innovation"),
      medal(3, 2, "Excellence"),
    ];

    let summary = engagement_summary(&medals, &users, Uuid::from_u128(1));
    assert_eq!(summary.total, 4);
    assert_eq!(summary.sent, 1);
    assert_eq!(summary.received, 2);
    assert_eq!(summary.distinct_values, 1);
    // Users 1, 2, 3 are active out of 4.
    assert_eq!(summary.participation_rate, 75);
  }

  #[test]
  fn empty_platform_is_all_zeroes() {
    let summary = engagement_summary(&[], &[], Uuid::from_u128(1));
    assert_eq!(summary.total, 0);
    assert_eq!(summary.participation_rate, 0);
  }
}
