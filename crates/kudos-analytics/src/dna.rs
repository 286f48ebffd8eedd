//! Value distribution — the "value DNA" of a person or a team.

use serde::Serialize;
use uuid::Uuid;

use kudos_core::{medal::Medal, user::User, value::Value};

/// Rendering defaults for medals tagged with a value the snapshot does not
/// know. Unresolved names degrade, they never fail the distribution.
pub const FALLBACK_COLOR: &str = "#CCCCCC";
pub const FALLBACK_ICON: &str = "🏆";

/// One slice of a distribution. Segments come back pre-sorted descending by
/// percentage, so consumers may read index 0 as the primary strength and
/// index 1 as the secondary without re-sorting.
#[derive(Debug, Clone, Serialize)]
pub struct ValueSegment {
  pub value:       String,
  pub count:       u32,
  /// Share of the filtered medal set, in percent.
  pub percentage:  f64,
  pub color:       String,
  pub icon:        String,
  pub description: String,
}

/// Percentage breakdown of `medals` by value name.
///
/// Callers pass the already-scoped subset (see [`received_by`] and
/// [`received_by_team`]). An empty subset yields an empty distribution —
/// there is no zero denominator here. Ties in percentage keep the order the
/// values were first encountered in (the sort is stable).
pub fn value_distribution<'a, I>(medals: I, values: &[Value]) -> Vec<ValueSegment>
where
  I: IntoIterator<Item = &'a Medal>,
{
  // Group in first-encounter order.
  let mut counts: Vec<(&str, u32)> = Vec::new();
  let mut total = 0u32;
  for medal in medals {
    total += 1;
    match counts.iter().position(|(name, _)| *name == medal.value) {
      Some(i) => counts[i].1 += 1,
      None => counts.push((medal.value.as_str(), 1)),
    }
  }

  if total == 0 {
    return Vec::new();
  }

  let mut segments: Vec<ValueSegment> = counts
    .into_iter()
    .map(|(name, count)| {
      let resolved = values.iter().find(|v| v.name == name);
      ValueSegment {
        value:       name.to_string(),
        count,
        percentage:  100.0 * f64::from(count) / f64::from(total),
        color:       resolved
          .map_or_else(|| FALLBACK_COLOR.to_string(), |v| v.color.clone()),
        icon:        resolved
          .map_or_else(|| FALLBACK_ICON.to_string(), |v| v.icon.clone()),
        description: resolved
          .map_or_else(String::new, |v| v.description.clone()),
      }
    })
    .collect();

  // Counts share one denominator, so count order is percentage order; the
  // integer comparison sidesteps float ordering.
  segments.sort_by(|a, b| b.count.cmp(&a.count));
  segments
}

/// Individual scope: medals received by one user.
pub fn received_by(medals: &[Medal], user_id: Uuid) -> impl Iterator<Item = &Medal> {
  medals.iter().filter(move |m| m.recipient.id == user_id)
}

/// Team scope: medals whose recipient belongs to `team` per the roster.
/// Medals whose recipient is missing from the roster fall outside every
/// team.
pub fn received_by_team<'a>(
  medals: &'a [Medal],
  users: &'a [User],
  team: &'a str,
) -> impl Iterator<Item = &'a Medal> {
  medals.iter().filter(move |m| {
    users
      .iter()
      .find(|u| u.id == m.recipient.id)
      .is_some_and(|u| u.team == team)
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use kudos_core::user::Participant;

  fn value(name: &str, color: &str) -> Value {
    Value {
      name:        name.into(),
      color:       color.into(),
      icon:        "🌟".into(),
      description: format!("{name} description"),
      example:     String::new(),
    }
  }

  fn medal(recipient: u128, value: &str) -> Medal {
    let participant = |n: u128| Participant {
      id:     Uuid::from_u128(n),
      name:   format!("user-{n}"),
      email:  format!("user-{n}@example.com"),
      avatar: String::new(),
    };
    Medal {
      id:         Uuid::new_v4(),
      giver:      participant(50),
      recipient:  participant(recipient),
      value:      value.into(),
      message:    String::new(),
      created_at: "2025-06-01T10:00:00Z".parse().unwrap(),
      is_public:  true,
      likes:      0,
      comments:   Vec::new(),
    }
  }

  fn user(n: u128, team: &str) -> User {
    User {
      id:         Uuid::from_u128(n),
      name:       format!("user-{n}"),
      email:      format!("user-{n}@example.com"),
      department: String::new(),
      team:       team.into(),
      area:       String::new(),
      avatar:     String::new(),
      birthday:   None,
      is_admin:   false,
    }
  }

  #[test]
  fn percentages_close_to_one_hundred() {
    let values = vec![value("A", "#111111"), value("B", "#222222"), value("C", "#333333")];
    let medals = vec![
      medal(1, "A"),
      medal(1, "A"),
      medal(1, "B"),
      medal(1, "C"),
      medal(1, "C"),
      medal(1, "C"),
    ];

    let segments = value_distribution(&medals, &values);
    let sum: f64 = segments.iter().map(|s| s.percentage).sum();
    assert!((sum - 100.0).abs() < 1e-6, "sum = {sum}");
  }

  #[test]
  fn sorted_descending_with_primary_first() {
    let values = vec![value("A", "#111111"), value("B", "#222222")];
    let medals = vec![medal(1, "B"), medal(1, "A"), medal(1, "A")];

    let segments = value_distribution(&medals, &values);
    assert_eq!(segments[0].value, "A");
    assert!((segments[0].percentage - 200.0 / 3.0).abs() < 1e-9);
    assert_eq!(segments[1].value, "B");
  }

  #[test]
  fn tied_segments_keep_encounter_order() {
    let values = vec![value("A", "#111111"), value("B", "#222222")];
    let medals = vec![medal(1, "B"), medal(1, "A")];

    let segments = value_distribution(&medals, &values);
    assert_eq!(segments[0].value, "B");
    assert_eq!(segments[1].value, "A");
  }

  #[test]
  fn unresolved_value_gets_neutral_defaults() {
    let segments = value_distribution(&[medal(1, "Ghost")], &[]);
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].color, FALLBACK_COLOR);
    assert_eq!(segments[0].icon, FALLBACK_ICON);
    assert!(segments[0].description.is_empty());
  }

  #[test]
  fn empty_input_yields_empty_distribution() {
    let values = vec![value("A", "#111111")];
    assert!(value_distribution(&[], &values).is_empty());
  }

  #[test]
  fn individual_scope_filters_by_recipient() {
    let values = vec![value("A", "#111111")];
    let medals = vec![medal(1, "A"), medal(2, "A"), medal(1, "A")];

    let segments =
      value_distribution(received_by(&medals, Uuid::from_u128(1)), &values);
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].count, 2);
    assert!((segments[0].percentage - 100.0).abs() < 1e-9);
  }

  #[test]
  fn team_scope_resolves_recipients_through_the_roster() {
    let values = vec![value("A", "#111111")];
    let users = vec![user(1, "Platform"), user(2, "UX")];
    // Recipient 9 is not on the roster; their medal counts for no team.
    let medals = vec![medal(1, "A"), medal(2, "A"), medal(9, "A")];

    let segments = value_distribution(
      received_by_team(&medals, &users, "Platform"),
      &values,
    );
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].count, 1);
  }
}
