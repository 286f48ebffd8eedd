//! Demo dataset.
//!
//! A small company roster with enough recognition history to make every
//! derived view non-trivial: a same-day birthday, a current-month
//! leaderboard with a tie, repeated giver/recipient pairs (so the global
//! graph's significance threshold keeps some edges and drops others) and
//! cross-team traffic. Dates are anchored to the `now` passed in, the way
//! a seeded demo database would be.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
  medal::Medal,
  snapshot::Snapshot,
  user::User,
  value::Value,
};

/// Stable fixture id: users occupy 1..=8, medals 101..
fn fid(n: u128) -> Uuid { Uuid::from_u128(n) }

/// The six corporate values every deployment starts with.
pub fn corporate_values() -> Vec<Value> {
  let v = |name: &str, color: &str, icon: &str, description: &str, example: &str| Value {
    name:        name.to_string(),
    color:       color.to_string(),
    icon:        icon.to_string(),
    description: description.to_string(),
    example:     example.to_string(),
  };

  vec![
    v(
      "Collaboration",
      "#3b82f6",
      "🤝",
      "Working as a team toward shared goals",
      "Helping a colleague through a complex project, sharing knowledge, or bridging communication between teams.",
    ),
    v(
      "Innovation",
      "#ef4444",
      "💡",
      "Finding new ways to do things",
      "Proposing a creative solution, adopting a new technology, or improving an existing process.",
    ),
    v(
      "Excellence",
      "#f59e0b",
      "🌟",
      "Pursuing quality in everything we do",
      "Delivering high-quality work, exceeding expectations, or holding a consistently high bar.",
    ),
    v(
      "Integrity",
      "#10b981",
      "🛡️",
      "Acting with honesty and transparency",
      "Owning mistakes, keeping commitments, or doing the right thing when it is hard.",
    ),
    v(
      "Leadership",
      "#8b5cf6",
      "👑",
      "Inspiring and guiding others to succeed",
      "Motivating the team through a difficult stretch, taking initiative, or mentoring junior colleagues.",
    ),
    v(
      "Adaptability",
      "#06b6d4",
      "🔄",
      "Staying flexible when things change",
      "Absorbing new requirements quickly, picking up unfamiliar tools, or handling shifting priorities.",
    ),
  ]
}

fn demo_users(today: NaiveDate) -> Vec<User> {
  let u = |n: u128,
           name: &str,
           email: &str,
           department: &str,
           team: &str,
           area: &str,
           birthday: Option<NaiveDate>,
           is_admin: bool| User {
    id: fid(n),
    name: name.to_string(),
    email: email.to_string(),
    department: department.to_string(),
    team: team.to_string(),
    area: area.to_string(),
    avatar: "/avatars/placeholder.svg".to_string(),
    birthday,
    is_admin,
  };
  let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day);

  vec![
    u(1, "Maya Grant", "maya.grant@example.com", "Engineering", "Platform", "IT", d(1990, 3, 15), false),
    u(2, "Carl Lowe", "carl.lowe@example.com", "Marketing", "Digital", "Marketing", d(1988, 1, 15), true),
    // Birthday today, so the congratulations flow is exercisable out of
    // the box.
    u(3, "Anna Marsh", "anna.marsh@example.com", "People", "Talent", "HR", Some(today), false),
    u(4, "Luis Reyes", "luis.reyes@example.com", "Sales", "Accounts", "Sales", d(1985, 2, 10), false),
    u(5, "Elena Ford", "elena.ford@example.com", "Design", "UX", "IT", d(1991, 12, 5), false),
    u(6, "Rob Silva", "rob.silva@example.com", "Engineering", "Architecture", "IT", d(1987, 6, 20), false),
    u(7, "Pat Moore", "pat.moore@example.com", "Engineering", "QA", "IT", d(1992, 2, 29), false),
    u(8, "Dana Hart", "dana.hart@example.com", "People", "Recruiting", "HR", d(1993, 8, 30), false),
  ]
}

fn demo_medals(users: &[User], now: DateTime<Utc>) -> Vec<Medal> {
  // Fixture users occupy ids 1..=8 in roster order.
  let by_id = |n: u128| users[(n - 1) as usize].participant();

  let mut next = 100u128;
  let mut medal = |giver: u128,
                   recipient: u128,
                   value: &str,
                   message: &str,
                   days_ago: i64,
                   likes: u32| {
    next += 1;
    Medal {
      id: fid(next),
      giver: by_id(giver),
      recipient: by_id(recipient),
      value: value.to_string(),
      message: message.to_string(),
      created_at: now - Duration::days(days_ago),
      is_public: true,
      likes,
      comments: Vec::new(),
    }
  };

  vec![
    // Current-month cluster. Maya leads the board; Anna and Elena tie on
    // two, with Anna's earliest recognition first.
    medal(2, 1, "Collaboration", "Key part of the platform migration landing on time.", 1, 5),
    medal(3, 1, "Innovation", "The pipeline automation saved the team hours every week.", 2, 8),
    medal(6, 1, "Excellence", "Flawless rollout, solid docs, zero regressions.", 3, 4),
    medal(1, 3, "Leadership", "Ran the hiring sprint and kept everyone sane.", 4, 3),
    medal(5, 3, "Collaboration", "Paired with design daily until the handoff was smooth.", 2, 2),
    medal(4, 5, "Excellence", "The dashboard redesign is the best thing we have shipped.", 3, 6),
    medal(2, 5, "Adaptability", "Picked up the new prototyping stack in a week.", 1, 1),
    medal(2, 1, "Collaboration", "Unblocked marketing twice this sprint.", 5, 2),
    // Older history, outside the monthly window but inside the graphs.
    medal(6, 8, "Adaptability", "Adjusted the onboarding flow on short notice.", 40, 3),
    medal(8, 6, "Integrity", "Flagged the estimate mismatch instead of letting it slide.", 45, 4),
    medal(2, 1, "Excellence", "Quarter after quarter, the platform work holds up.", 50, 7),
    medal(4, 7, "Excellence", "Caught the release blocker nobody else saw.", 60, 5),
    medal(7, 4, "Collaboration", "Sales + QA tag team on the client repro.", 65, 2),
  ]
}

/// Build the full demo snapshot, dated relative to `now`.
pub fn demo_snapshot(now: DateTime<Utc>) -> Snapshot {
  let users = demo_users(now.date_naive());
  let medals = demo_medals(&users, now);
  Snapshot {
    users,
    values: corporate_values(),
    medals,
    taken_at: now,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fixture_is_internally_consistent() {
    let now = "2025-06-15T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
    let snap = demo_snapshot(now);

    // Every medal references a roster user on both ends and a known value.
    for medal in &snap.medals {
      assert!(snap.user(medal.giver.id).is_some(), "giver missing");
      assert!(snap.user(medal.recipient.id).is_some(), "recipient missing");
      assert!(
        snap.values.iter().any(|v| v.name == medal.value),
        "value {:?} missing",
        medal.value
      );
    }

    // One user celebrates today.
    assert!(
      snap.users.iter().any(|u| u.birthday == Some(now.date_naive())),
      "no same-day birthday in fixture"
    );
  }
}
