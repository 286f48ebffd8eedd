//! Upcoming-birthday calculation.
//!
//! All arithmetic is date-only. Differencing full timestamps here once
//! produced off-by-one results near midnight and DST transitions, so the
//! reference "today" is a [`NaiveDate`] and nothing below ever touches a
//! time-of-day component.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use kudos_core::user::User;

/// A roster entry annotated with the days remaining until the next
/// occurrence of their birthday. Recomputed on every query.
#[derive(Debug, Clone, Serialize)]
pub struct BirthdayEntry {
  pub user:       User,
  /// 0 on the day itself, at most 366.
  pub days_until: u32,
}

/// The observed occurrence of `birthday`'s month/day in `year`.
/// A Feb 29 birthday is observed on Mar 1 in non-leap years.
fn occurrence_in(year: i32, birthday: NaiveDate) -> Option<NaiveDate> {
  NaiveDate::from_ymd_opt(year, birthday.month(), birthday.day())
    .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
}

/// Days from `today` until the next occurrence of `birthday`'s month/day.
/// The year component of `birthday` is ignored. Returns 0 when the
/// occurrence is today.
pub fn days_until_birthday(birthday: NaiveDate, today: NaiveDate) -> u32 {
  let next = match occurrence_in(today.year(), birthday) {
    Some(d) if d >= today => d,
    // This year's occurrence already passed; roll over to next year.
    // The fallback arm is never taken: Mar 1 exists in every year.
    _ => occurrence_in(today.year() + 1, birthday).unwrap_or(today),
  };

  (next - today).num_days() as u32
}

/// Every user with a parseable birthday, sorted ascending by `days_until`.
/// The sort is stable: users equidistant from their birthday keep roster
/// order. Users without a stored birthday are excluded, not fatal.
pub fn upcoming_birthdays(users: &[User], today: NaiveDate) -> Vec<BirthdayEntry> {
  let mut entries: Vec<BirthdayEntry> = users
    .iter()
    .filter_map(|user| {
      let birthday = user.birthday?;
      Some(BirthdayEntry {
        user:       user.clone(),
        days_until: days_until_birthday(birthday, today),
      })
    })
    .collect();

  entries.sort_by_key(|entry| entry.days_until);
  entries
}

#[cfg(test)]
mod tests {
  use super::*;
  use uuid::Uuid;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn user(n: u128, birthday: Option<NaiveDate>) -> User {
    User {
      id:         Uuid::from_u128(n),
      name:       format!("user-{n}"),
      email:      format!("user-{n}@example.com"),
      department: "Engineering".into(),
      team:       "Platform".into(),
      area:       "IT".into(),
      avatar:     "/avatars/placeholder.svg".into(),
      birthday,
      is_admin:   false,
    }
  }

  #[test]
  fn same_day_is_zero() {
    let today = date(2025, 3, 15);
    assert_eq!(days_until_birthday(date(1990, 3, 15), today), 0);
  }

  #[test]
  fn tomorrow_is_one() {
    let today = date(2025, 3, 14);
    assert_eq!(days_until_birthday(date(1990, 3, 15), today), 1);
  }

  #[test]
  fn passed_birthday_rolls_to_next_year() {
    let today = date(2025, 3, 16);
    // Mar 15 2026 is 364 days after Mar 16 2025.
    assert_eq!(days_until_birthday(date(1990, 3, 15), today), 364);
  }

  #[test]
  fn result_is_within_bounds_across_a_year() {
    let birthday = date(1988, 7, 4);
    let mut today = date(2024, 1, 1);
    for _ in 0..730 {
      let days = days_until_birthday(birthday, today);
      assert!(days <= 366, "{days} out of range on {today}");
      today = today.succ_opt().unwrap();
    }
  }

  #[test]
  fn leap_day_observed_on_march_first() {
    // 2025 has no Feb 29; the birthday is observed on Mar 1.
    assert_eq!(days_until_birthday(date(1992, 2, 29), date(2025, 2, 28)), 1);
    assert_eq!(days_until_birthday(date(1992, 2, 29), date(2025, 3, 1)), 0);
    // In a leap year the real date wins.
    assert_eq!(days_until_birthday(date(1992, 2, 29), date(2024, 2, 29)), 0);
  }

  #[test]
  fn upcoming_sorts_ascending_and_puts_today_first() {
    let today = date(2025, 6, 10);
    let users = vec![
      user(1, Some(date(1990, 3, 15))),
      user(2, Some(today)),
    ];

    let upcoming = upcoming_birthdays(&users, today);
    assert_eq!(upcoming.len(), 2);
    assert_eq!(upcoming[0].user.id, Uuid::from_u128(2));
    assert_eq!(upcoming[0].days_until, 0);
    assert!(upcoming[1].days_until > 0);
  }

  #[test]
  fn missing_birthdays_are_excluded_not_fatal() {
    let today = date(2025, 6, 10);
    let users = vec![
      user(1, None),
      user(2, Some(date(1991, 6, 12))),
      user(3, None),
    ];

    let upcoming = upcoming_birthdays(&users, today);
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].user.id, Uuid::from_u128(2));
  }

  #[test]
  fn equal_distance_keeps_roster_order() {
    let today = date(2025, 6, 10);
    let users = vec![
      user(1, Some(date(1990, 6, 12))),
      user(2, Some(date(1985, 6, 12))),
    ];

    let upcoming = upcoming_birthdays(&users, today);
    assert_eq!(upcoming[0].user.id, Uuid::from_u128(1));
    assert_eq!(upcoming[1].user.id, Uuid::from_u128(2));
  }

  #[test]
  fn empty_roster_yields_empty_result() {
    assert!(upcoming_birthdays(&[], date(2025, 1, 1)).is_empty());
  }
}
