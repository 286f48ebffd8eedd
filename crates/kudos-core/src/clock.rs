//! Injectable time source.
//!
//! Birthday and monthly-window calculations depend on "today"; tests and
//! the demo fixture need to pin it, so nothing in the engine reads the
//! system clock directly.

use chrono::{DateTime, NaiveDate, Utc};

pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;

  /// The current calendar day, date-only.
  fn today(&self) -> NaiveDate { self.now().date_naive() }
}

/// Live wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> { Utc::now() }
}

/// A clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
  fn now(&self) -> DateTime<Utc> { self.0 }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fixed_clock_reports_its_instant() {
    let at = "2025-06-15T12:30:00Z".parse::<DateTime<Utc>>().unwrap();
    let clock = FixedClock(at);
    assert_eq!(clock.now(), at);
    assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
  }
}
