//! Time source for statistics bookkeeping.
//!
//! # Responsibility
//! - Decouple "now" from the wall clock so day buckets are testable.
//! - Fix the timezone in which calendar days are cut.
//!
//! # Invariants
//! - `local_now` and `now` denote the same instant.

use chrono::{DateTime, Duration, FixedOffset, Local, Offset, Utc};
use std::cell::Cell;

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// The current instant in the user's timezone; its date is "today".
    fn local_now(&self) -> DateTime<FixedOffset> {
        self.now().with_timezone(&Local).fixed_offset()
    }
}

/// Wall clock backed by the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Caller-controlled clock used by tests and replays.
///
/// Days are cut at midnight of a fixed offset (UTC unless set otherwise),
/// independent of the host timezone.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<DateTime<Utc>>,
    offset: FixedOffset,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self::with_offset(start, Utc.fix())
    }

    pub fn with_offset(start: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self {
            now: Cell::new(start),
            offset,
        }
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        self.now.set(instant);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn local_now(&self) -> DateTime<FixedOffset> {
        self.now.get().with_timezone(&self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, ManualClock};
    use chrono::{Duration, FixedOffset, NaiveDate, TimeZone, Utc};

    #[test]
    fn manual_clock_advances() {
        let start = Utc.with_ymd_and_hms(2024, 1, 31, 23, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        clock.advance(Duration::hours(2));
        assert_eq!(
            clock.now(),
            Utc.with_ymd_and_hms(2024, 2, 1, 1, 0, 0).unwrap()
        );
    }

    #[test]
    fn manual_clock_cuts_days_at_its_offset() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let clock = ManualClock::with_offset(
            Utc.with_ymd_and_hms(2024, 6, 10, 20, 0, 0).unwrap(),
            tokyo,
        );
        assert_eq!(
            clock.local_now().date_naive(),
            NaiveDate::from_ymd_opt(2024, 6, 11).unwrap()
        );
        assert_eq!(clock.local_now(), clock.now());
    }
}
