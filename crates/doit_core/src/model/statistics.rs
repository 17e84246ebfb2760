//! Per-day usage statistics model.
//!
//! # Invariants
//! - Counters never decrease.
//! - `date` is a calendar day in UTC; time of day is not retained.

use chrono::{DateTime, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

/// Counter selector for one statistics bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatisticKind {
    CreatedTasks,
    FinishedTasks,
    DeletedTasks,
    OverdueTasks,
    CreatedLists,
    DeletedLists,
}

impl StatisticKind {
    pub const ALL: [StatisticKind; 6] = [
        StatisticKind::CreatedTasks,
        StatisticKind::FinishedTasks,
        StatisticKind::DeletedTasks,
        StatisticKind::OverdueTasks,
        StatisticKind::CreatedLists,
        StatisticKind::DeletedLists,
    ];

    /// Stable name used in log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreatedTasks => "created_tasks",
            Self::FinishedTasks => "finished_tasks",
            Self::DeletedTasks => "deleted_tasks",
            Self::OverdueTasks => "overdue_tasks",
            Self::CreatedLists => "created_lists",
            Self::DeletedLists => "deleted_lists",
        }
    }
}

/// Counter bundle for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticalData {
    pub date: NaiveDate,
    pub created_tasks: u64,
    pub finished_tasks: u64,
    pub deleted_tasks: u64,
    pub overdue_tasks: u64,
    pub created_lists: u64,
    pub deleted_lists: u64,
}

impl StatisticalData {
    /// Creates an all-zero bucket for `date`.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            created_tasks: 0,
            finished_tasks: 0,
            deleted_tasks: 0,
            overdue_tasks: 0,
            created_lists: 0,
            deleted_lists: 0,
        }
    }

    /// Returns whether `instant` falls on this bucket's day, read in the
    /// instant's own timezone.
    pub fn same_day<Tz: TimeZone>(&self, instant: DateTime<Tz>) -> bool {
        instant.date_naive() == self.date
    }

    pub fn get(&self, kind: StatisticKind) -> u64 {
        match kind {
            StatisticKind::CreatedTasks => self.created_tasks,
            StatisticKind::FinishedTasks => self.finished_tasks,
            StatisticKind::DeletedTasks => self.deleted_tasks,
            StatisticKind::OverdueTasks => self.overdue_tasks,
            StatisticKind::CreatedLists => self.created_lists,
            StatisticKind::DeletedLists => self.deleted_lists,
        }
    }

    /// Adds `amount` to the selected counter, saturating at `u64::MAX`.
    pub fn increment(&mut self, kind: StatisticKind, amount: u64) {
        let counter = match kind {
            StatisticKind::CreatedTasks => &mut self.created_tasks,
            StatisticKind::FinishedTasks => &mut self.finished_tasks,
            StatisticKind::DeletedTasks => &mut self.deleted_tasks,
            StatisticKind::OverdueTasks => &mut self.overdue_tasks,
            StatisticKind::CreatedLists => &mut self.created_lists,
            StatisticKind::DeletedLists => &mut self.deleted_lists,
        };
        *counter = counter.saturating_add(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::{StatisticKind, StatisticalData};
    use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};

    #[test]
    fn increment_touches_only_selected_counter() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let mut data = StatisticalData::new(day);
        data.increment(StatisticKind::DeletedLists, 4);

        for kind in StatisticKind::ALL {
            let expected = if kind == StatisticKind::DeletedLists { 4 } else { 0 };
            assert_eq!(data.get(kind), expected, "{}", kind.as_str());
        }
    }

    #[test]
    fn same_day_ignores_time_of_day() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let data = StatisticalData::new(day);
        assert!(data.same_day(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()));
        assert!(data.same_day(Utc.with_ymd_and_hms(2024, 5, 1, 23, 59, 59).unwrap()));
        assert!(!data.same_day(Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap()));
    }

    #[test]
    fn same_day_reads_the_instant_timezone() {
        let data = StatisticalData::new(NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
        let late_utc = Utc.with_ymd_and_hms(2024, 5, 1, 22, 0, 0).unwrap();
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();

        assert!(!data.same_day(late_utc));
        assert!(data.same_day(late_utc.with_timezone(&tokyo)));
    }
}
