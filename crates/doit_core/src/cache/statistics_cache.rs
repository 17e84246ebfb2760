//! Day-bucketed usage counters.
//!
//! # Invariants
//! - Exactly one bucket per calendar day; buckets are keyed by day.
//! - The day of a report is its date in the timezone the instant carries.
//! - Non-positive report amounts never create or modify a bucket.

use crate::model::statistics::{StatisticKind, StatisticalData};
use chrono::{DateTime, NaiveDate, TimeZone};
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone)]
pub struct StatisticsCache {
    buckets: BTreeMap<NaiveDate, StatisticalData>,
}

impl StatisticsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` to `kind` in the bucket for `date`'s calendar day.
    ///
    /// The bucket is created on first report. `amount <= 0` is a no-op.
    /// Pass local instants to get local days.
    pub fn report<Tz: TimeZone>(
        &mut self,
        kind: StatisticKind,
        amount: i64,
        date: DateTime<Tz>,
    ) {
        let Ok(amount) = u64::try_from(amount) else {
            return;
        };
        if amount == 0 {
            return;
        }

        let day = date.date_naive();
        self.buckets
            .entry(day)
            .or_insert_with(|| StatisticalData::new(day))
            .increment(kind, amount);
    }

    pub fn report_created_tasks<Tz: TimeZone>(&mut self, amount: i64, date: DateTime<Tz>) {
        self.report(StatisticKind::CreatedTasks, amount, date);
    }

    pub fn report_finished_tasks<Tz: TimeZone>(&mut self, amount: i64, date: DateTime<Tz>) {
        self.report(StatisticKind::FinishedTasks, amount, date);
    }

    pub fn report_deleted_tasks<Tz: TimeZone>(&mut self, amount: i64, date: DateTime<Tz>) {
        self.report(StatisticKind::DeletedTasks, amount, date);
    }

    pub fn report_overdue_tasks<Tz: TimeZone>(&mut self, amount: i64, date: DateTime<Tz>) {
        self.report(StatisticKind::OverdueTasks, amount, date);
    }

    pub fn report_created_lists<Tz: TimeZone>(&mut self, amount: i64, date: DateTime<Tz>) {
        self.report(StatisticKind::CreatedLists, amount, date);
    }

    pub fn report_deleted_lists<Tz: TimeZone>(&mut self, amount: i64, date: DateTime<Tz>) {
        self.report(StatisticKind::DeletedLists, amount, date);
    }

    /// Returns copies of all buckets, oldest day first.
    pub fn get_statistics_data(&self) -> Vec<StatisticalData> {
        self.buckets.values().cloned().collect()
    }

    /// Sums `kind` over buckets on or after `first_day`; `None` sums all.
    pub fn total_since(&self, kind: StatisticKind, first_day: Option<NaiveDate>) -> u64 {
        let sum = |bucket: &StatisticalData| bucket.get(kind);
        match first_day {
            Some(day) => self.buckets.range(day..).map(|(_, b)| sum(b)).sum(),
            None => self.buckets.values().map(sum).sum(),
        }
    }

    pub fn clear_data(&mut self) {
        self.buckets.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::StatisticsCache;
    use crate::model::statistics::StatisticKind;
    use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};

    #[test]
    fn negative_amount_creates_no_bucket() {
        let mut cache = StatisticsCache::new();
        let now = Utc.with_ymd_and_hms(2024, 3, 3, 12, 0, 0).unwrap();
        cache.report_finished_tasks(-1, now);
        assert!(cache.get_statistics_data().is_empty());
    }

    #[test]
    fn total_since_respects_first_day() {
        let mut cache = StatisticsCache::new();
        cache.report_deleted_lists(1, Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
        cache.report_deleted_lists(2, Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap());
        cache.report_deleted_lists(4, Utc.with_ymd_and_hms(2024, 3, 3, 9, 0, 0).unwrap());

        let march_2 = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        assert_eq!(
            cache.total_since(StatisticKind::DeletedLists, Some(march_2)),
            6
        );
        assert_eq!(cache.total_since(StatisticKind::DeletedLists, None), 7);
        assert_eq!(cache.total_since(StatisticKind::CreatedLists, None), 0);
    }

    #[test]
    fn buckets_follow_the_reporting_timezone() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let evening = Utc.with_ymd_and_hms(2024, 6, 10, 20, 0, 0).unwrap();
        let morning = Utc.with_ymd_and_hms(2024, 6, 11, 1, 0, 0).unwrap();

        let mut local = StatisticsCache::new();
        local.report_created_tasks(1, evening.with_timezone(&tokyo));
        local.report_created_tasks(1, morning.with_timezone(&tokyo));
        let buckets = local.get_statistics_data();
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].date, NaiveDate::from_ymd_opt(2024, 6, 11).unwrap());
        assert_eq!(buckets[0].created_tasks, 2);

        let mut utc = StatisticsCache::new();
        utc.report_created_tasks(1, evening);
        utc.report_created_tasks(1, morning);
        assert_eq!(utc.get_statistics_data().len(), 2);
    }
}
