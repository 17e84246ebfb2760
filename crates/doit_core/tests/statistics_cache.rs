use chrono::{TimeZone, Utc};
use doit_core::{StatisticKind, StatisticsCache};

#[test]
fn zero_amount_is_a_no_op() {
    let mut cache = StatisticsCache::new();
    let date = Utc.with_ymd_and_hms(2024, 4, 2, 10, 0, 0).unwrap();

    cache.report_created_tasks(0, date);
    assert!(cache.get_statistics_data().is_empty());
}

#[test]
fn same_day_reports_accumulate_in_one_bucket() {
    let mut cache = StatisticsCache::new();
    let morning = Utc.with_ymd_and_hms(2024, 4, 2, 8, 15, 0).unwrap();
    let evening = Utc.with_ymd_and_hms(2024, 4, 2, 22, 45, 0).unwrap();

    cache.report_created_tasks(3, morning);
    cache.report_created_tasks(2, evening);

    let data = cache.get_statistics_data();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0].created_tasks, 5);
    assert_eq!(data[0].date, morning.date_naive());
}

#[test]
fn different_days_get_separate_buckets() {
    let mut cache = StatisticsCache::new();
    let monday = Utc.with_ymd_and_hms(2024, 4, 1, 23, 59, 59).unwrap();
    let tuesday = Utc.with_ymd_and_hms(2024, 4, 2, 0, 0, 0).unwrap();

    cache.report_deleted_tasks(1, tuesday);
    cache.report_deleted_tasks(1, monday);

    let data = cache.get_statistics_data();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0].date, monday.date_naive());
    assert_eq!(data[1].date, tuesday.date_naive());
}

#[test]
fn each_report_targets_its_own_counter() {
    let mut cache = StatisticsCache::new();
    let date = Utc.with_ymd_and_hms(2024, 4, 2, 12, 0, 0).unwrap();

    cache.report_created_tasks(1, date);
    cache.report_finished_tasks(2, date);
    cache.report_deleted_tasks(3, date);
    cache.report_overdue_tasks(4, date);
    cache.report_created_lists(5, date);
    cache.report_deleted_lists(6, date);

    let bucket = &cache.get_statistics_data()[0];
    assert_eq!(bucket.get(StatisticKind::CreatedTasks), 1);
    assert_eq!(bucket.get(StatisticKind::FinishedTasks), 2);
    assert_eq!(bucket.get(StatisticKind::DeletedTasks), 3);
    assert_eq!(bucket.get(StatisticKind::OverdueTasks), 4);
    assert_eq!(bucket.get(StatisticKind::CreatedLists), 5);
    assert_eq!(bucket.get(StatisticKind::DeletedLists), 6);
}

#[test]
fn returned_data_is_a_copy_and_clear_removes_buckets() {
    let mut cache = StatisticsCache::new();
    let date = Utc.with_ymd_and_hms(2024, 4, 2, 12, 0, 0).unwrap();
    cache.report_created_lists(1, date);

    let mut copy = cache.get_statistics_data();
    copy[0].created_lists = 100;
    assert_eq!(cache.get_statistics_data()[0].created_lists, 1);

    cache.clear_data();
    assert!(cache.get_statistics_data().is_empty());
}
