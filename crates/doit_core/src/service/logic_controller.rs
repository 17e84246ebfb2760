//! Validated entry point for list/task mutations.
//!
//! # Responsibility
//! - Verify task input before it reaches the working set.
//! - Enforce unique list names across add/edit flows.
//! - Record usage statistics for every confirmed mutation.
//!
//! # Invariants
//! - Statistics are credited only with what the data cache actually applied.
//! - A list is rejected iff a different existing list carries its name.
//! - The controller is an explicit value owned by the application; there is
//!   no process-wide instance.

use crate::cache::data_cache::DataCache;
use crate::cache::statistics_cache::StatisticsCache;
use crate::model::collection::TaskCollection;
use crate::model::statistics::{StatisticKind, StatisticalData};
use crate::model::task::Task;
use crate::service::clock::{Clock, SystemClock};
use crate::service::verifier::{DataVerifier, TaskVerifier};
use chrono::{Days, NaiveDate};
use log::{debug, info, warn};
use std::collections::HashSet;

/// Coordinates verification, the working set and statistics.
///
/// Mutating methods take `&mut self`; callers sharing one controller across
/// threads must wrap it in a mutex.
pub struct LogicController<V: TaskVerifier = DataVerifier, C: Clock = SystemClock> {
    verifier: V,
    clock: C,
    data: DataCache,
    statistics: StatisticsCache,
}

impl LogicController {
    /// Creates a controller with the default verifier and the system clock.
    pub fn new() -> Self {
        Self::with_parts(DataVerifier, SystemClock)
    }
}

impl Default for LogicController {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: TaskVerifier, C: Clock> LogicController<V, C> {
    /// Creates an empty controller from explicit collaborators.
    pub fn with_parts(verifier: V, clock: C) -> Self {
        Self {
            verifier,
            clock,
            data: DataCache::new(),
            statistics: StatisticsCache::new(),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Read-only view of the working set.
    pub fn data(&self) -> &DataCache {
        &self.data
    }

    /// Adds a list unless any existing list already has its name.
    pub fn add_list(&mut self, collection: TaskCollection) -> bool {
        if self.data.has_list(&collection.name) {
            debug!("event=list_add module=controller status=rejected reason=duplicate_name");
            return false;
        }

        let added = self.data.add_list(collection);
        if added {
            self.credit(StatisticKind::CreatedLists, 1);
        }
        added
    }

    /// Adds a batch of lists, or none of them when any name collides.
    ///
    /// A collision is a candidate named like an existing list or like another
    /// candidate in the same batch. Returns the number of lists added.
    pub fn add_lists(&mut self, collections: Vec<TaskCollection>) -> usize {
        if self.batch_has_name_collision(&collections) {
            debug!(
                "event=lists_add module=controller status=rejected reason=duplicate_name batch_size={}",
                collections.len()
            );
            return 0;
        }

        let added = self.data.add_lists(collections);
        self.credit(StatisticKind::CreatedLists, added);
        added
    }

    pub fn add_task(&mut self, task: Task, collection: &TaskCollection) -> bool {
        if !self.verifier.verify_task(&task) {
            debug!("event=task_add module=controller status=rejected reason=verification");
            return false;
        }

        let added = self.data.add_task(task, collection);
        if added {
            self.credit(StatisticKind::CreatedTasks, 1);
        }
        added
    }

    /// Adds tasks to one list; rejects all of them when any fails
    /// verification.
    pub fn add_tasks(&mut self, tasks: Vec<Task>, collection: &TaskCollection) -> usize {
        if !self.verifier.verify_tasks(&tasks) {
            debug!(
                "event=tasks_add module=controller status=rejected reason=verification batch_size={}",
                tasks.len()
            );
            return 0;
        }

        let added = self.data.add_tasks(tasks, collection);
        self.credit(StatisticKind::CreatedTasks, added);
        added
    }

    /// Replaces `old` with `new` unless another list already uses `new.name`.
    pub fn edit_list(&mut self, old: &TaskCollection, new: TaskCollection) -> bool {
        if new.name != old.name && self.data.has_list(&new.name) {
            debug!("event=list_edit module=controller status=rejected reason=duplicate_name");
            return false;
        }
        self.data.edit_list(old, new)
    }

    pub fn edit_task(&mut self, old: &Task, new: Task) -> bool {
        if !self.verifier.verify_task(&new) {
            debug!("event=task_edit module=controller status=rejected reason=verification");
            return false;
        }
        self.data.edit_task(old, new)
    }

    /// Replaces a whole list after verifying every task it carries.
    pub fn edit_tasks(&mut self, old: &TaskCollection, new: TaskCollection) -> bool {
        if !self.verifier.verify_tasks(&new.tasks) {
            debug!("event=tasks_edit module=controller status=rejected reason=verification");
            return false;
        }
        self.data.edit_list(old, new)
    }

    /// Marks `task` completed and credits one finished task.
    ///
    /// An already completed task is left alone; the result then only tells
    /// whether it is part of the working set.
    pub fn complete_task(&mut self, task: &Task) -> bool {
        if task.completed {
            return self.data.contains_task(task);
        }

        let changed = self.data.edit_task(task, task.with_completed(true));
        if changed {
            self.credit(StatisticKind::FinishedTasks, 1);
        }
        changed
    }

    /// Clears the completed flag. Finished-task counters are not reduced.
    pub fn decomplete_task(&mut self, task: &Task) -> bool {
        if !task.completed {
            return self.data.contains_task(task);
        }
        self.data.edit_task(task, task.with_completed(false))
    }

    pub fn toggle_task_completed(&mut self, task: &Task) -> bool {
        if task.completed {
            self.decomplete_task(task)
        } else {
            self.complete_task(task)
        }
    }

    pub fn move_task(&mut self, task: &Task, collection: &TaskCollection) -> bool {
        self.data.move_task(task, collection)
    }

    pub fn remove_list(&mut self, collection: &TaskCollection) -> bool {
        let removed = self.data.remove_list(collection);
        if removed {
            self.credit(StatisticKind::DeletedLists, 1);
        }
        removed
    }

    pub fn remove_lists(&mut self, collections: &[TaskCollection]) -> usize {
        let removed = self.data.remove_lists(collections);
        self.credit(StatisticKind::DeletedLists, removed);
        removed
    }

    pub fn remove_task(&mut self, task: &Task) -> bool {
        let removed = self.data.remove_task(task);
        if removed {
            self.credit(StatisticKind::DeletedTasks, 1);
        }
        removed
    }

    pub fn remove_tasks(&mut self, tasks: &[Task]) -> usize {
        let removed = self.data.remove_tasks(tasks);
        self.credit(StatisticKind::DeletedTasks, removed);
        removed
    }

    pub fn get_all_lists(&self) -> Vec<TaskCollection> {
        self.data.get_all_lists()
    }

    pub fn get_all_tasks(&self) -> Vec<Task> {
        self.data.get_all_tasks()
    }

    pub fn get_statistics_data(&self) -> Vec<StatisticalData> {
        self.statistics.get_statistics_data()
    }

    /// Loads persisted lists into the working set at startup.
    ///
    /// Skips verification and statistics; returns the number of lists loaded.
    /// A list whose name or tasks are already in the working set is dropped
    /// and counted in a `warn!` event.
    pub fn restore_lists(&mut self, collections: Vec<TaskCollection>) -> usize {
        let requested = collections.len();
        let restored = self.data.add_lists(collections);
        if restored < requested {
            warn!(
                "event=cache_restore module=controller status=partial requested={} restored={} dropped={}",
                requested,
                restored,
                requested - restored
            );
        } else {
            info!(
                "event=cache_restore module=controller status=ok requested={} restored={}",
                requested, restored
            );
        }
        restored
    }

    /// Open tasks whose due date has passed.
    pub fn overdue_tasks(&self) -> Vec<Task> {
        let now_ms = self.clock.now().timestamp_millis();
        self.data
            .get_all_tasks()
            .into_iter()
            .filter(|task| task.is_overdue(now_ms))
            .collect()
    }

    /// Credits today's overdue counter with the current overdue task count.
    pub fn report_overdue_tasks(&mut self) -> usize {
        let overdue = self.overdue_tasks().len();
        self.credit(StatisticKind::OverdueTasks, overdue);
        overdue
    }

    pub fn get_number_of_created_tasks(&self, past_days: i64) -> u64 {
        self.total_for_interval(StatisticKind::CreatedTasks, past_days)
    }

    pub fn get_number_of_finished_tasks(&self, past_days: i64) -> u64 {
        self.total_for_interval(StatisticKind::FinishedTasks, past_days)
    }

    pub fn get_number_of_overdue_tasks(&self, past_days: i64) -> u64 {
        self.total_for_interval(StatisticKind::OverdueTasks, past_days)
    }

    pub fn get_number_of_deleted_tasks(&self, past_days: i64) -> u64 {
        self.total_for_interval(StatisticKind::DeletedTasks, past_days)
    }

    pub fn get_number_of_created_lists(&self, past_days: i64) -> u64 {
        self.total_for_interval(StatisticKind::CreatedLists, past_days)
    }

    pub fn get_number_of_deleted_lists(&self, past_days: i64) -> u64 {
        self.total_for_interval(StatisticKind::DeletedLists, past_days)
    }

    pub fn add_number_of_created_tasks(&mut self, amount: i64) {
        self.report_now(StatisticKind::CreatedTasks, amount);
    }

    pub fn add_number_of_finished_tasks(&mut self, amount: i64) {
        self.report_now(StatisticKind::FinishedTasks, amount);
    }

    pub fn add_number_of_overdue_tasks(&mut self, amount: i64) {
        self.report_now(StatisticKind::OverdueTasks, amount);
    }

    pub fn add_number_of_deleted_tasks(&mut self, amount: i64) {
        self.report_now(StatisticKind::DeletedTasks, amount);
    }

    pub fn add_number_of_created_lists(&mut self, amount: i64) {
        self.report_now(StatisticKind::CreatedLists, amount);
    }

    pub fn add_number_of_deleted_lists(&mut self, amount: i64) {
        self.report_now(StatisticKind::DeletedLists, amount);
    }

    pub fn clear_data(&mut self) {
        self.data.clear_data();
        info!("event=cache_clear module=controller status=ok target=data");
    }

    pub fn clear_statistics_data(&mut self) {
        self.statistics.clear_data();
        info!("event=cache_clear module=controller status=ok target=statistics");
    }

    // Sums local-day buckets from `today - past_days` through today. A
    // negative interval covers all recorded history.
    fn total_for_interval(&self, kind: StatisticKind, past_days: i64) -> u64 {
        let first_day = match u64::try_from(past_days) {
            Ok(days) => {
                let today = self.clock.local_now().date_naive();
                Some(
                    today
                        .checked_sub_days(Days::new(days))
                        .unwrap_or(NaiveDate::MIN),
                )
            }
            Err(_) => None,
        };
        self.statistics.total_since(kind, first_day)
    }

    fn credit(&mut self, kind: StatisticKind, count: usize) {
        self.report_now(kind, i64::try_from(count).unwrap_or(i64::MAX));
    }

    fn report_now(&mut self, kind: StatisticKind, amount: i64) {
        let now = self.clock.local_now();
        self.statistics.report(kind, amount, now);
    }

    fn batch_has_name_collision(&self, collections: &[TaskCollection]) -> bool {
        let mut seen = HashSet::with_capacity(collections.len());
        collections.iter().any(|collection| {
            self.data.has_list(&collection.name) || !seen.insert(collection.name.as_str())
        })
    }
}
