//! In-memory working set of task lists.
//!
//! # Responsibility
//! - Own every list and the tasks nested in it during a session.
//! - Provide add/edit/move/remove/query operations with boolean outcomes.
//!
//! # Invariants
//! - At most one list per name; the name is the list key.
//! - A task (by content) lives in at most one list.
//! - A failed operation leaves the working set unchanged.

use crate::model::collection::TaskCollection;
use crate::model::task::Task;
use std::collections::{BTreeMap, HashMap};

/// Name-keyed list store with a task -> owning list index.
#[derive(Debug, Default, Clone)]
pub struct DataCache {
    lists: BTreeMap<String, Vec<Task>>,
    owners: HashMap<Task, String>,
}

impl DataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new list.
    ///
    /// Fails when a list with the same name exists or when one of the
    /// carried tasks already lives in another list.
    pub fn add_list(&mut self, collection: TaskCollection) -> bool {
        if self.lists.contains_key(&collection.name) {
            return false;
        }
        if collection
            .tasks
            .iter()
            .any(|task| self.owners.contains_key(task))
        {
            return false;
        }
        self.insert_list(collection);
        true
    }

    /// Adds each list independently; returns how many were inserted.
    pub fn add_lists(&mut self, collections: impl IntoIterator<Item = TaskCollection>) -> usize {
        collections
            .into_iter()
            .map(|collection| self.add_list(collection))
            .filter(|added| *added)
            .count()
    }

    /// Appends `task` to the list named like `target`.
    ///
    /// When no such list exists, `target` itself becomes a new list with
    /// `task` appended. Fails when an equal task already exists anywhere.
    pub fn add_task(&mut self, task: Task, target: &TaskCollection) -> bool {
        if self.owners.contains_key(&task) {
            return false;
        }

        match self.lists.get_mut(&target.name) {
            Some(tasks) => {
                self.owners.insert(task.clone(), target.name.clone());
                tasks.push(task);
                true
            }
            None => {
                let mut collection = target.clone();
                collection.push_task(task);
                self.add_list(collection)
            }
        }
    }

    /// Adds each task to `target` independently; returns the success count.
    pub fn add_tasks(
        &mut self,
        tasks: impl IntoIterator<Item = Task>,
        target: &TaskCollection,
    ) -> usize {
        tasks
            .into_iter()
            .map(|task| self.add_task(task, target))
            .filter(|added| *added)
            .count()
    }

    /// Removes `task` from whichever list owns it.
    pub fn remove_task(&mut self, task: &Task) -> bool {
        let Some(owner) = self.owners.remove(task) else {
            return false;
        };
        if let Some(tasks) = self.lists.get_mut(&owner) {
            tasks.retain(|candidate| candidate != task);
        }
        true
    }

    pub fn remove_tasks<'a>(&mut self, tasks: impl IntoIterator<Item = &'a Task>) -> usize {
        tasks
            .into_iter()
            .filter(|task| self.remove_task(task))
            .count()
    }

    /// Replaces `old` with `new` in place, keeping list and position.
    ///
    /// Fails when `old` is absent or when `new` already exists as a
    /// different task. Replacing a task with an identical copy succeeds.
    pub fn edit_task(&mut self, old: &Task, new: Task) -> bool {
        let Some((owner, index)) = self.locate(old) else {
            return false;
        };
        if *old == new {
            return true;
        }
        if self.owners.contains_key(&new) {
            return false;
        }
        let Some(tasks) = self.lists.get_mut(&owner) else {
            return false;
        };

        tasks[index] = new.clone();
        self.owners.remove(old);
        self.owners.insert(new, owner);
        true
    }

    /// Moves `task` to the end of the list named like `target`.
    ///
    /// The list is created from `target` when missing. On failure the task
    /// is restored to its original slot.
    pub fn move_task(&mut self, task: &Task, target: &TaskCollection) -> bool {
        let Some((owner, index)) = self.locate(task) else {
            return false;
        };

        self.remove_task(task);
        if self.add_task(task.clone(), target) {
            return true;
        }

        if let Some(tasks) = self.lists.get_mut(&owner) {
            tasks.insert(index, task.clone());
        }
        self.owners.insert(task.clone(), owner);
        false
    }

    /// Replaces the list named like `old` with `new`.
    ///
    /// Only `old.name` is used to find the list; the tasks `old` carries are
    /// ignored, so a stale copy still addresses the live list.
    ///
    /// Fails without side effects when `old` is absent, when another list
    /// already carries `new.name`, or when `new` holds a task owned by a
    /// different list.
    pub fn edit_list(&mut self, old: &TaskCollection, new: TaskCollection) -> bool {
        if !self.lists.contains_key(&old.name) {
            return false;
        }
        if new.name != old.name && self.lists.contains_key(&new.name) {
            return false;
        }

        let Some(previous) = self.take_list(&old.name) else {
            return false;
        };
        if self.add_list(new) {
            return true;
        }

        self.insert_list(previous);
        false
    }

    /// Removes the list named like `collection` together with its live tasks.
    ///
    /// Only the name is matched; the tasks `collection` carries are ignored.
    pub fn remove_list(&mut self, collection: &TaskCollection) -> bool {
        self.take_list(&collection.name).is_some()
    }

    pub fn remove_lists<'a>(
        &mut self,
        collections: impl IntoIterator<Item = &'a TaskCollection>,
    ) -> usize {
        collections
            .into_iter()
            .filter(|collection| self.remove_list(collection))
            .count()
    }

    /// Returns copies of every list, ordered by name.
    pub fn get_all_lists(&self) -> Vec<TaskCollection> {
        self.lists
            .iter()
            .map(|(name, tasks)| TaskCollection {
                name: name.clone(),
                tasks: tasks.clone(),
            })
            .collect()
    }

    /// Returns copies of every task across all lists.
    pub fn get_all_tasks(&self) -> Vec<Task> {
        self.lists.values().flatten().cloned().collect()
    }

    pub fn get_list(&self, name: &str) -> Option<TaskCollection> {
        self.lists.get(name).map(|tasks| TaskCollection {
            name: name.to_string(),
            tasks: tasks.clone(),
        })
    }

    pub fn has_list(&self, name: &str) -> bool {
        self.lists.contains_key(name)
    }

    pub fn contains_task(&self, task: &Task) -> bool {
        self.owners.contains_key(task)
    }

    /// Name of the list that owns `task`.
    pub fn list_of_task(&self, task: &Task) -> Option<&str> {
        self.owners.get(task).map(String::as_str)
    }

    pub fn list_count(&self) -> usize {
        self.lists.len()
    }

    pub fn task_count(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    pub fn clear_data(&mut self) {
        self.lists.clear();
        self.owners.clear();
    }

    fn locate(&self, task: &Task) -> Option<(String, usize)> {
        let owner = self.owners.get(task)?;
        let index = self
            .lists
            .get(owner)?
            .iter()
            .position(|candidate| candidate == task)?;
        Some((owner.clone(), index))
    }

    // Caller guarantees the name is free. Tasks already owned elsewhere are
    // skipped, which also drops repeated entries inside `collection`.
    fn insert_list(&mut self, collection: TaskCollection) {
        let TaskCollection { name, tasks } = collection;
        let mut stored = Vec::with_capacity(tasks.len());
        for task in tasks {
            if self.owners.contains_key(&task) {
                continue;
            }
            self.owners.insert(task.clone(), name.clone());
            stored.push(task);
        }
        self.lists.insert(name, stored);
    }

    fn take_list(&mut self, name: &str) -> Option<TaskCollection> {
        let (name, tasks) = self.lists.remove_entry(name)?;
        for task in &tasks {
            self.owners.remove(task);
        }
        Some(TaskCollection { name, tasks })
    }
}

#[cfg(test)]
mod tests {
    use super::DataCache;
    use crate::model::collection::TaskCollection;
    use crate::model::task::Task;

    #[test]
    fn owner_index_follows_moves_and_edits() {
        let mut cache = DataCache::new();
        let task = Task::new("t", "");
        let a = TaskCollection::new("A");
        let b = TaskCollection::new("B");
        assert!(cache.add_list(b.clone()));
        assert!(cache.add_task(task.clone(), &a));
        assert_eq!(cache.list_of_task(&task), Some("A"));

        assert!(cache.move_task(&task, &b));
        assert_eq!(cache.list_of_task(&task), Some("B"));

        let edited = task.with_completed(true);
        assert!(cache.edit_task(&task, edited.clone()));
        assert!(!cache.contains_task(&task));
        assert_eq!(cache.list_of_task(&edited), Some("B"));
        assert_eq!(cache.task_count(), 1);
    }

    #[test]
    fn failed_move_restores_original_position() {
        let mut cache = DataCache::new();
        let first = Task::new("first", "");
        let second = Task::new("second", "");
        let third = Task::new("third", "");
        let other = Task::new("other", "");
        assert!(cache.add_list(TaskCollection::with_tasks(
            "A",
            [first.clone(), second.clone(), third.clone()]
        )));
        assert!(cache.add_list(TaskCollection::with_tasks("B", [other.clone()])));

        // A brand-new target that drags along a task owned by "B" cannot be created.
        let target = TaskCollection::with_tasks("C", [other]);
        assert!(!cache.move_task(&second, &target));

        let a = cache.get_list("A").unwrap();
        assert_eq!(a.tasks, vec![first, second, third]);
        assert!(!cache.has_list("C"));
    }

    #[test]
    fn edit_list_restores_previous_list_on_conflict() {
        let mut cache = DataCache::new();
        let owned = Task::new("owned", "");
        let kept = Task::new("kept", "");
        let old = TaskCollection::with_tasks("Old", [kept.clone()]);
        assert!(cache.add_list(old.clone()));
        assert!(cache.add_list(TaskCollection::with_tasks("Other", [owned.clone()])));

        let new = TaskCollection::with_tasks("Renamed", [kept.clone(), owned]);
        assert!(!cache.edit_list(&old, new));
        assert_eq!(cache.get_list("Old"), Some(old));
        assert_eq!(cache.list_of_task(&kept), Some("Old"));
        assert!(!cache.has_list("Renamed"));
    }

    #[test]
    fn add_list_skips_repeated_tasks_inside_collection() {
        let mut cache = DataCache::new();
        let task = Task::new("t", "");
        let collection = TaskCollection {
            name: "L".to_string(),
            tasks: vec![task.clone(), task.clone()],
        };
        assert!(cache.add_list(collection));
        assert_eq!(cache.get_list("L").unwrap().tasks, vec![task]);
    }
}
