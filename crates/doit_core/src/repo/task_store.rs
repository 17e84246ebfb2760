//! Persistent list/task store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide row-identifier CRUD over the `lists` and `tasks` tables.
//! - Rebuild the in-memory working set from persisted rows.
//!
//! # Invariants
//! - List names are unique (`idx_lists_name`), matching the name-keyed
//!   working set.
//! - An update/delete by row ID touches zero or one row. More than one row is
//!   reported as `RepoError::IntegrityViolation`, which callers must treat as
//!   fatal.
//! - Read paths reject rows that cannot form valid model values instead of
//!   masking them.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::collection::TaskCollection;
use crate::model::task::{Priority, Task};
use log::error;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Auto-increment row ID of the `lists` table.
pub type ListRowId = i64;
/// Auto-increment row ID of the `tasks` table.
pub type TaskRowId = i64;

const TASK_SELECT_SQL: &str = "SELECT
    id,
    name,
    description,
    priority,
    due_date,
    reminder_date,
    completed,
    custom_position
FROM tasks";

const REQUIRED_TABLES: [&str; 2] = ["lists", "tasks"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for persistent store operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Persisted row cannot be mapped back to a model value.
    InvalidData(String),
    /// A by-ID write affected more than one row; row IDs are no longer unique.
    IntegrityViolation {
        table: &'static str,
        affected: usize,
    },
    /// Connection schema is not at the version this binary expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::IntegrityViolation { table, affected } => write!(
                f,
                "integrity violation: {affected} rows in `{table}` matched one row id"
            ),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Row-identifier based persistence for lists and tasks.
pub trait TaskStore {
    /// Inserts a list row. A name already in use fails with `RepoError::Db`.
    fn add_list(&self, list: &TaskCollection) -> RepoResult<ListRowId>;
    /// Returns assigned IDs in input order.
    fn add_lists(&self, lists: &[TaskCollection]) -> RepoResult<Vec<ListRowId>>;
    fn add_task(&self, task: &Task, list_id: ListRowId) -> RepoResult<TaskRowId>;
    /// Returns assigned IDs in input order.
    fn add_tasks(&self, tasks: &[Task], list_id: ListRowId) -> RepoResult<Vec<TaskRowId>>;
    /// Renames a list. Contained tasks are not touched; renaming onto a name
    /// in use fails with `RepoError::Db`.
    fn edit_list(&self, list_id: ListRowId, list: &TaskCollection) -> RepoResult<bool>;
    fn edit_task(&self, task_id: TaskRowId, task: &Task) -> RepoResult<bool>;
    fn move_task(&self, task_id: TaskRowId, list_id: ListRowId) -> RepoResult<bool>;
    /// Deletes a list; its tasks go with it.
    fn remove_list(&self, list_id: ListRowId) -> RepoResult<bool>;
    fn remove_lists(&self, list_ids: &[ListRowId]) -> RepoResult<Vec<bool>>;
    fn remove_task(&self, task_id: TaskRowId) -> RepoResult<bool>;
    fn remove_tasks(&self, task_ids: &[TaskRowId]) -> RepoResult<Vec<bool>>;
    /// Lists with names only; tasks are loaded separately.
    fn all_lists(&self) -> RepoResult<Vec<(ListRowId, TaskCollection)>>;
    fn all_tasks(&self) -> RepoResult<Vec<(TaskRowId, Task)>>;
    /// Tasks of one list ordered by custom position, then row ID.
    fn tasks_for_list(&self, list_id: ListRowId) -> RepoResult<Vec<(TaskRowId, Task)>>;
    fn task_ids(&self, list_id: ListRowId) -> RepoResult<Vec<TaskRowId>>;
    /// Empties both tables with two independent statements.
    fn clear_data(&self) -> RepoResult<()>;
}

/// SQLite-backed task store.
pub struct SqliteTaskStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskStore<'conn> {
    /// Wraps a connection opened through `db::open_db*`.
    ///
    /// Rejects connections whose schema is not migrated to the latest version
    /// or that lack the store tables.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version: u32 =
            conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        for table in REQUIRED_TABLES {
            let exists: i64 = conn.query_row(
                "SELECT EXISTS(
                    SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
                );",
                [table],
                |row| row.get(0),
            )?;
            if exists == 0 {
                return Err(RepoError::MissingRequiredTable(table));
            }
        }

        Ok(Self { conn })
    }
}

impl TaskStore for SqliteTaskStore<'_> {
    fn add_list(&self, list: &TaskCollection) -> RepoResult<ListRowId> {
        self.conn.execute(
            "INSERT INTO lists (name) VALUES (?1);",
            [list.name.as_str()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn add_lists(&self, lists: &[TaskCollection]) -> RepoResult<Vec<ListRowId>> {
        lists.iter().map(|list| self.add_list(list)).collect()
    }

    fn add_task(&self, task: &Task, list_id: ListRowId) -> RepoResult<TaskRowId> {
        self.conn.execute(
            "INSERT INTO tasks (
                name,
                description,
                priority,
                due_date,
                reminder_date,
                completed,
                custom_position,
                list_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                task.name.as_str(),
                task.description.as_str(),
                i64::from(task.priority.value()),
                task.due_date,
                task.reminder_date,
                bool_to_int(task.completed),
                task.custom_position,
                list_id,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn add_tasks(&self, tasks: &[Task], list_id: ListRowId) -> RepoResult<Vec<TaskRowId>> {
        tasks
            .iter()
            .map(|task| self.add_task(task, list_id))
            .collect()
    }

    fn edit_list(&self, list_id: ListRowId, list: &TaskCollection) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE lists SET name = ?1 WHERE id = ?2;",
            params![list.name.as_str(), list_id],
        )?;
        single_row_outcome("lists", changed)
    }

    fn edit_task(&self, task_id: TaskRowId, task: &Task) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                name = ?1,
                description = ?2,
                priority = ?3,
                due_date = ?4,
                reminder_date = ?5,
                completed = ?6,
                custom_position = ?7
             WHERE id = ?8;",
            params![
                task.name.as_str(),
                task.description.as_str(),
                i64::from(task.priority.value()),
                task.due_date,
                task.reminder_date,
                bool_to_int(task.completed),
                task.custom_position,
                task_id,
            ],
        )?;
        single_row_outcome("tasks", changed)
    }

    fn move_task(&self, task_id: TaskRowId, list_id: ListRowId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE tasks SET list_id = ?1 WHERE id = ?2;",
            params![list_id, task_id],
        )?;
        single_row_outcome("tasks", changed)
    }

    fn remove_list(&self, list_id: ListRowId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM lists WHERE id = ?1;", [list_id])?;
        single_row_outcome("lists", changed)
    }

    fn remove_lists(&self, list_ids: &[ListRowId]) -> RepoResult<Vec<bool>> {
        list_ids.iter().map(|id| self.remove_list(*id)).collect()
    }

    fn remove_task(&self, task_id: TaskRowId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1;", [task_id])?;
        single_row_outcome("tasks", changed)
    }

    fn remove_tasks(&self, task_ids: &[TaskRowId]) -> RepoResult<Vec<bool>> {
        task_ids.iter().map(|id| self.remove_task(*id)).collect()
    }

    fn all_lists(&self) -> RepoResult<Vec<(ListRowId, TaskCollection)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM lists ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut lists = Vec::new();

        while let Some(row) = rows.next()? {
            let id: ListRowId = row.get("id")?;
            let name: String = row.get("name")?;
            lists.push((id, TaskCollection::new(name)));
        }

        Ok(lists)
    }

    fn all_tasks(&self) -> RepoResult<Vec<(TaskRowId, Task)>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn tasks_for_list(&self, list_id: ListRowId) -> RepoResult<Vec<(TaskRowId, Task)>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE list_id = ?1
             ORDER BY custom_position ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([list_id])?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn task_ids(&self, list_id: ListRowId) -> RepoResult<Vec<TaskRowId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM tasks WHERE list_id = ?1 ORDER BY id ASC;")?;
        let ids = stmt
            .query_map([list_id], |row| row.get::<_, TaskRowId>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    fn clear_data(&self) -> RepoResult<()> {
        self.conn.execute("DELETE FROM tasks;", [])?;
        self.conn.execute("DELETE FROM lists;", [])?;
        Ok(())
    }
}

/// Reads every persisted list together with its tasks.
///
/// Feed the result to `LogicController::restore_lists` at startup.
pub fn load_working_set<S: TaskStore + ?Sized>(store: &S) -> RepoResult<Vec<TaskCollection>> {
    let lists = store.all_lists()?;
    let mut working_set = Vec::with_capacity(lists.len());

    for (list_id, list) in lists {
        let tasks = store
            .tasks_for_list(list_id)?
            .into_iter()
            .map(|(_, task)| task);
        working_set.push(TaskCollection::with_tasks(list.name, tasks));
    }

    Ok(working_set)
}

fn single_row_outcome(table: &'static str, affected: usize) -> RepoResult<bool> {
    match affected {
        0 => Ok(false),
        1 => Ok(true),
        affected => {
            error!(
                "event=store_write module=repo status=error error_code=integrity_violation table={table} affected={affected}"
            );
            Err(RepoError::IntegrityViolation { table, affected })
        }
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<(TaskRowId, Task)> {
    let id: TaskRowId = row.get("id")?;

    let priority_value: i64 = row.get("priority")?;
    let priority = Priority::try_from(priority_value).map_err(|err| {
        RepoError::InvalidData(format!("{err} in tasks.priority (row {id})"))
    })?;

    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid completed value `{other}` in tasks.completed (row {id})"
            )));
        }
    };

    let task = Task {
        name: row.get("name")?,
        description: row.get("description")?,
        priority,
        due_date: row.get("due_date")?,
        reminder_date: row.get("reminder_date")?,
        custom_position: row.get("custom_position")?,
        completed,
    };
    Ok((id, task))
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
