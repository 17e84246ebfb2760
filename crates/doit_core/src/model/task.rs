//! Task domain model.
//!
//! # Responsibility
//! - Define the task record and its priority ordinal.
//! - Provide copy-with helpers used by completion flows.
//!
//! # Invariants
//! - `Priority` values constructed through `Priority::new` stay in `0..=9`.
//! - Dates are Unix epoch milliseconds; `None` means "not set".

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Small ordinal task priority, `0` (lowest) to `9` (highest).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Priority(u8);

impl Priority {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 9;

    /// Creates a priority, rejecting values above `Priority::MAX`.
    pub fn new(value: u8) -> Result<Self, PriorityOutOfRange> {
        if value > Self::MAX {
            return Err(PriorityOutOfRange(i64::from(value)));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Returns whether the wrapped value is inside the supported range.
    ///
    /// Always true for values built by `new`; deserialized values are not
    /// range checked and must go through the verifier.
    pub fn is_valid(self) -> bool {
        self.0 <= Self::MAX
    }
}

impl TryFrom<i64> for Priority {
    type Error = PriorityOutOfRange;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| PriorityOutOfRange(value))
            .and_then(Priority::new)
    }
}

/// Priority value outside `Priority::MIN..=Priority::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityOutOfRange(pub i64);

impl Display for PriorityOutOfRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "priority {} is outside {}..={}",
            self.0,
            Priority::MIN,
            Priority::MAX
        )
    }
}

impl Error for PriorityOutOfRange {}

/// One actionable item inside a task list.
///
/// Equality and hashing cover every field, so two tasks with the same content
/// are the same task as far as the working set is concerned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    pub description: String,
    pub priority: Priority,
    /// Unix epoch milliseconds.
    pub due_date: Option<i64>,
    /// Unix epoch milliseconds.
    pub reminder_date: Option<i64>,
    /// User-defined ordering inside the owning list.
    pub custom_position: i32,
    pub completed: bool,
}

impl Task {
    /// Creates an open task with default priority and no dates.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn due_date(mut self, epoch_ms: i64) -> Self {
        self.due_date = Some(epoch_ms);
        self
    }

    pub fn reminder_date(mut self, epoch_ms: i64) -> Self {
        self.reminder_date = Some(epoch_ms);
        self
    }

    pub fn custom_position(mut self, position: i32) -> Self {
        self.custom_position = position;
        self
    }

    /// Returns a copy of this task with `completed` set to `completed`.
    pub fn with_completed(&self, completed: bool) -> Self {
        Self {
            completed,
            ..self.clone()
        }
    }

    /// Open task whose due date lies strictly before `now_ms`.
    pub fn is_overdue(&self, now_ms: i64) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < now_ms)
    }
}
