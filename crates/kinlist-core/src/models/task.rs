//! Task records and the inputs that create, change and query them.

use std::cmp::Ordering;

use jiff::{civil::Date, Timestamp};
use serde::{Deserialize, Serialize};

use super::{TaskId, UserId};
use crate::error::{Result, SocialError};

/// A to-do item owned by `user_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,

    /// Owner and visibility scope
    pub user_id: UserId,

    pub task_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Date>,

    pub is_done: bool,

    /// Private tasks never appear in a read made by anyone but the owner
    pub is_private: bool,

    /// Creator of the task; differs from `user_id` for delegated tasks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_by: Option<UserId>,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Task {
    /// Whether someone other than the owner created this task.
    pub fn is_delegated(&self) -> bool {
        self.assigned_by.is_some_and(|creator| creator != self.user_id)
    }

    /// Listing order: due date ascending with undated tasks last, then
    /// creation order.
    pub fn listing_order(a: &Task, b: &Task) -> Ordering {
        match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
        .then(a.id.cmp(&b.id))
    }
}

fn validate_task_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(SocialError::invalid_argument("task_name").with_reason("must not be empty"));
    }
    Ok(name.to_string())
}

/// Validated fields for a task that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    task_name: String,
    due_date: Option<Date>,
    is_private: bool,
}

impl NewTask {
    pub fn new(task_name: &str) -> Result<Self> {
        Ok(Self {
            task_name: validate_task_name(task_name)?,
            due_date: None,
            is_private: false,
        })
    }

    pub fn due(mut self, date: Date) -> Self {
        self.due_date = Some(date);
        self
    }

    pub fn private(mut self, is_private: bool) -> Self {
        self.is_private = is_private;
        self
    }

    pub fn task_name(&self) -> &str {
        &self.task_name
    }

    pub fn due_date(&self) -> Option<Date> {
        self.due_date
    }

    pub fn is_private(&self) -> bool {
        self.is_private
    }
}

/// Owner-side changes to an existing task. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub task_name: Option<String>,

    /// `Some(None)` clears the due date
    pub due_date: Option<Option<Date>>,

    pub is_done: Option<bool>,
    pub is_private: Option<bool>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.task_name.is_none()
            && self.due_date.is_none()
            && self.is_done.is_none()
            && self.is_private.is_none()
    }

    /// Applies the update to `task`, validating the new name.
    pub fn apply_to(&self, task: &mut Task) -> Result<()> {
        if let Some(name) = &self.task_name {
            task.task_name = validate_task_name(name)?;
        }
        if let Some(due) = self.due_date {
            task.due_date = due;
        }
        if let Some(done) = self.is_done {
            task.is_done = done;
        }
        if let Some(private) = self.is_private {
            task.is_private = private;
        }
        Ok(())
    }
}

/// Which of an owner's tasks a read may return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    /// Everything; only the owner reads with this
    #[default]
    All,

    /// Tasks with `is_private == false`
    PublicOnly,
}

/// Filter for listing one owner's tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub visibility: Visibility,

    /// Restrict to done (`Some(true)`) or open (`Some(false)`) tasks
    pub done: Option<bool>,
}

impl TaskFilter {
    /// The filter every non-owner read goes through.
    pub fn public() -> Self {
        Self {
            visibility: Visibility::PublicOnly,
            done: None,
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        let visible = match self.visibility {
            Visibility::All => true,
            Visibility::PublicOnly => !task.is_private,
        };
        visible && self.done.is_none_or(|done| task.is_done == done)
    }
}
