//! Task CRUD operations and queries.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension};

use super::{id_column, id_param, optional_date_column, timestamp_column};
use crate::{
    error::{DatabaseResultExt, Result},
    models::{NewTask, Task, TaskFilter, TaskId, UserId, Visibility},
};

const TASK_COLUMNS: &str =
    "id, user_id, task_name, due_date, is_done, is_private, assigned_by, created_at, updated_at";
const INSERT_TASK_SQL: &str = "INSERT INTO tasks (user_id, task_name, due_date, is_done, is_private, assigned_by, created_at, updated_at) VALUES (?1, ?2, ?3, 0, ?4, ?5, ?6, ?6)";
const SELECT_TASK_SQL: &str = "SELECT id, user_id, task_name, due_date, is_done, is_private, assigned_by, created_at, updated_at FROM tasks WHERE id = ?1";
const UPDATE_TASK_SQL: &str = "UPDATE tasks SET task_name = ?1, due_date = ?2, is_done = ?3, is_private = ?4, updated_at = ?5 WHERE id = ?6";
const DELETE_TASK_SQL: &str = "DELETE FROM tasks WHERE id = ?1";

/// Due date ascending, undated last, then creation order.
const LISTING_ORDER: &str = "ORDER BY due_date IS NULL, due_date, id";

impl super::Database {
    fn build_task_from_row(row: &rusqlite::Row) -> rusqlite::Result<Task> {
        Ok(Task {
            id: TaskId(id_column(row, 0)?),
            user_id: UserId(id_column(row, 1)?),
            task_name: row.get(2)?,
            due_date: optional_date_column(row, 3)?,
            is_done: row.get(4)?,
            is_private: row.get(5)?,
            assigned_by: row
                .get::<_, Option<i64>>(6)?
                .map(|id| UserId(id as u64)),
            created_at: timestamp_column(row, 7)?,
            updated_at: timestamp_column(row, 8)?,
        })
    }

    pub fn insert_task(&mut self, owner: UserId, creator: UserId, task: &NewTask) -> Result<Task> {
        let now = Timestamp::now();
        self.connection
            .execute(
                INSERT_TASK_SQL,
                params![
                    id_param(owner.0),
                    task.task_name(),
                    task.due_date().map(|d| d.to_string()),
                    task.is_private(),
                    id_param(creator.0),
                    now.to_string()
                ],
            )
            .db_context("Failed to insert task")?;
        let id = TaskId(self.connection.last_insert_rowid() as u64);

        Ok(Task {
            id,
            user_id: owner,
            task_name: task.task_name().to_string(),
            due_date: task.due_date(),
            is_done: false,
            is_private: task.is_private(),
            assigned_by: Some(creator),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn get_task(&self, id: TaskId) -> Result<Option<Task>> {
        self.connection
            .query_row(SELECT_TASK_SQL, params![id_param(id.0)], Self::build_task_from_row)
            .optional()
            .db_context("Failed to query task")
    }

    /// Lists the tasks of one owner through `filter`.
    pub fn list_tasks(&self, owner: UserId, filter: &TaskFilter) -> Result<Vec<Task>> {
        let mut query = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = ?");
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(id_param(owner.0))];

        if filter.visibility == Visibility::PublicOnly {
            query.push_str(" AND is_private = 0");
        }
        if let Some(done) = filter.done {
            query.push_str(" AND is_done = ?");
            params_vec.push(Box::new(done));
        }
        query.push(' ');
        query.push_str(LISTING_ORDER);

        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare query")?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|b| &**b).collect();

        let tasks = stmt
            .query_map(&params_refs[..], Self::build_task_from_row)
            .db_context("Failed to query tasks")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch tasks")?;
        Ok(tasks)
    }

    /// Writes the owner-editable fields back and bumps `updated_at`.
    pub fn save_task(&mut self, task: &Task) -> Result<Option<Task>> {
        let now = Timestamp::now();
        let updated = self
            .connection
            .execute(
                UPDATE_TASK_SQL,
                params![
                    task.task_name,
                    task.due_date.map(|d| d.to_string()),
                    task.is_done,
                    task.is_private,
                    now.to_string(),
                    id_param(task.id.0)
                ],
            )
            .db_context("Failed to update task")?;

        if updated == 0 {
            return Ok(None);
        }
        Ok(Some(Task {
            updated_at: now,
            ..task.clone()
        }))
    }

    pub fn delete_task(&mut self, id: TaskId) -> Result<bool> {
        let removed = self
            .connection
            .execute(DELETE_TASK_SQL, params![id_param(id.0)])
            .db_context("Failed to delete task")?;
        Ok(removed > 0)
    }
}
