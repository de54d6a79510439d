use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use tracing::{debug, info};

use crate::domain::{
    error::TaskError,
    repository::TaskRepository,
    task::{NewTask, Task, TaskId, TaskStatus},
};

const SELECT_TASK: &str = "SELECT id, title, description, due_date, completed, status FROM tasks";

#[derive(Clone)]
pub struct SqliteTaskRepository {
    pool: Pool<Sqlite>,
}

impl SqliteTaskRepository {
    /// Opens (creating when missing) the database at `database_url`.
    ///
    /// A single pooled connection is kept for the life of the repository so
    /// `sqlite::memory:` databases stay visible across calls.
    pub async fn connect(database_url: &str) -> Result<Self, TaskError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        debug!(%database_url, "connected task store");
        Ok(Self { pool })
    }

    /// Adds the `status` column to tables created before it existed and
    /// backfills it from the legacy `completed` flag.
    async fn migrate_status_column(&self) -> Result<(), TaskError> {
        let columns = sqlx::query("PRAGMA table_info(tasks)").fetch_all(&self.pool).await?;
        let has_status = columns
            .iter()
            .any(|row| row.try_get::<String, _>("name").map(|name| name == "status").unwrap_or(false));
        if has_status {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        sqlx::query("ALTER TABLE tasks ADD COLUMN status TEXT NOT NULL DEFAULT 'pending'")
            .execute(&mut *tx)
            .await?;
        let backfilled = sqlx::query(
            "UPDATE tasks SET status = CASE WHEN completed = 1 THEN 'completed' ELSE 'pending' END",
        )
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        info!(rows = backfilled.rows_affected(), "migrated tasks table to status column");
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn init(&self) -> Result<(), TaskError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT,
                description TEXT,
                due_date TEXT,
                completed INTEGER DEFAULT 0,
                status TEXT NOT NULL DEFAULT 'pending'
            )",
        )
        .execute(&self.pool)
        .await?;
        self.migrate_status_column().await
    }

    async fn add(&self, input: NewTask) -> Result<TaskId, TaskError> {
        let status = TaskStatus::Pending;
        let result = sqlx::query(
            "INSERT INTO tasks (title, description, due_date, completed, status)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(input.title())
        .bind(input.description())
        .bind(input.due_date_text())
        .bind(status.completed_flag())
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;
        let id = TaskId(result.last_insert_rowid());
        debug!(%id, "task added");
        Ok(id)
    }

    async fn get(&self, id: TaskId) -> Result<Option<Task>, TaskError> {
        let row = sqlx::query(&format!("{SELECT_TASK} WHERE id = ?1"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;
        row.map(row_to_task).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Task>, TaskError> {
        let rows = sqlx::query(&format!("{SELECT_TASK} ORDER BY id ASC"))
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(row_to_task).collect()
    }

    async fn set_status(&self, id: TaskId, status: TaskStatus) -> Result<(), TaskError> {
        let result = sqlx::query("UPDATE tasks SET status = ?2, completed = ?3 WHERE id = ?1")
            .bind(id.0)
            .bind(status.as_str())
            .bind(status.completed_flag())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(TaskError::NotFound(id));
        }
        debug!(%id, %status, "task status updated");
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> Result<bool, TaskError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?1")
            .bind(id.0)
            .execute(&self.pool)
            .await?;
        let deleted = result.rows_affected() > 0;
        debug!(%id, deleted, "task delete");
        Ok(deleted)
    }

    async fn close(&self) {
        self.pool.close().await;
        debug!("task store closed");
    }
}

fn row_to_task(row: SqliteRow) -> Result<Task, TaskError> {
    let id: i64 = row.try_get("id")?;
    let title: Option<String> = row.try_get("title")?;
    let description: Option<String> = row.try_get("description")?;
    let due_date: Option<String> = row.try_get("due_date")?;
    let status: Option<String> = row.try_get("status")?;
    let completed: Option<i64> = row.try_get("completed")?;

    // Prefer the status column; the flag only matters for rows without one.
    let status = match status.as_deref() {
        Some(raw) if !raw.trim().is_empty() => TaskStatus::normalize(Some(raw)),
        _ => TaskStatus::normalize(completed.map(|flag| flag.to_string()).as_deref()),
    };

    Ok(Task {
        id: TaskId(id),
        title: title.unwrap_or_default(),
        description: description.unwrap_or_default(),
        due_date: due_date.unwrap_or_default(),
        status,
    })
}
