use crate::domain::{NewTask, Task};
use sqlx::{Executor, Sqlite, SqlitePool};

pub struct TaskRepository<'a> {
    pub pool: &'a SqlitePool,
}

impl<'a> TaskRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Persists a new task and returns it with the id assigned by the database.
    ///
    /// # Arguments
    ///
    /// * `task` - The task to insert.
    ///
    /// # Returns
    /// * `sqlx::Result<Task>` - The stored task, including its id.
    pub async fn insert(&self, task: &NewTask) -> sqlx::Result<Task> {
        sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, completed, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, title, description, completed, created_at, updated_at
            "#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.completed)
        .bind(task.created_at)
        .bind(task.updated_at)
        .fetch_one(self.pool)
        .await
    }

    /// Writes the mutable columns of an existing task. `created_at` is never touched.
    ///
    /// # Returns
    /// * `sqlx::Result<u64>` - Number of rows affected (0 if the task no longer exists).
    pub async fn update(&self, task: &Task) -> sqlx::Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET title = ?, description = ?, completed = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.completed)
        .bind(task.updated_at)
        .bind(task.id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Retrieves a task by its ID.
    ///
    /// # Returns
    /// * `sqlx::Result<Option<Task>>` - The task if found, or None.
    pub async fn find_by_id(&self, id: i64) -> sqlx::Result<Option<Task>> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, completed, created_at, updated_at
            FROM tasks
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
    }

    pub async fn find_all(&self) -> sqlx::Result<Vec<Task>> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, completed, created_at, updated_at
            FROM tasks
            ORDER BY id ASC
            "#,
        )
        .fetch_all(self.pool)
        .await
    }

    pub async fn exists_by_id(&self, id: i64) -> sqlx::Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM tasks WHERE id = ?)")
            .bind(id)
            .fetch_one(self.pool)
            .await
    }

    pub async fn delete_by_id(&self, id: i64) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn find_by_completed(&self, completed: bool) -> sqlx::Result<Vec<Task>> {
        Self::find_by_completed_with_executor(self.pool, completed).await
    }

    /// Lists the tasks whose completion flag equals `completed`.
    ///
    /// # Arguments
    ///
    /// * `executor` - A pool, connection or transaction to run the query on.
    /// * `completed` - The flag to match.
    pub async fn find_by_completed_with_executor<'c, E>(
        executor: E,
        completed: bool,
    ) -> sqlx::Result<Vec<Task>>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, completed, created_at, updated_at
            FROM tasks
            WHERE completed = ?
            ORDER BY id ASC
            "#,
        )
        .bind(completed)
        .fetch_all(executor)
        .await
    }

    /// Case-insensitive substring match on the title. Case folding follows
    /// SQLite's `lower()`, which only folds ASCII letters.
    pub async fn find_by_title_containing_ignore_case(
        &self,
        fragment: &str,
    ) -> sqlx::Result<Vec<Task>> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, completed, created_at, updated_at
            FROM tasks
            WHERE instr(lower(title), lower(?)) > 0
            ORDER BY id ASC
            "#,
        )
        .bind(fragment)
        .fetch_all(self.pool)
        .await
    }

    /// Deletes every task whose completion flag equals `completed` in one statement.
    ///
    /// # Returns
    /// * `sqlx::Result<u64>` - Number of rows deleted (0 when nothing matched).
    pub async fn delete_by_completed_with_executor<'c, E>(
        executor: E,
        completed: bool,
    ) -> sqlx::Result<u64>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM tasks WHERE completed = ?")
            .bind(completed)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
