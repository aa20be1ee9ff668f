use crate::api::dto::{TaskRequest, TaskResponse};
use crate::db::queries::TaskRepository;
use crate::domain::{NewTask, Task};
use crate::errors::AppError;
use chrono::Utc;
use sqlx::SqlitePool;


#[derive(Clone)]
pub struct TaskService {
    db_pool: SqlitePool,
}

impl TaskService {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }

    fn repo(&self) -> TaskRepository<'_> {
        TaskRepository::new(&self.db_pool)
    }

    pub async fn create_task(&self, req: TaskRequest) -> Result<TaskResponse, AppError> {
        let task = NewTask::new(req.title.trim(), req.description, Utc::now());

        let stored = self.repo().insert(&task).await?;

        Ok(stored.into())
    }

    pub async fn get_all_tasks(&self) -> Result<Vec<TaskResponse>, AppError> {
        let tasks = self.repo().find_all().await?;
        Ok(tasks.into_iter().map(TaskResponse::from).collect())
    }

    pub async fn get_task_by_id(&self, id: i64) -> Result<TaskResponse, AppError> {
        Ok(self.find_existing(id).await?.into())
    }

    pub async fn get_tasks_by_status(&self, completed: bool) -> Result<Vec<TaskResponse>, AppError> {
        let tasks = self.repo().find_by_completed(completed).await?;
        Ok(tasks.into_iter().map(TaskResponse::from).collect())
    }

    pub async fn search_tasks_by_title(&self, fragment: &str) -> Result<Vec<TaskResponse>, AppError> {
        let tasks = self
            .repo()
            .find_by_title_containing_ignore_case(fragment)
            .await?;
        Ok(tasks.into_iter().map(TaskResponse::from).collect())
    }

    /// Replaces title and description. The completion flag is preserved.
    pub async fn update_task(&self, id: i64, req: TaskRequest) -> Result<TaskResponse, AppError> {
        let mut task = self.find_existing(id).await?;
        task.apply_update(req.title.trim(), req.description, Utc::now());

        self.save(task).await
    }

    pub async fn mark_as_completed(&self, id: i64) -> Result<TaskResponse, AppError> {
        self.set_completed(id, true).await
    }

    pub async fn mark_as_pending(&self, id: i64) -> Result<TaskResponse, AppError> {
        self.set_completed(id, false).await
    }

    pub async fn delete_task(&self, id: i64) -> Result<(), AppError> {
        let repo = self.repo();

        if !repo.exists_by_id(id).await? {
            return Err(AppError::NotFound);
        }

        // Lost a race with another delete.
        if repo.delete_by_id(id).await? == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    /// Removes every completed task in one transaction. Returns how many were removed.
    pub async fn delete_completed_tasks(&self) -> Result<u64, AppError> {
        let mut tx = self.db_pool.begin().await?;

        let deleted = TaskRepository::delete_by_completed_with_executor(&mut *tx, true).await?;

        tx.commit().await?;

        Ok(deleted)
    }

    async fn set_completed(&self, id: i64, completed: bool) -> Result<TaskResponse, AppError> {
        let mut task = self.find_existing(id).await?;
        task.set_completed(completed, Utc::now());

        self.save(task).await
    }

    async fn find_existing(&self, id: i64) -> Result<Task, AppError> {
        self.repo().find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    async fn save(&self, task: Task) -> Result<TaskResponse, AppError> {
        // The row may have been deleted between the read and this write.
        if self.repo().update(&task).await? == 0 {
            return Err(AppError::NotFound);
        }

        Ok(task.into())
    }
}
