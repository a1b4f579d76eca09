//! Repository port for board persistence.
//!
//! Defines the abstract interface for storing columns, tasks, and activity
//! records, allowing different persistence implementations (`PostgreSQL`,
//! in-memory for testing).
//!
//! # Implementation Notes
//!
//! Implementations must ensure:
//! - Each mutating operation that carries activity records applies the row
//!   write and every record append atomically: all land or none do.
//! - [`BoardRepository::ensure_columns`] backfills the whole template
//!   atomically, so a half-created board is never observable.
//! - Activity rows are immutable once written; the only permitted touch is
//!   nulling the task reference during [`BoardRepository::delete_task`].

use crate::board::domain::{ActivityRecord, BoardTask, Column, ProjectId, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for board repository operations.
pub type BoardRepositoryResult<T> = Result<T, BoardRepositoryError>;

/// Board persistence contract.
#[async_trait]
pub trait BoardRepository: Send + Sync {
    /// Idempotently backfills the project's columns from the fixed
    /// template, returning the full column set in presentation order.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::Persistence`] when the backfill or
    /// read fails.
    async fn ensure_columns(&self, project: ProjectId) -> BoardRepositoryResult<Vec<Column>>;

    /// Returns the project's tasks sorted by `(order, created_at)`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::Persistence`] when the query fails.
    async fn list_tasks(&self, project: ProjectId) -> BoardRepositoryResult<Vec<BoardTask>>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::Persistence`] when the query fails.
    async fn find_task(&self, id: TaskId) -> BoardRepositoryResult<Option<BoardTask>>;

    /// Stores a new task together with its creation record, atomically.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::DuplicateTask`] when the task ID
    /// already exists.
    async fn insert_task(
        &self,
        task: &BoardTask,
        activity: &ActivityRecord,
    ) -> BoardRepositoryResult<()>;

    /// Persists changes to an existing task together with the activity
    /// records describing them, atomically.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn update_task(
        &self,
        task: &BoardTask,
        activities: &[ActivityRecord],
    ) -> BoardRepositoryResult<()>;

    /// Removes a task, atomically appending its deletion record and nulling
    /// the task reference on every history row that pointed at it.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn delete_task(
        &self,
        id: TaskId,
        activity: &ActivityRecord,
    ) -> BoardRepositoryResult<()>;

    /// Returns up to `limit` records for the task, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::Persistence`] when the query fails.
    async fn task_history(
        &self,
        task: TaskId,
        limit: usize,
    ) -> BoardRepositoryResult<Vec<ActivityRecord>>;

    /// Returns up to `limit` records for the project, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::Persistence`] when the query fails.
    async fn project_activity(
        &self,
        project: ProjectId,
        limit: usize,
    ) -> BoardRepositoryResult<Vec<ActivityRecord>>;
}

/// Errors returned by board repository implementations.
#[derive(Debug, Clone, Error)]
pub enum BoardRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl BoardRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
