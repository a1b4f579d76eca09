//! Board orchestration service: the full operation surface consumed by
//! transport layers.
//!
//! Every operation authorizes through the shared access predicates, lazily
//! backfills the project's columns before touching tasks, and pairs each
//! mutation with its activity records inside one repository transaction.

use crate::board::{
    domain::{
        ActivityAction, ActivityRecord, Actor, Assignee, AssigneeOption, BoardDomainError,
        BoardTask, ChangeSet, Column, ColumnCode, ProjectRef, TaskId, assignable_options,
        can_access_board, can_delete_tasks,
    },
    ports::{BoardRepository, BoardRepositoryError},
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Maximum records returned for a single task's history.
const TASK_HISTORY_LIMIT: usize = 200;
/// Maximum records returned for a project's activity feed.
const PROJECT_ACTIVITY_LIMIT: usize = 300;

/// Service-level errors for board operations.
#[derive(Debug, Error)]
pub enum BoardError {
    /// The referenced task does not exist in this project.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The actor may not touch this project's board.
    #[error("access to this project's board is denied")]
    Forbidden,

    /// Domain validation failed.
    #[error(transparent)]
    Validation(#[from] BoardDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] BoardRepositoryError),
}

/// Result type for board service operations.
pub type BoardResult<T> = Result<T, BoardError>;

/// One project's board: columns in presentation order and tasks sorted by
/// `(order, created_at)`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct BoardState {
    /// The five pipeline columns.
    pub columns: Vec<Column>,
    /// All tasks on the board.
    pub tasks: Vec<BoardTask>,
}

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: String,
    status: String,
    order: i32,
    deadline: Option<NaiveDate>,
    assignee: Option<String>,
}

impl CreateTaskRequest {
    /// Creates a request with the required title and column code.
    #[must_use]
    pub fn new(title: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            status: status.into(),
            order: 0,
            deadline: None,
            assignee: None,
        }
    }

    /// Sets the free-text description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the position value within the column.
    #[must_use]
    pub const fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Sets the deadline date.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets the assignee token.
    #[must_use]
    pub fn with_assignee(mut self, token: impl Into<String>) -> Self {
        self.assignee = Some(token.into());
        self
    }
}

/// Partial update for a task; absent fields are left untouched.
///
/// The deadline is doubly optional so a patch can distinguish "leave it" from
/// "clear it".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    title: Option<String>,
    description: Option<String>,
    status: Option<String>,
    deadline: Option<Option<NaiveDate>>,
    assignee: Option<String>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Moves the task to the column with this code.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets or clears the deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Option<NaiveDate>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Replaces the assignee from a token.
    #[must_use]
    pub fn with_assignee(mut self, token: impl Into<String>) -> Self {
        self.assignee = Some(token.into());
        self
    }
}

/// One item of a bulk move/reorder batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionUpdate {
    /// The task to reposition.
    pub task_id: TaskId,
    /// Target column code.
    pub status: String,
    /// Target position value.
    pub order: i32,
}

/// Board orchestration service.
#[derive(Clone)]
pub struct BoardService<R, C>
where
    R: BoardRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> BoardService<R, C>
where
    R: BoardRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new board service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Returns the project's board, backfilling columns on first touch.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Forbidden`] when the actor fails the access
    /// gate, or [`BoardError::Repository`] on storage failure.
    pub async fn get_board(&self, actor: &Actor, project: &ProjectRef) -> BoardResult<BoardState> {
        self.authorize(actor, project)?;
        let columns = self.repository.ensure_columns(project.id()).await?;
        let tasks = self.repository.list_tasks(project.id()).await?;
        Ok(BoardState { columns, tasks })
    }

    /// Creates a task and appends its creation record.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Forbidden`] when the actor fails the access
    /// gate, [`BoardError::Validation`] for an empty title, unknown column
    /// code, or bad assignee token, and [`BoardError::Repository`] on
    /// storage failure.
    pub async fn create_task(
        &self,
        actor: &Actor,
        project: &ProjectRef,
        request: CreateTaskRequest,
    ) -> BoardResult<BoardTask> {
        self.authorize(actor, project)?;
        self.repository.ensure_columns(project.id()).await?;

        let column = ColumnCode::try_from(request.status.as_str())
            .map_err(BoardDomainError::UnknownColumn)?;
        let mut task = BoardTask::new(
            project.id(),
            column,
            request.title,
            request.description,
            request.order,
            &*self.clock,
        )?;
        if request.deadline.is_some() {
            task.set_deadline(request.deadline, &*self.clock);
        }
        if let Some(token) = request.assignee {
            let assignee = Assignee::resolve(&token, project)?;
            task.set_assignee(assignee, &*self.clock);
        }

        let record = ActivityRecord::new(project.id(), ActivityAction::Create, &*self.clock)
            .with_task(task.id())
            .with_actor(actor.id())
            .with_new_data(
                ChangeSet::new()
                    .with("title", task.title())
                    .with("description", task.description()),
            );

        self.repository.insert_task(&task, &record).await?;
        tracing::debug!(task = %task.id(), project = %project.id(), "task created");
        Ok(task)
    }

    /// Applies a partial update, appending a move record when the column
    /// changed and an update record when title, description, or assignee
    /// changed. Both may result from one call.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotFound`] when the task does not exist in
    /// this project, plus the same failure modes as
    /// [`BoardService::create_task`].
    pub async fn update_task(
        &self,
        actor: &Actor,
        project: &ProjectRef,
        task_id: TaskId,
        patch: TaskPatch,
    ) -> BoardResult<BoardTask> {
        self.authorize(actor, project)?;
        self.repository.ensure_columns(project.id()).await?;

        let mut task = self.find_project_task(project, task_id).await?;

        let old_title = task.title().to_owned();
        let old_description = task.description().to_owned();
        let old_column = task.column();
        let old_assignee_display = task.assignee().display(project);

        if let Some(title) = patch.title {
            task.set_title(title, &*self.clock)?;
        }
        if let Some(description) = patch.description {
            task.set_description(description, &*self.clock);
        }
        if let Some(status) = patch.status {
            let column =
                ColumnCode::try_from(status.as_str()).map_err(BoardDomainError::UnknownColumn)?;
            task.move_to(column, &*self.clock);
        }
        if let Some(deadline) = patch.deadline {
            task.set_deadline(deadline, &*self.clock);
        }
        if let Some(token) = patch.assignee {
            let assignee = Assignee::resolve(&token, project)?;
            task.set_assignee(assignee, &*self.clock);
        }

        let mut records = Vec::new();
        if old_column != task.column() {
            records.push(
                ActivityRecord::new(project.id(), ActivityAction::Move, &*self.clock)
                    .with_task(task.id())
                    .with_actor(actor.id())
                    .with_columns(old_column, task.column()),
            );
        }

        let mut old_changes = ChangeSet::new();
        let mut new_changes = ChangeSet::new();
        if old_title != task.title() {
            old_changes.insert("title", old_title);
            new_changes.insert("title", task.title());
        }
        if old_description != task.description() {
            old_changes.insert("description", old_description);
            new_changes.insert("description", task.description());
        }
        let new_assignee_display = task.assignee().display(project);
        if old_assignee_display != new_assignee_display {
            old_changes.insert("assignee", old_assignee_display);
            new_changes.insert("assignee", new_assignee_display);
        }
        if !old_changes.is_empty() {
            records.push(
                ActivityRecord::new(project.id(), ActivityAction::Update, &*self.clock)
                    .with_task(task.id())
                    .with_actor(actor.id())
                    .with_old_data(old_changes)
                    .with_new_data(new_changes),
            );
        }

        self.repository.update_task(&task, &records).await?;
        tracing::debug!(
            task = %task.id(),
            records = records.len(),
            "task updated"
        );
        Ok(task)
    }

    /// Deletes a task, keeping its history with the task reference nulled.
    ///
    /// Narrower authorization than the other operations: only admins and
    /// the responsible manager may delete.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Forbidden`] when the deletion gate refuses,
    /// [`BoardError::NotFound`] when the task does not exist in this
    /// project, and [`BoardError::Repository`] on storage failure.
    pub async fn delete_task(
        &self,
        actor: &Actor,
        project: &ProjectRef,
        task_id: TaskId,
    ) -> BoardResult<()> {
        if !can_delete_tasks(actor, project) {
            return Err(BoardError::Forbidden);
        }
        let task = self.find_project_task(project, task_id).await?;

        let record = ActivityRecord::new(project.id(), ActivityAction::Delete, &*self.clock)
            .with_task(task.id())
            .with_actor(actor.id())
            .with_old_data(
                ChangeSet::new()
                    .with("title", task.title())
                    .with("column", task.column().as_str()),
            );

        self.repository.delete_task(task.id(), &record).await?;
        tracing::debug!(task = %task.id(), project = %project.id(), "task deleted");
        Ok(())
    }

    /// Applies a bulk move/reorder batch.
    ///
    /// Items referencing missing tasks, tasks of other projects, or unknown
    /// column codes are skipped silently: stale drag state must not fail
    /// the whole batch. Per item, a column change appends one move record;
    /// an order-only change appends one reorder record; a no-op appends
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Forbidden`] when the actor fails the access
    /// gate and [`BoardError::Repository`] on storage failure.
    pub async fn apply_reorder(
        &self,
        actor: &Actor,
        project: &ProjectRef,
        updates: Vec<PositionUpdate>,
    ) -> BoardResult<()> {
        self.authorize(actor, project)?;
        self.repository.ensure_columns(project.id()).await?;

        for update in updates {
            let Some(mut task) = self.repository.find_task(update.task_id).await? else {
                tracing::warn!(task = %update.task_id, "reorder item skipped: task missing");
                continue;
            };
            if task.project() != project.id() {
                tracing::warn!(task = %update.task_id, "reorder item skipped: foreign project");
                continue;
            }
            let Ok(column) = ColumnCode::try_from(update.status.as_str()) else {
                tracing::warn!(
                    task = %update.task_id,
                    status = %update.status,
                    "reorder item skipped: unknown column code"
                );
                continue;
            };

            let old_column = task.column();
            let old_order = task.order();
            let column_changed = old_column != column;
            let order_changed = old_order != update.order;
            if !column_changed && !order_changed {
                continue;
            }

            if column_changed {
                task.move_to(column, &*self.clock);
            }
            if order_changed {
                task.set_order(update.order, &*self.clock);
            }

            // One record per item: a cross-column move wins over a reorder.
            let record = if column_changed {
                ActivityRecord::new(project.id(), ActivityAction::Move, &*self.clock)
                    .with_task(task.id())
                    .with_actor(actor.id())
                    .with_columns(old_column, column)
            } else {
                ActivityRecord::new(project.id(), ActivityAction::Reorder, &*self.clock)
                    .with_task(task.id())
                    .with_actor(actor.id())
                    .with_old_data(ChangeSet::new().with("order", old_order))
                    .with_new_data(ChangeSet::new().with("order", update.order))
            };

            match self
                .repository
                .update_task(&task, std::slice::from_ref(&record))
                .await
            {
                Ok(()) => {}
                Err(BoardRepositoryError::NotFound(id)) => {
                    tracing::warn!(task = %id, "reorder item skipped: deleted mid-batch");
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }

    /// Returns the task's history, newest first, capped at 200 records.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Forbidden`] when the actor fails the access
    /// gate, [`BoardError::NotFound`] when the task does not exist in this
    /// project, and [`BoardError::Repository`] on storage failure.
    pub async fn task_history(
        &self,
        actor: &Actor,
        project: &ProjectRef,
        task_id: TaskId,
    ) -> BoardResult<Vec<ActivityRecord>> {
        self.authorize(actor, project)?;
        let task = self.find_project_task(project, task_id).await?;
        Ok(self
            .repository
            .task_history(task.id(), TASK_HISTORY_LIMIT)
            .await?)
    }

    /// Returns the project's activity feed, newest first, capped at 300
    /// records.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Forbidden`] when the actor fails the access
    /// gate and [`BoardError::Repository`] on storage failure.
    pub async fn project_activity(
        &self,
        actor: &Actor,
        project: &ProjectRef,
    ) -> BoardResult<Vec<ActivityRecord>> {
        self.authorize(actor, project)?;
        Ok(self
            .repository
            .project_activity(project.id(), PROJECT_ACTIVITY_LIMIT)
            .await?)
    }

    /// Enumerates the valid assignee choices for the project.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Forbidden`] when the actor fails the access
    /// gate.
    pub fn list_assignable(
        &self,
        actor: &Actor,
        project: &ProjectRef,
    ) -> BoardResult<Vec<AssigneeOption>> {
        self.authorize(actor, project)?;
        Ok(assignable_options(project))
    }

    /// Evaluates the shared access gate.
    fn authorize(&self, actor: &Actor, project: &ProjectRef) -> BoardResult<()> {
        if can_access_board(actor, project) {
            Ok(())
        } else {
            Err(BoardError::Forbidden)
        }
    }

    /// Loads a task and verifies it belongs to the given project.
    async fn find_project_task(
        &self,
        project: &ProjectRef,
        task_id: TaskId,
    ) -> BoardResult<BoardTask> {
        let task = self
            .repository
            .find_task(task_id)
            .await?
            .ok_or(BoardError::NotFound(task_id))?;
        if task.project() != project.id() {
            return Err(BoardError::NotFound(task_id));
        }
        Ok(task)
    }
}
