//! In-memory board repository for tests and local development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::board::{
    domain::{ActivityRecord, BoardTask, Column, ProjectId, TaskId},
    ports::{BoardRepository, BoardRepositoryError, BoardRepositoryResult},
};

/// Thread-safe in-memory board repository.
///
/// Mutating operations take the write lock for their whole span, which gives
/// the same all-or-nothing visibility the `PostgreSQL` adapter gets from
/// transactions.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBoardRepository {
    state: Arc<RwLock<InMemoryBoardState>>,
}

#[derive(Debug, Default)]
struct InMemoryBoardState {
    columns: HashMap<ProjectId, Vec<Column>>,
    tasks: HashMap<TaskId, BoardTask>,
    activity: Vec<ActivityRecord>,
}

impl InMemoryBoardRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> BoardRepositoryError {
    BoardRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

/// Filters and orders activity rows newest-first, bounded by `limit`.
fn collect_history<'a, F>(
    activity: &'a [ActivityRecord],
    limit: usize,
    matches: F,
) -> Vec<ActivityRecord>
where
    F: Fn(&'a ActivityRecord) -> bool,
{
    activity
        .iter()
        .rev()
        .filter(|record| matches(record))
        .take(limit)
        .cloned()
        .collect()
}

#[async_trait]
impl BoardRepository for InMemoryBoardRepository {
    async fn ensure_columns(&self, project: ProjectId) -> BoardRepositoryResult<Vec<Column>> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let columns = state.columns.entry(project).or_default();
        for template_column in Column::template_for(project) {
            let present = columns
                .iter()
                .any(|column| column.code() == template_column.code());
            if !present {
                columns.push(template_column);
            }
        }
        columns.sort_by_key(Column::position);
        Ok(columns.clone())
    }

    async fn list_tasks(&self, project: ProjectId) -> BoardRepositoryResult<Vec<BoardTask>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut tasks: Vec<BoardTask> = state
            .tasks
            .values()
            .filter(|task| task.project() == project)
            .cloned()
            .collect();
        tasks.sort_by_key(|task| (task.order(), task.created_at()));
        Ok(tasks)
    }

    async fn find_task(&self, id: TaskId) -> BoardRepositoryResult<Option<BoardTask>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn insert_task(
        &self,
        task: &BoardTask,
        activity: &ActivityRecord,
    ) -> BoardRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(BoardRepositoryError::DuplicateTask(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        state.activity.push(activity.clone());
        Ok(())
    }

    async fn update_task(
        &self,
        task: &BoardTask,
        activities: &[ActivityRecord],
    ) -> BoardRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if !state.tasks.contains_key(&task.id()) {
            return Err(BoardRepositoryError::NotFound(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        state.activity.extend_from_slice(activities);
        Ok(())
    }

    async fn delete_task(
        &self,
        id: TaskId,
        activity: &ActivityRecord,
    ) -> BoardRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.tasks.remove(&id).is_none() {
            return Err(BoardRepositoryError::NotFound(id));
        }
        state.activity.push(activity.clone());
        // History survives the task; only the reference is severed.
        for record in &mut state.activity {
            if record.task == Some(id) {
                record.task = None;
            }
        }
        Ok(())
    }

    async fn task_history(
        &self,
        task: TaskId,
        limit: usize,
    ) -> BoardRepositoryResult<Vec<ActivityRecord>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(collect_history(&state.activity, limit, |record| {
            record.task == Some(task)
        }))
    }

    async fn project_activity(
        &self,
        project: ProjectId,
        limit: usize,
    ) -> BoardRepositoryResult<Vec<ActivityRecord>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(collect_history(&state.activity, limit, |record| {
            record.project == project
        }))
    }
}
