//! `PostgreSQL` repository implementation for board storage.

use super::{
    models::{ActivityRow, ColumnRow, NewActivityRow, NewColumnRow, NewTaskRow, TaskRow},
    schema::{board_activity, board_columns, board_tasks},
};
use crate::board::{
    domain::{
        ActivityAction, ActivityId, ActivityRecord, Assignee, BoardTask, ChangeSet, Column,
        ColumnCode, ColumnId, PersistedBoardTaskData, ProjectId, TaskId, UserId,
    },
    ports::{BoardRepository, BoardRepositoryError, BoardRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by board adapters.
pub type BoardPgPool = Pool<ConnectionManager<PgConnection>>;

impl From<DieselError> for BoardRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

/// `PostgreSQL`-backed board repository.
///
/// Every composite write runs inside one transaction, so a task mutation is
/// never visible without its history records and the column backfill is
/// all-or-nothing.
#[derive(Debug, Clone)]
pub struct PostgresBoardRepository {
    pool: BoardPgPool,
}

impl PostgresBoardRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: BoardPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> BoardRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> BoardRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(BoardRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(BoardRepositoryError::persistence)?
    }
}

#[async_trait]
impl BoardRepository for PostgresBoardRepository {
    async fn ensure_columns(&self, project: ProjectId) -> BoardRepositoryResult<Vec<Column>> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, BoardRepositoryError, _>(|tx_conn| {
                let template_rows: Vec<NewColumnRow> = Column::template_for(project)
                    .iter()
                    .map(column_to_new_row)
                    .collect();

                // The unique index on (project_id, code) makes the backfill
                // idempotent under concurrent first touches.
                diesel::insert_into(board_columns::table)
                    .values(&template_rows)
                    .on_conflict((board_columns::project_id, board_columns::code))
                    .do_nothing()
                    .execute(tx_conn)
                    .map_err(BoardRepositoryError::persistence)?;

                let rows = board_columns::table
                    .filter(board_columns::project_id.eq(project.into_inner()))
                    .order(board_columns::position.asc())
                    .select(ColumnRow::as_select())
                    .load::<ColumnRow>(tx_conn)
                    .map_err(BoardRepositoryError::persistence)?;

                rows.into_iter().map(row_to_column).collect()
            })
        })
        .await
    }

    async fn list_tasks(&self, project: ProjectId) -> BoardRepositoryResult<Vec<BoardTask>> {
        self.run_blocking(move |connection| {
            let rows = board_tasks::table
                .filter(board_tasks::project_id.eq(project.into_inner()))
                .order((board_tasks::position.asc(), board_tasks::created_at.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(BoardRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn find_task(&self, id: TaskId) -> BoardRepositoryResult<Option<BoardTask>> {
        self.run_blocking(move |connection| {
            let row = board_tasks::table
                .filter(board_tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(BoardRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn insert_task(
        &self,
        task: &BoardTask,
        activity: &ActivityRecord,
    ) -> BoardRepositoryResult<()> {
        let task_id = task.id();
        let new_task = task_to_new_row(task)?;
        let new_activity = activity_to_new_row(activity);

        self.run_blocking(move |connection| {
            connection.transaction::<_, BoardRepositoryError, _>(|tx_conn| {
                diesel::insert_into(board_tasks::table)
                    .values(&new_task)
                    .execute(tx_conn)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            BoardRepositoryError::DuplicateTask(task_id)
                        }
                        _ => BoardRepositoryError::persistence(err),
                    })?;

                diesel::insert_into(board_activity::table)
                    .values(&new_activity)
                    .execute(tx_conn)
                    .map_err(BoardRepositoryError::persistence)?;
                Ok(())
            })
        })
        .await
    }

    async fn update_task(
        &self,
        task: &BoardTask,
        activities: &[ActivityRecord],
    ) -> BoardRepositoryResult<()> {
        let task_id = task.id();
        let changeset = task_to_new_row(task)?;
        let new_activities: Vec<NewActivityRow> =
            activities.iter().map(activity_to_new_row).collect();

        self.run_blocking(move |connection| {
            connection.transaction::<_, BoardRepositoryError, _>(|tx_conn| {
                let updated =
                    diesel::update(board_tasks::table.find(task_id.into_inner()))
                        .set(&changeset)
                        .execute(tx_conn)
                        .map_err(BoardRepositoryError::persistence)?;
                if updated == 0 {
                    return Err(BoardRepositoryError::NotFound(task_id));
                }

                if !new_activities.is_empty() {
                    diesel::insert_into(board_activity::table)
                        .values(&new_activities)
                        .execute(tx_conn)
                        .map_err(BoardRepositoryError::persistence)?;
                }
                Ok(())
            })
        })
        .await
    }

    async fn delete_task(
        &self,
        id: TaskId,
        activity: &ActivityRecord,
    ) -> BoardRepositoryResult<()> {
        let new_activity = activity_to_new_row(activity);

        self.run_blocking(move |connection| {
            connection.transaction::<_, BoardRepositoryError, _>(|tx_conn| {
                diesel::insert_into(board_activity::table)
                    .values(&new_activity)
                    .execute(tx_conn)
                    .map_err(BoardRepositoryError::persistence)?;

                // History outlives the task; sever references, keep rows.
                diesel::update(
                    board_activity::table.filter(board_activity::task_id.eq(id.into_inner())),
                )
                .set(board_activity::task_id.eq(Option::<uuid::Uuid>::None))
                .execute(tx_conn)
                .map_err(BoardRepositoryError::persistence)?;

                let deleted =
                    diesel::delete(board_tasks::table.find(id.into_inner()))
                        .execute(tx_conn)
                        .map_err(BoardRepositoryError::persistence)?;
                if deleted == 0 {
                    return Err(BoardRepositoryError::NotFound(id));
                }
                Ok(())
            })
        })
        .await
    }

    async fn task_history(
        &self,
        task: TaskId,
        limit: usize,
    ) -> BoardRepositoryResult<Vec<ActivityRecord>> {
        let bound = history_bound(limit)?;
        self.run_blocking(move |connection| {
            let rows = board_activity::table
                .filter(board_activity::task_id.eq(task.into_inner()))
                .order(board_activity::created_at.desc())
                .limit(bound)
                .select(ActivityRow::as_select())
                .load::<ActivityRow>(connection)
                .map_err(BoardRepositoryError::persistence)?;
            rows.into_iter().map(row_to_activity).collect()
        })
        .await
    }

    async fn project_activity(
        &self,
        project: ProjectId,
        limit: usize,
    ) -> BoardRepositoryResult<Vec<ActivityRecord>> {
        let bound = history_bound(limit)?;
        self.run_blocking(move |connection| {
            let rows = board_activity::table
                .filter(board_activity::project_id.eq(project.into_inner()))
                .order(board_activity::created_at.desc())
                .limit(bound)
                .select(ActivityRow::as_select())
                .load::<ActivityRow>(connection)
                .map_err(BoardRepositoryError::persistence)?;
            rows.into_iter().map(row_to_activity).collect()
        })
        .await
    }
}

fn history_bound(limit: usize) -> BoardRepositoryResult<i64> {
    i64::try_from(limit).map_err(BoardRepositoryError::persistence)
}

fn column_to_new_row(column: &Column) -> NewColumnRow {
    NewColumnRow {
        id: column.id().into_inner(),
        project_id: column.project().into_inner(),
        code: column.code().as_str().to_owned(),
        title: column.title().to_owned(),
        position: column.position(),
    }
}

fn row_to_column(row: ColumnRow) -> BoardRepositoryResult<Column> {
    let code =
        ColumnCode::try_from(row.code.as_str()).map_err(BoardRepositoryError::persistence)?;
    Ok(Column::from_persisted(
        ColumnId::from_uuid(row.id),
        ProjectId::from_uuid(row.project_id),
        code,
        row.title,
        row.position,
    ))
}

fn task_to_new_row(task: &BoardTask) -> BoardRepositoryResult<NewTaskRow> {
    let assignee =
        serde_json::to_value(task.assignee()).map_err(BoardRepositoryError::persistence)?;
    Ok(NewTaskRow {
        id: task.id().into_inner(),
        project_id: task.project().into_inner(),
        column_code: task.column().as_str().to_owned(),
        title: task.title().to_owned(),
        description: task.description().to_owned(),
        position: task.order(),
        deadline: task.deadline(),
        assignee,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: TaskRow) -> BoardRepositoryResult<BoardTask> {
    let column = ColumnCode::try_from(row.column_code.as_str())
        .map_err(BoardRepositoryError::persistence)?;
    let assignee = serde_json::from_value::<Assignee>(row.assignee)
        .map_err(BoardRepositoryError::persistence)?;

    Ok(BoardTask::from_persisted(PersistedBoardTaskData {
        id: TaskId::from_uuid(row.id),
        project: ProjectId::from_uuid(row.project_id),
        column,
        title: row.title,
        description: row.description,
        order: row.position,
        deadline: row.deadline,
        assignee,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

fn activity_to_new_row(record: &ActivityRecord) -> NewActivityRow {
    NewActivityRow {
        id: record.id.into_inner(),
        project_id: record.project.into_inner(),
        task_id: record.task.map(TaskId::into_inner),
        actor_id: record.actor.map(UserId::into_inner),
        action: record.action.as_str().to_owned(),
        from_column: record.from_column.map(|code| code.as_str().to_owned()),
        to_column: record.to_column.map(|code| code.as_str().to_owned()),
        old_data: record.old_data.clone().map(Into::into),
        new_data: record.new_data.clone().map(Into::into),
        created_at: record.created_at,
    }
}

fn row_to_activity(row: ActivityRow) -> BoardRepositoryResult<ActivityRecord> {
    let action =
        ActivityAction::try_from(row.action.as_str()).map_err(BoardRepositoryError::persistence)?;
    let from_column = parse_optional_code(row.from_column)?;
    let to_column = parse_optional_code(row.to_column)?;
    let old_data = parse_optional_changes(row.old_data)?;
    let new_data = parse_optional_changes(row.new_data)?;

    Ok(ActivityRecord {
        id: ActivityId::from_uuid(row.id),
        project: ProjectId::from_uuid(row.project_id),
        task: row.task_id.map(TaskId::from_uuid),
        actor: row.actor_id.map(UserId::from_uuid),
        action,
        from_column,
        to_column,
        old_data,
        new_data,
        created_at: row.created_at,
    })
}

fn parse_optional_code(code: Option<String>) -> BoardRepositoryResult<Option<ColumnCode>> {
    code.map(|raw| ColumnCode::try_from(raw.as_str()))
        .transpose()
        .map_err(BoardRepositoryError::persistence)
}

fn parse_optional_changes(
    data: Option<serde_json::Value>,
) -> BoardRepositoryResult<Option<ChangeSet>> {
    data.map(serde_json::from_value)
        .transpose()
        .map_err(BoardRepositoryError::persistence)
}
