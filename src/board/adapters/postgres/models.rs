//! Diesel row models for board persistence.

use super::schema::{board_activity, board_columns, board_tasks};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for column records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = board_columns)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ColumnRow {
    /// Column row identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Stable stage code.
    pub code: String,
    /// Display title.
    pub title: String,
    /// Presentation position.
    pub position: i32,
}

/// Insert model for column records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = board_columns)]
pub struct NewColumnRow {
    /// Column row identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Stable stage code.
    pub code: String,
    /// Display title.
    pub title: String,
    /// Presentation position.
    pub position: i32,
}

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = board_tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Stage code the task sits in.
    pub column_code: String,
    /// Task title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Position within the stage.
    pub position: i32,
    /// Optional deadline date.
    pub deadline: Option<NaiveDate>,
    /// Tagged assignee payload.
    pub assignee: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-modified timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = board_tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Stage code the task sits in.
    pub column_code: String,
    /// Task title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Position within the stage.
    pub position: i32,
    /// Optional deadline date.
    pub deadline: Option<NaiveDate>,
    /// Tagged assignee payload.
    pub assignee: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-modified timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for activity records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = board_activity)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ActivityRow {
    /// Record identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Task reference, nulled when the task is deleted.
    pub task_id: Option<uuid::Uuid>,
    /// Acting user.
    pub actor_id: Option<uuid::Uuid>,
    /// Action kind code.
    pub action: String,
    /// Source column code for move events.
    pub from_column: Option<String>,
    /// Target column code for move events.
    pub to_column: Option<String>,
    /// Changed fields before the event.
    pub old_data: Option<Value>,
    /// Changed fields after the event.
    pub new_data: Option<Value>,
    /// Event timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for activity records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = board_activity)]
pub struct NewActivityRow {
    /// Record identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Task reference.
    pub task_id: Option<uuid::Uuid>,
    /// Acting user.
    pub actor_id: Option<uuid::Uuid>,
    /// Action kind code.
    pub action: String,
    /// Source column code for move events.
    pub from_column: Option<String>,
    /// Target column code for move events.
    pub to_column: Option<String>,
    /// Changed fields before the event.
    pub old_data: Option<Value>,
    /// Changed fields after the event.
    pub new_data: Option<Value>,
    /// Event timestamp.
    pub created_at: DateTime<Utc>,
}
