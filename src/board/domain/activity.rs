//! Append-only activity history for board mutations.
//!
//! Every state-changing operation appends one record per semantic change; a
//! single call may append more than one (a move plus a text edit). Records
//! are never updated or deleted. Task deletion nulls the task reference on
//! surviving rows so project history outlives its tasks.

use super::{ActivityId, ColumnCode, ProjectId, TaskId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The kind of change an activity record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    /// A task was created.
    Create,
    /// Task fields (title, description, assignee) changed.
    Update,
    /// A task moved to a different column.
    Move,
    /// A task's position changed within its column.
    Reorder,
    /// A task was deleted.
    Delete,
}

impl ActivityAction {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Move => "move",
            Self::Reorder => "reorder",
            Self::Delete => "delete",
        }
    }
}

impl TryFrom<&str> for ActivityAction {
    type Error = ParseActivityActionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "move" => Ok(Self::Move),
            "reorder" => Ok(Self::Reorder),
            "delete" => Ok(Self::Delete),
            _ => Err(ParseActivityActionError(value.to_owned())),
        }
    }
}

/// Error returned while parsing activity actions from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown activity action: {0}")]
pub struct ParseActivityActionError(pub String);

/// A field-name → value snapshot capturing only the fields that changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeSet(serde_json::Map<String, Value>);

impl ChangeSet {
    /// Creates an empty change set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a field value, returning the set for chaining.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Records a field value in place.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    /// Returns the recorded value for a field, if present.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Returns whether no fields were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of recorded fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the underlying JSON map.
    #[must_use]
    pub const fn as_map(&self) -> &serde_json::Map<String, Value> {
        &self.0
    }
}

impl From<ChangeSet> for Value {
    fn from(set: ChangeSet) -> Self {
        Self::Object(set.0)
    }
}

/// One immutable audit row describing a single state-changing event.
///
/// The task reference is nullable because history survives task deletion;
/// the actor is nullable as a defensive case for unauthenticated writes,
/// which the access gate prevents in normal operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Record identifier.
    pub id: ActivityId,
    /// The project whose board changed.
    pub project: ProjectId,
    /// The task that changed; null once the task is deleted.
    pub task: Option<TaskId>,
    /// The acting user, when authenticated.
    pub actor: Option<UserId>,
    /// The kind of change.
    pub action: ActivityAction,
    /// Source column for move events.
    pub from_column: Option<ColumnCode>,
    /// Target column for move events.
    pub to_column: Option<ColumnCode>,
    /// Changed fields before the event.
    pub old_data: Option<ChangeSet>,
    /// Changed fields after the event.
    pub new_data: Option<ChangeSet>,
    /// Event timestamp.
    pub created_at: DateTime<Utc>,
}

impl ActivityRecord {
    /// Creates a record for an event happening now.
    #[must_use]
    pub fn new(project: ProjectId, action: ActivityAction, clock: &impl Clock) -> Self {
        Self {
            id: ActivityId::new(),
            project,
            task: None,
            actor: None,
            action,
            from_column: None,
            to_column: None,
            old_data: None,
            new_data: None,
            created_at: clock.utc(),
        }
    }

    /// Attaches the task the event concerns.
    #[must_use]
    pub const fn with_task(mut self, task: TaskId) -> Self {
        self.task = Some(task);
        self
    }

    /// Attaches the acting user.
    #[must_use]
    pub const fn with_actor(mut self, actor: UserId) -> Self {
        self.actor = Some(actor);
        self
    }

    /// Attaches source and target columns for a move event.
    #[must_use]
    pub const fn with_columns(mut self, from: ColumnCode, to: ColumnCode) -> Self {
        self.from_column = Some(from);
        self.to_column = Some(to);
        self
    }

    /// Attaches the before-snapshot of changed fields.
    #[must_use]
    pub fn with_old_data(mut self, data: ChangeSet) -> Self {
        self.old_data = Some(data);
        self
    }

    /// Attaches the after-snapshot of changed fields.
    #[must_use]
    pub fn with_new_data(mut self, data: ChangeSet) -> Self {
        self.new_data = Some(data);
        self
    }
}
