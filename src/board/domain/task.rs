//! Task aggregate: one card on a project board.

use super::{Assignee, BoardDomainError, ColumnCode, ProjectId, TaskId};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A task on a project board.
///
/// Tasks belong to exactly one project and occupy one pipeline stage. The
/// `order` value is caller-authoritative: the board never renumbers it, ties
/// are permitted, and reads break ties on creation time. Storing the stage
/// as a [`ColumnCode`] keeps the task's column inside the task's project by
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardTask {
    id: TaskId,
    project: ProjectId,
    column: ColumnCode,
    title: String,
    description: String,
    order: i32,
    deadline: Option<NaiveDate>,
    assignee: Assignee,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedBoardTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owning project.
    pub project: ProjectId,
    /// Persisted pipeline stage.
    pub column: ColumnCode,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: String,
    /// Persisted position value.
    pub order: i32,
    /// Persisted deadline, if any.
    pub deadline: Option<NaiveDate>,
    /// Persisted assignee.
    pub assignee: Assignee,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted last-modified timestamp.
    pub updated_at: DateTime<Utc>,
}

impl BoardTask {
    /// Creates a new task in the given stage.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTitle`] when the title is empty
    /// after trimming.
    pub fn new(
        project: ProjectId,
        column: ColumnCode,
        title: impl Into<String>,
        description: impl Into<String>,
        order: i32,
        clock: &impl Clock,
    ) -> Result<Self, BoardDomainError> {
        let title = validate_title(title.into())?;
        let timestamp = clock.utc();
        Ok(Self {
            id: TaskId::new(),
            project,
            column,
            title,
            description: description.into(),
            order,
            deadline: None,
            assignee: Assignee::None,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedBoardTaskData) -> Self {
        Self {
            id: data.id,
            project: data.project,
            column: data.column,
            title: data.title,
            description: data.description,
            order: data.order,
            deadline: data.deadline,
            assignee: data.assignee,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project(&self) -> ProjectId {
        self.project
    }

    /// Returns the pipeline stage the task sits in.
    #[must_use]
    pub const fn column(&self) -> ColumnCode {
        self.column
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the free-text description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the position value within the stage.
    #[must_use]
    pub const fn order(&self) -> i32 {
        self.order
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<NaiveDate> {
        self.deadline
    }

    /// Returns the assignee.
    #[must_use]
    pub const fn assignee(&self) -> Assignee {
        self.assignee
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last-modified timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the title.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTitle`] when the new title is empty
    /// after trimming.
    pub fn set_title(
        &mut self,
        title: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), BoardDomainError> {
        self.title = validate_title(title.into())?;
        self.touch(clock);
        Ok(())
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: impl Into<String>, clock: &impl Clock) {
        self.description = description.into();
        self.touch(clock);
    }

    /// Moves the task to another stage.
    pub fn move_to(&mut self, column: ColumnCode, clock: &impl Clock) {
        self.column = column;
        self.touch(clock);
    }

    /// Replaces the position value.
    pub fn set_order(&mut self, order: i32, clock: &impl Clock) {
        self.order = order;
        self.touch(clock);
    }

    /// Sets or clears the deadline.
    pub fn set_deadline(&mut self, deadline: Option<NaiveDate>, clock: &impl Clock) {
        self.deadline = deadline;
        self.touch(clock);
    }

    /// Replaces the assignee.
    ///
    /// Callers resolve the assignee through [`Assignee::resolve`] so
    /// project membership has already been validated.
    pub fn set_assignee(&mut self, assignee: Assignee, clock: &impl Clock) {
        self.assignee = assignee;
        self.touch(clock);
    }

    /// Updates the last-modified timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

/// Trims and validates a task title.
fn validate_title(title: String) -> Result<String, BoardDomainError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(BoardDomainError::EmptyTitle);
    }
    Ok(trimmed.to_owned())
}
