//! Board columns: the fixed five-stage pipeline every project board shows.

use super::{ColumnId, ProjectId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable machine-readable stage identifier for a board column.
///
/// The pipeline is fixed: every project board has exactly these five stages,
/// in this order. Codes are the wire representation used by clients and
/// stored with tasks; display titles live on [`Column`] rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnCode {
    /// Work that has not been picked up yet.
    Queue,
    /// Work currently being done.
    InProgress,
    /// Work stuck and needing help from the team.
    Help,
    /// Work blocked on the customer.
    Blocked,
    /// Finished work.
    Done,
}

/// The five pipeline stages in presentation order.
pub(crate) const COLUMN_TEMPLATE: [ColumnCode; 5] = [
    ColumnCode::Queue,
    ColumnCode::InProgress,
    ColumnCode::Help,
    ColumnCode::Blocked,
    ColumnCode::Done,
];

impl ColumnCode {
    /// Returns the canonical wire code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Queue => "queue",
            Self::InProgress => "inprogress",
            Self::Help => "help",
            Self::Blocked => "blocked",
            Self::Done => "done",
        }
    }

    /// Returns the display title shown as the column header.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Queue => "на очереди",
            Self::InProgress => "в процессе",
            Self::Help => "нужна помощь с задачей",
            Self::Blocked => "подвисло из-за заказчика",
            Self::Done => "выполнено",
        }
    }

    /// Returns the stage's position in the fixed presentation order.
    #[must_use]
    pub fn position(self) -> i32 {
        COLUMN_TEMPLATE
            .iter()
            .position(|code| *code == self)
            .and_then(|index| i32::try_from(index).ok())
            .unwrap_or(0)
    }
}

impl TryFrom<&str> for ColumnCode {
    type Error = ParseColumnCodeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "queue" => Ok(Self::Queue),
            "inprogress" => Ok(Self::InProgress),
            "help" => Ok(Self::Help),
            "blocked" => Ok(Self::Blocked),
            "done" => Ok(Self::Done),
            _ => Err(ParseColumnCodeError(value.to_owned())),
        }
    }
}

impl std::fmt::Display for ColumnCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned while parsing column codes from client input or storage.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown column code: {0}")]
pub struct ParseColumnCodeError(pub String);

/// A column row on one project's board.
///
/// Columns are created lazily from the template the first time a board is
/// touched, are unique per `(project, code)`, and are never reordered or
/// deleted at runtime. Task ordering does not use the column's `position`;
/// it only drives header presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    id: ColumnId,
    project: ProjectId,
    code: ColumnCode,
    title: String,
    position: i32,
}

impl Column {
    /// Creates a column for a project from a template stage.
    #[must_use]
    pub fn from_template(project: ProjectId, code: ColumnCode) -> Self {
        Self {
            id: ColumnId::new(),
            project,
            code,
            title: code.title().to_owned(),
            position: code.position(),
        }
    }

    /// Reconstructs a column from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: ColumnId,
        project: ProjectId,
        code: ColumnCode,
        title: String,
        position: i32,
    ) -> Self {
        Self {
            id,
            project,
            code,
            title,
            position,
        }
    }

    /// Returns the full five-stage template for a project, in order.
    #[must_use]
    pub fn template_for(project: ProjectId) -> Vec<Self> {
        COLUMN_TEMPLATE
            .iter()
            .map(|code| Self::from_template(project, *code))
            .collect()
    }

    /// Returns the column identifier.
    #[must_use]
    pub const fn id(&self) -> ColumnId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project(&self) -> ProjectId {
        self.project
    }

    /// Returns the stage code.
    #[must_use]
    pub const fn code(&self) -> ColumnCode {
        self.code
    }

    /// Returns the display title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the presentation position.
    #[must_use]
    pub const fn position(&self) -> i32 {
        self.position
    }
}
