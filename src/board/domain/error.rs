//! Error types for board domain validation.

use thiserror::Error;

/// Errors returned while validating board input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The assignee token does not match the grammar.
    #[error("malformed assignee token: '{0}'")]
    AssigneeFormat(String),

    /// The assignee token references someone outside the project.
    #[error("assignee '{0}': actor not associated with project")]
    AssigneeNotAssociated(String),

    /// The column code is not one of the pipeline stages.
    #[error(transparent)]
    UnknownColumn(#[from] super::ParseColumnCodeError),
}
