//! Domain model for the task board.
//!
//! The board domain models columns, tasks, assignee resolution, activity
//! history, and the authorization predicates while keeping all
//! infrastructure concerns outside of the domain boundary. The project
//! aggregate is consumed read-only from the surrounding system; the board
//! never mutates it.

mod access;
mod activity;
mod actor;
mod assignee;
mod column;
mod error;
mod ids;
mod project;
mod task;

pub use access::{can_access_board, can_delete_tasks};
pub use activity::{ActivityAction, ActivityRecord, ChangeSet, ParseActivityActionError};
pub use actor::{Actor, ParseRoleError, Role};
pub use assignee::{Assignee, AssigneeOption, assignable_options};
pub use column::{Column, ColumnCode, ParseColumnCodeError};
pub use error::BoardDomainError;
pub use ids::{ActivityId, ColumnId, DeveloperId, ProjectId, TaskId, UserId};
pub use project::{DeveloperRef, ProjectRef, ResponsibleRef};
pub use task::{BoardTask, PersistedBoardTaskData};
