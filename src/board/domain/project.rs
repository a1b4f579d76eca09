//! Read-only view of the project aggregate consumed from the surrounding
//! system.
//!
//! The board scopes columns, tasks, and history to a project and validates
//! assignees against its roster, but never mutates project state. Callers
//! resolve the aggregate (responsible party and linked developers, with
//! display names) and hand it to every board operation.

use super::{DeveloperId, ProjectId, UserId};
use serde::{Deserialize, Serialize};

/// The project's responsible party (a manager or admin user).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsibleRef {
    id: UserId,
    full_name: String,
}

impl ResponsibleRef {
    /// Creates a responsible-party reference.
    #[must_use]
    pub fn new(id: UserId, full_name: impl Into<String>) -> Self {
        Self {
            id,
            full_name: full_name.into(),
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }
}

/// A developer linked to the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeveloperRef {
    id: DeveloperId,
    full_name: String,
}

impl DeveloperRef {
    /// Creates a linked-developer reference.
    #[must_use]
    pub fn new(id: DeveloperId, full_name: impl Into<String>) -> Self {
        Self {
            id,
            full_name: full_name.into(),
        }
    }

    /// Returns the developer identifier.
    #[must_use]
    pub const fn id(&self) -> DeveloperId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }
}

/// Read-only project aggregate: identity, responsible party, and the linked
/// developer roster.
///
/// The responsible reference is optional because user deletion severs it
/// without deleting the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    id: ProjectId,
    responsible: Option<ResponsibleRef>,
    developers: Vec<DeveloperRef>,
}

impl ProjectRef {
    /// Creates a project reference.
    #[must_use]
    pub fn new(
        id: ProjectId,
        responsible: Option<ResponsibleRef>,
        developers: impl IntoIterator<Item = DeveloperRef>,
    ) -> Self {
        Self {
            id,
            responsible,
            developers: developers.into_iter().collect(),
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the responsible party, if one is set.
    #[must_use]
    pub const fn responsible(&self) -> Option<&ResponsibleRef> {
        self.responsible.as_ref()
    }

    /// Returns the responsible party's user id, if one is set.
    #[must_use]
    pub fn responsible_id(&self) -> Option<UserId> {
        self.responsible.as_ref().map(ResponsibleRef::id)
    }

    /// Returns the linked developers.
    #[must_use]
    pub fn developers(&self) -> &[DeveloperRef] {
        &self.developers
    }

    /// Returns whether the developer is linked to this project.
    #[must_use]
    pub fn has_developer(&self, id: DeveloperId) -> bool {
        self.developers.iter().any(|dev| dev.id() == id)
    }

    /// Looks up a linked developer by id.
    #[must_use]
    pub fn developer(&self, id: DeveloperId) -> Option<&DeveloperRef> {
        self.developers.iter().find(|dev| dev.id() == id)
    }
}
