//! Actor identity and role classification supplied by the authentication
//! layer.

use super::{DeveloperId, UserId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role classification for an authenticated actor.
///
/// Admins are superusers by definition in the surrounding system, so no
/// separate superuser flag exists here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access to every project board.
    Admin,
    /// Project manager: access to boards of projects they are responsible
    /// for.
    Manager,
    /// Developer: access to boards of projects their profile is linked to.
    Contributor,
}

impl Role {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Contributor => "contributor",
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "contributor" => Ok(Self::Contributor),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

/// Error returned while parsing role codes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

/// An authenticated actor as seen by the board.
///
/// Contributors carry the id of their developer profile so membership checks
/// and activity attribution need no further lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    id: UserId,
    role: Role,
    developer: Option<DeveloperId>,
}

impl Actor {
    /// Creates an actor without a developer profile.
    #[must_use]
    pub const fn new(id: UserId, role: Role) -> Self {
        Self {
            id,
            role,
            developer: None,
        }
    }

    /// Attaches the actor's developer profile id.
    #[must_use]
    pub const fn with_developer(mut self, developer: DeveloperId) -> Self {
        self.developer = Some(developer);
        self
    }

    /// Returns the acting user's id.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the actor's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the actor's developer profile id, if any.
    #[must_use]
    pub const fn developer(&self) -> Option<DeveloperId> {
        self.developer
    }
}
