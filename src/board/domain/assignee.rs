//! Task assignee variant and its compact token encoding.
//!
//! An assignee is one of: nobody, the customer, the project's responsible
//! user, or a developer linked to the project. The token grammar is the only
//! write path for assignees, and resolution validates project membership, so
//! a task can never point at a user or developer outside its own project.

use super::{BoardDomainError, DeveloperId, ProjectRef, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token prefix selecting the responsible user.
const USER_PREFIX: &str = "user:";
/// Token prefix selecting a linked developer.
const DEV_PREFIX: &str = "dev:";

/// Display label for the customer assignee.
const CUSTOMER_LABEL: &str = "Заказчик";
/// Display label for the empty assignee option.
const NONE_LABEL: &str = "—";

/// Who a task is assigned to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Assignee {
    /// Nobody is assigned.
    #[default]
    None,
    /// The project's customer.
    Customer,
    /// The project's responsible user.
    User {
        /// The responsible user's id.
        id: UserId,
    },
    /// A developer linked to the project.
    Developer {
        /// The linked developer's id.
        id: DeveloperId,
    },
}

impl Assignee {
    /// Resolves a compact token against the project roster.
    ///
    /// Grammar: empty or `none` → nobody; `customer` → the customer;
    /// `user:<uuid>` → the responsible user; `dev:<uuid>` → a linked
    /// developer. Tokens are trimmed and matched case-insensitively on the
    /// keyword forms.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::AssigneeFormat`] for tokens outside the
    /// grammar and [`BoardDomainError::AssigneeNotAssociated`] for
    /// well-formed references to users or developers that are not part of
    /// the project.
    pub fn resolve(token: &str, project: &ProjectRef) -> Result<Self, BoardDomainError> {
        let normalized = token.trim();
        if normalized.is_empty() || normalized.eq_ignore_ascii_case("none") {
            return Ok(Self::None);
        }
        if normalized.eq_ignore_ascii_case("customer") {
            return Ok(Self::Customer);
        }
        if let Some(raw_id) = normalized.strip_prefix(USER_PREFIX) {
            let id = parse_member_id(token, raw_id).map(UserId::from_uuid)?;
            if project.responsible_id() == Some(id) {
                return Ok(Self::User { id });
            }
            return Err(BoardDomainError::AssigneeNotAssociated(token.to_owned()));
        }
        if let Some(raw_id) = normalized.strip_prefix(DEV_PREFIX) {
            let id = parse_member_id(token, raw_id).map(DeveloperId::from_uuid)?;
            if project.has_developer(id) {
                return Ok(Self::Developer { id });
            }
            return Err(BoardDomainError::AssigneeNotAssociated(token.to_owned()));
        }
        Err(BoardDomainError::AssigneeFormat(token.to_owned()))
    }

    /// Renders the assignee back to the token grammar.
    ///
    /// Round-trips exactly with [`Assignee::resolve`] for the same project.
    #[must_use]
    pub fn token(&self) -> String {
        match self {
            Self::None => String::new(),
            Self::Customer => "customer".to_owned(),
            Self::User { id } => format!("{USER_PREFIX}{id}"),
            Self::Developer { id } => format!("{DEV_PREFIX}{id}"),
        }
    }

    /// Renders a human label for the assignee.
    ///
    /// Empty for nobody, the customer label, or the member's display name
    /// from the project roster. A reference no longer on the roster renders
    /// empty rather than inventing a name.
    #[must_use]
    pub fn display(&self, project: &ProjectRef) -> String {
        match self {
            Self::None => String::new(),
            Self::Customer => CUSTOMER_LABEL.to_owned(),
            Self::User { id } => project
                .responsible()
                .filter(|responsible| responsible.id() == *id)
                .map(|responsible| responsible.full_name().to_owned())
                .unwrap_or_default(),
            Self::Developer { id } => project
                .developer(*id)
                .map(|dev| dev.full_name().to_owned())
                .unwrap_or_default(),
        }
    }
}

fn parse_member_id(token: &str, raw_id: &str) -> Result<Uuid, BoardDomainError> {
    Uuid::parse_str(raw_id).map_err(|_| BoardDomainError::AssigneeFormat(token.to_owned()))
}

/// One selectable assignee choice for a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssigneeOption {
    /// The token accepted by [`Assignee::resolve`].
    pub token: String,
    /// The label shown to the user.
    pub label: String,
}

impl AssigneeOption {
    /// Creates an option pair.
    #[must_use]
    pub fn new(token: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            label: label.into(),
        }
    }
}

/// Enumerates every valid assignee token for the project, with labels.
///
/// The returned tokens are exactly the set [`Assignee::resolve`] accepts for
/// the same project: nobody, the customer, the responsible user when one is
/// set, and each linked developer.
#[must_use]
pub fn assignable_options(project: &ProjectRef) -> Vec<AssigneeOption> {
    let mut options = vec![
        AssigneeOption::new("", NONE_LABEL),
        AssigneeOption::new("customer", CUSTOMER_LABEL),
    ];
    if let Some(responsible) = project.responsible() {
        options.push(AssigneeOption::new(
            format!("{USER_PREFIX}{}", responsible.id()),
            format!("Менеджер: {}", responsible.full_name()),
        ));
    }
    for dev in project.developers() {
        options.push(AssigneeOption::new(
            format!("{DEV_PREFIX}{}", dev.id()),
            format!("Разработчик: {}", dev.full_name()),
        ));
    }
    options
}
