//! Board authorization predicates.
//!
//! Every board-reading and board-mutating operation evaluates these two
//! functions and nothing else. Keeping the rules in one place prevents the
//! per-endpoint drift this logic suffered from historically.

use super::{Actor, ProjectRef, Role};

/// Returns whether the actor may read or mutate the project's board.
///
/// Admins always may; managers only for projects they are responsible for;
/// contributors only for projects their developer profile is linked to.
#[must_use]
pub fn can_access_board(actor: &Actor, project: &ProjectRef) -> bool {
    match actor.role() {
        Role::Admin => true,
        Role::Manager => project.responsible_id() == Some(actor.id()),
        Role::Contributor => actor
            .developer()
            .is_some_and(|dev| project.has_developer(dev)),
    }
}

/// Returns whether the actor may delete tasks on the project's board.
///
/// Narrower than [`can_access_board`]: contributors may never delete.
#[must_use]
pub fn can_delete_tasks(actor: &Actor, project: &ProjectRef) -> bool {
    match actor.role() {
        Role::Admin => true,
        Role::Manager => project.responsible_id() == Some(actor.id()),
        Role::Contributor => false,
    }
}
