//! Kanban task-board engine.
//!
//! This module implements the per-project task board: the fixed five-stage
//! column pipeline, task CRUD with caller-authoritative ordering, bulk
//! move/reorder application, assignee resolution scoped to project
//! membership, and the append-only activity history that records every
//! state-changing operation. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
