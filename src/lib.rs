//! Taskboard: the Kanban engine of a project management backend.
//!
//! This crate provides the per-project task board: a fixed five-stage
//! column pipeline, task CRUD with caller-authoritative ordering, bulk
//! drag-and-drop move/reorder application, project-scoped assignee
//! resolution, and an append-only activity history.
//!
//! # Architecture
//!
//! Taskboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, in-memory)
//!
//! Authentication, transport, and project CRUD are owned by the surrounding
//! system: callers hand every operation an already-resolved project
//! aggregate and actor identity, and the board answers with domain values.
//!
//! # Modules
//!
//! - [`board`]: Columns, tasks, assignees, activity history, and the board
//!   service

pub mod board;
