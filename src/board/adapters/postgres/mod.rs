//! `PostgreSQL` implementation of the board repository using Diesel ORM.

mod models;
mod repository;
mod schema;

pub use repository::{BoardPgPool, PostgresBoardRepository};
