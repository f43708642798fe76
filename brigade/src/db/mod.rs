//! Database layer for data persistence and access.
//!
//! This module implements the data access layer using SQLx with PostgreSQL,
//! following the repository pattern: API handlers talk to repositories
//! ([`handlers`]), repositories run queries and return records ([`models`]).
//!
//! Migrations live in the `migrations/` directory and are run on startup by
//! [`crate::migrator`].

pub mod errors;
pub mod handlers;
pub mod models;
