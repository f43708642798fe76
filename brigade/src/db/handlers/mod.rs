//! Repository implementations for database access.
//!
//! Each repository wraps a SQLx connection or transaction, provides
//! strongly-typed operations, and returns domain models from
//! [`crate::db::models`]. Create repositories from a pool connection or a
//! transaction, never hold one across await points that need the pool.

pub mod recipes;

pub use recipes::Recipes;
