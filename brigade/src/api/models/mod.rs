//! API request and response data models.
//!
//! API models are distinct from database models so the public contract can
//! evolve independently of the storage representation. All models are
//! annotated with `utoipa` for automatic API docs.

pub mod recipes;
