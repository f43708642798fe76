//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers
//! - **[`models`]**: Request/response data structures
//!
//! All endpoints are documented with OpenAPI annotations using `utoipa`; the
//! assembled document is served at `/api-docs/openapi.json`.

pub mod handlers;
pub mod models;
