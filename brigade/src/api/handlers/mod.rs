//! HTTP request handlers for the API endpoints.
//!
//! Handlers validate and deserialize the request, run business logic via the
//! database repositories, and serialize the response. Errors are
//! [`crate::errors::Error`], which converts to appropriate HTTP status codes.

pub mod costing;
