//! HTTP server exposing index lookups.
//!
//! - [`api`]: Request/response types and route handlers

pub mod api;
