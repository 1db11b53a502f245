//! Dashboard and JSON API server
//!
//! Serves the dashboard pages (one in-memory session per submitted analysis)
//! and a small JSON API over the same service.

pub mod context;
pub mod handlers;
pub mod middleware;
pub mod routing;
pub mod startup;
pub mod types;
