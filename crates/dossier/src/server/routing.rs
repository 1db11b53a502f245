//! Axum router configuration for all endpoints

use axum::{
  middleware,
  routing::{get, post},
  Router,
};

use crate::server::context::AppContext;
use crate::server::handlers::{api, dashboard, logs, status};
use crate::server::middleware::request_context_middleware;

/// Create the application router over shared state
pub fn create_router(ctx: AppContext) -> Router {
  Router::new()
    // Dashboard pages
    .route("/", get(dashboard::index))
    .route("/analysis", post(dashboard::create))
    .route("/analysis/{id}", get(dashboard::show).post(dashboard::resubmit))
    .route("/analysis/{id}/contacts", post(dashboard::resolve_contact))
    // JSON API
    .route("/api/analysis", post(api::analyze))
    .route("/api/contacts", get(api::contact))
    // Status, version and logs
    .route("/status", get(status::status))
    .route("/version", get(status::version))
    .route("/logs", get(logs::get_logs))
    .layer(middleware::from_fn_with_state(ctx.clone(), request_context_middleware))
    .with_state(ctx)
}
