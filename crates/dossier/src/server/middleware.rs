//! Per-request context and request logging
//!
//! Every request gets a [`RequestContext`] in its extensions; start and
//! completion are written to the activity log with method, path, status and
//! duration.

use axum::{
  extract::{Request, State},
  http::{Method, Uri},
  middleware::Next,
  response::Response,
};
use herald::activity::{self, ActivityLog};
use herald::Level;
use std::time::Instant;
use uuid::Uuid;

use crate::server::context::AppContext;

#[derive(Clone)]
pub struct RequestContext {
  pub request_id: Uuid,
  pub method: Method,
  pub uri: Uri,
  pub activity: ActivityLog,
}

impl RequestContext {
  pub fn new(method: Method, uri: Uri, activity: ActivityLog) -> Self {
    Self { request_id: Uuid::new_v4(), method, uri, activity }
  }

  fn activity_context(&self, status_code: Option<u16>, duration_ms: Option<f64>) -> activity::RequestContext {
    activity::RequestContext {
      request_id: Some(self.request_id.to_string()),
      method: Some(self.method.to_string()),
      path: Some(self.uri.path().to_string()),
      status_code,
      duration_ms,
    }
  }

  /// Log `message` tagged with this request
  pub async fn log(&self, level: Level, component: &str, message: &str) {
    self.activity.record(level, component, message, Some(self.activity_context(None, None))).await;
  }

  pub async fn log_info(&self, message: &str, component: &str) {
    self.log(Level::Info, component, message).await;
  }

  pub async fn log_success(&self, message: &str, component: &str) {
    self.log(Level::Success, component, message).await;
  }

  pub async fn log_warn(&self, message: &str, component: &str) {
    self.log(Level::Warn, component, message).await;
  }

  pub async fn log_error(&self, message: &str, component: &str) {
    self.log(Level::Error, component, message).await;
  }

  async fn log_request_start(&self) {
    self.activity.record(Level::Debug, "http-request", "Request started", Some(self.activity_context(None, None))).await;
  }

  async fn log_request_complete(&self, status_code: u16, duration_ms: f64) {
    let level = if status_code >= 500 { Level::Error } else { Level::Info };
    self
      .activity
      .record(level, "http-request", "Request completed", Some(self.activity_context(Some(status_code), Some(duration_ms))))
      .await;
  }
}

/// Inject a [`RequestContext`] and log the request around the handler
pub async fn request_context_middleware(
  State(ctx): State<AppContext>,
  mut request: Request,
  next: Next,
) -> Response {
  let context = RequestContext::new(request.method().clone(), request.uri().clone(), ctx.activity.clone());

  let started = Instant::now();
  context.log_request_start().await;

  request.extensions_mut().insert(context.clone());
  let response = next.run(request).await;

  let duration_ms = started.elapsed().as_secs_f64() * 1000.0;
  context.log_request_complete(response.status().as_u16(), duration_ms).await;

  response
}
