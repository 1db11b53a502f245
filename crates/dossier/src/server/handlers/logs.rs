//! Logs endpoint handler

use axum::{
  extract::{Extension, Query},
  http::StatusCode,
  response::Json,
};
use herald::Level;
use uuid::Uuid;

use crate::server::middleware::RequestContext;
use crate::server::types::{failure, ApiFailure, BaseResponse, LogsQuery, LogsResponse};

const DEFAULT_LIMIT: usize = 100;

/// GET /logs - Most recent activity log entries
pub async fn get_logs(
  Extension(context): Extension<RequestContext>,
  Query(query): Query<LogsQuery>,
) -> Result<Json<BaseResponse<LogsResponse>>, ApiFailure> {
  let transaction_id = Uuid::new_v4();

  let level = match query.level.as_deref() {
    None | Some("") => None,
    Some(name) => match Level::parse(name) {
      Some(level) => Some(level),
      None => {
        let message = format!("Unknown log level: {name}");
        return Err(failure(StatusCode::BAD_REQUEST, "invalid_level", &message, transaction_id));
      }
    },
  };

  match context.activity.entries(Some(query.limit.unwrap_or(DEFAULT_LIMIT)), level).await {
    Ok(logs) => Ok(Json(BaseResponse::success(LogsResponse { logs }, transaction_id))),
    Err(e) => {
      context.log_error(&format!("Failed to read logs: {e}"), "logs-api").await;
      let message = format!("Failed to read logs: {e}");
      Err(failure(StatusCode::INTERNAL_SERVER_ERROR, "logs_read_failed", &message, transaction_id))
    }
  }
}
