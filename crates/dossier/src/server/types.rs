//! Response envelopes and request parameters for the JSON endpoints

use axum::{
  http::StatusCode,
  response::{IntoResponse, Json, Response},
};
use herald::activity::ActivityEntry;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::contact::{ContactInfo, ContactOutcome, FallbackPolicy};
use crate::error::DossierError;
use crate::models::AnalysisResponse;

// Base Response Structure
// ======================

/// Envelope for every JSON endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct BaseResponse<T> {
  pub versioning: VersionInfo,

  /// Correlates the response with activity log entries
  pub transaction_id: Uuid,

  #[serde(skip_serializing_if = "Vec::is_empty", default)]
  pub errors: Vec<ApiError>,

  #[serde(flatten)]
  pub data: T,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VersionInfo {
  pub latest: String,
  pub requested: String,
  pub resolved: String,
}

impl VersionInfo {
  fn current() -> Self {
    let version = env!("CARGO_PKG_VERSION");
    Self { latest: version.to_string(), requested: version.to_string(), resolved: version.to_string() }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
  /// Error key, unique to the error source
  pub key: String,

  pub message: String,
}

impl ApiError {
  pub fn new(key: &str, message: &str) -> Self {
    Self { key: key.to_string(), message: message.to_string() }
  }
}

impl<T> BaseResponse<T> {
  pub fn success(data: T, transaction_id: Uuid) -> Self {
    Self { versioning: VersionInfo::current(), transaction_id, errors: Vec::new(), data }
  }

  pub fn error(errors: Vec<ApiError>, transaction_id: Uuid) -> BaseResponse<()> {
    BaseResponse { versioning: VersionInfo::current(), transaction_id, errors, data: () }
  }
}

/// Error half of every JSON handler's result
pub type ApiFailure = (StatusCode, Json<BaseResponse<()>>);

pub fn failure(status: StatusCode, key: &str, message: &str, transaction_id: Uuid) -> ApiFailure {
  (status, Json(BaseResponse::<()>::error(vec![ApiError::new(key, message)], transaction_id)))
}

impl DossierError {
  /// Status code and error key this error maps to on the wire
  pub fn status_and_key(&self) -> (StatusCode, &'static str) {
    match self {
      DossierError::Transport { .. } => (StatusCode::BAD_GATEWAY, "backend_unreachable"),
      DossierError::Decode { .. } => (StatusCode::BAD_GATEWAY, "backend_response_invalid"),
      DossierError::SessionNotFound { .. } => (StatusCode::NOT_FOUND, "session_not_found"),
      DossierError::InvalidConfig { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "invalid_config"),
      DossierError::Render { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "render_failed"),
      DossierError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error"),
    }
  }
}

/// Dashboard pages report errors as plain text
impl IntoResponse for DossierError {
  fn into_response(self) -> Response {
    let (status, _) = self.status_and_key();
    (status, self.to_string()).into_response()
  }
}

// Status/Version Endpoints
// =======================

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
  pub status: String,
  pub version: String,
  /// Dashboard sessions held in memory
  pub sessions: usize,
  pub analysis_backend: String,
  pub contact_enrichment_configured: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VersionResponse {
  pub version: String,
}

// Logs Endpoint
// =============

#[derive(Debug, Default, Deserialize)]
pub struct LogsQuery {
  pub limit: Option<usize>,
  pub level: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogsResponse {
  pub logs: Vec<ActivityEntry>,
}

// Analysis and Contact Endpoints
// ==============================

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalysisPayload {
  pub analysis: AnalysisResponse,
}

#[derive(Debug, Deserialize)]
pub struct ContactQuery {
  pub profile_url: String,
}

/// A lookup outcome together with what the dashboard would display for it
#[derive(Debug, Serialize, Deserialize)]
pub struct ContactPayload {
  pub profile_url: String,
  pub outcome: ContactOutcome,
  pub policy: FallbackPolicy,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub contact_info: Option<ContactInfo>,
  pub fallback: bool,
}
