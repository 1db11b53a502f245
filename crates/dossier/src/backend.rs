//! HTTP client for the analysis backend

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::config::DossierConfig;
use crate::error::{DossierError, Result};
use crate::models::AnalysisResponse;
use crate::request::{AnalysisRequest, CompetitorAnalysisRequest};

pub const ANALYSIS_PATH: &str = "/api/analysis/run";
pub const COMPETITOR_PATH: &str = "/api/othercompetitor/analyze";

/// Response of `POST /api/othercompetitor/analyze`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompetitorAnalysisResponse {
  #[serde(default)]
  pub success: Option<bool>,
  #[serde(default)]
  pub analysis: Option<Value>,
}

/// The two calls the dashboard makes against the analysis service
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
  /// Run the primary analysis
  async fn run_analysis(&self, request: &AnalysisRequest) -> Result<AnalysisResponse>;

  /// Analyze one competitor against the company
  async fn analyze_competitor(
    &self,
    request: &CompetitorAnalysisRequest,
  ) -> Result<CompetitorAnalysisResponse>;
}

/// reqwest-backed implementation
pub struct HttpAnalysisBackend {
  client: Client,
  analysis_url: String,
  competitor_url: String,
}

impl HttpAnalysisBackend {
  pub fn new(config: &DossierConfig) -> Result<Self> {
    let mut builder = Client::builder();
    if let Some(secs) = config.request_timeout_secs {
      builder = builder.timeout(Duration::from_secs(secs));
    }

    let client = builder
      .build()
      .map_err(|e| DossierError::invalid_config(format!("HTTP client: {e}")))?;

    Ok(Self {
      client,
      analysis_url: config.analysis_endpoint(ANALYSIS_PATH),
      competitor_url: config.analysis_endpoint(COMPETITOR_PATH),
    })
  }

  /// POST `body` as JSON and decode the reply, whatever the status code
  async fn post_json<B, R>(&self, url: &str, body: &B) -> Result<R>
  where
    B: Serialize + ?Sized + Sync,
    R: serde::de::DeserializeOwned,
  {
    let response = self
      .client
      .post(url)
      .json(body)
      .send()
      .await
      .map_err(|e| DossierError::transport(url, e))?;

    let status = response.status();
    if !status.is_success() {
      // The backend reports problems inside the body; keep decoding
      tracing::warn!(%url, %status, "analysis backend returned a non-success status");
    }

    let text = response.text().await.map_err(|e| DossierError::transport(url, e))?;
    serde_json::from_str(&text).map_err(|e| DossierError::decode(url, e))
  }
}

#[async_trait]
impl AnalysisBackend for HttpAnalysisBackend {
  async fn run_analysis(&self, request: &AnalysisRequest) -> Result<AnalysisResponse> {
    if let Ok(payload) = serde_json::to_string_pretty(request) {
      tracing::debug!(target: "dossier::backend", "sending analysis request:\n{payload}");
    }

    let response: AnalysisResponse = self.post_json(&self.analysis_url, request).await?;

    if let Ok(payload) = serde_json::to_string_pretty(&response) {
      tracing::debug!(target: "dossier::backend", "received analysis response:\n{payload}");
    }
    tracing::info!(
      target: "dossier::backend",
      "analysis response sections:\n{}",
      describe_sections(&response)
    );

    Ok(response)
  }

  async fn analyze_competitor(
    &self,
    request: &CompetitorAnalysisRequest,
  ) -> Result<CompetitorAnalysisResponse> {
    tracing::debug!(
      target: "dossier::backend",
      competitor = %request.competitor_name,
      "sending competitor analysis request"
    );
    self.post_json(&self.competitor_url, request).await
  }
}

fn presence<T>(field: &Option<T>) -> &'static str {
  if field.is_some() {
    "present"
  } else {
    "absent"
  }
}

/// One-line-per-section summary of what the backend returned
pub fn describe_sections(response: &AnalysisResponse) -> String {
  let success = match response.success {
    Some(true) => "true",
    Some(false) => "false",
    None => "unknown",
  };

  [
    format!("success: {success}"),
    format!("timestamp: {}", response.timestamp.as_deref().unwrap_or("none")),
    format!("linkedInData: {}", presence(&response.linked_in_data)),
    format!("companyData: {}", presence(&response.company_data)),
    format!("marketData: {}", presence(&response.market_data)),
    format!("aiInsights: {}", presence(&response.ai_insights)),
    format!("procurementExecutives: {}", presence(&response.procurement_executives)),
    format!("errors: {}", response.errors.len()),
  ]
  .join("\n")
}
