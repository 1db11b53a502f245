//! Outbound request payloads derived from the form

use serde::{Deserialize, Serialize};

use crate::form::{Competitor, FormData};

/// Marker searched for in the project details
const INDUSTRY_MARKER: &str = "industry";

/// Body of `POST /api/analysis/run`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
  pub company_name: String,
  pub key_decision_makers: Vec<String>,
  pub project_details: String,
  pub competitors: Vec<Competitor>,
  pub industry: String,
}

impl AnalysisRequest {
  /// Build the request for `form`, using `default_industry` when none can be found
  pub fn from_form(form: &FormData, default_industry: &str) -> Self {
    let key_decision_makers = form
      .key_decision_makers
      .iter()
      .filter(|kdm| !kdm.name.trim().is_empty())
      .map(|kdm| kdm.name.clone())
      .collect();

    let industry = match form.industry.as_deref().map(str::trim) {
      Some(explicit) if !explicit.is_empty() => explicit.to_string(),
      _ => extract_industry(&form.project_details).unwrap_or_else(|| default_industry.to_string()),
    };

    Self {
      company_name: form.company_name.clone(),
      key_decision_makers,
      project_details: form.project_details.clone(),
      competitors: form.competitors.clone(),
      industry,
    }
  }
}

/// The first whitespace-delimited token after the first case-sensitive
/// `"industry"` in `details`. `None` when the marker is absent; an empty
/// string when nothing follows it.
pub fn extract_industry(details: &str) -> Option<String> {
  let (_, rest) = details.split_once(INDUSTRY_MARKER)?;
  Some(rest.split_whitespace().next().unwrap_or_default().to_string())
}

/// Body of `POST /api/othercompetitor/analyze`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorAnalysisRequest {
  pub company_name: String,
  pub competitor_name: String,
  pub data_type: String,
}
