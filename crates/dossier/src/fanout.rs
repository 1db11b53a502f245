//! Per-competitor enrichment
//!
//! One request per selected competitor, all in flight at once. Results keep
//! checkbox order; failed or unsuccessful lookups are dropped.

use futures::future::join_all;
use serde_json::Value;

use crate::backend::{AnalysisBackend, CompetitorAnalysisResponse};
use crate::form::Competitor;
use crate::models::{AnalysisResponse, CompetitorEngagement, EngagementRole};
use crate::request::CompetitorAnalysisRequest;

/// Analyze every selected competitor in `competitors` against `company_name`
pub async fn enrich_competitors(
  backend: &dyn AnalysisBackend,
  company_name: &str,
  competitors: &[Competitor],
  data_type: &str,
) -> Vec<CompetitorEngagement> {
  let requests: Vec<CompetitorAnalysisRequest> = competitors
    .iter()
    .filter(|c| c.selected)
    .map(|c| CompetitorAnalysisRequest {
      company_name: company_name.to_string(),
      competitor_name: c.name.clone(),
      data_type: data_type.to_string(),
    })
    .collect();

  if requests.is_empty() {
    return Vec::new();
  }

  let outcomes = join_all(requests.iter().map(|request| async move {
    match backend.analyze_competitor(request).await {
      Ok(response) => engagement_from(&request.competitor_name, response),
      Err(e) => {
        herald::warn(&format!("competitor analysis for {} failed: {e}", request.competitor_name));
        None
      }
    }
  }))
  .await;

  let engagements: Vec<CompetitorEngagement> = outcomes.into_iter().flatten().collect();
  tracing::info!(
    requested = requests.len(),
    succeeded = engagements.len(),
    "competitor enrichment finished"
  );
  engagements
}

/// Tag a successful analysis with the competitor's name; anything else is dropped
pub fn engagement_from(
  competitor: &str,
  response: CompetitorAnalysisResponse,
) -> Option<CompetitorEngagement> {
  if response.success != Some(true) {
    herald::debug(&format!("competitor analysis for {competitor} was not successful"));
    return None;
  }

  let mut analysis = match response.analysis {
    Some(Value::Object(map)) => map,
    _ => {
      herald::debug(&format!("competitor analysis for {competitor} carried no analysis object"));
      return None;
    }
  };
  analysis.insert("competitor".to_string(), Value::String(competitor.to_string()));

  match serde_json::from_value::<CompetitorEngagement>(Value::Object(analysis)) {
    Ok(mut engagement) => {
      engagement.role = EngagementRole::Competitor;
      Some(engagement)
    }
    Err(e) => {
      herald::debug(&format!("competitor analysis for {competitor} did not decode: {e}"));
      None
    }
  }
}

/// Append `engagements` after whatever comparison rows the backend already sent
pub fn merge_engagements(response: &mut AnalysisResponse, engagements: Vec<CompetitorEngagement>) {
  if engagements.is_empty() {
    return;
  }

  response.competitors_engagement.get_or_insert_with(Vec::new).extend(engagements);
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn engagement(name: &str) -> CompetitorEngagement {
    CompetitorEngagement { competitor: name.to_string(), ..Default::default() }
  }

  #[test]
  fn successful_analysis_is_tagged_with_competitor() {
    let response = CompetitorAnalysisResponse {
      success: Some(true),
      analysis: Some(json!({
        "competitor": "ignored",
        "marketPosition": { "marketShare": "12%", "regionalStrengths": "East" }
      })),
    };

    let engagement = engagement_from("JSPL", response).unwrap();
    assert_eq!(engagement.competitor, "JSPL");
    assert_eq!(engagement.role, EngagementRole::Competitor);
    assert!(engagement.market_position.is_some());
  }

  #[test]
  fn unsuccessful_or_empty_analysis_is_dropped() {
    let failed = CompetitorAnalysisResponse { success: Some(false), analysis: Some(json!({})) };
    assert!(engagement_from("SAIL", failed).is_none());

    let missing_flag = CompetitorAnalysisResponse { success: None, analysis: Some(json!({})) };
    assert!(engagement_from("SAIL", missing_flag).is_none());

    let not_object = CompetitorAnalysisResponse { success: Some(true), analysis: Some(json!("text")) };
    assert!(engagement_from("SAIL", not_object).is_none());
  }

  #[test]
  fn merge_appends_after_existing_rows() {
    let mut response = AnalysisResponse {
      competitors_engagement: Some(vec![engagement("From backend")]),
      ..Default::default()
    };

    merge_engagements(&mut response, vec![engagement("JSPL"), engagement("SAIL")]);

    let names: Vec<String> =
      response.competitors_engagement.unwrap().into_iter().map(|e| e.competitor).collect();
    assert_eq!(names, vec!["From backend", "JSPL", "SAIL"]);
  }

  #[test]
  fn merge_creates_list_when_absent_and_skips_empty() {
    let mut response = AnalysisResponse::default();
    merge_engagements(&mut response, Vec::new());
    assert!(response.competitors_engagement.is_none());

    merge_engagements(&mut response, vec![engagement("JSPL")]);
    assert_eq!(response.competitors_engagement.unwrap().len(), 1);
  }
}
