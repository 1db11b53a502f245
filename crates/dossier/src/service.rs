//! Analysis orchestration: primary call plus competitor fan-out

use std::sync::Arc;

use crate::backend::{AnalysisBackend, HttpAnalysisBackend};
use crate::config::DossierConfig;
use crate::contact::{ContactLookup, ContactOutClient, ContactOutcome};
use crate::error::Result;
use crate::fanout::{enrich_competitors, merge_engagements};
use crate::form::FormData;
use crate::models::AnalysisResponse;
use crate::request::AnalysisRequest;

#[derive(Clone)]
pub struct DossierService {
  backend: Arc<dyn AnalysisBackend>,
  contacts: Arc<dyn ContactLookup>,
  config: Arc<DossierConfig>,
}

impl DossierService {
  pub fn new(
    backend: Arc<dyn AnalysisBackend>,
    contacts: Arc<dyn ContactLookup>,
    config: DossierConfig,
  ) -> Self {
    Self { backend, contacts, config: Arc::new(config) }
  }

  /// Service talking to the configured HTTP endpoints
  pub fn from_config(config: DossierConfig) -> Result<Self> {
    let backend = Arc::new(HttpAnalysisBackend::new(&config)?);
    let contacts = Arc::new(ContactOutClient::new(&config)?);
    Ok(Self::new(backend, contacts, config))
  }

  pub fn config(&self) -> &DossierConfig {
    &self.config
  }

  /// A fresh form with the configured competitor list
  pub fn blank_form(&self) -> FormData {
    FormData::new(self.config.competitors.as_slice())
  }

  /// The request `form` would send
  pub fn build_request(&self, form: &FormData) -> AnalysisRequest {
    AnalysisRequest::from_form(form, &self.config.default_industry)
  }

  /// Run the primary analysis and the competitor fan-out concurrently and
  /// merge the fan-out rows into the primary response
  pub async fn analyze(&self, form: &FormData) -> Result<AnalysisResponse> {
    let request = self.build_request(form);
    herald::info(&format!(
      "Running analysis for {} ({} decision makers, {} competitors)",
      request.company_name,
      request.key_decision_makers.len(),
      form.selected_competitors().count()
    ));

    let (primary, engagements) = tokio::join!(
      self.backend.run_analysis(&request),
      enrich_competitors(
        self.backend.as_ref(),
        &request.company_name,
        &form.competitors,
        &self.config.competitor_data_type,
      )
    );

    let mut response = primary.inspect_err(|e| herald::error(&format!("Analysis failed: {e}")))?;
    merge_engagements(&mut response, engagements);

    if !response.errors.is_empty() {
      herald::warn(&format!("Analysis completed with {} reported errors", response.errors.len()));
    }

    Ok(response)
  }

  /// Look up contact details for one profile
  pub async fn lookup_contact(&self, profile_url: &str) -> ContactOutcome {
    let outcome = self.contacts.lookup(profile_url).await;
    if let ContactOutcome::Error { detail } = &outcome {
      herald::warn(&format!("Contact lookup for {profile_url} failed: {detail}"));
    }
    outcome
  }
}
