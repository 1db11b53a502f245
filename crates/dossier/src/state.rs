//! Application state for one dashboard session
//!
//! All mutation goes through [`AppState::reduce`], so the submit, merge and
//! contact flows can be driven and inspected without a browser or server.

use serde::{Deserialize, Serialize};

use crate::contact::{ContactBook, ContactOutcome, FallbackPolicy};
use crate::form::FormData;
use crate::models::AnalysisResponse;

/// Something that happened to a session
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
  SetCompanyName(String),
  SetProjectDetails(String),
  SetIndustry(String),
  SetDecisionMaker { index: usize, name: String },
  AddDecisionMaker,
  RemoveDecisionMaker(usize),
  ToggleCompetitor(usize),
  /// Submit pressed; ignored while a submission is running
  SubmitStarted,
  AnalysisCompleted(Box<AnalysisResponse>),
  AnalysisFailed(String),
  ContactResolved { profile_url: String, outcome: ContactOutcome, policy: FallbackPolicy },
}

/// What the page can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
  Idle,
  Loading,
  Populated,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
  pub form: FormData,
  pub loading: bool,
  pub response: Option<AnalysisResponse>,
  pub contacts: ContactBook,
  /// Last submission failure; logged, never shown to the user
  #[serde(skip_serializing_if = "Option::is_none")]
  pub last_error: Option<String>,
}

impl AppState {
  pub fn new(form: FormData) -> Self {
    Self { form, ..Default::default() }
  }

  /// Apply `action`. Returns `false` when the action was rejected.
  pub fn reduce(&mut self, action: Action) -> bool {
    match action {
      Action::SetCompanyName(value) => self.form.set_company_name(value),
      Action::SetProjectDetails(value) => self.form.set_project_details(value),
      Action::SetIndustry(value) => self.form.set_industry(value),
      Action::SetDecisionMaker { index, name } => self.form.set_decision_maker(index, name),
      Action::AddDecisionMaker => self.form.add_decision_maker(),
      Action::RemoveDecisionMaker(index) => return self.form.remove_decision_maker(index),
      Action::ToggleCompetitor(index) => self.form.toggle_competitor(index),
      Action::SubmitStarted => {
        if self.loading || !self.form.is_submittable() {
          return false;
        }
        self.loading = true;
      }
      Action::AnalysisCompleted(response) => {
        self.loading = false;
        self.last_error = None;
        self.response = Some(*response);
      }
      Action::AnalysisFailed(detail) => {
        // The previous response, if any, stays on screen
        self.loading = false;
        self.last_error = Some(detail);
      }
      Action::ContactResolved { profile_url, outcome, policy } => {
        self.contacts.record(&profile_url, outcome, policy);
      }
    }
    true
  }

  /// The renderable phase
  pub fn phase(&self) -> Phase {
    if self.loading {
      Phase::Loading
    } else if self.response.is_some() {
      Phase::Populated
    } else {
      Phase::Idle
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn state() -> AppState {
    AppState::new(FormData::new(&["TATA Steel", "JSPL"]))
  }

  #[test]
  fn submit_requires_company_name() {
    let mut state = state();
    assert!(!state.reduce(Action::SubmitStarted));
    assert_eq!(state.phase(), Phase::Idle);

    state.reduce(Action::SetCompanyName("Acme".to_string()));
    assert!(state.reduce(Action::SubmitStarted));
    assert_eq!(state.phase(), Phase::Loading);
    assert!(!state.reduce(Action::SubmitStarted));
  }

  #[test]
  fn completion_populates_and_failure_keeps_previous_response() {
    let mut state = state();
    state.reduce(Action::SetCompanyName("Acme".to_string()));
    state.reduce(Action::SubmitStarted);

    let response = AnalysisResponse { success: Some(true), ..Default::default() };
    state.reduce(Action::AnalysisCompleted(Box::new(response.clone())));
    assert_eq!(state.phase(), Phase::Populated);

    state.reduce(Action::SubmitStarted);
    state.reduce(Action::AnalysisFailed("connection refused".to_string()));
    assert_eq!(state.phase(), Phase::Populated);
    assert_eq!(state.response, Some(response));
    assert_eq!(state.last_error.as_deref(), Some("connection refused"));
  }

  #[test]
  fn failure_on_first_submit_returns_to_idle() {
    let mut state = state();
    state.reduce(Action::SetCompanyName("Acme".to_string()));
    state.reduce(Action::SubmitStarted);
    state.reduce(Action::AnalysisFailed("bad json".to_string()));

    assert_eq!(state.phase(), Phase::Idle);
    assert!(state.response.is_none());
  }

  #[test]
  fn form_edits_flow_through() {
    let mut state = state();
    state.reduce(Action::AddDecisionMaker);
    state.reduce(Action::SetDecisionMaker { index: 1, name: "Jane".to_string() });
    state.reduce(Action::ToggleCompetitor(1));
    state.reduce(Action::SetProjectDetails("steel industry rollout".to_string()));
    state.reduce(Action::SetIndustry("Steel".to_string()));

    assert_eq!(state.form.key_decision_makers.len(), 2);
    assert_eq!(state.form.key_decision_makers[1].name, "Jane");
    assert!(state.form.competitors[1].selected);
    assert_eq!(state.form.industry.as_deref(), Some("Steel"));

    assert!(state.reduce(Action::RemoveDecisionMaker(0)));
    assert!(!state.reduce(Action::RemoveDecisionMaker(0)));
  }

  #[test]
  fn contact_resolution_is_independent_of_response() {
    let mut state = state();
    state.reduce(Action::ContactResolved {
      profile_url: "https://x.test/in/a".to_string(),
      outcome: ContactOutcome::NotFound,
      policy: FallbackPolicy::None,
    });

    assert!(state.response.is_none());
    assert!(state.contacts.get("https://x.test/in/a").is_some());
  }
}
