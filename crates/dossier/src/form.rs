//! Dashboard form state and its edit operations

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDecisionMaker {
  #[serde(default)]
  pub name: String,
}

impl KeyDecisionMaker {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into() }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competitor {
  pub name: String,
  #[serde(default)]
  pub selected: bool,
}

impl Competitor {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into(), selected: false }
  }
}

/// Everything the user enters before running an analysis
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
  #[serde(default)]
  pub company_name: String,
  #[serde(default)]
  pub key_decision_makers: Vec<KeyDecisionMaker>,
  #[serde(default)]
  pub project_details: String,
  #[serde(default)]
  pub competitors: Vec<Competitor>,
  /// Explicit industry; when blank it is derived from `project_details`
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub industry: Option<String>,
}

impl FormData {
  /// A fresh form: one empty decision-maker slot and every competitor unselected
  pub fn new<S: AsRef<str>>(competitors: &[S]) -> Self {
    Self {
      company_name: String::new(),
      key_decision_makers: vec![KeyDecisionMaker::default()],
      project_details: String::new(),
      competitors: competitors.iter().map(|c| Competitor::new(c.as_ref())).collect(),
      industry: None,
    }
  }

  pub fn set_company_name(&mut self, value: impl Into<String>) {
    self.company_name = value.into();
  }

  pub fn set_project_details(&mut self, value: impl Into<String>) {
    self.project_details = value.into();
  }

  pub fn set_industry(&mut self, value: impl Into<String>) {
    let value = value.into();
    self.industry = if value.trim().is_empty() { None } else { Some(value) };
  }

  /// Replace the name in slot `index`; out-of-range indexes are ignored
  pub fn set_decision_maker(&mut self, index: usize, value: impl Into<String>) {
    if let Some(slot) = self.key_decision_makers.get_mut(index) {
      slot.name = value.into();
    }
  }

  /// Append an empty decision-maker slot
  pub fn add_decision_maker(&mut self) {
    self.key_decision_makers.push(KeyDecisionMaker::default());
  }

  /// Remove slot `index`; the last remaining slot cannot be removed
  pub fn remove_decision_maker(&mut self, index: usize) -> bool {
    if self.key_decision_makers.len() <= 1 || index >= self.key_decision_makers.len() {
      return false;
    }
    self.key_decision_makers.remove(index);
    true
  }

  /// Flip the checkbox at `index`
  pub fn toggle_competitor(&mut self, index: usize) {
    if let Some(competitor) = self.competitors.get_mut(index) {
      competitor.selected = !competitor.selected;
    }
  }

  /// Select exactly the competitors whose names appear in `names`
  pub fn select_competitors<S: AsRef<str>>(&mut self, names: &[S]) {
    for competitor in &mut self.competitors {
      competitor.selected = names.iter().any(|n| n.as_ref() == competitor.name);
    }
  }

  /// Selected competitors in checkbox order
  pub fn selected_competitors(&self) -> impl Iterator<Item = &Competitor> {
    self.competitors.iter().filter(|c| c.selected)
  }

  /// Whether the one required field is filled in
  pub fn is_submittable(&self) -> bool {
    !self.company_name.trim().is_empty()
  }
}
