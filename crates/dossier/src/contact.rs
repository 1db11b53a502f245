//! Contact enrichment for profile cards
//!
//! Lookups return an explicit [`ContactOutcome`]; whether a miss is shown as
//! a miss or papered over with sample data is the caller's [`FallbackPolicy`].

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

use crate::config::DossierConfig;
use crate::error::{DossierError, Result};

pub const PROFILE_LOOKUP_PATH: &str = "/v2/contacts/profile-url";

/// Email addresses and phone numbers for one profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
  pub email: Vec<String>,
  pub phone: Vec<String>,
}

impl ContactInfo {
  /// The fixed sample profile used by [`FallbackPolicy::Mock`]
  pub fn sample() -> Self {
    Self {
      email: vec!["jane.sample@example.com".to_string()],
      phone: vec!["+1 555 0100".to_string()],
    }
  }
}

/// Result of one lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContactOutcome {
  Found { email: Vec<String>, phone: Vec<String> },
  NotFound,
  Error { detail: String },
}

/// What to show when a lookup does not find anything
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
  /// Show the miss or the error
  #[default]
  None,
  /// Show the sample profile as if the lookup had succeeded
  Mock,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactLookup: Send + Sync {
  async fn lookup(&self, profile_url: &str) -> ContactOutcome;
}

/// Client for the ContactOut profile lookup API
pub struct ContactOutClient {
  client: Client,
  endpoint: String,
  token: Option<String>,
}

impl ContactOutClient {
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
      endpoint: config.contact_endpoint(PROFILE_LOOKUP_PATH),
      token: config.contact_token.clone(),
    })
  }
}

#[async_trait]
impl ContactLookup for ContactOutClient {
  async fn lookup(&self, profile_url: &str) -> ContactOutcome {
    let Some(token) = self.token.as_deref() else {
      return ContactOutcome::Error { detail: "contact enrichment token is not configured".to_string() };
    };

    let response = match self
      .client
      .get(&self.endpoint)
      .query(&[("profile_url", profile_url)])
      .bearer_auth(token)
      .send()
      .await
    {
      Ok(response) => response,
      Err(e) => return ContactOutcome::Error { detail: format!("request failed: {e}") },
    };

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
      return ContactOutcome::NotFound;
    }
    if !status.is_success() {
      return ContactOutcome::Error { detail: format!("contact API returned HTTP {status}") };
    }

    match response.json::<Value>().await {
      Ok(body) => outcome_from_body(&body),
      Err(e) => ContactOutcome::Error { detail: format!("unreadable contact response: {e}") },
    }
  }
}

/// Interpret a lookup body: both `email` and `phone` must be present, either
/// at the top level or under `profile`
pub fn outcome_from_body(body: &Value) -> ContactOutcome {
  let source = match body.get("profile") {
    Some(profile) if profile.is_object() => profile,
    _ => body,
  };

  match (source.get("email"), source.get("phone")) {
    (Some(email), Some(phone)) if !email.is_null() && !phone.is_null() => {
      ContactOutcome::Found { email: string_list(email), phone: string_list(phone) }
    }
    _ => ContactOutcome::NotFound,
  }
}

/// A string or an array of strings as a list
fn string_list(value: &Value) -> Vec<String> {
  let items: Vec<&Value> = match value {
    Value::Array(items) => items.iter().collect(),
    other => vec![other],
  };

  items
    .into_iter()
    .filter_map(|item| match item {
      Value::String(s) => Some(s.trim().to_string()),
      Value::Number(n) => Some(n.to_string()),
      _ => None,
    })
    .filter(|s| !s.is_empty())
    .collect()
}

/// Key used for contact state: no query, no fragment, no trailing slash
pub fn normalize_profile_url(profile_url: &str) -> String {
  let trimmed = profile_url.trim();

  match Url::parse(trimmed) {
    Ok(mut url) => {
      url.set_query(None);
      url.set_fragment(None);
      url.as_str().trim_end_matches('/').to_string()
    }
    Err(_) => {
      let end = trimmed.find(['?', '#']).unwrap_or(trimmed.len());
      trimmed[..end].trim_end_matches('/').to_string()
    }
  }
}

/// Contact state for one profile card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEntry {
  /// Whether the Email/Call options are revealed
  pub show_options: bool,
  /// What the lookup actually returned
  pub outcome: ContactOutcome,
  /// What to display, if anything
  pub contact_info: Option<ContactInfo>,
  /// `contact_info` is sample data, not a lookup result
  pub fallback: bool,
}

/// Contact state for all cards on a page, keyed by normalized profile URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactBook {
  entries: HashMap<String, ContactEntry>,
}

impl ContactBook {
  /// Store `outcome` for `profile_url`, applying `policy` to misses
  pub fn record(&mut self, profile_url: &str, outcome: ContactOutcome, policy: FallbackPolicy) {
    let (contact_info, fallback) = match (&outcome, policy) {
      (ContactOutcome::Found { email, phone }, _) => {
        (Some(ContactInfo { email: email.clone(), phone: phone.clone() }), false)
      }
      (_, FallbackPolicy::Mock) => (Some(ContactInfo::sample()), true),
      (_, FallbackPolicy::None) => (None, false),
    };

    self.entries.insert(
      normalize_profile_url(profile_url),
      ContactEntry { show_options: true, outcome, contact_info, fallback },
    );
  }

  pub fn get(&self, profile_url: &str) -> Option<&ContactEntry> {
    self.entries.get(&normalize_profile_url(profile_url))
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}
