//! Configuration for the dossier tools
//!
//! Loaded from a JSON file (explicit path, then `.dossier.json`,
//! `dossier.json`, `~/.dossier/config.json`), falling back to defaults,
//! then patched from `DOSSIER_*` environment variables.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use url::Url;

use crate::contact::FallbackPolicy;
use crate::error::{DossierError, Result};

pub const ENV_ANALYSIS_URL: &str = "DOSSIER_ANALYSIS_URL";
pub const ENV_CONTACT_URL: &str = "DOSSIER_CONTACT_URL";
pub const ENV_CONTACT_TOKEN: &str = "DOSSIER_CONTACT_TOKEN";
pub const ENV_LOG_PATH: &str = "DOSSIER_LOG_PATH";

/// Effective configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DossierConfig {
  /// Base URL of the analysis backend (`/api/analysis/run` is appended)
  pub analysis_base_url: String,
  /// Base URL of the contact enrichment API
  pub contact_base_url: String,
  /// Bearer token for the contact enrichment API; server-side only
  #[serde(skip_serializing_if = "Option::is_none")]
  pub contact_token: Option<String>,
  /// What to show when a contact lookup does not find anything
  pub contact_fallback: FallbackPolicy,
  /// Competitors offered as checkboxes, in display order
  pub competitors: Vec<String>,
  /// Industry used when the project details do not name one
  pub default_industry: String,
  /// `dataType` tag sent with every competitor analysis
  pub competitor_data_type: String,
  /// Per-request timeout; `None` waits indefinitely
  pub request_timeout_secs: Option<u64>,
  /// Address the server binds to
  pub bind: SocketAddr,
  /// JSONL activity log written by the server
  pub activity_log_path: PathBuf,
  /// Dashboard sessions kept in memory before the oldest is evicted
  pub max_sessions: usize,
  /// Idle dashboard sessions older than this are dropped
  pub session_idle_secs: u64,
}

fn default_competitors() -> Vec<String> {
  ["TATA Steel", "JSPL", "Essar Steel", "SAIL", "Arcelor Mittal/Nippon Steel (AM/NS)"]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_activity_log_path() -> PathBuf {
  dirs::home_dir()
    .unwrap_or_else(std::env::temp_dir)
    .join(".dossier")
    .join("activity.jsonl")
}

impl Default for DossierConfig {
  fn default() -> Self {
    Self {
      analysis_base_url: "https://high-intelligence-backend.onrender.com".to_string(),
      contact_base_url: "https://api.contactout.com".to_string(),
      contact_token: None,
      contact_fallback: FallbackPolicy::None,
      competitors: default_competitors(),
      default_industry: "Technology".to_string(),
      competitor_data_type: "TMT".to_string(),
      request_timeout_secs: None,
      bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
      activity_log_path: default_activity_log_path(),
      max_sessions: 500,
      session_idle_secs: 3600,
    }
  }
}

impl DossierConfig {
  /// Load configuration from a file
  pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
    let content = std::fs::read_to_string(path.as_ref())?;
    serde_json::from_str(&content).map_err(|e| {
      DossierError::invalid_config(format!("{}: {e}", path.as_ref().display()))
    })
  }

  /// Load from `explicit`, else the first well-known file, else defaults;
  /// then apply environment overrides and validate
  pub fn load(explicit: Option<&Path>) -> Result<Self> {
    let mut config = match explicit {
      Some(path) => Self::load_from_file(path)?,
      None => match Self::discover() {
        Some(path) => Self::load_from_file(path)?,
        None => Self::default(),
      },
    };

    config.apply_env();
    config.validate()?;
    Ok(config)
  }

  fn discover() -> Option<PathBuf> {
    let mut candidates = vec![PathBuf::from(".dossier.json"), PathBuf::from("dossier.json")];
    if let Some(home) = dirs::home_dir() {
      candidates.push(home.join(".dossier").join("config.json"));
    }

    candidates.into_iter().find(|p| p.exists())
  }

  /// Patch fields from `DOSSIER_*` environment variables
  pub fn apply_env(&mut self) {
    if let Ok(url) = std::env::var(ENV_ANALYSIS_URL) {
      self.analysis_base_url = url;
    }
    if let Ok(url) = std::env::var(ENV_CONTACT_URL) {
      self.contact_base_url = url;
    }
    if let Ok(token) = std::env::var(ENV_CONTACT_TOKEN) {
      if !token.trim().is_empty() {
        self.contact_token = Some(token);
      }
    }
    if let Ok(path) = std::env::var(ENV_LOG_PATH) {
      self.activity_log_path = PathBuf::from(path);
    }
  }

  pub fn validate(&self) -> Result<()> {
    parse_base_url("analysis_base_url", &self.analysis_base_url)?;
    parse_base_url("contact_base_url", &self.contact_base_url)?;

    if self.competitors.is_empty() {
      return Err(DossierError::invalid_config("competitors must not be empty"));
    }
    if self.competitors.iter().any(|c| c.trim().is_empty()) {
      return Err(DossierError::invalid_config("competitor names must not be blank"));
    }
    if self.competitor_data_type.trim().is_empty() {
      return Err(DossierError::invalid_config("competitor_data_type must not be blank"));
    }
    if self.max_sessions == 0 {
      return Err(DossierError::invalid_config("max_sessions must be at least 1"));
    }

    Ok(())
  }

  /// `analysis_base_url` joined with `path`
  pub fn analysis_endpoint(&self, path: &str) -> String {
    join_url(&self.analysis_base_url, path)
  }

  /// `contact_base_url` joined with `path`
  pub fn contact_endpoint(&self, path: &str) -> String {
    join_url(&self.contact_base_url, path)
  }
}

fn parse_base_url(field: &str, value: &str) -> Result<Url> {
  if value.trim().is_empty() {
    return Err(DossierError::invalid_config(format!("{field} must not be empty")));
  }

  let url = Url::parse(value)
    .map_err(|e| DossierError::invalid_config(format!("{field} '{value}': {e}")))?;

  match url.scheme() {
    "http" | "https" => Ok(url),
    other => Err(DossierError::invalid_config(format!("{field} has unsupported scheme '{other}'"))),
  }
}

fn join_url(base: &str, path: &str) -> String {
  format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;
  use tempfile::TempDir;

  #[test]
  fn defaults_are_valid() {
    let config = DossierConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.competitors.len(), 5);
    assert_eq!(config.default_industry, "Technology");
    assert_eq!(config.competitor_data_type, "TMT");
    assert!(config.request_timeout_secs.is_none());
    assert_eq!(config.max_sessions, 500);
  }

  #[test]
  fn zero_session_limit_is_rejected() {
    let config = DossierConfig { max_sessions: 0, ..DossierConfig::default() };
    assert!(matches!(config.validate(), Err(DossierError::InvalidConfig { .. })));
  }

  #[test]
  fn endpoints_join_without_double_slashes() {
    let config = DossierConfig {
      analysis_base_url: "http://localhost:9000/".to_string(),
      ..DossierConfig::default()
    };
    assert_eq!(config.analysis_endpoint("/api/analysis/run"), "http://localhost:9000/api/analysis/run");
  }

  #[test]
  fn partial_file_keeps_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dossier.json");
    std::fs::write(&path, r#"{"competitors": ["Acme Rival"], "contact_fallback": "mock"}"#).unwrap();

    let config = DossierConfig::load_from_file(&path).unwrap();
    assert_eq!(config.competitors, vec!["Acme Rival".to_string()]);
    assert_eq!(config.contact_fallback, FallbackPolicy::Mock);
    assert_eq!(config.default_industry, "Technology");
  }

  #[test]
  fn rejects_bad_urls_and_empty_competitors() {
    let bad_url = DossierConfig { analysis_base_url: "ftp://x".to_string(), ..Default::default() };
    assert!(matches!(bad_url.validate(), Err(DossierError::InvalidConfig { .. })));

    let empty = DossierConfig { competitors: Vec::new(), ..Default::default() };
    assert!(empty.validate().is_err());
  }

  #[test]
  fn malformed_file_is_invalid_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(DossierConfig::load(Some(&path)), Err(DossierError::InvalidConfig { .. })));
  }

  #[test]
  #[serial]
  fn env_overrides_apply() {
    std::env::set_var(ENV_ANALYSIS_URL, "http://127.0.0.1:4000");
    std::env::set_var(ENV_CONTACT_TOKEN, "secret-token");

    let mut config = DossierConfig::default();
    config.apply_env();

    std::env::remove_var(ENV_ANALYSIS_URL);
    std::env::remove_var(ENV_CONTACT_TOKEN);

    assert_eq!(config.analysis_base_url, "http://127.0.0.1:4000");
    assert_eq!(config.contact_token.as_deref(), Some("secret-token"));
  }
}
