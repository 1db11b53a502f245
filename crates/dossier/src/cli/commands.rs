//! CLI command implementations

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use colored::*;
use std::path::PathBuf;

use crate::cli::display::{print_contact, print_summary};
use crate::config::DossierConfig;
use crate::contact::ContactBook;
use crate::form::{Competitor, FormData, KeyDecisionMaker};
use crate::render::{render_report, results_view};
use crate::service::DossierService;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
  /// Merged analysis response as JSON
  Json,
  /// Standalone HTML report
  Html,
  /// Plain text overview
  Summary,
}

/// Inputs for one `run`
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
  pub company: String,
  pub decision_makers: Vec<String>,
  pub details: String,
  pub industry: Option<String>,
  pub competitors: Vec<String>,
}

impl RunOptions {
  /// The dashboard form these options correspond to. Competitors outside the
  /// configured list are appended, selected.
  pub fn to_form(&self, config: &DossierConfig) -> FormData {
    let mut form = FormData::new(config.competitors.as_slice());
    form.set_company_name(self.company.trim());
    form.set_project_details(self.details.as_str());
    if let Some(industry) = &self.industry {
      form.set_industry(industry.as_str());
    }

    if !self.decision_makers.is_empty() {
      form.key_decision_makers = self.decision_makers.iter().map(KeyDecisionMaker::new).collect();
    }

    form.select_competitors(self.competitors.as_slice());
    for name in &self.competitors {
      if !form.competitors.iter().any(|c| &c.name == name) {
        form.competitors.push(Competitor { name: name.clone(), selected: true });
      }
    }

    form
  }
}

/// Run an analysis and print or write the result
pub async fn run(
  config: DossierConfig,
  options: RunOptions,
  format: OutputFormat,
  output: Option<PathBuf>,
) -> Result<()> {
  let form = options.to_form(&config);
  if !form.is_submittable() {
    bail!("Company name is required");
  }

  let service = DossierService::from_config(config)?;
  let response = service.analyze(&form).await?;

  let rendered = match format {
    OutputFormat::Json => serde_json::to_string_pretty(&response)?,
    OutputFormat::Html => render_report(&form, &response)?,
    OutputFormat::Summary => {
      if output.is_some() {
        herald::warn("--output is ignored for the summary format");
      }
      print_summary(&results_view(&response, &ContactBook::default(), &form.company_name));
      return Ok(());
    }
  };

  match output {
    Some(path) => {
      std::fs::write(&path, rendered).with_context(|| format!("Failed to write {}", path.display()))?;
      println!("{} Wrote report to {}", "✓".green(), path.display().to_string().cyan());
    }
    None => println!("{rendered}"),
  }

  Ok(())
}

/// Look up one profile's contact details
pub async fn contact(config: DossierConfig, profile_url: &str) -> Result<()> {
  let policy = config.contact_fallback;
  let service = DossierService::from_config(config)?;
  let outcome = service.lookup_contact(profile_url).await;

  let mut book = ContactBook::default();
  book.record(profile_url, outcome, policy);
  match book.get(profile_url) {
    Some(entry) => print_contact(profile_url, entry),
    None => bail!("No contact state recorded for {profile_url}"),
  }

  Ok(())
}

/// Print the effective configuration with the token masked
pub fn show_config(config: &DossierConfig) -> Result<()> {
  let mut shown = config.clone();
  if shown.contact_token.is_some() {
    shown.contact_token = Some("********".to_string());
  }
  println!("{}", serde_json::to_string_pretty(&shown)?);
  Ok(())
}
