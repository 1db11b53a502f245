//! Dashboard rendering
//!
//! The response is first flattened into view structs (all gating, sentinel
//! filtering and de-duplication happens here), then fed to the askama
//! template, which only loops and branches on booleans.

use askama::Template;
use std::collections::HashSet;

use crate::contact::{ContactBook, ContactOutcome};
use crate::error::{DossierError, Result};
use crate::form::FormData;
use crate::models::{
  shown, AnalysisResponse, CompanyRecord, CompetitorEngagement, EngagementRole, LooseValue,
  ProcurementExecutive, Profile,
};
use crate::state::{AppState, Phase};

const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabeledValue {
  pub label: String,
  pub value: String,
}

impl LabeledValue {
  fn new(label: &str, value: impl Into<String>) -> Self {
    Self { label: label.to_string(), value: value.into() }
  }
}

// Form
// ====

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecisionMakerSlot {
  pub index: usize,
  pub name: String,
  pub removable: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompetitorBox {
  pub name: String,
  pub checked: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormView {
  pub company_name: String,
  pub project_details: String,
  pub industry: String,
  pub decision_makers: Vec<DecisionMakerSlot>,
  pub competitors: Vec<CompetitorBox>,
}

pub fn form_view(form: &FormData) -> FormView {
  let removable = form.key_decision_makers.len() > 1;

  FormView {
    company_name: form.company_name.clone(),
    project_details: form.project_details.clone(),
    industry: form.industry.clone().unwrap_or_default(),
    decision_makers: form
      .key_decision_makers
      .iter()
      .enumerate()
      .map(|(index, kdm)| DecisionMakerSlot { index, name: kdm.name.clone(), removable })
      .collect(),
    competitors: form
      .competitors
      .iter()
      .map(|c| CompetitorBox { name: c.name.clone(), checked: c.selected })
      .collect(),
  }
}

// Results
// =======

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionChip {
  pub label: String,
  pub present: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusView {
  pub status: String,
  pub timestamp: String,
  pub company: String,
  pub industry: String,
  pub errors: Vec<String>,
  pub chips: Vec<SectionChip>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoleView {
  pub title: String,
  pub subtitle: String,
  pub caption: String,
}

/// Contact controls under a profile card
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactView {
  pub profile_url: String,
  pub show_options: bool,
  pub emails: Vec<String>,
  pub phones: Vec<String>,
  pub fallback: bool,
  pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrimaryView {
  pub name: String,
  pub headline: String,
  pub profile_link: String,
  pub has_current_role: bool,
  pub current_role: RoleView,
  pub previous_roles: Vec<RoleView>,
  pub education: String,
  pub contact: ContactView,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactLine {
  pub kind: String,
  pub value: String,
  pub href: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectorView {
  pub name: String,
  pub din: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyView {
  pub fields: Vec<LabeledValue>,
  pub contact: Vec<ContactLine>,
  pub directors: Vec<DirectorView>,
  pub legal: Vec<LabeledValue>,
  pub financial: Vec<LabeledValue>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsightView {
  pub html: String,
  pub summary: String,
  pub key_points: Vec<String>,
  pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonSection {
  pub title: String,
  pub rows: Vec<LabeledValue>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonCard {
  pub heading: String,
  pub baseline: bool,
  pub sections: Vec<ComparisonSection>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutiveCard {
  pub name: String,
  pub headline: String,
  pub profile_url: String,
  pub current_role: String,
  pub contact: ContactView,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultsView {
  pub status: StatusView,
  pub has_primary: bool,
  pub primary: PrimaryView,
  pub has_company: bool,
  pub company: CompanyView,
  pub has_market: bool,
  pub market: InsightView,
  pub has_ai: bool,
  pub ai: InsightView,
  pub has_comparisons: bool,
  pub comparisons: Vec<ComparisonCard>,
  pub has_executives: bool,
  pub executives: Vec<ExecutiveCard>,
}

/// Flatten `response` for display. `company_fallback` names the company when
/// the backend did not echo it.
pub fn results_view(
  response: &AnalysisResponse,
  contacts: &ContactBook,
  company_fallback: &str,
) -> ResultsView {
  let echoed = response.form_data.as_ref();
  let company = echoed
    .and_then(|f| f.company_name.clone())
    .filter(|c| !c.trim().is_empty())
    .unwrap_or_else(|| company_fallback.to_string());

  let primary = response
    .linked_in_data
    .as_ref()
    .and_then(|data| data.results.first())
    .map(|first| {
      let input_name = first.input.as_ref().and_then(|i| i.name.as_deref());
      primary_view(first.primary(), input_name, first.link.as_deref(), contacts)
    });

  let registry = response
    .company_data
    .as_ref()
    .and_then(|c| c.data.as_ref())
    .map(company_view);

  let market = response.market_data.as_ref().map(|m| InsightView {
    html: m.synthesized_data.as_deref().map(insight_html).unwrap_or_default(),
    ..Default::default()
  });

  let ai = response.ai_insights.as_ref().map(|a| InsightView {
    html: a.synthesized_data.as_deref().map(insight_html).unwrap_or_default(),
    summary: a.summary.clone().unwrap_or_default(),
    key_points: a.key_points.clone(),
    recommendations: a.recommendations.clone(),
  });

  let comparisons = response
    .competitors_engagement
    .as_ref()
    .map(|rows| rows.iter().map(|row| comparison_card(row, &company)).collect::<Vec<_>>());

  let executives = response
    .procurement_executives
    .as_ref()
    .map(|p| {
      dedupe_executives(&p.results).into_iter().map(|e| executive_card(e, contacts)).collect::<Vec<_>>()
    });

  ResultsView {
    status: status_view(response, &company),
    has_primary: primary.is_some(),
    primary: primary.unwrap_or_default(),
    has_company: registry.is_some(),
    company: registry.unwrap_or_default(),
    has_market: market.is_some(),
    market: market.unwrap_or_default(),
    has_ai: ai.is_some(),
    ai: ai.unwrap_or_default(),
    has_comparisons: comparisons.is_some(),
    comparisons: comparisons.unwrap_or_default(),
    has_executives: executives.is_some(),
    executives: executives.unwrap_or_default(),
  }
}

fn status_view(response: &AnalysisResponse, company: &str) -> StatusView {
  let linked_in_count = response
    .linked_in_data
    .as_ref()
    .map(|d| d.count.unwrap_or(d.results.len() as u64))
    .unwrap_or(0);

  StatusView {
    status: if response.success == Some(true) { "Success" } else { "Partial Success" }.to_string(),
    timestamp: response.timestamp.as_deref().map(format_timestamp).unwrap_or_default(),
    company: company.to_string(),
    industry: response
      .form_data
      .as_ref()
      .and_then(|f| f.industry.clone())
      .unwrap_or_default(),
    errors: response.errors.iter().map(|e| format!("{}: {}", e.source, e.message)).collect(),
    chips: vec![
      SectionChip {
        label: format!("LinkedIn Profiles ({linked_in_count})"),
        present: response.linked_in_data.is_some(),
      },
      SectionChip { label: "Company Data".to_string(), present: response.company_data.is_some() },
      SectionChip { label: "Market Insights".to_string(), present: response.market_data.is_some() },
      SectionChip { label: "AI Analysis".to_string(), present: response.ai_insights.is_some() },
      SectionChip {
        label: "Procurement Executives".to_string(),
        present: response.procurement_executives.is_some(),
      },
    ],
  }
}

/// RFC 3339 timestamps shown as `YYYY-MM-DD HH:MM:SS UTC`; anything else verbatim
pub fn format_timestamp(raw: &str) -> String {
  chrono::DateTime::parse_from_rfc3339(raw)
    .map(|t| t.with_timezone(&chrono::Utc).format("%Y-%m-%d %H:%M:%S UTC").to_string())
    .unwrap_or_else(|_| raw.to_string())
}

fn role_view(title: &Option<String>, subtitle: &Option<String>, caption: &Option<String>) -> RoleView {
  RoleView {
    title: title.clone().unwrap_or_default(),
    subtitle: subtitle.clone().unwrap_or_default(),
    caption: caption.clone().unwrap_or_default(),
  }
}

fn primary_view(
  profile: Option<&Profile>,
  input_name: Option<&str>,
  link: Option<&str>,
  contacts: &ContactBook,
) -> PrimaryView {
  let name = profile
    .and_then(|p| p.full_name.as_deref())
    .filter(|n| !n.is_empty())
    .or(input_name.filter(|n| !n.is_empty()))
    .unwrap_or("Name not available")
    .to_string();

  let headline = profile
    .and_then(|p| p.headline.as_deref())
    .filter(|h| !h.is_empty())
    .unwrap_or("Title not available")
    .to_string();

  let profile_link = link
    .filter(|l| !l.is_empty())
    .or_else(|| profile.and_then(|p| p.linkedin_url.as_deref()))
    .unwrap_or_default()
    .to_string();

  let experiences = profile.map(|p| p.experiences.as_slice()).unwrap_or_default();
  let current = experiences.first().map(|e| role_view(&e.title, &e.subtitle, &e.caption));
  let previous_roles = experiences
    .iter()
    .skip(1)
    .take(2)
    .map(|e| role_view(&e.title, &e.subtitle, &e.caption))
    .collect();

  let education = profile
    .and_then(|p| p.educations.first())
    .map(|e| match (&e.title, &e.subtitle) {
      (Some(title), Some(subtitle)) if !subtitle.is_empty() => format!("{title}, {subtitle}"),
      (Some(title), _) => title.clone(),
      (None, Some(subtitle)) => subtitle.clone(),
      (None, None) => String::new(),
    })
    .unwrap_or_default();

  let contact = contact_view(&profile_link, contacts);

  PrimaryView {
    name,
    headline,
    has_current_role: current.is_some(),
    current_role: current.unwrap_or_default(),
    previous_roles,
    education,
    profile_link,
    contact,
  }
}

fn company_view(record: &CompanyRecord) -> CompanyView {
  let mut view = CompanyView::default();

  if let Some(basic) = &record.basic {
    let fields = [
      ("Legal Name", &basic.legal_name),
      ("CIN", &basic.cin),
      ("Registration Date", &basic.registration_date),
      ("Company Type", &basic.company_type),
      ("Registered Office", &basic.registered_office),
    ];
    view.fields = fields
      .iter()
      .filter_map(|(label, field)| shown(field).map(|value| LabeledValue::new(label, value)))
      .collect();

    if let Some(contact) = &basic.contact {
      if let Some(phone) = shown(&contact.phone) {
        view.contact.push(ContactLine { kind: "Phone".to_string(), href: format!("tel:{phone}"), value: phone });
      }
      if let Some(email) = shown(&contact.email) {
        view.contact.push(ContactLine { kind: "Email".to_string(), href: format!("mailto:{email}"), value: email });
      }
      if let Some(website) = shown(&contact.website) {
        view.contact.push(ContactLine { kind: "Website".to_string(), href: website_href(&website), value: website });
      }
    }
  }

  if let Some(legal) = &record.legal {
    if let Some(roc) = shown(&legal.roc_office) {
      view.legal.push(LabeledValue::new("ROC Office", roc));
    }
    if let Some(status) = shown(&legal.compliance_status) {
      view.legal.push(LabeledValue::new("Compliance Status (MCA21)", status));
    }
    view.directors = legal
      .directors
      .iter()
      .filter_map(|d| {
        let name = shown(&d.name)?;
        Some(DirectorView { name, din: shown(&d.din).unwrap_or_default() })
      })
      .collect();
  }

  if let Some(financial) = &record.financial {
    view.financial = financial
      .iter()
      .filter(|(_, value)| !value.is_object() && !value.is_array())
      .filter_map(|(key, value)| {
        LooseValue(value.clone()).display().map(|v| LabeledValue::new(&key.replace('_', " "), v))
      })
      .collect();
  }

  view
}

fn website_href(website: &str) -> String {
  if website.starts_with("http://") || website.starts_with("https://") {
    website.to_string()
  } else {
    format!("https://{website}")
  }
}

/// Backend insight text is trusted HTML; newlines become line breaks
pub fn insight_html(text: &str) -> String {
  text.replace('\n', "<br/>")
}

fn price_row(label: &str, value: Option<&Option<LooseValue>>) -> LabeledValue {
  let text = value.and_then(|v| v.as_ref()).and_then(LooseValue::plain);
  LabeledValue::new(label, text.unwrap_or_else(|| NOT_AVAILABLE.to_string()))
}

fn comparison_card(row: &CompetitorEngagement, company: &str) -> ComparisonCard {
  let heading = match row.role {
    EngagementRole::Subject => format!("{company} (baseline)"),
    EngagementRole::Competitor if row.competitor.is_empty() => format!("{company} vs {NOT_AVAILABLE}"),
    EngagementRole::Competitor => format!("{company} vs {}", row.competitor),
  };

  let price = row.price_comparison.as_ref();
  let market = row.market_position.as_ref();
  let quality = row.product_quality.as_ref();
  let delivery = row.delivery_logistics.as_ref();
  let financial = row.financial_stability.as_ref();
  let strategy = row.strategic_recommendations.as_ref();

  let sections = vec![
    ComparisonSection {
      title: "Price Analysis".to_string(),
      rows: vec![
        price_row(&format!("{company} Price"), price.map(|p| &p.subject_price)),
        price_row("Competitor Price", price.map(|p| &p.competitor_price)),
        price_row("Price Difference", price.map(|p| &p.percentage_difference)),
      ],
    },
    ComparisonSection {
      title: "Market Position".to_string(),
      rows: vec![
        price_row("Market Share", market.map(|m| &m.market_share)),
        price_row("Regional Strengths", market.map(|m| &m.regional_strengths)),
      ],
    },
    ComparisonSection {
      title: "Product Quality".to_string(),
      rows: vec![
        price_row("Quality Certifications", quality.map(|q| &q.quality_certifications)),
        price_row("Product Range", quality.map(|q| &q.product_range_availability)),
      ],
    },
    ComparisonSection {
      title: "Delivery Logistics".to_string(),
      rows: vec![
        price_row("Delivery Timeframes", delivery.map(|d| &d.delivery_timeframes)),
        price_row("Geographic Coverage", delivery.map(|d| &d.geographic_coverage)),
      ],
    },
    ComparisonSection {
      title: "Financial Stability".to_string(),
      rows: vec![
        price_row("Credit Terms", financial.map(|f| &f.credit_terms_comparison)),
        price_row("Risk Assessment", financial.map(|f| &f.risk_assessment)),
      ],
    },
    ComparisonSection {
      title: "Strategic Recommendations".to_string(),
      rows: vec![
        price_row("Key Differentiators", strategy.map(|s| &s.key_differentiators)),
        price_row("Negotiation Leverage Points", strategy.map(|s| &s.negotiation_leverage_points)),
      ],
    },
  ];

  ComparisonCard { heading, baseline: row.role == EngagementRole::Subject, sections }
}

/// Executives with a usable profile, first occurrence of each profile URL only
pub fn dedupe_executives(results: &[ProcurementExecutive]) -> Vec<&ProcurementExecutive> {
  let mut seen: HashSet<Option<&str>> = HashSet::new();

  results
    .iter()
    .filter(|e| !e.has_error() && e.primary().is_some())
    .filter(|e| seen.insert(e.profile_url.as_deref()))
    .collect()
}

fn executive_card(executive: &ProcurementExecutive, contacts: &ContactBook) -> ExecutiveCard {
  let profile = executive.primary();
  let profile_url = executive.profile_url.clone().unwrap_or_default();

  let current_role = profile
    .and_then(|p| p.experiences.first())
    .map(|e| match (&e.title, &e.subtitle) {
      (Some(title), Some(subtitle)) if !subtitle.is_empty() => format!("{title} · {subtitle}"),
      (Some(title), _) => title.clone(),
      _ => String::new(),
    })
    .unwrap_or_default();

  ExecutiveCard {
    name: profile.and_then(|p| p.full_name.clone()).unwrap_or_default(),
    headline: profile.and_then(|p| p.headline.clone()).unwrap_or_default(),
    contact: contact_view(&profile_url, contacts),
    profile_url,
    current_role,
  }
}

fn contact_view(profile_url: &str, contacts: &ContactBook) -> ContactView {
  let mut view = ContactView { profile_url: profile_url.to_string(), ..Default::default() };
  if profile_url.is_empty() {
    return view;
  }

  let Some(entry) = contacts.get(profile_url) else {
    return view;
  };

  view.show_options = entry.show_options;
  view.fallback = entry.fallback;

  match &entry.contact_info {
    Some(info) => {
      view.emails = info.email.clone();
      view.phones = info.phone.clone();
    }
    None => {
      view.message = match &entry.outcome {
        ContactOutcome::NotFound => "No contact details found".to_string(),
        ContactOutcome::Error { detail } => format!("Contact lookup failed: {detail}"),
        ContactOutcome::Found { .. } => String::new(),
      };
    }
  }

  view
}

// Page
// ====

/// Where the page's forms point
#[derive(Debug, Clone, Default)]
pub struct PageOptions {
  /// Target of the analysis form; `None` renders a read-only report
  pub form_action: Option<String>,
  /// Target of the Connect buttons; `None` hides them
  pub contact_action: Option<String>,
  /// Reload interval while loading
  pub refresh_secs: Option<u32>,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardPage {
  pub show_form: bool,
  pub form_action: String,
  pub form: FormView,
  pub loading: bool,
  pub refresh: bool,
  pub refresh_secs: u32,
  pub has_results: bool,
  pub results: ResultsView,
  pub has_contact_action: bool,
  pub contact_action: String,
}

impl DashboardPage {
  pub fn from_state(state: &AppState, options: &PageOptions) -> Self {
    let phase = state.phase();
    let results = state
      .response
      .as_ref()
      .filter(|_| phase == Phase::Populated)
      .map(|r| results_view(r, &state.contacts, &state.form.company_name));

    Self {
      show_form: options.form_action.is_some(),
      form_action: options.form_action.clone().unwrap_or_default(),
      form: form_view(&state.form),
      loading: phase == Phase::Loading,
      refresh: phase == Phase::Loading && options.refresh_secs.is_some(),
      refresh_secs: options.refresh_secs.unwrap_or_default(),
      has_results: results.is_some(),
      results: results.unwrap_or_default(),
      has_contact_action: options.contact_action.is_some(),
      contact_action: options.contact_action.clone().unwrap_or_default(),
    }
  }

  pub fn to_html(&self) -> Result<String> {
    self.render().map_err(|e| DossierError::render("dashboard", e))
  }
}

/// Render the whole page for `state`
pub fn render_page(state: &AppState, options: &PageOptions) -> Result<String> {
  DashboardPage::from_state(state, options).to_html()
}

/// Read-only report for one response, as written by the CLI
pub fn render_report(form: &FormData, response: &AnalysisResponse) -> Result<String> {
  let state = AppState { form: form.clone(), response: Some(response.clone()), ..Default::default() };
  render_page(&state, &PageOptions::default())
}
