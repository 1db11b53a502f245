//! Shapes returned by the analysis backend
//!
//! The backend contract is loose: every section may be missing, null or
//! shaped differently than expected. Sections, list items and scalar fields
//! are decoded leniently so one malformed value only discards itself.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Backend convention for "no data available"
pub const SENTINEL: &str = "0";

fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: DeserializeOwned,
{
  let value = Option::<Value>::deserialize(deserializer)?;
  Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

fn lenient_or_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: DeserializeOwned + Default,
{
  Ok(lenient::<D, T>(deserializer)?.unwrap_or_default())
}

/// Items that fail to decode are dropped; anything but an array is `None`
fn lenient_items<'de, D, T>(deserializer: D) -> std::result::Result<Option<Vec<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: DeserializeOwned,
{
  let value = Option::<Value>::deserialize(deserializer)?;
  Ok(match value {
    Some(Value::Array(items)) => {
      Some(items.into_iter().filter_map(|item| serde_json::from_value(item).ok()).collect())
    }
    _ => None,
  })
}

fn lenient_vec<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
  D: Deserializer<'de>,
  T: DeserializeOwned,
{
  Ok(lenient_items::<D, T>(deserializer)?.unwrap_or_default())
}

/// Strings, numbers and booleans as text; anything else is `None`
fn loose_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(match Option::<Value>::deserialize(deserializer)? {
    Some(Value::String(s)) => Some(s),
    Some(Value::Number(n)) => Some(n.to_string()),
    Some(Value::Bool(b)) => Some(b.to_string()),
    _ => None,
  })
}

fn loose_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(loose_text(deserializer)?.unwrap_or_default())
}

/// A count sent as a number or a numeric string
fn loose_count<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(match Option::<Value>::deserialize(deserializer)? {
    Some(Value::Number(n)) => n.as_u64(),
    Some(Value::String(s)) => s.trim().parse().ok(),
    _ => None,
  })
}

/// A loosely typed scalar from the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LooseValue(pub Value);

impl LooseValue {
  pub fn text(value: &str) -> Self {
    Self(Value::String(value.to_string()))
  }

  /// Whether this is the `"0"` string sentinel (numeric zero is not)
  pub fn is_sentinel(&self) -> bool {
    matches!(&self.0, Value::String(s) if s == SENTINEL)
  }

  /// Display text, or `None` for null and the `"0"` sentinel
  pub fn display(&self) -> Option<String> {
    if self.is_sentinel() {
      return None;
    }
    self.plain()
  }

  /// Display text without sentinel handling; `None` only for null
  pub fn plain(&self) -> Option<String> {
    match &self.0 {
      Value::Null => None,
      Value::String(s) => Some(s.clone()),
      Value::Number(n) => Some(n.to_string()),
      Value::Bool(b) => Some(b.to_string()),
      other => Some(other.to_string()),
    }
  }
}

/// Optional field → display text, honoring the sentinel
pub fn shown(field: &Option<LooseValue>) -> Option<String> {
  field.as_ref().and_then(LooseValue::display)
}

/// Response of `POST /api/analysis/run`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
  #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
  pub success: Option<bool>,

  #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
  pub timestamp: Option<String>,

  #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
  pub form_data: Option<EchoedForm>,

  #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
  pub linked_in_data: Option<LinkedInData>,

  #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
  pub company_data: Option<CompanyData>,

  #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
  pub procurement_executives: Option<ProcurementExecutives>,

  #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
  pub market_data: Option<MarketData>,

  #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
  pub ai_insights: Option<AiInsights>,

  #[serde(
    rename = "CompetitorsEngagement",
    default,
    deserialize_with = "lenient_items",
    skip_serializing_if = "Option::is_none"
  )]
  pub competitors_engagement: Option<Vec<CompetitorEngagement>>,

  #[serde(default, deserialize_with = "lenient_vec", skip_serializing_if = "Vec::is_empty")]
  pub errors: Vec<AnalysisError>,
}

/// The subset of the submitted form the backend echoes back
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EchoedForm {
  #[serde(default, deserialize_with = "loose_text")]
  pub company_name: Option<String>,
  #[serde(default, deserialize_with = "loose_text")]
  pub industry: Option<String>,
}

/// A partial failure reported inside a successful response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisError {
  #[serde(default, deserialize_with = "loose_string")]
  pub source: String,
  #[serde(default, deserialize_with = "loose_string")]
  pub message: String,
}

// LinkedIn
// ========

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedInData {
  #[serde(default, deserialize_with = "lenient")]
  pub success: Option<bool>,
  #[serde(default, deserialize_with = "loose_count")]
  pub count: Option<u64>,
  #[serde(default, deserialize_with = "lenient_vec")]
  pub results: Vec<LinkedInProfile>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedInProfile {
  #[serde(default, deserialize_with = "lenient")]
  pub input: Option<ProfileInput>,
  #[serde(default, deserialize_with = "loose_text")]
  pub search_query: Option<String>,
  #[serde(default, deserialize_with = "loose_text")]
  pub link: Option<String>,
  #[serde(default, deserialize_with = "loose_text")]
  pub title: Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub profile_data: Option<ProfileEnvelope>,
  #[serde(default, deserialize_with = "loose_text")]
  pub error: Option<String>,
}

impl LinkedInProfile {
  /// First scraped profile, if any
  pub fn primary(&self) -> Option<&Profile> {
    self.profile_data.as_ref().and_then(|p| p.data.first())
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileInput {
  #[serde(default, deserialize_with = "loose_text")]
  pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileEnvelope {
  #[serde(default, deserialize_with = "lenient_vec")]
  pub data: Vec<Profile>,
  #[serde(default, deserialize_with = "lenient")]
  pub success: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
  #[serde(default, deserialize_with = "loose_text")]
  pub full_name: Option<String>,
  #[serde(default, deserialize_with = "loose_text")]
  pub first_name: Option<String>,
  #[serde(default, deserialize_with = "loose_text")]
  pub last_name: Option<String>,
  #[serde(default, deserialize_with = "loose_text")]
  pub headline: Option<String>,
  #[serde(default, deserialize_with = "loose_text")]
  pub linkedin_url: Option<String>,
  #[serde(default, deserialize_with = "loose_text")]
  pub address_with_country: Option<String>,
  /// Sometimes a number, sometimes text such as `"500+"`
  #[serde(default)]
  pub connections: Option<LooseValue>,
  #[serde(default)]
  pub followers: Option<LooseValue>,
  #[serde(default, deserialize_with = "lenient_vec")]
  pub experiences: Vec<Experience>,
  #[serde(default, deserialize_with = "lenient_vec")]
  pub educations: Vec<Education>,
  #[serde(default, deserialize_with = "lenient")]
  pub is_procurement_executive: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experience {
  #[serde(default, deserialize_with = "loose_text")]
  pub title: Option<String>,
  #[serde(default, deserialize_with = "loose_text")]
  pub subtitle: Option<String>,
  #[serde(default, deserialize_with = "loose_text")]
  pub caption: Option<String>,
  #[serde(default, deserialize_with = "loose_text")]
  pub metadata: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
  #[serde(default, deserialize_with = "loose_text")]
  pub title: Option<String>,
  #[serde(default, deserialize_with = "loose_text")]
  pub subtitle: Option<String>,
  #[serde(default, deserialize_with = "loose_text")]
  pub caption: Option<String>,
}

// Company registry
// ================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyData {
  #[serde(default, deserialize_with = "lenient")]
  pub data: Option<CompanyRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
  #[serde(rename = "Basic_Company_Details", default, deserialize_with = "lenient")]
  pub basic: Option<BasicCompanyDetails>,

  #[serde(
    rename = "Legal & Compliance Details",
    alias = "Legal_&_Compliance_Details",
    default,
    deserialize_with = "lenient"
  )]
  pub legal: Option<LegalCompliance>,

  #[serde(rename = "Financial_Health_&_Cash_Rich_Status", default, deserialize_with = "lenient")]
  pub financial: Option<serde_json::Map<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicCompanyDetails {
  #[serde(rename = "Legal Name", default)]
  pub legal_name: Option<LooseValue>,
  #[serde(rename = "CIN", default)]
  pub cin: Option<LooseValue>,
  #[serde(rename = "Registration Date", default)]
  pub registration_date: Option<LooseValue>,
  #[serde(rename = "Company Type", default)]
  pub company_type: Option<LooseValue>,
  #[serde(rename = "Registered Office", default)]
  pub registered_office: Option<LooseValue>,
  #[serde(rename = "Contact Details", default, deserialize_with = "lenient")]
  pub contact: Option<RegistryContact>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryContact {
  #[serde(rename = "Phone", default)]
  pub phone: Option<LooseValue>,
  #[serde(rename = "Email", default)]
  pub email: Option<LooseValue>,
  #[serde(rename = "Website", default)]
  pub website: Option<LooseValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegalCompliance {
  #[serde(rename = "ROC Office", alias = "ROC_Office", default)]
  pub roc_office: Option<LooseValue>,
  #[serde(rename = "Active_Compliance_Status_MCA21", default)]
  pub compliance_status: Option<LooseValue>,
  #[serde(
    rename = "List of Directors",
    alias = "List_of_Directors",
    default,
    deserialize_with = "lenient_vec"
  )]
  pub directors: Vec<Director>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Director {
  #[serde(rename = "Name", default)]
  pub name: Option<LooseValue>,
  #[serde(rename = "DIN", default)]
  pub din: Option<LooseValue>,
}

// Procurement executives
// ======================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcurementExecutives {
  #[serde(default, deserialize_with = "lenient")]
  pub success: Option<bool>,
  #[serde(default, deserialize_with = "loose_text")]
  pub company_name: Option<String>,
  #[serde(default, deserialize_with = "loose_count")]
  pub executives_found: Option<u64>,
  #[serde(default, deserialize_with = "lenient_vec")]
  pub results: Vec<ProcurementExecutive>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcurementExecutive {
  #[serde(default, deserialize_with = "loose_text")]
  pub query: Option<String>,
  #[serde(default, deserialize_with = "loose_text")]
  pub title: Option<String>,
  #[serde(default, deserialize_with = "loose_text")]
  pub profile_url: Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub profile_data: Option<ProfileEnvelope>,
  /// Sometimes a message, sometimes a flag
  #[serde(default)]
  pub error: Option<Value>,
}

impl ProcurementExecutive {
  pub fn has_error(&self) -> bool {
    match &self.error {
      None | Some(Value::Null) | Some(Value::Bool(false)) => false,
      Some(Value::String(s)) => !s.is_empty(),
      Some(_) => true,
    }
  }

  pub fn primary(&self) -> Option<&Profile> {
    self.profile_data.as_ref().and_then(|p| p.data.first())
  }
}

// Insight blobs
// =============

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketData {
  #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
  pub synthesized_data: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub gemini_data: Option<Value>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub perplexity_data: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiInsights {
  #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
  pub summary: Option<String>,
  #[serde(default, deserialize_with = "lenient_vec", skip_serializing_if = "Vec::is_empty")]
  pub recommendations: Vec<String>,
  #[serde(default, deserialize_with = "lenient_vec", skip_serializing_if = "Vec::is_empty")]
  pub key_points: Vec<String>,
  #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
  pub synthesized_data: Option<String>,
}

// Competitor comparison
// =====================

/// Who a comparison row describes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngagementRole {
  /// The analyzed company compared against itself (baseline row)
  Subject,
  #[default]
  Competitor,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorEngagement {
  #[serde(default, deserialize_with = "loose_string")]
  pub competitor: String,
  /// Unknown roles read as competitor rows
  #[serde(default, deserialize_with = "lenient_or_default")]
  pub role: EngagementRole,
  #[serde(default, deserialize_with = "lenient")]
  pub price_comparison: Option<PriceComparison>,
  #[serde(default, deserialize_with = "lenient")]
  pub market_position: Option<MarketPosition>,
  #[serde(default, deserialize_with = "lenient")]
  pub product_quality: Option<ProductQuality>,
  #[serde(default, deserialize_with = "lenient")]
  pub delivery_logistics: Option<DeliveryLogistics>,
  #[serde(default, deserialize_with = "lenient")]
  pub financial_stability: Option<FinancialStability>,
  #[serde(default, deserialize_with = "lenient")]
  pub strategic_recommendations: Option<StrategicRecommendations>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceComparison {
  /// Price quoted by the analyzed company
  #[serde(alias = "jswSteelPrice", default)]
  pub subject_price: Option<LooseValue>,
  #[serde(default)]
  pub competitor_price: Option<LooseValue>,
  #[serde(default)]
  pub percentage_difference: Option<LooseValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketPosition {
  #[serde(default)]
  pub market_share: Option<LooseValue>,
  #[serde(default)]
  pub regional_strengths: Option<LooseValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuality {
  #[serde(default)]
  pub quality_certifications: Option<LooseValue>,
  #[serde(default)]
  pub product_range_availability: Option<LooseValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryLogistics {
  #[serde(default)]
  pub delivery_timeframes: Option<LooseValue>,
  #[serde(default)]
  pub geographic_coverage: Option<LooseValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialStability {
  #[serde(default)]
  pub credit_terms_comparison: Option<LooseValue>,
  #[serde(default)]
  pub risk_assessment: Option<LooseValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategicRecommendations {
  #[serde(default)]
  pub key_differentiators: Option<LooseValue>,
  #[serde(default)]
  pub negotiation_leverage_points: Option<LooseValue>,
}
