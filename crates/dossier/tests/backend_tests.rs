use dossier::backend::{AnalysisBackend, HttpAnalysisBackend, ANALYSIS_PATH, COMPETITOR_PATH};
use dossier::contact::ContactOutClient;
use dossier::request::{AnalysisRequest, CompetitorAnalysisRequest};
use dossier::{DossierConfig, DossierError, DossierService};
use mockito::{Matcher, Server};
use serde_json::json;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Log output collected in memory
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
  fn text(&self) -> String {
    String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
  }
}

impl Write for Captured {
  fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
    self.0.lock().unwrap().extend_from_slice(buf);
    Ok(buf.len())
  }

  fn flush(&mut self) -> std::io::Result<()> {
    Ok(())
  }
}

impl<'a> MakeWriter<'a> for Captured {
  type Writer = Captured;

  fn make_writer(&'a self) -> Self::Writer {
    self.clone()
  }
}

fn config_for(server: &Server) -> DossierConfig {
  DossierConfig {
    analysis_base_url: server.url(),
    contact_base_url: server.url(),
    competitors: vec!["TATA Steel".to_string(), "JSPL".to_string(), "SAIL".to_string()],
    ..Default::default()
  }
}

fn acme_request() -> AnalysisRequest {
  AnalysisRequest {
    company_name: "Acme".to_string(),
    key_decision_makers: vec![],
    project_details: String::new(),
    competitors: vec![],
    industry: "Technology".to_string(),
  }
}

#[tokio::test]
async fn test_run_analysis_posts_camel_case_body() {
  let mut server = Server::new_async().await;
  let mock = server
    .mock("POST", ANALYSIS_PATH)
    .match_header("content-type", "application/json")
    .match_body(Matcher::PartialJson(json!({
      "companyName": "Acme",
      "keyDecisionMakers": [],
      "industry": "Technology"
    })))
    .with_status(200)
    .with_header("content-type", "application/json")
    .with_body(json!({ "success": true, "timestamp": "2024-03-01T10:15:00Z" }).to_string())
    .create_async()
    .await;

  let backend = HttpAnalysisBackend::new(&config_for(&server)).unwrap();
  let response = backend.run_analysis(&acme_request()).await.unwrap();

  mock.assert_async().await;
  assert_eq!(response.success, Some(true));
  assert_eq!(response.timestamp.as_deref(), Some("2024-03-01T10:15:00Z"));
}

#[tokio::test]
async fn test_non_success_status_is_still_decoded() {
  let mut server = Server::new_async().await;
  let _mock = server
    .mock("POST", ANALYSIS_PATH)
    .with_status(500)
    .with_body(
      json!({
        "success": false,
        "companyData": null,
        "errors": [{ "source": "linkedin", "message": "timeout" }]
      })
      .to_string(),
    )
    .create_async()
    .await;

  let backend = HttpAnalysisBackend::new(&config_for(&server)).unwrap();
  let response = backend.run_analysis(&acme_request()).await.unwrap();

  assert_eq!(response.success, Some(false));
  assert!(response.company_data.is_none());
  assert_eq!(response.errors.len(), 1);
  assert_eq!(response.errors[0].source, "linkedin");
}

#[tokio::test]
async fn test_unparseable_body_is_a_decode_error() {
  let mut server = Server::new_async().await;
  let _mock = server
    .mock("POST", ANALYSIS_PATH)
    .with_status(502)
    .with_body("<html>Bad Gateway</html>")
    .create_async()
    .await;

  let backend = HttpAnalysisBackend::new(&config_for(&server)).unwrap();
  let result = backend.run_analysis(&acme_request()).await;

  assert!(matches!(result, Err(DossierError::Decode { .. })));
}

#[tokio::test]
async fn test_unreachable_backend_is_a_transport_error() {
  let config = DossierConfig { analysis_base_url: "http://127.0.0.1:9".to_string(), ..Default::default() };
  let backend = HttpAnalysisBackend::new(&config).unwrap();

  let result = backend.run_analysis(&acme_request()).await;
  assert!(matches!(result, Err(DossierError::Transport { .. })));
}

#[tokio::test]
async fn test_competitor_request_body() {
  let mut server = Server::new_async().await;
  let mock = server
    .mock("POST", COMPETITOR_PATH)
    .match_body(Matcher::Json(json!({
      "companyName": "Acme",
      "competitorName": "JSPL",
      "dataType": "TMT"
    })))
    .with_status(200)
    .with_body(json!({ "success": true, "analysis": { "marketPosition": { "marketShare": "9%" } } }).to_string())
    .create_async()
    .await;

  let backend = HttpAnalysisBackend::new(&config_for(&server)).unwrap();
  let request = CompetitorAnalysisRequest {
    company_name: "Acme".to_string(),
    competitor_name: "JSPL".to_string(),
    data_type: "TMT".to_string(),
  };
  let response = backend.analyze_competitor(&request).await.unwrap();

  mock.assert_async().await;
  assert_eq!(response.success, Some(true));
}

#[tokio::test]
async fn test_analysis_without_competitors_makes_no_fanout_calls() {
  let mut server = Server::new_async().await;
  let primary = server
    .mock("POST", ANALYSIS_PATH)
    .match_body(Matcher::PartialJson(json!({ "keyDecisionMakers": [], "industry": "Technology" })))
    .with_status(200)
    .with_body(json!({ "success": true }).to_string())
    .expect(1)
    .create_async()
    .await;
  let competitor = server.mock("POST", COMPETITOR_PATH).expect(0).create_async().await;

  let config = config_for(&server);
  let service = DossierService::new(
    Arc::new(HttpAnalysisBackend::new(&config).unwrap()),
    Arc::new(ContactOutClient::new(&config).unwrap()),
    config,
  );

  let mut form = service.blank_form();
  form.set_company_name("Acme");
  let response = service.analyze(&form).await.unwrap();

  primary.assert_async().await;
  competitor.assert_async().await;
  assert!(response.competitors_engagement.is_none());
}

#[tokio::test]
async fn test_fanout_failures_are_dropped_and_rows_appended() {
  let mut server = Server::new_async().await;
  let _primary = server
    .mock("POST", ANALYSIS_PATH)
    .with_status(200)
    .with_body(
      json!({
        "success": true,
        "CompetitorsEngagement": [{ "competitor": "Acme", "role": "subject" }]
      })
      .to_string(),
    )
    .create_async()
    .await;
  let _sail = server
    .mock("POST", COMPETITOR_PATH)
    .match_body(Matcher::PartialJson(json!({ "competitorName": "SAIL" })))
    .with_status(200)
    .with_body(json!({ "success": true, "analysis": { "priceComparison": { "competitorPrice": "52000" } } }).to_string())
    .create_async()
    .await;
  let _tata = server
    .mock("POST", COMPETITOR_PATH)
    .match_body(Matcher::PartialJson(json!({ "competitorName": "TATA Steel" })))
    .with_status(500)
    .with_body("upstream exploded")
    .create_async()
    .await;
  let _jspl = server
    .mock("POST", COMPETITOR_PATH)
    .match_body(Matcher::PartialJson(json!({ "competitorName": "JSPL" })))
    .with_status(200)
    .with_body(json!({ "success": false }).to_string())
    .create_async()
    .await;

  let config = config_for(&server);
  let service = DossierService::from_config(config).unwrap();

  let mut form = service.blank_form();
  form.set_company_name("Acme");
  form.select_competitors(&["SAIL", "TATA Steel", "JSPL"]);

  let response = service.analyze(&form).await.unwrap();
  let rows = response.competitors_engagement.unwrap();

  let names: Vec<&str> = rows.iter().map(|r| r.competitor.as_str()).collect();
  assert_eq!(names, vec!["Acme", "SAIL"]);
}

async fn section_summary_logged_with(filter: &str) -> String {
  let mut server = Server::new_async().await;
  let _mock = server
    .mock("POST", ANALYSIS_PATH)
    .with_status(200)
    .with_body(json!({ "success": true, "marketData": { "synthesizedData": "up" } }).to_string())
    .create_async()
    .await;

  let captured = Captured::default();
  let subscriber = tracing_subscriber::fmt()
    .with_writer(captured.clone())
    .with_env_filter(EnvFilter::new(filter))
    .with_ansi(false)
    .finish();
  let _guard = tracing::subscriber::set_default(subscriber);

  let backend = HttpAnalysisBackend::new(&config_for(&server)).unwrap();
  backend.run_analysis(&acme_request()).await.unwrap();

  captured.text()
}

#[tokio::test]
async fn test_section_summary_follows_the_log_filter() {
  let shown = section_summary_logged_with("dossier=info").await;
  assert!(shown.contains("analysis response sections"));
  assert!(shown.contains("marketData: present"));

  let hidden = section_summary_logged_with("dossier=warn").await;
  assert!(!hidden.contains("analysis response sections"));
}
