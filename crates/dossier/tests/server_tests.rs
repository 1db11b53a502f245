//! Route tests driving the router in-process

use async_trait::async_trait;
use axum::{
  body::{to_bytes, Body},
  http::{header, Request, StatusCode},
  Router,
};
use dossier::backend::{AnalysisBackend, CompetitorAnalysisResponse};
use dossier::contact::{ContactLookup, ContactOutcome, FallbackPolicy};
use dossier::error::Result;
use dossier::models::AnalysisResponse;
use dossier::request::{AnalysisRequest, CompetitorAnalysisRequest};
use dossier::server::context::AppContext;
use dossier::server::routing::create_router;
use dossier::{DossierConfig, DossierService};
use herald::activity::ActivityLog;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

struct StubBackend;

#[async_trait]
impl AnalysisBackend for StubBackend {
  async fn run_analysis(&self, request: &AnalysisRequest) -> Result<AnalysisResponse> {
    let body = json!({
      "success": true,
      "formData": { "companyName": request.company_name, "industry": request.industry },
      "errors": [{ "source": "linkedin", "message": "timeout" }]
    });
    Ok(serde_json::from_value(body).unwrap())
  }

  async fn analyze_competitor(
    &self,
    _request: &CompetitorAnalysisRequest,
  ) -> Result<CompetitorAnalysisResponse> {
    Ok(CompetitorAnalysisResponse { success: Some(true), analysis: Some(json!({})) })
  }
}

struct UnreachableContacts;

#[async_trait]
impl ContactLookup for UnreachableContacts {
  async fn lookup(&self, _profile_url: &str) -> ContactOutcome {
    ContactOutcome::Error { detail: "network down".to_string() }
  }
}

fn app(dir: &TempDir, policy: FallbackPolicy) -> Router {
  let config = DossierConfig {
    contact_fallback: policy,
    competitors: vec!["TATA Steel".to_string(), "JSPL".to_string()],
    ..Default::default()
  };
  let service = DossierService::new(Arc::new(StubBackend), Arc::new(UnreachableContacts), config);
  let activity = ActivityLog::open_with_echo(dir.path().join("activity.jsonl"), false).unwrap();
  create_router(AppContext::new(service, activity))
}

async fn body_text(response: axum::response::Response) -> String {
  let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
  String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
  Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
  Request::builder()
    .method("POST")
    .uri(uri)
    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
    .body(Body::from(body.to_string()))
    .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
  Request::builder()
    .method("POST")
    .uri(uri)
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from(body.to_string()))
    .unwrap()
}

#[tokio::test]
async fn test_index_renders_idle_form() {
  let dir = TempDir::new().unwrap();
  let response = app(&dir, FallbackPolicy::None).oneshot(get("/")).await.unwrap();

  assert_eq!(response.status(), StatusCode::OK);
  let html = body_text(response).await;
  assert!(html.contains("Analyze Company"));
  assert!(html.contains("TATA Steel"));
  assert!(!html.contains("Analysis Status"));
}

#[tokio::test]
async fn test_status_reports_healthy() {
  let dir = TempDir::new().unwrap();
  let response = app(&dir, FallbackPolicy::None).oneshot(get("/status")).await.unwrap();

  assert_eq!(response.status(), StatusCode::OK);
  let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
  assert_eq!(body["status"], "healthy");
  assert_eq!(body["sessions"], 0);
}

#[tokio::test]
async fn test_api_analysis_requires_company_name() {
  let dir = TempDir::new().unwrap();
  let response = app(&dir, FallbackPolicy::None)
    .oneshot(post_json("/api/analysis", json!({ "companyName": "  " })))
    .await
    .unwrap();

  assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
  let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
  assert_eq!(body["errors"][0]["key"], "company_name_required");
}

#[tokio::test]
async fn test_api_analysis_returns_merged_response() {
  let dir = TempDir::new().unwrap();
  let form = json!({
    "companyName": "Acme",
    "projectDetails": "rollout in the steel industry segment",
    "competitors": [{ "name": "JSPL", "selected": true }]
  });
  let response = app(&dir, FallbackPolicy::None).oneshot(post_json("/api/analysis", form)).await.unwrap();

  assert_eq!(response.status(), StatusCode::OK);
  let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
  assert_eq!(body["analysis"]["formData"]["industry"], "segment");
  assert_eq!(body["analysis"]["CompetitorsEngagement"][0]["competitor"], "JSPL");
}

#[tokio::test]
async fn test_add_person_rerenders_form() {
  let dir = TempDir::new().unwrap();
  let response = app(&dir, FallbackPolicy::None)
    .oneshot(post_form("/analysis", "company_name=Acme&decision_maker=Jane&action=add_person"))
    .await
    .unwrap();

  assert_eq!(response.status(), StatusCode::OK);
  let html = body_text(response).await;
  assert_eq!(html.matches("name=\"decision_maker\"").count(), 2);
  assert!(html.contains("remove_person:1"));
}

#[tokio::test]
async fn test_form_edits_and_rejected_submits_store_no_session() {
  let dir = TempDir::new().unwrap();
  let app = app(&dir, FallbackPolicy::None);

  for _ in 0..5 {
    let response =
      app.clone().oneshot(post_form("/analysis", "company_name=Acme&action=add_person")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
  }
  let response = app
    .clone()
    .oneshot(post_form("/analysis", "company_name=&decision_maker=Jane&decision_maker=Raj&action=remove_person:1"))
    .await
    .unwrap();
  assert_eq!(response.status(), StatusCode::OK);

  let response = app.clone().oneshot(post_form("/analysis", "company_name=&action=analyze")).await.unwrap();
  assert_eq!(response.status(), StatusCode::OK);

  let response = app.clone().oneshot(get("/status")).await.unwrap();
  let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
  assert_eq!(body["sessions"], 0);

  let response = app.clone().oneshot(post_form("/analysis", "company_name=Acme")).await.unwrap();
  assert_eq!(response.status(), StatusCode::SEE_OTHER);

  let response = app.oneshot(get("/status")).await.unwrap();
  let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
  assert_eq!(body["sessions"], 1);
}

#[tokio::test]
async fn test_submission_redirects_and_session_populates() {
  let dir = TempDir::new().unwrap();
  let app = app(&dir, FallbackPolicy::None);

  let response = app
    .clone()
    .oneshot(post_form("/analysis", "company_name=Acme&competitor=JSPL&action=analyze"))
    .await
    .unwrap();
  assert_eq!(response.status(), StatusCode::SEE_OTHER);
  let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
  assert!(location.starts_with("/analysis/"));

  let mut html = String::new();
  for _ in 0..50 {
    let response = app.clone().oneshot(get(&location)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    html = body_text(response).await;
    if html.contains("Analysis Status") {
      break;
    }
    tokio::time::sleep(Duration::from_millis(20)).await;
  }

  assert!(html.contains("Analysis Status: Success"));
  assert!(html.contains("linkedin: timeout"));
  assert!(html.contains("Acme vs JSPL"));
  assert!(!html.contains("Company Information"));
  assert!(!html.contains("http-equiv=\"refresh\""));
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
  let dir = TempDir::new().unwrap();
  let uri = format!("/analysis/{}", uuid::Uuid::new_v4());
  let response = app(&dir, FallbackPolicy::None).oneshot(get(&uri)).await.unwrap();

  assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_contact_api_applies_fallback_policy() {
  let dir = TempDir::new().unwrap();
  let uri = "/api/contacts?profile_url=https%3A%2F%2Fwww.linkedin.com%2Fin%2Fjane-doe";

  let response = app(&dir, FallbackPolicy::Mock).oneshot(get(uri)).await.unwrap();
  assert_eq!(response.status(), StatusCode::OK);
  let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
  assert_eq!(body["outcome"]["kind"], "error");
  assert_eq!(body["fallback"], true);
  assert_eq!(body["contact_info"]["email"][0], "jane.sample@example.com");

  let response = app(&dir, FallbackPolicy::None).oneshot(get(uri)).await.unwrap();
  let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
  assert_eq!(body["fallback"], false);
  assert!(body.get("contact_info").is_none());
}

#[tokio::test]
async fn test_requests_are_logged() {
  let dir = TempDir::new().unwrap();
  let app = app(&dir, FallbackPolicy::None);

  app.clone().oneshot(get("/version")).await.unwrap();
  let response = app.oneshot(get("/logs?level=info")).await.unwrap();
  assert_eq!(response.status(), StatusCode::OK);

  let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
  let logs = body["logs"].as_array().unwrap();
  assert!(logs.iter().any(|entry| entry["context"]["path"] == "/version"));
}

#[tokio::test]
async fn test_logs_rejects_unknown_level() {
  let dir = TempDir::new().unwrap();
  let response = app(&dir, FallbackPolicy::None).oneshot(get("/logs?level=loud")).await.unwrap();
  assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
