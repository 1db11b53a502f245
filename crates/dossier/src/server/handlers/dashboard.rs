//! Dashboard page handlers
//!
//! Pages are server-rendered. A submitted analysis runs in a background task
//! and its session page reloads itself until the result lands.

use axum::{
  extract::{Extension, Path, State},
  http::StatusCode,
  response::{Html, IntoResponse, Redirect, Response},
};
use url::form_urlencoded;
use uuid::Uuid;

use crate::error::{DossierError, Result};
use crate::form::{FormData, KeyDecisionMaker};
use crate::render::{render_page, PageOptions};
use crate::server::context::AppContext;
use crate::server::middleware::RequestContext;
use crate::state::{Action, AppState};

/// Seconds between reloads of a loading page
const REFRESH_SECS: u32 = 2;

/// What the form's submit button asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
  Analyze,
  AddPerson,
  RemovePerson(usize),
}

/// A decoded dashboard form post
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
  pub form: FormData,
  pub intent: Intent,
}

impl Submission {
  /// Decode an urlencoded body on top of `blank`, which supplies the competitor list
  pub fn parse(body: &str, blank: &FormData) -> Self {
    let mut form = blank.clone();
    let mut decision_makers = Vec::new();
    let mut selected = Vec::new();
    let mut intent = Intent::Analyze;

    for (key, value) in form_urlencoded::parse(body.as_bytes()) {
      match key.as_ref() {
        "company_name" => form.set_company_name(value.into_owned()),
        "project_details" => form.set_project_details(value.into_owned()),
        "industry" => form.set_industry(value.into_owned()),
        "decision_maker" => decision_makers.push(value.into_owned()),
        "competitor" => selected.push(value.into_owned()),
        "action" => intent = parse_intent(&value),
        _ => {}
      }
    }

    if !decision_makers.is_empty() {
      form.key_decision_makers = decision_makers.into_iter().map(KeyDecisionMaker::new).collect();
    }
    form.select_competitors(selected.as_slice());

    Self { form, intent }
  }
}

fn parse_intent(value: &str) -> Intent {
  match value.split_once(':') {
    Some(("remove_person", index)) => index.parse().map(Intent::RemovePerson).unwrap_or(Intent::Analyze),
    _ if value == "add_person" => Intent::AddPerson,
    _ => Intent::Analyze,
  }
}

fn session_options(id: Uuid) -> PageOptions {
  PageOptions {
    form_action: Some(format!("/analysis/{id}")),
    contact_action: Some(format!("/analysis/{id}/contacts")),
    refresh_secs: Some(REFRESH_SECS),
  }
}

fn page(state: &AppState, options: &PageOptions) -> Result<Html<String>> {
  render_page(state, options).map(Html)
}

/// Options for a page that is not backed by a stored session
fn unsaved_options() -> PageOptions {
  PageOptions { form_action: Some("/analysis".to_string()), ..Default::default() }
}

/// Apply a submitted form and its intent to `state`; `true` when an analysis
/// should start
fn apply_submission(state: &mut AppState, submission: Submission) -> bool {
  state.form = submission.form;
  match submission.intent {
    Intent::AddPerson => {
      state.reduce(Action::AddDecisionMaker);
      false
    }
    Intent::RemovePerson(index) => {
      state.reduce(Action::RemoveDecisionMaker(index));
      false
    }
    Intent::Analyze => state.reduce(Action::SubmitStarted),
  }
}

/// GET / - Empty dashboard
pub async fn index(State(ctx): State<AppContext>) -> Result<Html<String>> {
  let state = AppState::new(ctx.service.blank_form());
  page(&state, &unsaved_options())
}

/// POST /analysis - Start a new session once the form is accepted
///
/// Edits and rejected submits are rendered back without storing anything.
pub async fn create(
  State(ctx): State<AppContext>,
  Extension(context): Extension<RequestContext>,
  body: String,
) -> Result<Response> {
  let blank = ctx.service.blank_form();
  let mut state = AppState::new(blank.clone());
  if !apply_submission(&mut state, Submission::parse(&body, &blank)) {
    return Ok(page(&state, &unsaved_options())?.into_response());
  }

  let form = state.form.clone();
  let id = ctx.sessions.create(state).await;
  context.log_info(&format!("Session {id} created"), "dashboard").await;
  start_analysis(&ctx, &context, id, form).await
}

/// POST /analysis/{id} - Edit or resubmit the form of an existing session
pub async fn resubmit(
  State(ctx): State<AppContext>,
  Extension(context): Extension<RequestContext>,
  Path(id): Path<Uuid>,
  body: String,
) -> Result<Response> {
  let submission = Submission::parse(&body, &ctx.service.blank_form());

  let outcome = ctx
    .sessions
    .update(id, |state| {
      // A running analysis owns the session until it finishes
      if state.loading {
        return None;
      }
      let started = apply_submission(state, submission);
      Some((started, state.clone()))
    })
    .await
    .ok_or_else(|| DossierError::session_not_found(id))?;

  match outcome {
    None => Ok(Redirect::to(&format!("/analysis/{id}")).into_response()),
    Some((true, state)) => start_analysis(&ctx, &context, id, state.form).await,
    Some((false, state)) => Ok(page(&state, &session_options(id))?.into_response()),
  }
}

async fn start_analysis(
  ctx: &AppContext,
  context: &RequestContext,
  id: Uuid,
  form: FormData,
) -> Result<Response> {
  spawn_analysis(ctx.clone(), id, form);
  context.log_info(&format!("Analysis started for session {id}"), "dashboard").await;
  Ok(Redirect::to(&format!("/analysis/{id}")).into_response())
}

/// Run the analysis in the background and feed the result back through the reducer
fn spawn_analysis(ctx: AppContext, id: Uuid, form: FormData) {
  tokio::spawn(async move {
    let action = match ctx.service.analyze(&form).await {
      Ok(response) => {
        ctx.activity.success("dashboard", &format!("Analysis for session {id} finished")).await;
        Action::AnalysisCompleted(Box::new(response))
      }
      Err(e) => {
        ctx.activity.error("dashboard", &format!("Analysis for session {id} failed: {e}")).await;
        Action::AnalysisFailed(e.to_string())
      }
    };

    if ctx.sessions.dispatch(id, action).await.is_none() {
      herald::warn(&format!("Session {id} disappeared before its analysis finished"));
    }
  });
}

/// GET /analysis/{id} - Render a session
pub async fn show(State(ctx): State<AppContext>, Path(id): Path<Uuid>) -> Result<Html<String>> {
  let state = ctx.sessions.get(id).await.ok_or_else(|| DossierError::session_not_found(id))?;
  page(&state, &session_options(id))
}

/// POST /analysis/{id}/contacts - Look up one profile's contact details
pub async fn resolve_contact(
  State(ctx): State<AppContext>,
  Extension(context): Extension<RequestContext>,
  Path(id): Path<Uuid>,
  body: String,
) -> Result<Response> {
  if ctx.sessions.get(id).await.is_none() {
    return Err(DossierError::session_not_found(id));
  }

  let profile_url = form_urlencoded::parse(body.as_bytes())
    .find(|(key, _)| key == "profile_url")
    .map(|(_, value)| value.into_owned())
    .filter(|url| !url.trim().is_empty());

  let Some(profile_url) = profile_url else {
    return Ok((StatusCode::BAD_REQUEST, "profile_url is required").into_response());
  };

  let outcome = ctx.service.lookup_contact(&profile_url).await;
  context.log_info(&format!("Contact lookup for {profile_url} in session {id}"), "dashboard").await;

  let policy = ctx.service.config().contact_fallback;
  ctx.sessions.dispatch(id, Action::ContactResolved { profile_url, outcome, policy }).await;

  Ok(Redirect::to(&format!("/analysis/{id}")).into_response())
}
