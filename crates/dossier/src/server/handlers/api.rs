//! JSON endpoints over the analysis service

use axum::{
  extract::{Extension, Json, Query, State},
  http::StatusCode,
  response::Json as ResponseJson,
};
use uuid::Uuid;

use crate::contact::ContactBook;
use crate::form::FormData;
use crate::server::context::AppContext;
use crate::server::middleware::RequestContext;
use crate::server::types::{
  failure, AnalysisPayload, ApiFailure, BaseResponse, ContactPayload, ContactQuery,
};

/// POST /api/analysis - Run an analysis and return the merged response
pub async fn analyze(
  State(ctx): State<AppContext>,
  Extension(context): Extension<RequestContext>,
  Json(form): Json<FormData>,
) -> Result<ResponseJson<BaseResponse<AnalysisPayload>>, ApiFailure> {
  let transaction_id = Uuid::new_v4();

  if !form.is_submittable() {
    return Err(failure(
      StatusCode::UNPROCESSABLE_ENTITY,
      "company_name_required",
      "Company name is required",
      transaction_id,
    ));
  }

  context.log_info(&format!("Analysis requested for {}", form.company_name.trim()), "analysis-api").await;

  match ctx.service.analyze(&form).await {
    Ok(analysis) => {
      let rows = analysis.competitors_engagement.as_ref().map_or(0, Vec::len);
      context
        .log_success(&format!("Analysis for {} finished ({rows} comparison rows)", form.company_name.trim()), "analysis-api")
        .await;
      Ok(ResponseJson(BaseResponse::success(AnalysisPayload { analysis }, transaction_id)))
    }
    Err(e) => {
      context.log_error(&format!("Analysis failed: {e}"), "analysis-api").await;
      let (status, key) = e.status_and_key();
      Err(failure(status, key, &e.to_string(), transaction_id))
    }
  }
}

/// GET /api/contacts - Look up contact details for one profile
pub async fn contact(
  State(ctx): State<AppContext>,
  Extension(context): Extension<RequestContext>,
  Query(query): Query<ContactQuery>,
) -> Result<ResponseJson<BaseResponse<ContactPayload>>, ApiFailure> {
  let transaction_id = Uuid::new_v4();

  if query.profile_url.trim().is_empty() {
    return Err(failure(
      StatusCode::BAD_REQUEST,
      "profile_url_required",
      "profile_url is required",
      transaction_id,
    ));
  }

  let outcome = ctx.service.lookup_contact(&query.profile_url).await;
  let policy = ctx.service.config().contact_fallback;

  let mut book = ContactBook::default();
  book.record(&query.profile_url, outcome.clone(), policy);
  let (contact_info, fallback) = book
    .get(&query.profile_url)
    .map(|entry| (entry.contact_info.clone(), entry.fallback))
    .unwrap_or_default();

  context.log_info(&format!("Contact lookup for {}", query.profile_url), "contacts-api").await;

  let payload = ContactPayload { profile_url: query.profile_url, outcome, policy, contact_info, fallback };
  Ok(ResponseJson(BaseResponse::success(payload, transaction_id)))
}
