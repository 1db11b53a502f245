//! Server startup and configuration

use anyhow::{Context, Result};
use axum::serve;
use herald::activity::ActivityLog;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::DossierConfig;
use crate::server::context::AppContext;
use crate::server::routing::create_router;
use crate::service::DossierService;

const COMPONENT: &str = "dossier-server";

/// Build the shared state from `config`
pub fn build_context(config: DossierConfig) -> Result<AppContext> {
  let activity = ActivityLog::open(&config.activity_log_path)
    .with_context(|| format!("Failed to open activity log {}", config.activity_log_path.display()))?;
  let service = DossierService::from_config(config)?;
  Ok(AppContext::new(service, activity))
}

/// Start the server on the configured bind address
pub async fn start_server(config: DossierConfig) -> Result<()> {
  let addr = config.bind;
  let ctx = build_context(config)?;
  let activity = ctx.activity.clone();

  activity.info(COMPONENT, &format!("Starting dossier server on {addr}")).await;
  if ctx.service.config().contact_token.is_none() {
    activity.warn(COMPONENT, "No contact enrichment token configured; Connect lookups will fail").await;
  }

  // Dashboard forms post same-origin; the permissive CORS layer is for the JSON API
  let app = create_router(ctx)
    .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()));

  let listener = TcpListener::bind(addr).await.with_context(|| format!("Failed to bind {addr}"))?;
  activity.info(COMPONENT, &format!("Server listening on {addr}")).await;

  match serve(listener, app).with_graceful_shutdown(shutdown_signal()).await {
    Ok(()) => {
      activity.info(COMPONENT, "Server shutdown gracefully").await;
      Ok(())
    }
    Err(e) => {
      activity.error(COMPONENT, &format!("Server error: {e}")).await;
      Err(anyhow::anyhow!("Server error: {e}"))
    }
  }
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    herald::warn(&format!("Failed to listen for shutdown signal: {e}"));
    std::future::pending::<()>().await;
  }
}
