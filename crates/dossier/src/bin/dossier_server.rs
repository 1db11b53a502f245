//! Dossier dashboard server
//!
//! Serves the company intelligence dashboard and its JSON API.

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use dossier::server::startup::start_server;
use dossier::DossierConfig;

#[derive(Parser)]
#[command(name = "dossier_server")]
#[command(about = "Company intelligence dashboard server")]
#[command(version)]
struct Args {
  /// Server bind address (overrides the configuration file)
  #[arg(long)]
  bind: Option<SocketAddr>,

  /// Configuration file
  #[arg(short, long, env = "DOSSIER_CONFIG")]
  config: Option<PathBuf>,

  /// Enable verbose logging
  #[arg(short, long)]
  verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  // RUST_LOG wins when set
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
    if args.verbose {
      EnvFilter::new("dossier=debug,tower_http=debug,info")
    } else {
      EnvFilter::new("dossier=info,tower_http=info,warn")
    }
  });

  tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

  let mut config = DossierConfig::load(args.config.as_deref())?;
  if let Some(bind) = args.bind {
    config.bind = bind;
  }

  herald::info!(&format!("Starting dossier server v{}", env!("CARGO_PKG_VERSION")));
  herald::info!(&format!("Binding to address: {}", config.bind));

  start_server(config).await
}
