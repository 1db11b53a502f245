use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use dossier::cli::commands::{self, OutputFormat, RunOptions};
use dossier::DossierConfig;

#[derive(Parser)]
#[command(name = "dossier")]
#[command(about = "Dossier - Company Intelligence\nDecision makers, registry data, market insights and competitor comparisons for one company")]
#[command(version)]
struct Cli {
  /// Configuration file
  #[arg(short, long, global = true, env = "DOSSIER_CONFIG")]
  config: Option<PathBuf>,

  /// Show debug output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Run an analysis for a company
  Run {
    /// Company to analyze
    company: String,
    /// Key decision maker (repeatable)
    #[arg(short = 'd', long = "decision-maker")]
    decision_makers: Vec<String>,
    /// Free-form project details
    #[arg(long, default_value = "")]
    details: String,
    /// Industry; derived from the project details when omitted
    #[arg(short, long)]
    industry: Option<String>,
    /// Competitor to compare against (repeatable)
    #[arg(short = 'C', long = "competitor")]
    competitors: Vec<String>,
    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
  },
  /// Look up contact details for a LinkedIn profile
  Contact {
    /// Profile URL
    profile_url: String,
  },
  /// Print the effective configuration
  Config,
}

async fn handle(command: Command, config: DossierConfig) -> Result<()> {
  match command {
    Command::Run { company, decision_makers, details, industry, competitors, format, output } => {
      let options = RunOptions { company, decision_makers, details, industry, competitors };
      commands::run(config, options, format, output).await
    }
    Command::Contact { profile_url } => commands::contact(config, &profile_url).await,
    Command::Config => commands::show_config(&config),
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
    EnvFilter::new(if cli.verbose { "dossier=debug,warn" } else { "warn" })
  });
  tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();

  let config = DossierConfig::load(cli.config.as_deref())?;
  handle(cli.command, config).await
}
