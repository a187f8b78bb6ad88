//! Trapline, an operator console for the traffic-capture platform
//!
//! Zones receive and log DNS/HTTP callbacks; rules attached to a zone
//! shape the crafted responses. This binary drives the platform's
//! rule-management API and the local template compiler.

mod cmd;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cmd::{rules::RulesSubcommand, template::TemplateSubcommand, zones::ZonesSubcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trapline_client::ApiClient;
use trapline_storage::{ConsolePrefs, FileStore};

#[derive(Parser)]
#[command(
    name = "trapline",
    about = "Operator console for the traffic-capture platform: zones, rules, and templates",
    version,
    propagate_version = true
)]
struct Cli {
    /// Base URL of the platform API
    #[arg(long, global = true, env = "TRAPLINE_API", default_value = "http://localhost:8000")]
    api: String,

    /// Bearer token for the platform API (falls back to the stored one)
    #[arg(long, global = true, env = "TRAPLINE_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Preference file location (default: ~/.trapline/prefs.json)
    #[arg(long, global = true, env = "TRAPLINE_PREFS")]
    prefs: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage zones
    Zones {
        #[command(subcommand)]
        subcommand: ZonesSubcommand,
    },

    /// Inspect and maintain rules on a zone
    Rules {
        #[command(subcommand)]
        subcommand: RulesSubcommand,
    },

    /// Compile, inspect, and apply rule templates
    Template {
        #[command(subcommand)]
        subcommand: TemplateSubcommand,
    },

    /// List the built-in template catalog
    Templates,

    /// List captured requests for a zone
    Requests {
        zone: String,
        #[arg(long, default_value_t = 50)]
        limit: usize,
        #[arg(long, default_value_t = 0)]
        skip: usize,
        /// Comma-separated protocol filter (e.g. "dns,http")
        #[arg(long, default_value = "")]
        protocols: String,
    },

    /// Check that the API is reachable
    Ping,
}

/// Everything a subcommand needs to run.
pub struct Context {
    pub client: ApiClient,
    pub prefs: ConsolePrefs<FileStore>,
    pub json: bool,
}

fn prefs_path(cli: &Cli) -> PathBuf {
    if let Some(path) = &cli.prefs {
        return path.clone();
    }
    home::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".trapline")
        .join("prefs.json")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let prefs = ConsolePrefs::new(FileStore::open(prefs_path(&cli))?);

    // Explicit token wins and is remembered for the next run.
    let token = match &cli.token {
        Some(token) => {
            prefs.set_token(token).await?;
            token.clone()
        }
        None => prefs.token().await?.unwrap_or_default(),
    };
    if token.is_empty() {
        tracing::warn!("no API token configured; requests will go out unauthenticated");
    }

    let ctx = Context {
        client: ApiClient::new(cli.api.clone(), token)?,
        prefs,
        json: cli.json,
    };

    match cli.command {
        Commands::Zones { subcommand } => cmd::zones::run(&ctx, subcommand).await,
        Commands::Rules { subcommand } => cmd::rules::run(&ctx, subcommand).await,
        Commands::Template { subcommand } => cmd::template::run(&ctx, subcommand).await,
        Commands::Templates => cmd::template::run_catalog(&ctx),
        Commands::Requests {
            zone,
            limit,
            skip,
            protocols,
        } => cmd::requests::run(&ctx, &zone, limit, skip, &protocols).await,
        Commands::Ping => {
            ctx.client.ping().await?;
            println!("ok: {}", ctx.client.base_url());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
