mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod render;
mod services;
mod workflow;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::commit::{self as commit_cmd, CommitArgs};
use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::console::Console;
use crate::cmd::generate::{self, GenerateArgs};
use crate::config::{AppConfig, DEFAULT_CONFIG_FILE};
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::github::GitHubClient;
use crate::infra::llm::OpenAiClient;

#[derive(Parser)]
#[command(
    name = "relnotes",
    author,
    version,
    about = "LLM-written changelogs from hosted release history"
)]
struct Cli {
    /// Path to the YAML config file.
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactively pick releases and write their changelog.
    Generate(GenerateArgs),
    /// Summarize the code changes of one commit or a range of recent ones.
    Commit(CommitArgs),
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();
    let mut console = Console::stdio();

    match cli.command {
        Commands::Config(args) => config_cmd::run(args.command, &cli.config, &mut console),
        Commands::Generate(args) => {
            let context = build_context(&cli.config)?;
            generate::run(&context, args, &mut console).await
        }
        Commands::Commit(args) => {
            let context = build_context(&cli.config)?;
            commit_cmd::run(&context, args, &mut console).await
        }
    }
}

fn build_context(config_path: &std::path::Path) -> AppResult<AppContext> {
    let config = AppConfig::load(config_path)?;

    let hosting = Arc::new(GitHubClient::new(
        config.github_api_base.clone(),
        config.github_token.clone(),
        config.request_timeout,
    )?);
    let language_model = Arc::new(OpenAiClient::new(
        config.llm_api_base.clone(),
        config.llm_api_key.clone(),
        config.model.clone(),
        config.llm_timeout,
    )?);

    Ok(AppContext::new(config, hosting, language_model))
}
