//! devcrew: ask a three-persona team for a web page and ship it once approved.
//!
//!   devcrew "Build a calculator app with a clear button"
//!   devcrew --request-file request.txt --workspace ./site --branch gh-pages
//!   devcrew --no-deploy "A todo list"
//!
//! Requires ANTHROPIC_API_KEY. Pushing with a token needs GITHUB_TOKEN,
//! GITHUB_USERNAME and GITHUB_REPO_URL; otherwise the workspace's configured
//! remote is used.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

use devcrew::deploy::{DeployConfig, DeploymentPipeline};
use devcrew::factory::{personas, GroupChat, GroupChatConfig, Orchestrator};
use devcrew::llm::{LlmClient, DEFAULT_MODEL};
use devcrew::output::{self, Tally};
use devcrew::workspace::Workspace;

#[derive(Parser)]
#[command(name = "devcrew", about = "Multi-agent web page builder with git deployment")]
struct Args {
    /// What to build
    request: Option<String>,

    /// Read the request from a file instead
    #[arg(long, conflicts_with = "request")]
    request_file: Option<PathBuf>,

    /// Git working tree that receives index.html
    #[arg(long, env = "DEVCREW_WORKSPACE", default_value = ".")]
    workspace: PathBuf,

    /// Remote alias used when no token credentials are set
    #[arg(long, env = "DEVCREW_REMOTE", default_value = "origin")]
    remote: String,

    /// Branch to push to
    #[arg(long, env = "DEVCREW_BRANCH", default_value = "main")]
    branch: String,

    /// Turn budget before giving up without approval
    #[arg(long, default_value_t = 30)]
    max_turns: usize,

    /// Timeout for each git command, in seconds
    #[arg(long, default_value_t = 120)]
    git_timeout: u64,

    /// Claude model to use
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Output token cap per persona reply
    #[arg(long, default_value_t = 8192)]
    max_tokens: u32,

    /// Anthropic API key (or set ANTHROPIC_API_KEY env var)
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Report approval but do not write or push anything
    #[arg(long)]
    no_deploy: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Use JSON logs with DEVCREW_LOG_JSON=1, human-readable otherwise
    let json_logs = std::env::var("DEVCREW_LOG_JSON").unwrap_or_default() == "1";
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "devcrew=info".into());
    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let args = Args::parse();

    let request = match (&args.request, &args.request_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => anyhow::bail!("Tell me what to build (positional request or --request-file)"),
    };
    let request = request.trim().to_string();
    if request.is_empty() {
        anyhow::bail!("The request is empty");
    }

    let orchestrator = if args.no_deploy {
        Orchestrator::dry_run()
    } else {
        let workspace = Workspace::create(&args.workspace).await?;
        Orchestrator::new(DeploymentPipeline::with_git(DeployConfig {
            workspace: workspace.root,
            remote: args.remote.clone(),
            branch: args.branch.clone(),
            git_timeout: Duration::from_secs(args.git_timeout),
            ..Default::default()
        }))
    };

    let llm = LlmClient::new(SecretString::from(args.api_key.clone()))
        .with_model(&args.model)
        .with_max_tokens(args.max_tokens);
    tracing::info!(
        model = %llm.model(),
        workspace = %args.workspace.display(),
        branch = %args.branch,
        max_turns = args.max_turns,
        deploy = !args.no_deploy,
        "Starting devcrew"
    );

    let mut chat = GroupChat::new(
        Arc::new(llm),
        personas::default_team(),
        GroupChatConfig {
            max_turns: args.max_turns,
        },
    );

    let messages = orchestrator.run_conversation(&mut chat, &request).await?;

    let mut stdout = std::io::stdout().lock();
    output::print_transcript(&mut stdout, &messages)?;
    writeln!(stdout, "Turns: {}", Tally::count(&messages).summary())?;

    Ok(())
}
