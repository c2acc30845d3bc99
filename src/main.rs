//! crit - CLI entry point.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

use crit::error::AgentError;
use crit::llm::{
    DEFAULT_MAX_STEPS, DEFAULT_PROMPT, GeminiClient, GeminiRunner, Strategy, model_path,
    orchestrator_for,
};
use crit::tools::{FileChangesTool, GenerateCommitMessageTool, Tool, ToolRegistry, WriteReviewTool};
use crit::{Settings, StdoutSink};

/// Review working-tree changes with Gemini.
#[derive(Parser, Debug)]
#[command(name = "crit")]
#[command(about = "Review working-tree changes, draft a commit message, and save the review as markdown")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Model preset: fallback (three attempts per model) or persistent (five attempts per model)
    #[arg(long, default_value_t = Strategy::Fallback)]
    strategy: Strategy,

    /// Model to try, in order (repeatable; replaces the preset list)
    #[arg(long = "model", value_name = "ID")]
    models: Vec<String>,

    /// Prompt sent to the model
    #[arg(long)]
    prompt: Option<String>,

    /// Maximum model responses per attempt
    #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
    max_steps: usize,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the three review tools directly, without a model
    Tools {
        /// Directory whose changes are inspected
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        /// Where the sample review is written
        #[arg(short = 'o', long, default_value = "./test-review.md")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Some(Command::Tools { dir, output }) = &cli.command {
        return check_tools(dir, output).await;
    }
    review(cli).await
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "warn,crit=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn review(cli: Cli) -> Result<()> {
    let settings = Settings::from_env()?;
    let client = GeminiClient::new(&settings).context("Failed to set up the Gemini client")?;

    let prompt = cli.prompt.as_deref().unwrap_or(DEFAULT_PROMPT);
    let runner = GeminiRunner::new(client, ToolRegistry::with_defaults(), prompt, cli.max_steps);
    let models = Some(cli.models.iter().map(|m| model_path(m)).collect());
    let orchestrator = orchestrator_for(runner, cli.strategy, models);

    let mut sink = StdoutSink;
    match orchestrator.run(&mut sink).await {
        Ok(outcome) => {
            println!(
                "\nCode review completed successfully with {}!",
                outcome.model
            );
            Ok(())
        }
        Err(err) => {
            report_failure(&err);
            std::process::exit(1);
        }
    }
}

fn report_failure(err: &AgentError) {
    match err {
        AgentError::AllModelsFailed { last_error, .. } => {
            eprintln!("\nAll models failed. Last error:");
            eprintln!("{last_error}");
            println!("\nSuggestions:");
            println!("1. Try again in a few minutes when the API load is lower");
            println!("2. Check your Google AI API key and quota");
            println!("3. Try the persistent strategy: crit --strategy persistent");
        }
        AgentError::Fatal { model, source } => {
            eprintln!("\nReview aborted while running {model}:");
            eprintln!("{source}");
        }
        AgentError::NoModels => {
            eprintln!("\n{err}");
        }
    }
}

/// Exercise the tools the way the model would, writing a sample review.
async fn check_tools(dir: &Path, output: &Path) -> Result<()> {
    let registry = ToolRegistry::with_defaults();
    let root_dir = dir.display().to_string();

    println!("Testing code review tools...\n");

    println!("1. Testing {}...", FileChangesTool.name());
    let changes = registry
        .invoke(FileChangesTool.name(), json!({ "rootDir": root_dir }))
        .await
        .context("Failed to collect file changes")?;
    let paths: Vec<String> = changes
        .as_array()
        .map(|files| {
            files
                .iter()
                .filter_map(|f| f["path"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();
    println!("Found {} changed files", paths.len());
    for path in &paths {
        println!("  - {path}");
    }
    println!();

    println!("2. Testing {}...", GenerateCommitMessageTool.name());
    let commit = registry
        .invoke(
            GenerateCommitMessageTool.name(),
            json!({ "rootDir": root_dir, "style": "conventional" }),
        )
        .await
        .context("Failed to generate commit message")?;
    let message = text_field(&commit, "message");
    println!("Generated commit message:");
    println!("  {message}");
    println!(
        "  Type: {}, Files: {}",
        text_field(&commit, "type"),
        commit["filesChanged"]
    );
    println!();

    println!("3. Testing {}...", WriteReviewTool.name());
    let written = registry
        .invoke(
            WriteReviewTool.name(),
            json!({
                "reviewContent": sample_review(&paths, &message),
                "outputPath": output.display().to_string(),
                "includeMetadata": true,
            }),
        )
        .await
        .context("Failed to write review")?;
    println!(
        "Markdown file created: {}",
        text_field(&written, "outputPath")
    );
    println!("   Size: {} bytes", written["fileSize"]);
    println!();

    println!("All tools are working correctly!");
    Ok(())
}

fn text_field(value: &Value, key: &str) -> String {
    value[key].as_str().unwrap_or_default().to_string()
}

fn sample_review(paths: &[String], commit_message: &str) -> String {
    let files = paths
        .iter()
        .map(|p| format!("- `{p}`"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "# Code Review Summary\n\n\
         ## Changes Made\n\
         - Tool self-check run without a model\n\n\
         ## Files Modified\n\
         {files}\n\n\
         ## Recommendations\n\
         - All tools are working correctly\n\n\
         ## Commit Message\n\
         `{commit_message}`"
    )
}
