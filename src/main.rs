use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use deskpilot::agents::CommanderAgent;
use deskpilot::models::ConversationHistory;
use deskpilot::operations::{OperationContext, OperationRegistry};
use deskpilot::{Config, Pipeline, PlanExecutor, ReportBuilder};

#[derive(Parser)]
#[command(name = "deskpilot", version, about = "Turn natural-language requests into file, browser and app operations")]
struct Cli {
    /// Directory that relative filenames resolve against (overrides WORKSPACE_DIR)
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Route, plan and execute a request
    Run {
        /// The request text
        request: String,

        /// JSON file with prior conversation turns: [{"role": "user", "content": "..."}]
        #[arg(long)]
        history: Option<PathBuf>,

        /// Print the full outcome as JSON instead of the message
        #[arg(long)]
        json: bool,
    },
    /// Execute a plan file in command-list JSON format without any LLM calls
    Exec {
        plan: PathBuf,

        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    deskpilot::utils::init_logger();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(workspace) = cli.workspace {
        config.workspace.root = workspace;
    }
    info!(workspace = %config.workspace.root.display(), provider = %config.llm.provider, "Configuration loaded");

    match cli.command {
        Commands::Run { request, history, json } => {
            let history: ConversationHistory = match history {
                Some(path) => {
                    let raw = tokio::fs::read_to_string(&path)
                        .await
                        .with_context(|| format!("Failed to read history file {}", path.display()))?;
                    serde_json::from_str(&raw).context("History file is not a list of conversation turns")?
                }
                None => Vec::new(),
            };

            let pipeline = Pipeline::from_config(&config)?;
            let outcome = pipeline.handle(&history, &request).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!("{}", outcome.message);
            }
        }
        Commands::Exec { plan, json } => {
            let raw = tokio::fs::read_to_string(&plan)
                .await
                .with_context(|| format!("Failed to read plan file {}", plan.display()))?;
            let plan_doc = CommanderAgent::parse_plan(&raw)?;

            let executor = PlanExecutor::new(
                OperationRegistry::with_defaults(),
                OperationContext::from_config(&config),
            );
            let report = executor.execute(&plan_doc).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let request = format!("plan file {}", plan.display());
                println!("{}", ReportBuilder::build(&request, &plan_doc, &report));
            }
        }
    }

    Ok(())
}
