use std::sync::Arc;
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::agents::capabilities::{Classify, Decompose, Generate, Search};
use crate::agents::{CommanderAgent, DividerAgent, WriterAgent};
use crate::config::Config;
use crate::executor::PlanExecutor;
use crate::llm::provider::LLM;
use crate::models::{ConversationHistory, PipelineOutcome};
use crate::operations::{OperationContext, OperationRegistry};
use crate::pipeline::bridge::ContentBridge;
use crate::pipeline::router::{IntentRouter, Route};
use crate::report::ReportBuilder;
use crate::search::BochaClient;
use crate::types::AppResult;

pub const EXECUTION_SECTION: &str = "\nExecution results for the user's instruction:\n";
pub const SAVE_SECTION: &str = "\nResults of saving the created content:\n";
pub const CREATIVE_DONE_NOTE: &str = "The content has already been created; do not create it again, just return the content and the file operation results to the user.";

/// The external services the pipeline depends on
#[derive(Clone)]
pub struct Capabilities {
    pub classifier: Arc<dyn Classify>,
    pub decomposer: Arc<dyn Decompose>,
    pub generator: Arc<dyn Generate>,
    pub searcher: Option<Arc<dyn Search>>,
}

impl Capabilities {
    /// LLM-backed agents plus Bocha search when a key is configured
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let llm = LLM::from_config(&config.llm)?;
        let searcher = BochaClient::from_config(&config.search).map(|c| Arc::new(c) as Arc<dyn Search>);

        Ok(Self {
            classifier: Arc::new(DividerAgent::new(llm.clone())),
            decomposer: Arc::new(CommanderAgent::new(llm.clone(), config.apps.clone())),
            generator: Arc::new(WriterAgent::new(llm)),
            searcher,
        })
    }
}

/// End-to-end handling of one request at a time; holds no per-request state.
pub struct Pipeline {
    router: IntentRouter,
    decomposer: Arc<dyn Decompose>,
    executor: PlanExecutor,
}

impl Pipeline {
    pub fn new(
        capabilities: Capabilities,
        registry: OperationRegistry,
        ctx: OperationContext,
        search_trigger: impl Into<String>,
    ) -> Self {
        let bridge = ContentBridge::new(capabilities.generator);
        Self {
            router: IntentRouter::new(capabilities.classifier, bridge, capabilities.searcher, search_trigger),
            decomposer: capabilities.decomposer,
            executor: PlanExecutor::new(registry, ctx),
        }
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Ok(Self::new(
            Capabilities::from_config(config)?,
            OperationRegistry::with_defaults(),
            OperationContext::from_config(config),
            config.search.trigger.clone(),
        ))
    }

    pub async fn handle(&self, history: &ConversationHistory, latest: &str) -> AppResult<PipelineOutcome> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("request", id = %request_id);
        self.handle_inner(history, latest).instrument(span).await
    }

    async fn handle_inner(&self, history: &ConversationHistory, latest: &str) -> AppResult<PipelineOutcome> {
        info!(message_len = latest.len(), history_turns = history.len(), "Starting request pipeline");

        let routed = self.router.route(history, latest).await?;

        let (instruction, creative) = match routed.route {
            Route::Answer { message } => {
                info!("Question routed to conversational answer; nothing to execute");
                return Ok(PipelineOutcome {
                    classification: routed.classification,
                    message,
                    plan: None,
                    report: None,
                    rendered_report: None,
                });
            }
            Route::Execute { instruction, creative } => (instruction, creative),
        };

        let plan = self.decomposer.decompose(&instruction).await?;
        let report = self.executor.execute(&plan).await;

        let mut rendered = ReportBuilder::build(&instruction, &plan, &report);
        let message = if creative {
            rendered.push('\n');
            rendered.push_str(CREATIVE_DONE_NOTE);
            format!("{}{}{}", instruction, SAVE_SECTION, rendered)
        } else {
            format!("{}{}{}", routed.latest, EXECUTION_SECTION, rendered)
        };

        info!(
            total = report.total_count,
            succeeded = report.success_count,
            "Request pipeline complete"
        );

        Ok(PipelineOutcome {
            classification: routed.classification,
            message,
            plan: Some(plan),
            report: Some(report),
            rendered_report: Some(rendered),
        })
    }
}
