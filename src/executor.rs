//! Plan Executor
//!
//! Runs a plan's operations strictly in order. Execution is best-effort: a
//! failed step is recorded and the next step still runs, so a report always
//! holds exactly one result per planned operation.

use tracing::{info, warn};

use crate::models::{ExecutedStep, ExecutionReport, OperationSpec, Plan, StepResult};
use crate::operations::{OperationContext, OperationRegistry};

pub struct PlanExecutor {
    registry: OperationRegistry,
    ctx: OperationContext,
}

impl PlanExecutor {
    pub fn new(registry: OperationRegistry, ctx: OperationContext) -> Self {
        Self { registry, ctx }
    }

    pub async fn execute(&self, plan: &Plan) -> ExecutionReport {
        info!(task_count = plan.len(), "Executing plan");

        let mut steps = Vec::with_capacity(plan.len());
        for (index, spec) in plan.operations.iter().enumerate() {
            let result = self.run_step(spec).await;
            if result.success {
                info!(step = index + 1, kind = %spec.label(), target = %spec.target(), "Step succeeded");
            } else {
                warn!(
                    step = index + 1,
                    kind = %spec.label(),
                    target = %spec.target(),
                    message = %result.message,
                    "Step failed"
                );
            }
            steps.push(ExecutedStep {
                spec: spec.clone(),
                result,
            });
        }

        let report = ExecutionReport::from_steps(steps);
        info!(
            total = report.total_count,
            succeeded = report.success_count,
            "Plan execution complete"
        );
        report
    }

    async fn run_step(&self, spec: &OperationSpec) -> StepResult {
        let Some(kind) = spec.kind() else {
            let code = match spec {
                OperationSpec::Unrecognized { code } => code.to_string(),
                _ => "?".to_string(),
            };
            return StepResult::failed(format!("Unknown operation type: {}", code));
        };

        match self.registry.lookup(kind) {
            Some(handler) => handler.execute(spec, &self.ctx).await,
            None => StepResult::failed(format!("Unsupported operation: {}", kind)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OperationKind;
    use tempfile::TempDir;

    fn executor(dir: &TempDir, registry: OperationRegistry) -> PlanExecutor {
        PlanExecutor::new(registry, OperationContext::new(dir.path()))
    }

    #[tokio::test]
    async fn test_failure_does_not_short_circuit() {
        let dir = TempDir::new().unwrap();
        let plan = Plan::new(vec![
            OperationSpec::DeleteFile { filename: "missing.txt".to_string() },
            OperationSpec::CreateFile {
                filename: "made.txt".to_string(),
                content: "ok".to_string(),
            },
            OperationSpec::ReadFile { filename: "made.txt".to_string() },
        ]);

        let report = executor(&dir, OperationRegistry::with_defaults()).execute(&plan).await;
        assert_eq!(report.steps.len(), plan.len());
        assert_eq!(report.success_count, 2);
        assert!(!report.steps[0].result.success);
        assert!(report.steps[2].result.message.contains("ok"));
    }

    #[tokio::test]
    async fn test_unregistered_kind_names_kind_and_continues() {
        let dir = TempDir::new().unwrap();
        let registry = OperationRegistry::with_defaults().without(OperationKind::CreateFile);
        let plan = Plan::new(vec![
            OperationSpec::CreateFile {
                filename: "a.txt".to_string(),
                content: "x".to_string(),
            },
            OperationSpec::AppendFile {
                filename: "b.txt".to_string(),
                content: "y".to_string(),
            },
        ]);

        let report = executor(&dir, registry).execute(&plan).await;
        assert_eq!(report.total_count, 2);
        assert!(!report.steps[0].result.success);
        assert!(report.steps[0].result.message.contains("CreateFile"));
        assert!(!dir.path().join("a.txt").exists());
        assert!(report.steps[1].result.success);
        assert_eq!(report.success_count, 1);
    }

    #[tokio::test]
    async fn test_unrecognized_code_is_reported() {
        let dir = TempDir::new().unwrap();
        let plan = Plan::new(vec![OperationSpec::Unrecognized { code: 12 }]);

        let report = executor(&dir, OperationRegistry::with_defaults()).execute(&plan).await;
        assert_eq!(report.steps.len(), 1);
        assert_eq!(report.steps[0].result.message, "Unknown operation type: 12");
        assert_eq!(report.success_count, 0);
    }

    #[tokio::test]
    async fn test_empty_plan() {
        let dir = TempDir::new().unwrap();
        let report = executor(&dir, OperationRegistry::with_defaults())
            .execute(&Plan::default())
            .await;
        assert!(report.steps.is_empty());
        assert_eq!(report.success_rate(), None);
    }

    #[tokio::test]
    async fn test_success_count_matches_results() {
        let dir = TempDir::new().unwrap();
        let plan = Plan::new(vec![
            OperationSpec::AppendFile {
                filename: "log.txt".to_string(),
                content: "1".to_string(),
            },
            OperationSpec::RenameFile {
                filename: "log.txt".to_string(),
                new_filename: String::new(),
            },
            OperationSpec::RenameFile {
                filename: "log.txt".to_string(),
                new_filename: "log2.txt".to_string(),
            },
            OperationSpec::DeleteFile { filename: "log.txt".to_string() },
            OperationSpec::DeleteFile { filename: "log2.txt".to_string() },
        ]);

        let report = executor(&dir, OperationRegistry::with_defaults()).execute(&plan).await;
        let successes = report.steps.iter().filter(|s| s.result.success).count();
        assert_eq!(report.success_count, successes);
        assert_eq!(successes, 3);
        assert_eq!(report.steps.len(), 5);
    }
}
