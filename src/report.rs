//! Report Builder
//!
//! Renders a plan and its execution report as markdown for the user.

use crate::models::{ExecutionReport, Plan};

pub struct ReportBuilder;

impl ReportBuilder {
    pub fn build(request: &str, plan: &Plan, report: &ExecutionReport) -> String {
        let mut lines: Vec<String> = Vec::new();

        lines.push("📋 **Execution Plan**".to_string());
        lines.push(format!("User request: {}", request));
        lines.push(format!("Planned operations: {}", plan.len()));
        lines.push(format!("Notes: {}", plan.comments));
        lines.push(String::new());

        for (i, spec) in plan.operations.iter().enumerate() {
            lines.push(format!("**Step {}**: {} -> `{}`", i + 1, spec.label(), spec.target()));
        }

        lines.push(String::new());
        lines.push("📄 **Execution Results**".to_string());

        for (i, step) in report.steps.iter().enumerate() {
            let status_icon = if step.result.success { "✅" } else { "❌" };
            lines.push(format!("{} **Step {}**: {}", status_icon, i + 1, step.spec.label()));
            lines.push(format!("   Result: {}", step.result.message));
            lines.push(String::new());
        }

        lines.push("📊 **Execution Summary**".to_string());
        lines.push(format!("- Total operations: {}", report.total_count));
        lines.push(format!("- Succeeded: {}", report.success_count));
        lines.push(format!("- Failed: {}", report.failure_count()));
        match report.success_rate() {
            Some(rate) => lines.push(format!("- Success rate: {:.1}%", rate)),
            None => lines.push("- Success rate: n/a (no operations)".to_string()),
        }

        lines.join("\n")
    }
}
