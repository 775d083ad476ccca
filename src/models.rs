// Core data model for a single request: conversation, routing decision,
// plan, and execution outcome. Nothing here outlives the request it was
// built for.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Agent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn agent(content: impl Into<String>) -> Self {
        Self {
            role: Role::Agent,
            content: content.into(),
        }
    }
}

/// Prior turns of the conversation, oldest first. Owned by the caller.
pub type ConversationHistory = Vec<ConversationTurn>;

// =============================================================================
// Classification
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationKind {
    /// Pure file / browser / app instruction
    Instruction,
    /// Knowledge question or content creation with no file operation
    Question,
    /// Content creation whose result must be written somewhere
    CreativeInstruction,
}

impl ClassificationKind {
    /// Map the classifier's numeric answer onto a kind.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(ClassificationKind::Instruction),
            1 => Some(ClassificationKind::Question),
            2 => Some(ClassificationKind::CreativeInstruction),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub kind: ClassificationKind,
    pub normalized_request: String,
    pub supplemental_info: String,
}

// =============================================================================
// Operations and plans
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    CreateFile,
    DeleteFile,
    ReadFile,
    RenameFile,
    AppendFile,
    OpenWebsite,
    OpenApp,
}

impl OperationKind {
    pub const ALL: [OperationKind; 7] = [
        OperationKind::CreateFile,
        OperationKind::DeleteFile,
        OperationKind::ReadFile,
        OperationKind::RenameFile,
        OperationKind::AppendFile,
        OperationKind::OpenWebsite,
        OperationKind::OpenApp,
    ];

    /// Wire code used by the decomposition service (1-based).
    pub fn code(self) -> i64 {
        match self {
            OperationKind::CreateFile => 1,
            OperationKind::DeleteFile => 2,
            OperationKind::ReadFile => 3,
            OperationKind::RenameFile => 4,
            OperationKind::AppendFile => 5,
            OperationKind::OpenWebsite => 6,
            OperationKind::OpenApp => 7,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.code() == code)
    }

    /// Human-readable name used in reports
    pub fn display_name(self) -> &'static str {
        match self {
            OperationKind::CreateFile => "Create file",
            OperationKind::DeleteFile => "Delete file",
            OperationKind::ReadFile => "Read file",
            OperationKind::RenameFile => "Rename file",
            OperationKind::AppendFile => "Append to file",
            OperationKind::OpenWebsite => "Open website",
            OperationKind::OpenApp => "Open app",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OperationKind::CreateFile => "CreateFile",
            OperationKind::DeleteFile => "DeleteFile",
            OperationKind::ReadFile => "ReadFile",
            OperationKind::RenameFile => "RenameFile",
            OperationKind::AppendFile => "AppendFile",
            OperationKind::OpenWebsite => "OpenWebsite",
            OperationKind::OpenApp => "OpenApp",
        };
        write!(f, "{}", name)
    }
}

/// One atomic operation. Each variant carries only the fields its kind uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OperationSpec {
    CreateFile { filename: String, content: String },
    DeleteFile { filename: String },
    ReadFile { filename: String },
    RenameFile { filename: String, new_filename: String },
    AppendFile { filename: String, content: String },
    OpenWebsite { url: String },
    /// `target` is an executable path or an application name, depending on platform
    OpenApp { target: String },
    /// Descriptor whose command type names no known operation
    Unrecognized { code: i64 },
}

impl OperationSpec {
    pub fn kind(&self) -> Option<OperationKind> {
        match self {
            OperationSpec::CreateFile { .. } => Some(OperationKind::CreateFile),
            OperationSpec::DeleteFile { .. } => Some(OperationKind::DeleteFile),
            OperationSpec::ReadFile { .. } => Some(OperationKind::ReadFile),
            OperationSpec::RenameFile { .. } => Some(OperationKind::RenameFile),
            OperationSpec::AppendFile { .. } => Some(OperationKind::AppendFile),
            OperationSpec::OpenWebsite { .. } => Some(OperationKind::OpenWebsite),
            OperationSpec::OpenApp { .. } => Some(OperationKind::OpenApp),
            OperationSpec::Unrecognized { .. } => None,
        }
    }

    /// What the step acts on: the filename for file operations, otherwise the url/app.
    pub fn target(&self) -> &str {
        match self {
            OperationSpec::CreateFile { filename, .. }
            | OperationSpec::DeleteFile { filename }
            | OperationSpec::ReadFile { filename }
            | OperationSpec::RenameFile { filename, .. }
            | OperationSpec::AppendFile { filename, .. } => filename,
            OperationSpec::OpenWebsite { url } => url,
            OperationSpec::OpenApp { target } => target,
            OperationSpec::Unrecognized { .. } => "",
        }
    }

    pub fn label(&self) -> String {
        match (self.kind(), self) {
            (Some(kind), _) => kind.display_name().to_string(),
            (None, OperationSpec::Unrecognized { code }) => format!("Unknown operation ({})", code),
            (None, _) => "Unknown operation".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub operations: Vec<OperationSpec>,
    #[serde(default)]
    pub comments: String,
}

impl Plan {
    pub fn new(operations: Vec<OperationSpec>) -> Self {
        Self {
            operations,
            comments: String::new(),
        }
    }

    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = comments.into();
        self
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

// =============================================================================
// Execution results
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub success: bool,
    pub message: String,
}

impl StepResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutedStep {
    pub spec: OperationSpec,
    pub result: StepResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub steps: Vec<ExecutedStep>,
    pub total_count: usize,
    pub success_count: usize,
    pub completed_at: DateTime<Utc>,
}

impl ExecutionReport {
    /// Build a report from executed steps; the counters are derived, never supplied.
    pub fn from_steps(steps: Vec<ExecutedStep>) -> Self {
        let success_count = steps.iter().filter(|s| s.result.success).count();
        Self {
            total_count: steps.len(),
            success_count,
            steps,
            completed_at: Utc::now(),
        }
    }

    pub fn failure_count(&self) -> usize {
        self.total_count.saturating_sub(self.success_count)
    }

    /// Percentage of successful steps, or `None` when nothing was planned
    pub fn success_rate(&self) -> Option<f64> {
        if self.total_count == 0 {
            None
        } else {
            Some(self.success_count as f64 / self.total_count as f64 * 100.0)
        }
    }
}

/// What the orchestrator hands back for one request
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutcome {
    pub classification: Classification,
    /// The enriched latest message for the downstream conversational step
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ExecutionReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rendered_report: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_kind_codes() {
        for kind in OperationKind::ALL {
            assert_eq!(OperationKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(OperationKind::from_code(0), None);
        assert_eq!(OperationKind::from_code(8), None);
        assert_eq!(OperationKind::RenameFile.code(), 4);
    }

    #[test]
    fn test_classification_codes() {
        assert_eq!(ClassificationKind::from_code(0), Some(ClassificationKind::Instruction));
        assert_eq!(ClassificationKind::from_code(2), Some(ClassificationKind::CreativeInstruction));
        assert_eq!(ClassificationKind::from_code(3), None);
    }

    #[test]
    fn test_spec_target() {
        let rename = OperationSpec::RenameFile {
            filename: "a.txt".to_string(),
            new_filename: "b.txt".to_string(),
        };
        assert_eq!(rename.target(), "a.txt");
        assert_eq!(rename.kind(), Some(OperationKind::RenameFile));

        let site = OperationSpec::OpenWebsite {
            url: "https://example.com".to_string(),
        };
        assert_eq!(site.target(), "https://example.com");

        let unknown = OperationSpec::Unrecognized { code: 42 };
        assert_eq!(unknown.kind(), None);
        assert!(unknown.label().contains("42"));
    }

    #[test]
    fn test_report_counters() {
        let steps = vec![
            ExecutedStep {
                spec: OperationSpec::ReadFile { filename: "x".to_string() },
                result: StepResult::ok("fine"),
            },
            ExecutedStep {
                spec: OperationSpec::DeleteFile { filename: "y".to_string() },
                result: StepResult::failed("nope"),
            },
        ];
        let report = ExecutionReport::from_steps(steps);
        assert_eq!(report.total_count, 2);
        assert_eq!(report.success_count, 1);
        assert_eq!(report.failure_count(), 1);
        assert_eq!(report.success_rate(), Some(50.0));
    }

    #[test]
    fn test_inconsistent_deserialized_counters_do_not_underflow() {
        let report: ExecutionReport = serde_json::from_str(
            r#"{"steps": [], "total_count": 1, "success_count": 3, "completed_at": "2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(report.failure_count(), 0);
    }

    #[test]
    fn test_empty_report_has_no_rate() {
        let report = ExecutionReport::from_steps(vec![]);
        assert_eq!(report.success_rate(), None);
        assert_eq!(report.failure_count(), 0);
    }
}
