//! Commander Agent
//!
//! Decomposes a natural-language instruction into an ordered [`Plan`] of typed
//! operations. The model answers with numbered command types and a flat
//! `file_info` record; this module turns that into [`OperationSpec`] variants.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::agents::capabilities::Decompose;
use crate::agents::parse_llm_json;
use crate::config::AppCatalog;
use crate::llm::provider::LLM;
use crate::models::{OperationKind, OperationSpec, Plan};
use crate::types::{AppError, AppResult};

/// Raw command list as produced by the decomposition model
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandList {
    pub commands: Vec<RawCommand>,
    #[serde(default)]
    pub comments: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RawCommand {
    pub command_type: i64,
    #[serde(default)]
    pub file_info: FileInfo,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FileInfo {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub new_filename: String,
    #[serde(default)]
    pub url: String,
}

impl RawCommand {
    fn into_spec(self) -> OperationSpec {
        let info = self.file_info;
        match OperationKind::from_code(self.command_type) {
            Some(OperationKind::CreateFile) => OperationSpec::CreateFile {
                filename: info.filename,
                content: info.content,
            },
            Some(OperationKind::DeleteFile) => OperationSpec::DeleteFile { filename: info.filename },
            Some(OperationKind::ReadFile) => OperationSpec::ReadFile { filename: info.filename },
            Some(OperationKind::RenameFile) => OperationSpec::RenameFile {
                filename: info.filename,
                new_filename: info.new_filename,
            },
            Some(OperationKind::AppendFile) => OperationSpec::AppendFile {
                filename: info.filename,
                content: info.content,
            },
            Some(OperationKind::OpenWebsite) => OperationSpec::OpenWebsite { url: info.url },
            Some(OperationKind::OpenApp) => OperationSpec::OpenApp { target: info.url },
            None => OperationSpec::Unrecognized {
                code: self.command_type,
            },
        }
    }
}

impl From<CommandList> for Plan {
    fn from(list: CommandList) -> Self {
        Plan {
            operations: list.commands.into_iter().map(RawCommand::into_spec).collect(),
            comments: list.comments,
        }
    }
}

pub struct CommanderAgent {
    llm: LLM,
    apps: AppCatalog,
}

impl CommanderAgent {
    pub fn new(llm: LLM, apps: AppCatalog) -> Self {
        Self { llm, apps }
    }

    /// Parse a command-list JSON document (optionally fenced) into a plan.
    pub fn parse_plan(response: &str) -> AppResult<Plan> {
        let list = parse_llm_json::<CommandList>(response)
            .map_err(|e| AppError::Validation(format!("Failed to parse command list JSON: {}", e)))?;
        Ok(Plan::from(list))
    }

    fn system_prompt(&self) -> String {
        let app_paths = if self.apps.is_empty() {
            "(none configured; use the path or application name the user gives)".to_string()
        } else {
            self.apps
                .entries
                .iter()
                .enumerate()
                .map(|(i, e)| format!("{}. {}: {}", i + 1, e.name, e.path))
                .collect::<Vec<_>>()
                .join("\n")
        };

        format!(r#"You are a command orchestrator. Break the user's request into concrete operations.

Supported command types:
1 = create file
2 = delete file
3 = read file
4 = rename file
5 = append to file
6 = open website
7 = open app

Known application paths:
{app_paths}

Return an ordered list of commands, each with:
1. command_type: the operation number (1-7)
2. file_info: the information the operation needs (filename, content, new_filename, url)

Notes:
- For multi-step requests, list the commands in execution order
- Make sure every file_info is complete and accurate
- Renaming needs both filename and new_filename
- Opening a website needs url
- If the user specifies a format for the text to write, extract the text that should actually be written
- For opening an app, put the app's install path or name into url, using the known paths above or the one the user gives
- If the user only vaguely describes what to write, compose suitable content yourself and put it in content

Respond with ONLY a JSON object:
{{"commands": [{{"command_type": 1, "file_info": {{"filename": "a.txt", "content": "...", "new_filename": "", "url": ""}}}}], "comments": "short explanation"}}"#,
            app_paths = app_paths,
        )
    }
}

#[async_trait]
impl Decompose for CommanderAgent {
    async fn decompose(&self, instruction: &str) -> AppResult<Plan> {
        info!(instruction_len = instruction.len(), "Decomposing instruction");

        let response = self.llm.complete(&self.system_prompt(), instruction).await?;
        let plan = Self::parse_plan(&response)?;

        info!(
            task_count = plan.len(),
            comments = %plan.comments,
            "Plan generated"
        );
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppEntry;
    use crate::llm::provider::LLMAdapter;
    use crate::types::{LLMRequest, LLMResponse, TokenUsage};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_parse_plan_two_steps() {
        let response = r#"```json
{"commands": [
  {"command_type": 1, "file_info": {"filename": "test.txt", "content": "draft"}},
  {"command_type": 4, "file_info": {"filename": "test.txt", "new_filename": "final.txt"}}
], "comments": "create then rename"}
```"#;
        let plan = CommanderAgent::parse_plan(response).unwrap();
        assert_eq!(plan.comments, "create then rename");
        assert_eq!(
            plan.operations,
            vec![
                OperationSpec::CreateFile {
                    filename: "test.txt".to_string(),
                    content: "draft".to_string(),
                },
                OperationSpec::RenameFile {
                    filename: "test.txt".to_string(),
                    new_filename: "final.txt".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_parse_plan_maps_url_fields() {
        let plan = CommanderAgent::parse_plan(
            r#"{"commands": [
                {"command_type": 6, "file_info": {"filename": "", "url": "https://www.baidu.com"}},
                {"command_type": 7, "file_info": {"filename": "", "url": "C:/CloudMusic/cloudmusic.exe"}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(plan.comments, "");
        assert_eq!(plan.operations[0], OperationSpec::OpenWebsite { url: "https://www.baidu.com".to_string() });
        assert_eq!(plan.operations[1], OperationSpec::OpenApp { target: "C:/CloudMusic/cloudmusic.exe".to_string() });
    }

    #[test]
    fn test_unknown_command_type_is_kept_as_unrecognized() {
        let plan = CommanderAgent::parse_plan(
            r#"{"commands": [{"command_type": 9, "file_info": {"filename": "x"}}]}"#,
        )
        .unwrap();
        assert_eq!(plan.operations, vec![OperationSpec::Unrecognized { code: 9 }]);
    }

    #[test]
    fn test_code_fence_inside_content_is_preserved() {
        let document = r#"{"commands": [{"command_type": 1, "file_info": {"filename": "README.md", "content": "Usage:\n```sh\ncargo run\n```\n"}}]}"#;
        let expected = vec![OperationSpec::CreateFile {
            filename: "README.md".to_string(),
            content: "Usage:\n```sh\ncargo run\n```\n".to_string(),
        }];

        let unfenced = CommanderAgent::parse_plan(document).unwrap();
        assert_eq!(unfenced.operations, expected);

        let fenced = CommanderAgent::parse_plan(&format!("```json\n{}\n```", document)).unwrap();
        assert_eq!(fenced.operations, expected);
    }

    #[test]
    fn test_malformed_plan_is_validation_error() {
        let result = CommanderAgent::parse_plan(r#"{"steps": []}"#);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    struct RecordingAdapter {
        reply: String,
        requests: Mutex<Vec<LLMRequest>>,
    }

    #[async_trait]
    impl LLMAdapter for RecordingAdapter {
        async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(LLMResponse {
                content: self.reply.clone(),
                finish_reason: "stop".to_string(),
                usage: TokenUsage::default(),
            })
        }
    }

    #[tokio::test]
    async fn test_decompose_sends_catalog_in_prompt() {
        let adapter = Arc::new(RecordingAdapter {
            reply: r#"{"commands": [{"command_type": 3, "file_info": {"filename": "notes.txt"}}]}"#.to_string(),
            requests: Mutex::new(Vec::new()),
        });
        let llm = LLM::with_adapter(adapter.clone(), "deepseek-chat");
        let apps = AppCatalog {
            entries: vec![AppEntry {
                name: "QQ".to_string(),
                path: "D:/QQNT/QQ.exe".to_string(),
            }],
        };
        let commander = CommanderAgent::new(llm, apps);

        let plan = commander.decompose("read notes.txt").await.unwrap();
        assert_eq!(plan.operations, vec![OperationSpec::ReadFile { filename: "notes.txt".to_string() }]);

        let requests = adapter.requests.lock().unwrap();
        let system = requests[0].system_instruction.clone().unwrap();
        assert!(system.contains("1. QQ: D:/QQNT/QQ.exe"));
        assert_eq!(requests[0].messages[0].content, "read notes.txt");
    }
}
