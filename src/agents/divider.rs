//! Divider Agent
//!
//! Classifies the latest message of a conversation into one of three routes and
//! extracts any supplementary information the downstream steps will need.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use crate::agents::capabilities::Classify;
use crate::agents::parse_llm_json;
use crate::llm::provider::LLM;
use crate::models::{Classification, ClassificationKind, ConversationHistory};
use crate::types::{AppError, AppResult};

const DIVIDER_SYSTEM_PROMPT: &str = r#"You are an assistant that decides whether the user's input is an instruction, a natural-language question, a creative request, or a creative request whose result must be written to a file.

Only file operations (create, delete, read, rename, append) and opening websites or applications count as instructions. Creative requests are poems, stories, essays and similar writing; writing code is NOT creative.

Return ques_type:
- 0 for a pure instruction with no creative requirement
- 1 for a natural-language question, or a creative request that involves no file operation
- 2 for a file operation that contains a creative request

If it is an instruction, rewrite it as a precise and concise instruction in ques_content.
If the history contains text that is to be written to a file, put that text in information and say that it is the text to be written to the file.
If the request depends on facts mentioned earlier in the conversation, copy them into information; the executor cannot look anything up.

Examples:
1. "Create index.txt containing my name" -> 0
2. "How should I live a healthy life?" -> 1
3. "Write a poem praising nature" -> 1
4. "Write a dark-themed novel and save it to mynovel.txt" -> 2
5. Anything about writing code -> 1

Respond with ONLY a JSON object:
{"ques_type": 0, "ques_content": "...", "information": "..."}"#;

#[derive(Debug, Deserialize)]
struct JudgementResponse {
    ques_type: i64,
    #[serde(default)]
    ques_content: String,
    #[serde(default)]
    information: String,
}

pub struct DividerAgent {
    llm: LLM,
}

impl DividerAgent {
    pub fn new(llm: LLM) -> Self {
        Self { llm }
    }

    /// Frame prior turns and the latest message the way the classifier expects.
    pub fn format_history(history: &ConversationHistory, latest: &str) -> String {
        let mut turns: Vec<&str> = history.iter().map(|t| t.content.as_str()).collect();
        turns.push(latest);
        format!(
            "History:\n{}\n---\nLatest question:\n{}",
            turns.join("\n---\n"),
            latest
        )
    }

    pub fn parse_classification(response: &str) -> AppResult<Classification> {
        let parsed = parse_llm_json::<JudgementResponse>(response)
            .map_err(|e| AppError::Validation(format!("Failed to parse classification JSON: {}", e)))?;

        let kind = ClassificationKind::from_code(parsed.ques_type).ok_or_else(|| {
            AppError::Validation(format!("Unknown classification type: {}", parsed.ques_type))
        })?;

        Ok(Classification {
            kind,
            normalized_request: parsed.ques_content,
            supplemental_info: parsed.information,
        })
    }
}

#[async_trait]
impl Classify for DividerAgent {
    async fn classify(&self, history: &ConversationHistory, latest: &str) -> AppResult<Classification> {
        let prompt = Self::format_history(history, latest);
        info!(history_turns = history.len(), "Classifying request");

        let response = self.llm.complete(DIVIDER_SYSTEM_PROMPT, &prompt).await?;
        let classification = Self::parse_classification(&response)?;

        info!(kind = ?classification.kind, "Request classified");
        Ok(classification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConversationTurn;

    #[test]
    fn test_format_history() {
        let history = vec![
            ConversationTurn::user("hello"),
            ConversationTurn::agent("hi there"),
        ];
        let framed = DividerAgent::format_history(&history, "delete a.txt");
        assert_eq!(
            framed,
            "History:\nhello\n---\nhi there\n---\ndelete a.txt\n---\nLatest question:\ndelete a.txt"
        );
    }

    #[test]
    fn test_parse_classification_fenced() {
        let response = "```json\n{\"ques_type\": 2, \"ques_content\": \"write a poem to poem.txt\", \"information\": \"\"}\n```";
        let classification = DividerAgent::parse_classification(response).unwrap();
        assert_eq!(classification.kind, ClassificationKind::CreativeInstruction);
        assert_eq!(classification.normalized_request, "write a poem to poem.txt");
    }

    #[test]
    fn test_parse_classification_rejects_unknown_type() {
        let result = DividerAgent::parse_classification("{\"ques_type\": 7, \"ques_content\": \"x\", \"information\": \"\"}");
        assert!(matches!(result, Err(AppError::Validation(msg)) if msg.contains('7')));
    }

    #[test]
    fn test_parse_classification_rejects_prose() {
        let result = DividerAgent::parse_classification("I think this is an instruction.");
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
