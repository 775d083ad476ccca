//! Writer Agent
//!
//! Generates creative content (poems, stories, essays, reports) for requests
//! classified as creative instructions.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use crate::agents::capabilities::Generate;
use crate::agents::parse_llm_json;
use crate::llm::provider::LLM;
use crate::types::{AppError, AppResult};

const WRITER_SYSTEM_PROMPT: &str = r#"You are an accomplished writer. Poems, songs, novels, essays, reports and assignments are all within your reach.
Create content that meets the user's requirements.

Respond with ONLY a JSON object:
{"content": "the created text"}"#;

#[derive(Debug, Deserialize)]
struct WriterResponse {
    content: String,
}

pub struct WriterAgent {
    llm: LLM,
}

impl WriterAgent {
    pub fn new(llm: LLM) -> Self {
        Self { llm }
    }

    pub fn parse_content(response: &str) -> AppResult<String> {
        let parsed = parse_llm_json::<WriterResponse>(response)
            .map_err(|e| AppError::Validation(format!("Failed to parse writer JSON: {}", e)))?;
        Ok(parsed.content)
    }
}

#[async_trait]
impl Generate for WriterAgent {
    async fn generate(&self, brief: &str) -> AppResult<String> {
        info!(brief_len = brief.len(), "Generating content");
        let response = self.llm.complete(WRITER_SYSTEM_PROMPT, brief).await?;
        let content = Self::parse_content(&response)?;
        info!(content_len = content.len(), "Content generated");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_content() {
        let content = WriterAgent::parse_content("```json\n{\"content\": \"Roses are red\"}\n```").unwrap();
        assert_eq!(content, "Roses are red");
    }

    #[test]
    fn test_parse_content_requires_json() {
        assert!(matches!(
            WriterAgent::parse_content("Roses are red"),
            Err(AppError::Validation(_))
        ));
    }
}
