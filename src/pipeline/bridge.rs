use std::sync::Arc;
use tracing::info;

use crate::agents::capabilities::Generate;
use crate::types::AppResult;

pub const WRITER_SECTION: &str = "\nContent created by the writer:\n";

/// Splices generated content onto a request before it is decomposed.
#[derive(Clone)]
pub struct ContentBridge {
    generator: Arc<dyn Generate>,
}

impl ContentBridge {
    pub fn new(generator: Arc<dyn Generate>) -> Self {
        Self { generator }
    }

    /// Generate content for `brief` and append it to `request`. The original
    /// request text is kept; generation errors propagate unchanged.
    pub async fn enrich(&self, request: &str, brief: &str) -> AppResult<String> {
        let generated = self.generator.generate(brief).await?;
        info!(content_len = generated.len(), "Spliced generated content into request");
        Ok(format!("{}{}{}", request, WRITER_SECTION, generated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AppError;
    use async_trait::async_trait;

    struct FixedWriter(Option<&'static str>);

    #[async_trait]
    impl Generate for FixedWriter {
        async fn generate(&self, _brief: &str) -> AppResult<String> {
            match self.0 {
                Some(text) => Ok(text.to_string()),
                None => Err(AppError::LLMApi("quota exceeded".to_string())),
            }
        }
    }

    #[tokio::test]
    async fn test_enrich_appends_content() {
        let bridge = ContentBridge::new(Arc::new(FixedWriter(Some("Once upon a time"))));
        let text = bridge.enrich("write a story to story.txt", "brief").await.unwrap();
        assert_eq!(
            text,
            "write a story to story.txt\nContent created by the writer:\nOnce upon a time"
        );
    }

    #[tokio::test]
    async fn test_generation_failure_propagates() {
        let bridge = ContentBridge::new(Arc::new(FixedWriter(None)));
        let result = bridge.enrich("write a story", "brief").await;
        assert!(matches!(result, Err(AppError::LLMApi(_))));
    }
}
