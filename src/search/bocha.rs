//! Bocha Web Search Client
//!
//! Calls the Bocha web-search API and condenses the hits into a plain-text
//! digest that can be appended to a request as reference material.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::SearchError;
use crate::agents::capabilities::Search;
use crate::types::AppResult;

const BOCHA_SEARCH_URL: &str = "https://api.bochaai.com/v1/web-search";

/// One page from a Bocha search response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebPage {
    pub title: String,
    /// Summary when available, otherwise the snippet
    pub summary: String,
    pub url: String,
    pub site: String,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    summary: bool,
    count: u32,
}

pub struct BochaClient {
    client: Client,
    api_key: String,
    endpoint: String,
    max_results: u32,
}

impl BochaClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            endpoint: BOCHA_SEARCH_URL.to_string(),
            max_results: 10,
        }
    }

    /// Configure client from config; `None` when no key is set
    pub fn from_config(config: &crate::config::SearchConfig) -> Option<Self> {
        if config.bocha_api_key.is_empty() {
            return None;
        }
        Some(Self::new(config.bocha_api_key.clone()).with_max_results(config.result_count))
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set maximum results per search
    pub fn with_max_results(mut self, max: u32) -> Self {
        self.max_results = max;
        self
    }

    pub async fn search_pages(&self, query: &str) -> Result<Vec<WebPage>, SearchError> {
        if self.api_key.is_empty() {
            return Err(SearchError::NoApiKey);
        }

        info!(query_len = query.len(), count = self.max_results, "Searching the web via Bocha");

        let response = self
            .client
            .post(self.endpoint.as_str())
            .bearer_auth(&self.api_key)
            .json(&SearchRequest {
                query,
                summary: true,
                count: self.max_results,
            })
            .send()
            .await
            .map_err(|e| SearchError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::RequestFailed(format!("HTTP {}: {}", status, body)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::ParseError(e.to_string()))?;

        debug!("Raw Bocha response received");
        let pages = parse_pages(&body);
        info!(count = pages.len(), "Bocha search completed");
        Ok(pages)
    }
}

/// Pull `data.webPages.value[]` out of a response. Missing sections mean no hits.
pub fn parse_pages(body: &Value) -> Vec<WebPage> {
    let Some(items) = body
        .get("data")
        .and_then(|d| d.get("webPages"))
        .and_then(|w| w.get("value"))
        .and_then(|v| v.as_array())
    else {
        return Vec::new();
    };

    let text = |item: &Value, key: &str| {
        item.get(key)
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string()
    };

    items
        .iter()
        .map(|item| {
            let summary = match text(item, "summary") {
                s if s.is_empty() => text(item, "snippet"),
                s => s,
            };
            WebPage {
                title: text(item, "name"),
                summary,
                url: text(item, "url"),
                site: text(item, "siteName"),
            }
        })
        .collect()
}

/// Render pages as the digest appended to a request
pub fn format_digest(pages: &[WebPage]) -> String {
    if pages.is_empty() {
        return "No relevant content found.".to_string();
    }

    let entries: Vec<String> = pages
        .iter()
        .map(|p| format!("**{}**\n{}\nSource: [{}]({})\n", p.title, p.summary, p.site, p.url))
        .collect();
    format!("Bocha search results:\n{}", entries.join("\n"))
}

#[async_trait]
impl Search for BochaClient {
    async fn search(&self, query: &str) -> AppResult<String> {
        let pages = self.search_pages(query).await?;
        Ok(format_digest(&pages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_pages_prefers_summary() {
        let body = json!({
            "data": {
                "webPages": {
                    "value": [
                        {
                            "name": "Release notes",
                            "summary": "Full summary",
                            "snippet": "short",
                            "url": "https://example.com/notes",
                            "siteName": "Example"
                        },
                        {
                            "name": "Blog",
                            "summary": "",
                            "snippet": "snippet only",
                            "url": "https://blog.example.com",
                            "siteName": "Blog"
                        }
                    ]
                }
            }
        });

        let pages = parse_pages(&body);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].summary, "Full summary");
        assert_eq!(pages[1].summary, "snippet only");
        assert_eq!(pages[1].site, "Blog");
    }

    #[test]
    fn test_parse_pages_missing_sections() {
        assert!(parse_pages(&json!({})).is_empty());
        assert!(parse_pages(&json!({"data": {"webPages": {}}})).is_empty());
    }

    #[test]
    fn test_format_digest() {
        assert_eq!(format_digest(&[]), "No relevant content found.");

        let digest = format_digest(&[WebPage {
            title: "Title".to_string(),
            summary: "Body".to_string(),
            url: "https://example.com".to_string(),
            site: "Example".to_string(),
        }]);
        assert!(digest.starts_with("Bocha search results:\n"));
        assert!(digest.contains("**Title**\nBody\nSource: [Example](https://example.com)"));
    }

    #[tokio::test]
    async fn test_search_digest_from_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/web-search")
            .match_header("authorization", "Bearer bocha-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "data": {"webPages": {"value": [
                        {"name": "Rust 1.80", "summary": "Released in July", "url": "https://blog.rust-lang.org", "siteName": "Rust Blog"}
                    ]}}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = BochaClient::new("bocha-key".to_string())
            .with_endpoint(format!("{}/v1/web-search", server.url()))
            .with_max_results(3);
        let digest = client.search("rust release").await.unwrap();

        mock.assert_async().await;
        assert!(digest.contains("**Rust 1.80**\nReleased in July"));
    }

    #[tokio::test]
    async fn test_http_error_is_request_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/web-search")
            .with_status(401)
            .with_body("invalid key")
            .create_async()
            .await;

        let client = BochaClient::new("bad".to_string()).with_endpoint(format!("{}/v1/web-search", server.url()));
        let result = client.search_pages("anything").await;
        assert!(matches!(result, Err(SearchError::RequestFailed(msg)) if msg.contains("401")));
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        let client = BochaClient::new(String::new());
        let result = client.search_pages("anything").await;
        assert!(matches!(result, Err(SearchError::NoApiKey)));
    }
}
