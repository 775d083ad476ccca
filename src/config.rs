use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub llm: LLMConfig,
    pub search: SearchConfig,
    pub workspace: WorkspaceConfig,
    pub apps: AppCatalog,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LLMConfig {
    pub provider: String,
    pub api_key: String,
    pub api_base: Option<String>,
    pub model: String,
    pub temperature: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub bocha_api_key: String,
    pub result_count: u32,
    /// Literal phrase that, when present in a request, triggers a web search
    pub trigger: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceConfig {
    /// Relative filenames in operations resolve against this directory
    pub root: PathBuf,
}

/// Friendly application names mapped to their launch path or identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppCatalog {
    pub entries: Vec<AppEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppEntry {
    pub name: String,
    pub path: String,
}

impl AppCatalog {
    /// Parse `Name=path;Name=path`. Blank segments are ignored.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut entries = Vec::new();
        for segment in raw.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            let (name, path) = segment
                .split_once('=')
                .with_context(|| format!("APP_CATALOG entry '{}' is not of the form Name=path", segment))?;
            entries.push(AppEntry {
                name: name.trim().to_string(),
                path: path.trim().to_string(),
            });
        }
        Ok(Self { entries })
    }

    /// Case-insensitive lookup by application name
    pub fn resolve(&self, name: &str) -> Option<&str> {
        let wanted = name.trim().to_lowercase();
        self.entries
            .iter()
            .find(|e| e.name.to_lowercase() == wanted)
            .map(|e| e.path.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub const DEFAULT_SEARCH_TRIGGER: &str = "search the web";

impl LLMConfig {
    /// Base URL for the configured provider when none is set explicitly
    pub fn resolved_api_base(&self) -> String {
        if let Some(base) = &self.api_base {
            return base.clone();
        }
        match self.provider.as_str() {
            "openai" => "https://api.openai.com/v1".to_string(),
            _ => "https://api.deepseek.com/v1".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = var("LLM_PROVIDER").unwrap_or_else(|| "deepseek".to_string());
        let api_key = var("LLM_API_KEY")
            .or_else(|| match provider.as_str() {
                "openai" => var("OPENAI_API_KEY"),
                _ => var("DEEPSEEK_API_KEY"),
            })
            .unwrap_or_default();

        Ok(Self {
            llm: LLMConfig {
                api_key,
                api_base: var("LLM_API_BASE"),
                model: var("LLM_MODEL").unwrap_or_else(|| "deepseek-chat".to_string()),
                temperature: var("LLM_TEMPERATURE")
                    .unwrap_or_else(|| "0.7".to_string())
                    .parse()
                    .context("LLM_TEMPERATURE must be a number")?,
                provider,
            },
            search: SearchConfig {
                bocha_api_key: var("BOCHA_API_KEY").unwrap_or_default(),
                result_count: var("SEARCH_RESULT_COUNT")
                    .unwrap_or_else(|| "10".to_string())
                    .parse()
                    .context("SEARCH_RESULT_COUNT must be a positive integer")?,
                trigger: var("WEB_SEARCH_TRIGGER").unwrap_or_else(|| DEFAULT_SEARCH_TRIGGER.to_string()),
            },
            workspace: WorkspaceConfig {
                root: var("WORKSPACE_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(".")),
            },
            apps: AppCatalog::parse(&var("APP_CATALOG").unwrap_or_default())?,
        })
    }
}
