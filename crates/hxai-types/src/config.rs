//! Configuration types for hxai.
//!
//! `AppConfig` represents the top-level `hxai.toml`. Every section and field
//! has a default, so an empty file (or no file at all) is a valid config.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub document: DocumentConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding `index.html` and static assets. Skipped if missing.
    #[serde(default = "default_web_dir")]
    pub web_dir: PathBuf,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3333
}

fn default_web_dir() -> PathBuf {
    PathBuf::from("templates")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            web_dir: default_web_dir(),
        }
    }
}

/// Chat-completion provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API (without `/chat/completions`).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Per-attempt timeout for a model call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Extra attempts after a transient failure.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4-turbo-preview".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_retries() -> u32 {
    1
}

fn default_retry_backoff_ms() -> u64 {
    500
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// How generated fragments reach the persisted document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentMode {
    /// Patch the targeted element of the stored document.
    #[default]
    Incremental,
    /// Regenerate the whole document from the latest fragment.
    Rebuild,
}

impl fmt::Display for DocumentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentMode::Incremental => write!(f, "incremental"),
            DocumentMode::Rebuild => write!(f, "rebuild"),
        }
    }
}

impl FromStr for DocumentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "incremental" => Ok(DocumentMode::Incremental),
            "rebuild" => Ok(DocumentMode::Rebuild),
            other => Err(format!("invalid document mode: '{other}'")),
        }
    }
}

/// Persisted document settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// The document rewritten after every update.
    #[serde(default = "default_document_path")]
    pub path: PathBuf,
    /// Read-only starting template used by reset and lazy creation.
    #[serde(default = "default_template_path")]
    pub template: PathBuf,
    #[serde(default)]
    pub mode: DocumentMode,
    #[serde(default = "default_reset_on_startup")]
    pub reset_on_startup: bool,
}

fn default_document_path() -> PathBuf {
    PathBuf::from("prototype.html")
}

fn default_template_path() -> PathBuf {
    PathBuf::from("prototype-start.html")
}

fn default_reset_on_startup() -> bool {
    true
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            path: default_document_path(),
            template: default_template_path(),
            mode: DocumentMode::default(),
            reset_on_startup: default_reset_on_startup(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_default_values() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 3333);
        assert_eq!(config.llm.model, "gpt-4-turbo-preview");
        assert_eq!(config.llm.max_retries, 1);
        assert_eq!(config.document.mode, DocumentMode::Incremental);
        assert!(config.document.reset_on_startup);
    }

    #[test]
    fn test_app_config_deserialize_empty() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_app_config_deserialize_partial_sections() {
        let toml_str = r#"
[llm]
model = "gpt-4o"
timeout_secs = 30

[document]
path = "out/page.html"
mode = "rebuild"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.timeout_secs, 30);
        assert_eq!(config.llm.base_url, "https://api.openai.com/v1");
        assert_eq!(config.document.path, PathBuf::from("out/page.html"));
        assert_eq!(config.document.template, PathBuf::from("prototype-start.html"));
        assert_eq!(config.document.mode, DocumentMode::Rebuild);
        assert_eq!(config.server, ServerConfig::default());
    }

    #[test]
    fn test_document_mode_from_str() {
        assert_eq!("Rebuild".parse::<DocumentMode>().unwrap(), DocumentMode::Rebuild);
        assert_eq!(
            "incremental".parse::<DocumentMode>().unwrap(),
            DocumentMode::Incremental
        );
        assert!("append".parse::<DocumentMode>().is_err());
    }
}
