//! Configuration loader for hxai.
//!
//! Reads `hxai.toml` and deserializes it into [`AppConfig`]. Falls back to
//! defaults when the file is missing or malformed, then applies environment
//! overrides.

use std::path::{Path, PathBuf};

use hxai_types::config::{AppConfig, DocumentMode};

/// Config file used when neither `--config` nor `HXAI_CONFIG` is given.
pub const DEFAULT_CONFIG_FILE: &str = "hxai.toml";

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "HXAI_CONFIG";

/// Pick the config file path: explicit flag, then `HXAI_CONFIG`, then
/// `./hxai.toml`.
pub fn resolve_config_path(
    explicit: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| lookup(CONFIG_PATH_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Load configuration from `path`.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - Otherwise returns the parsed config, with a zero `llm.timeout_secs`
///   replaced by the default.
pub async fn load_config(path: &Path) -> AppConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => sanitize(config),
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            AppConfig::default()
        }
    }
}

/// A zero per-attempt timeout would fail every model call before it is sent.
fn sanitize(mut config: AppConfig) -> AppConfig {
    if config.llm.timeout_secs == 0 {
        let fallback = AppConfig::default().llm.timeout_secs;
        tracing::warn!("llm.timeout_secs must be at least 1, using {fallback}");
        config.llm.timeout_secs = fallback;
    }
    config
}

/// Apply `OPENAI_MODEL`, `OPENAI_BASE_URL` and `HXAI_DOCUMENT_MODE`
/// overrides read through `lookup`. Blank values are ignored, and an
/// unknown document mode is logged and ignored.
pub fn apply_env_overrides(
    mut config: AppConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> AppConfig {
    let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(model) = get("OPENAI_MODEL") {
        config.llm.model = model;
    }
    if let Some(base_url) = get("OPENAI_BASE_URL") {
        config.llm.base_url = base_url;
    }
    if let Some(mode) = get("HXAI_DOCUMENT_MODE") {
        match mode.parse::<DocumentMode>() {
            Ok(mode) => config.document.mode = mode,
            Err(err) => tracing::warn!("Ignoring HXAI_DOCUMENT_MODE: {err}"),
        }
    }
    config
}
