//! API key resolution.
//!
//! The key is read from the environment variable named by
//! `llm.api_key_env` (default `OPENAI_API_KEY`) and wrapped in a
//! [`SecretString`] right away, so it never shows up in `Debug` output or logs.

use secrecy::SecretString;

use hxai_types::config::LlmConfig;

/// Resolve the API key using `lookup` for environment access.
///
/// Returns `None` when the variable is unset or blank.
pub fn resolve_api_key(
    config: &LlmConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<SecretString> {
    lookup(&config.api_key_env)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(SecretString::from)
}

/// Read an environment variable, treating non-Unicode values as unset.
pub fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_resolves_named_variable() {
        let config = LlmConfig {
            api_key_env: "CUSTOM_KEY".to_string(),
            ..LlmConfig::default()
        };
        let key = resolve_api_key(&config, |name| {
            (name == "CUSTOM_KEY").then(|| " sk-test \n".to_string())
        })
        .unwrap();
        assert_eq!(key.expose_secret(), "sk-test");
    }

    #[test]
    fn test_missing_or_blank_is_none() {
        let config = LlmConfig::default();
        assert!(resolve_api_key(&config, |_| None).is_none());
        assert!(resolve_api_key(&config, |_| Some("   ".to_string())).is_none());
    }

    #[test]
    fn test_debug_output_hides_key() {
        let config = LlmConfig::default();
        let key = resolve_api_key(&config, |_| Some("sk-very-secret".to_string())).unwrap();
        assert!(!format!("{key:?}").contains("sk-very-secret"));
    }
}
