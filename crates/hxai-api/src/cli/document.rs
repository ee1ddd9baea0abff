//! Document maintenance commands.

use anyhow::{Context, Result};

use hxai_types::config::AppConfig;

use crate::state::document_store;

/// Overwrite the stored document with the starting template.
pub async fn reset(config: &AppConfig, json: bool, quiet: bool) -> Result<()> {
    let store = document_store(config);
    store.reset().await.with_context(|| {
        format!(
            "failed to reset {} from {}",
            config.document.path.display(),
            config.document.template.display()
        )
    })?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "status": "reset",
                "document": config.document.path.display().to_string(),
            })
        );
    } else if !quiet {
        println!(
            "Reset {} from {}",
            config.document.path.display(),
            config.document.template.display()
        );
    }

    Ok(())
}
