//! One-shot generation from the command line.

use anyhow::Result;

use hxai_types::generation::GenerationRequest;

use crate::state::AppState;

/// Generate a fragment for `prompt`, patching `target` when given, and print it.
pub async fn generate_once(
    state: &AppState,
    prompt: String,
    target: Option<String>,
    json: bool,
) -> Result<()> {
    let mut request = GenerationRequest::new(prompt);
    if let Some(target) = target {
        request = request.with_target(target);
    }

    let outcome = state.service.generate(request).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "html_code": outcome.fragment,
                "target": outcome.target_element_id,
                "document_updated": outcome.document_updated,
                "document": state.service.store().document_path().display().to_string(),
            }))?
        );
    } else {
        println!("{}", outcome.fragment);
        if outcome.document_updated {
            eprintln!(
                "Updated {}",
                state.service.store().document_path().display()
            );
        }
    }

    Ok(())
}
