//! Fenced-fragment extraction from raw model output.

use hxai_types::error::GenerationError;

/// Opening fence the prompt asks the model to use.
pub const HTML_FENCE_OPEN: &str = "```html";

/// Closing fence.
pub const FENCE_CLOSE: &str = "```";

/// Return the trimmed body of the first ```` ```html ```` block in `raw`.
///
/// The block runs from the first opening fence to the next closing fence
/// after it. Anything before or after is discarded.
///
/// # Errors
///
/// `MalformedResponse` if there is no opening fence, or no closing fence
/// after it. Partial text is never returned.
pub fn extract_fragment(raw: &str) -> Result<String, GenerationError> {
    let open = raw.find(HTML_FENCE_OPEN).ok_or_else(|| {
        GenerationError::MalformedResponse("response has no ```html block".to_string())
    })?;

    let body = &raw[open + HTML_FENCE_OPEN.len()..];
    let close = body.find(FENCE_CLOSE).ok_or_else(|| {
        GenerationError::MalformedResponse("```html block is never closed".to_string())
    })?;

    Ok(body[..close].trim().to_string())
}
