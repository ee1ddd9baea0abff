//! Generation request and outcome types.

use serde::{Deserialize, Serialize};

/// A request to generate a fragment and, optionally, splice it into the
/// persisted document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_element_id: Option<String>,
    #[serde(default)]
    pub use_conversation_context: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl GenerationRequest {
    pub fn new(prompt_text: impl Into<String>) -> Self {
        Self {
            prompt_text: prompt_text.into(),
            ..Default::default()
        }
    }

    pub fn with_target(mut self, element_id: impl Into<String>) -> Self {
        self.target_element_id = Some(element_id.into());
        self
    }

    pub fn with_context(mut self, session_id: Option<String>) -> Self {
        self.use_conversation_context = true;
        self.session_id = session_id;
        self
    }
}

/// Result of a successful generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOutcome {
    /// The fragment extracted from the model response.
    pub fragment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_element_id: Option<String>,
    /// Whether the persisted document was rewritten.
    pub document_updated: bool,
}
