//! Prompt builder for fragment generation.
//!
//! Wraps the caller's free-text description in a fixed instruction template.
//! The model is told to answer with a single ```` ```html ```` block, which
//! [`crate::extract::extract_fragment`] later pulls back out.
//!
//! The user message is a `- CODE DESCRIPTION :` header, the description in
//! a bare fence (optionally preceded by the current markup of the target
//! element), then the fixed output constraints.

use hxai_types::conversation::ConversationTurn;
use hxai_types::error::GenerationError;
use hxai_types::llm::Message;

/// Fixed system instruction sent with every request.
pub const SYSTEM_PROMPT: &str = "You are an expert at writing HTML and CSS. \
    Your Task is to write new HTML and CSS Code for a web app, according to the provided task details. \
    The html code you write can make use of Tailwind classes for styling. \
    Your generated code will be directly written to innerHTML of an HTML Element and used in production.";

/// Placeholder image service the model may use when asked for images.
pub const IMAGE_SERVICE_URL: &str = "https://source.unsplash.com/random/";

const CONTEXT_PREFIX: &str = "Here's what I have so far:";

/// The system/user message pair for one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system_message: String,
    pub user_message: String,
}

impl PromptPair {
    /// Ordered messages for the model: `history`, then system, then user.
    pub fn to_messages(&self, history: &[ConversationTurn]) -> Vec<Message> {
        let mut messages: Vec<Message> = history.iter().map(Message::from).collect();
        messages.push(Message::system(self.system_message.clone()));
        messages.push(Message::user(self.user_message.clone()));
        messages
    }
}

/// Builds [`PromptPair`]s. Stateless.
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the prompt pair for `prompt_text`.
    ///
    /// When `context_fragment` is given, the description is prefixed with the
    /// current markup so the model edits it instead of starting over.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when `prompt_text` is empty or whitespace.
    pub fn build(
        prompt_text: &str,
        context_fragment: Option<&str>,
    ) -> Result<PromptPair, GenerationError> {
        if prompt_text.trim().is_empty() {
            return Err(GenerationError::InvalidArgument(
                "Prompt is required".to_string(),
            ));
        }

        let description = match context_fragment {
            Some(context) if !context.trim().is_empty() => {
                format!("{CONTEXT_PREFIX}\n{context}\n{prompt_text}")
            }
            _ => prompt_text.to_string(),
        };

        let user_message = format!(
            "- CODE DESCRIPTION :\n```\n{description}\n```\n\n{}",
            Self::constraints()
        );

        Ok(PromptPair {
            system_message: SYSTEM_PROMPT.to_string(),
            user_message,
        })
    }

    /// Fixed output constraints appended to every user message.
    fn constraints() -> String {
        [
            "Answer with generated code only. DO NOT ADD ANY EXTRA TEXT DESCRIPTION OR COMMENTS BESIDES THE CODE. Your answer contains code only !".to_string(),
            format!(
                "Only include images if you are specifically asked for it. If asked to use images you can use {IMAGE_SERVICE_URL} as the image source. \
                 You can use one keyword to get a specific image by providing it like this {IMAGE_SERVICE_URL}?keyword."
            ),
            "When using images make sure that they are not stretched by using object-cover or bg-cover on the image.".to_string(),
            "Write the full code for the new HTML and CSS for the web app, which uses tailwind classes if needed. You can use the svg icon code of heroicons directly if needed.".to_string(),
            "The code that you write will be written directly into an HTML DOM. Make sure that all html elements are closed properly and that your full code is enclosed with ```html blocks.".to_string(),
            "Do not use libraries or imports except what is provided in this task; otherwise it would crash the component because not installed. Do not import extra libraries besides what is provided above !".to_string(),
            "Write the Code as the creative genius that you are - with good ui formatting.".to_string(),
        ]
        .join(" ")
    }
}

/// Turn literal `\n` escape sequences (as sent by some form encoders) into
/// real newlines.
pub fn normalize_prompt(raw: &str) -> String {
    raw.replace("\\n", "\n")
}
