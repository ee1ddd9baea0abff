//! Session-scoped conversation logs.
//!
//! A [`Conversation`] is an append-only list of turns behind its own lock.
//! The [`ConversationRegistry`] maps session ids to conversations and creates
//! them on first use.

use std::sync::{Arc, PoisonError, RwLock};

use dashmap::DashMap;

use hxai_types::conversation::{ConversationTurn, DEFAULT_SESSION};
use hxai_types::llm::MessageRole;

/// Ordered, append-only log of turns for one session.
#[derive(Debug, Default)]
pub struct Conversation {
    turns: RwLock<Vec<ConversationTurn>>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, turn: ConversationTurn) {
        self.turns
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(turn);
    }

    /// Append a user turn and the assistant's reply under one lock, so
    /// readers see both or neither.
    pub fn append_exchange(&self, user: impl Into<String>, assistant: impl Into<String>) {
        let user = ConversationTurn::user(user);
        let assistant = ConversationTurn::assistant(assistant);
        let mut turns = self.turns.write().unwrap_or_else(PoisonError::into_inner);
        turns.push(user);
        turns.push(assistant);
    }

    /// Copy of all turns, oldest first.
    pub fn snapshot(&self) -> Vec<ConversationTurn> {
        self.turns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.turns.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.turns
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Content of the most recent assistant turn, if any.
    pub fn latest_assistant(&self) -> Option<String> {
        self.turns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .rev()
            .find(|turn| turn.role == MessageRole::Assistant)
            .map(|turn| turn.content.clone())
    }
}

/// Conversations keyed by session id.
#[derive(Debug, Default)]
pub struct ConversationRegistry {
    sessions: DashMap<String, Arc<Conversation>>,
}

impl ConversationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve an optional caller-supplied session id, falling back to
    /// [`DEFAULT_SESSION`] when absent or blank.
    pub fn session_key(session_id: Option<&str>) -> &str {
        match session_id.map(str::trim) {
            Some(id) if !id.is_empty() => id,
            _ => DEFAULT_SESSION,
        }
    }

    /// The conversation for `session_id`, created empty if it does not exist.
    pub fn get_or_create(&self, session_id: &str) -> Arc<Conversation> {
        self.sessions
            .entry(session_id.to_string())
            .or_default()
            .clone()
    }

    pub fn get(&self, session_id: &str) -> Option<Arc<Conversation>> {
        self.sessions.get(session_id).map(|entry| entry.value().clone())
    }

    /// Drop a session. Returns whether it existed.
    pub fn remove(&self, session_id: &str) -> bool {
        self.sessions.remove(session_id).is_some()
    }

    /// Ids of all known sessions, sorted.
    pub fn session_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions.iter().map(|entry| entry.key().clone()).collect();
        ids.sort();
        ids
    }
}
