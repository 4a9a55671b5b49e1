use crate::stream::ChatStream;
use chrono::{DateTime, Utc};
use dlmm_lp_data::chat::{ChatMessage, ChatRequest, PoolContext};
use dlmm_lp_domain::{PoolRecord, RiskStyle, ShownPoolsState};
use std::sync::Arc;
use uuid::Uuid;

/// In-memory state of one chat session.
#[derive(Debug, Clone)]
pub struct ChatSession {
    /// Session identifier.
    pub id: Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Pools and bin steps already recommended.
    pub shown: ShownPoolsState,
    /// Conversation so far.
    pub history: Vec<ChatMessage>,
    /// Style chosen by the user, if any.
    pub style: Option<RiskStyle>,
    /// Last pool recommended in this session.
    pub last_pool: Option<PoolRecord>,
    /// Streaming buffer for chat answers.
    pub stream: Arc<ChatStream>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            shown: ShownPoolsState::new(),
            history: Vec::new(),
            style: None,
            last_pool: None,
            stream: Arc::new(ChatStream::new()),
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: Option<RiskStyle>) -> Self {
        self.style = style;
        self
    }

    /// Records a recommended pool.
    pub fn record_pool(&mut self, style: Option<RiskStyle>, pool: &PoolRecord) {
        self.shown.record(style, pool);
        self.last_pool = Some(pool.clone());
    }

    /// Builds a chat request for `message` from the current session context.
    /// The message itself is not added to the history.
    #[must_use]
    pub fn chat_request(&self, message: &str) -> ChatRequest {
        let mut messages = self.history.clone();
        messages.push(ChatMessage::user(message));
        let unseen = self
            .style
            .map(|s| self.shown.unseen_bin_steps(s))
            .unwrap_or_default();
        ChatRequest {
            messages,
            pool: self
                .last_pool
                .as_ref()
                .map(|p| PoolContext::from_pool(p, unseen)),
            style: self.style,
        }
    }

    /// Appends a completed exchange to the history.
    pub fn push_exchange(&mut self, question: &str, answer: &str) {
        self.history.push(ChatMessage::user(question));
        self.history.push(ChatMessage::assistant(answer));
    }

    /// Forgets shown pools and history.
    pub fn reset(&mut self) {
        self.shown.clear();
        self.history.clear();
        self.last_pool = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dlmm_lp_data::chat::ChatRole;

    #[test]
    fn test_chat_request_carries_context() {
        let mut session = ChatSession::new().with_style(Some(RiskStyle::Moderate));
        let pool = PoolRecord::new("SOL-USDC", "A", 10);
        session.record_pool(Some(RiskStyle::Moderate), &pool);
        session.push_exchange("hi", "hello");

        let request = session.chat_request("what range?");
        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[2].role, ChatRole::User);
        let context = request.pool.unwrap();
        assert_eq!(context.address, "A");
        assert_eq!(context.unseen_bin_steps, vec![15]);
        assert_eq!(request.style, Some(RiskStyle::Moderate));
        assert_eq!(session.history.len(), 2);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut session = ChatSession::new();
        session.record_pool(None, &PoolRecord::new("SOL-USDC", "A", 10));
        session.push_exchange("q", "a");
        session.reset();
        assert!(!session.shown.contains("A"));
        assert!(session.history.is_empty());
        assert!(session.last_pool.is_none());
    }
}
