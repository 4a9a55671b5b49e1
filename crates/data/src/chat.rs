//! Streaming chat/completion client.
//!
//! The backend receives the message history plus optional pool and style
//! context and streams the answer back as plain UTF-8 text. Chunks are handed
//! to a sink as they arrive; the full answer is returned at the end.

use crate::error::{DataError, Result};
use async_trait::async_trait;
use dlmm_lp_domain::{PoolRecord, RiskStyle};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One message of the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Pool the conversation is currently about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolContext {
    pub address: String,
    pub name: String,
    pub bin_step: u16,
    pub liquidity: Decimal,
    pub apy: Decimal,
    pub fees_24h: Decimal,
    /// Preferred bin steps of the style not shown yet this session.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unseen_bin_steps: Vec<u16>,
}

impl PoolContext {
    #[must_use]
    pub fn from_pool(pool: &PoolRecord, unseen_bin_steps: Vec<u16>) -> Self {
        Self {
            address: pool.address.clone(),
            name: pool.name.clone(),
            bin_step: pool.bin_step,
            liquidity: pool.liquidity,
            apy: pool.apy,
            fees_24h: pool.fees_24h,
            unseen_bin_steps,
        }
    }
}

/// Body sent to the chat backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool: Option<PoolContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<RiskStyle>,
}

/// Receives streamed text as it arrives.
pub type ChunkSink<'a> = dyn FnMut(&str) + Send + 'a;

/// Chat/completion backend.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Sends `request`, feeding chunks to `on_chunk`, and returns the full answer.
    async fn complete(&self, request: &ChatRequest, on_chunk: &mut ChunkSink<'_>) -> Result<String>;
}

/// Configuration for [`HttpChatClient`].
#[derive(Debug, Clone)]
pub struct ChatClientConfig {
    /// Endpoint URL receiving POSTed [`ChatRequest`] bodies.
    pub url: String,
    /// Timeout for the whole exchange.
    pub timeout: Duration,
}

impl Default for ChatClientConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:3000/api/chat".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Chat backend over HTTP with a chunked text response.
#[derive(Debug, Clone)]
pub struct HttpChatClient {
    client: Client,
    config: ChatClientConfig,
}

impl HttpChatClient {
    pub fn new(config: ChatClientConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl ChatClient for HttpChatClient {
    async fn complete(&self, request: &ChatRequest, on_chunk: &mut ChunkSink<'_>) -> Result<String> {
        debug!(
            url = %self.config.url,
            messages = request.messages.len(),
            pool = ?request.pool.as_ref().map(|p| &p.address),
            "Sending chat request"
        );

        let mut response = self.client.post(&self.config.url).json(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Chat request failed");
            return Err(DataError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let mut decoder = Utf8Chunks::default();
        let mut answer = String::new();
        while let Some(bytes) = response.chunk().await? {
            let text = decoder.push(&bytes);
            if !text.is_empty() {
                on_chunk(&text);
                answer.push_str(&text);
            }
        }
        decoder.finish()?;

        info!(chars = answer.len(), "Chat response complete");
        Ok(answer)
    }
}

/// Reassembles UTF-8 text split across network chunks.
#[derive(Debug, Default)]
struct Utf8Chunks {
    pending: Vec<u8>,
}

impl Utf8Chunks {
    fn push(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let valid = match std::str::from_utf8(&self.pending) {
            Ok(_) => self.pending.len(),
            // A sequence cut at the chunk boundary has no error length yet.
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(e) => {
                // Replace the invalid bytes and carry on.
                let end = e.valid_up_to() + e.error_len().unwrap_or(1);
                let text = String::from_utf8_lossy(&self.pending[..end]).into_owned();
                self.pending.drain(..end);
                return text + &self.push(&[]);
            }
        };
        let text = String::from_utf8_lossy(&self.pending[..valid]).into_owned();
        self.pending.drain(..valid);
        text
    }

    fn finish(self) -> Result<()> {
        if self.pending.is_empty() {
            Ok(())
        } else {
            Err(DataError::Stream(format!(
                "{} trailing bytes of incomplete UTF-8",
                self.pending.len()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_utf8_chunks_reassembles_split_codepoints() {
        let text = "Bin ±5 → 0.057 SOL";
        let bytes = text.as_bytes();
        // Split inside the multi-byte '±'.
        let split = text.find('±').unwrap() + 1;

        let mut decoder = Utf8Chunks::default();
        let mut out = decoder.push(&bytes[..split]);
        out.push_str(&decoder.push(&bytes[split..]));
        assert_eq!(out, text);
        assert!(decoder.finish().is_ok());
    }

    #[test]
    fn test_utf8_chunks_reports_truncated_tail() {
        let mut decoder = Utf8Chunks::default();
        assert_eq!(decoder.push(&[b'a', 0xE2, 0x86]), "a");
        assert!(decoder.finish().is_err());
    }

    #[test]
    fn test_utf8_chunks_replaces_invalid_bytes() {
        let mut decoder = Utf8Chunks::default();
        assert_eq!(decoder.push(&[b'a', 0xFF, b'b']), "a\u{FFFD}b");
    }

    #[test]
    fn test_request_serialization_omits_empty_context() {
        let request = ChatRequest {
            messages: vec![ChatMessage::user("which pool?")],
            pool: None,
            style: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "user");
        assert!(json.get("pool").is_none());
        assert!(json.get("style").is_none());
    }

    #[test]
    fn test_pool_context_from_pool() {
        let pool = PoolRecord::new("SOL-USDC", "addr", 10)
            .with_liquidity(dec!(5000))
            .with_apy(dec!(7));
        let request = ChatRequest {
            messages: vec![],
            pool: Some(PoolContext::from_pool(&pool, vec![15])),
            style: Some(RiskStyle::Moderate),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["pool"]["binStep"], 10);
        assert_eq!(json["pool"]["unseenBinSteps"][0], 15);
        assert_eq!(json["style"], "moderate");
    }
}
