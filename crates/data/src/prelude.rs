pub use crate::chat::{
    ChatClient, ChatClientConfig, ChatMessage, ChatRequest, ChatRole, ChunkSink, HttpChatClient,
    PoolContext,
};
pub use crate::error::DataError;
pub use crate::providers::PoolListingProvider;
pub use crate::providers::meteora::{MeteoraApiConfig, MeteoraPoolApi, parse_groups};
