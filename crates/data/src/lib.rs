//! REST collaborators: the pool listing API and the chat/completion backend.

/// Streaming chat client.
pub mod chat;
/// Error types.
pub mod error;
/// Prelude re-exports.
pub mod prelude;
/// Pool listing providers.
pub mod providers;
