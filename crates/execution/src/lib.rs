//! Session orchestration and position pre-flight.
//!
//! This crate sequences the I/O around the pure recommendation core:
//! - Pool recommendation rounds per chat session
//! - Fresh active-bin reads and bin-array probing for range candidates
//! - Streaming chat with a per-session sequence guard
//! - Wallet balance validation
//! - Transaction error classification
//! - Position submission pre-flight, served over HTTP; the wallet layer
//!   supplies the [`submit::PositionCreator`] that signs and sends

/// Prelude module for convenient imports.
pub mod prelude;

/// Pool, range and chat orchestration.
pub mod advisor;
/// Balance validation.
pub mod balance;
/// Error types.
pub mod error;
/// Chat session state.
pub mod session;
/// Sequence-guarded streaming buffer.
pub mod stream;
/// Position pre-flight and submission.
pub mod submit;
/// Transaction error classification.
pub mod tx_errors;
