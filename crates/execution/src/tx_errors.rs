//! Classification of transaction simulation and submission errors.
//!
//! RPC and wallet errors arrive as free-form text. Known failure modes are
//! recognized by substring so the UI can show an actionable message; anything
//! else keeps its raw text.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Known transaction failure modes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum TxFailure {
    InsufficientFunds,
    SimulationFailed,
    /// Blockhash expired before landing.
    Expired,
    Slippage,
    /// The wallet declined to sign.
    Rejected,
    Other(String),
}

const PATTERNS: &[(&str, TxFailure)] = &[
    ("insufficient funds", TxFailure::InsufficientFunds),
    ("insufficient lamports", TxFailure::InsufficientFunds),
    ("exceeds desired slippage", TxFailure::Slippage),
    ("slippage", TxFailure::Slippage),
    ("simulation failed", TxFailure::SimulationFailed),
    ("blockhash not found", TxFailure::Expired),
    ("block height exceeded", TxFailure::Expired),
    ("user rejected", TxFailure::Rejected),
];

impl TxFailure {
    /// Classifies a raw error message. Matching is case-insensitive.
    #[must_use]
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        PATTERNS
            .iter()
            .find(|(needle, _)| lower.contains(needle))
            .map(|(_, failure)| failure.clone())
            .unwrap_or_else(|| Self::Other(message.to_string()))
    }

    /// Message shown to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InsufficientFunds => {
                "Insufficient SOL to cover the deposit, rent and fees. Add SOL and try again."
                    .to_string()
            }
            Self::SimulationFailed => {
                "The transaction failed simulation. The pool state may have changed; refresh and try again."
                    .to_string()
            }
            Self::Expired => "The transaction expired before confirming. Please try again.".to_string(),
            Self::Slippage => {
                "The price moved beyond the allowed slippage. Refresh the ranges and try again."
                    .to_string()
            }
            Self::Rejected => "The transaction was rejected in the wallet.".to_string(),
            Self::Other(raw) => raw.clone(),
        }
    }
}

impl fmt::Display for TxFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientFunds => write!(f, "insufficient funds"),
            Self::SimulationFailed => write!(f, "simulation failed"),
            Self::Expired => write!(f, "blockhash expired"),
            Self::Slippage => write!(f, "slippage exceeded"),
            Self::Rejected => write!(f, "rejected by user"),
            Self::Other(raw) => write!(f, "{raw}"),
        }
    }
}
