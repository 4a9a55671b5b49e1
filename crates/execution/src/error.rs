use crate::tx_errors::TxFailure;
use dlmm_lp_data::error::DataError;
use dlmm_lp_optimization::error::RecommendError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while advising on or submitting a position.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// Wallet balance does not cover amount, cost and fee buffer.
    #[error("insufficient balance: need {required} SOL, have {available} SOL (short {shortfall} SOL)")]
    InsufficientBalance {
        required: Decimal,
        available: Decimal,
        shortfall: Decimal,
    },

    #[error("failed to read wallet balance: {0:#}")]
    BalanceUnavailable(anyhow::Error),

    #[error("active bin unavailable for pool {pool}: {source:#}")]
    ActiveBinUnavailable {
        pool: String,
        source: anyhow::Error,
    },

    /// The price moved out of the requested range since it was recommended.
    #[error("active bin {active_bin_id} is outside the requested range [{min_bin_id}, {max_bin_id}]")]
    ActiveBinOutOfRange {
        active_bin_id: i32,
        min_bin_id: i32,
        max_bin_id: i32,
    },

    #[error("bin array check failed: {0:#}")]
    BinArrayCheck(anyhow::Error),

    /// An existing-bins-only request would need new bin arrays.
    #[error("{missing} destination bin array(s) do not exist")]
    StaleBinArrays { missing: u32 },

    #[error(transparent)]
    Recommend(#[from] RecommendError),

    #[error(transparent)]
    Upstream(#[from] DataError),

    /// The chat backend failed or returned nothing usable.
    #[error("chat backend failed: {0}")]
    Chat(DataError),

    #[error("transaction failed: {0}")]
    Transaction(TxFailure),
}

impl ExecutionError {
    /// Message suitable for the chat UI.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InsufficientBalance { shortfall, .. } => format!(
                "Your wallet is short by {} SOL. Top up or lower the amount and try again.",
                shortfall.normalize()
            ),
            Self::BalanceUnavailable(_) => {
                "Couldn't read your wallet balance. Please try again.".to_string()
            }
            Self::ActiveBinUnavailable { .. } | Self::Recommend(RecommendError::ActiveBinUnavailable { .. }) => {
                "Couldn't read the pool's current price. Please try again in a moment.".to_string()
            }
            Self::ActiveBinOutOfRange { .. } => {
                "The price moved out of the selected range. Refresh the ranges and pick again."
                    .to_string()
            }
            Self::BinArrayCheck(_) => {
                "Couldn't verify the pool's bin arrays. Please try again.".to_string()
            }
            Self::StaleBinArrays { .. } => {
                "The selected range now needs new bin arrays. Refresh the ranges and pick again."
                    .to_string()
            }
            Self::Recommend(RecommendError::NoExistingRange { .. }) => {
                "No range fits on the pool's existing bin arrays right now. Try the standard ranges instead."
                    .to_string()
            }
            Self::Recommend(e) => e.to_string(),
            Self::Upstream(_) => "Couldn't fetch pools right now. Please try again.".to_string(),
            Self::Chat(_) => {
                "The assistant is unavailable right now. Please try again.".to_string()
            }
            Self::Transaction(failure) => failure.user_message(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExecutionError>;
