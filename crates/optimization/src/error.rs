use dlmm_lp_domain::DomainError;
use thiserror::Error;

/// Errors raised while recommending bin ranges.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecommendError {
    /// The live active bin could not be read, and no fallback anchor was given.
    #[error("active bin unavailable for pool {pool}")]
    ActiveBinUnavailable { pool: String },

    /// Probing succeeded but no range fits on existing bin arrays.
    #[error("no range on existing bin arrays around the active bin of pool {pool}")]
    NoExistingRange { pool: String },

    #[error(transparent)]
    InvalidRange(#[from] DomainError),
}
