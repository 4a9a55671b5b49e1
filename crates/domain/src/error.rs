use thiserror::Error;

/// Errors raised while constructing domain values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("unknown risk style: {0}")]
    UnknownStyle(String),

    #[error("unknown range label: {0}")]
    UnknownRangeLabel(String),

    #[error("invalid bin range: min {min} / center {center} / max {max}")]
    InvalidBinRange { min: i32, center: i32, max: i32 },

    #[error("range width must be positive")]
    ZeroWidth,
}
