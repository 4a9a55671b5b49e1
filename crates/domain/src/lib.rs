//! Core domain types for DLMM liquidity recommendations.
//!
//! This crate holds the vocabulary shared by every other crate:
//! - Pool snapshots fetched from the listing API
//! - Portfolio risk styles and their preferred bin steps
//! - Per-session "already shown" tracking
//! - Bin-range candidates and the bin-array math behind their costs

/// Cost constants in SOL.
pub mod costs;
/// Enumerations.
pub mod enums;
/// Domain entities.
pub mod entities;
/// Error types.
pub mod error;
/// Bin and bin-array math.
pub mod math;
/// Value objects.
pub mod value_objects;

pub use entities::pool::{PoolGroup, PoolRecord};
pub use entities::session::ShownPoolsState;
pub use enums::{RangeLabel, RiskLevel, RiskStyle};
pub use error::DomainError;
pub use value_objects::bin_range::{BinRangeCandidate, RangeSet};
pub use value_objects::coverage::BinArrayCoverage;
