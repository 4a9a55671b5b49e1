//! Pool selection and bin-range recommendation.
//!
//! Both halves are pure functions over already-fetched data:
//! - [`filter`] drops near-dead pools before ranking
//! - [`ranking`] orders pools per risk style
//! - [`selector`] picks one unseen pool with a three-tier fallback
//! - [`ranges`] and [`recommender`] derive candidate ranges around the active bin

/// Prelude module for convenient imports.
pub mod prelude;

/// Error types.
pub mod error;
/// Quality pre-filter.
pub mod filter;
/// Static range generation.
pub mod ranges;
/// Per-style pool ranking.
pub mod ranking;
/// Cost-aware range recommendation.
pub mod recommender;
/// Pool selection.
pub mod selector;
