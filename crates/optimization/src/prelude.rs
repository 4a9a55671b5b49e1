//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use dlmm_lp_optimization::prelude::*;
//! ```

pub use crate::error::RecommendError;
pub use crate::filter::{QualityFilter, QualityFilterConfig, matches_search};
pub use crate::ranges::{candidate_ranges, custom_range, default_ranges, preset_candidates};
pub use crate::ranking::{
    AggressiveRanking, ConservativeRanking, ModerateRanking, PoolRanking, rank_pools,
    ranking_for,
};
pub use crate::recommender::{RangeMode, RangeRecommender, RecommenderConfig};
pub use crate::selector::{PoolSelector, Selection, SelectionTier, select_best_pool, select_pool};
