//! Pool listing providers.

/// Meteora DLMM listing API.
pub mod meteora;

use crate::error::Result;
use async_trait::async_trait;
use dlmm_lp_domain::PoolGroup;

/// Source of candidate pools grouped by pair name.
#[async_trait]
pub trait PoolListingProvider: Send + Sync {
    /// Groups matching `search`. An empty term lists everything the source returns.
    async fn fetch_groups(&self, search: &str) -> Result<Vec<PoolGroup>>;
}
