//! Quality pre-filter applied before ranking.
//!
//! Near-dead pools (tiny yield or fees) are always dropped. Low-TVL pools are
//! dropped only when their name group has at least one pool above the bar, so
//! the TVL clause never empties a group on its own.

use dlmm_lp_domain::{PoolGroup, PoolRecord};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Thresholds for the quality pre-filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityFilterConfig {
    /// Minimum APY in percent.
    pub min_apy: Decimal,
    /// Minimum fees over the last 24h in USD.
    pub min_fees_24h: Decimal,
    /// Minimum TVL in USD, applied per group.
    pub min_liquidity: Decimal,
}

impl Default for QualityFilterConfig {
    fn default() -> Self {
        Self {
            min_apy: Decimal::new(3, 2),     // 0.03%
            min_fees_24h: Decimal::from(5),  // $5
            min_liquidity: Decimal::from(3000), // $3k
        }
    }
}

/// Case-insensitive pair-name match. Separators `/`, `_` and spaces are
/// treated like `-`. An empty term matches everything.
#[must_use]
pub fn matches_search(name: &str, term: &str) -> bool {
    fn normalize(s: &str) -> String {
        s.trim()
            .to_lowercase()
            .chars()
            .map(|c| if matches!(c, '/' | '_' | ' ') { '-' } else { c })
            .collect()
    }
    let term = normalize(term);
    term.is_empty() || normalize(name).contains(&term)
}

/// Applies the quality thresholds to fetched pool groups.
#[derive(Debug, Clone, Default)]
pub struct QualityFilter {
    config: QualityFilterConfig,
}

impl QualityFilter {
    #[must_use]
    pub fn new(config: QualityFilterConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &QualityFilterConfig {
        &self.config
    }

    fn is_alive(&self, pool: &PoolRecord) -> bool {
        pool.apy >= self.config.min_apy && pool.fees_24h >= self.config.min_fees_24h
    }

    /// Filters one name group.
    #[must_use]
    pub fn filter_group(&self, group: &PoolGroup) -> Vec<PoolRecord> {
        let alive: Vec<&PoolRecord> = group.pairs.iter().filter(|p| self.is_alive(p)).collect();

        let any_deep = alive
            .iter()
            .any(|p| p.liquidity >= self.config.min_liquidity);

        let kept: Vec<PoolRecord> = alive
            .into_iter()
            .filter(|p| !any_deep || p.liquidity >= self.config.min_liquidity)
            .cloned()
            .collect();

        debug!(
            group = %group.name,
            total = group.pairs.len(),
            kept = kept.len(),
            tvl_filter_applied = any_deep,
            "Filtered pool group"
        );
        kept
    }

    /// Filters groups whose name matches `search`, flattening the survivors in
    /// listing order.
    #[must_use]
    pub fn apply(&self, groups: &[PoolGroup], search: Option<&str>) -> Vec<PoolRecord> {
        groups
            .iter()
            .filter(|g| search.is_none_or(|term| matches_search(&g.name, term)))
            .flat_map(|g| self.filter_group(g))
            .collect()
    }
}
