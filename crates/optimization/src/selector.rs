//! Picks one pool per recommendation round.
//!
//! After ranking, selection falls back through three tiers:
//! 1. first unseen pool with a preferred bin step
//! 2. first unseen pool of any bin step
//! 3. everything was shown: first preferred pool, else the first pool
//!
//! A non-empty input therefore always yields a pool.

use crate::filter::{QualityFilter, QualityFilterConfig};
use crate::ranking::rank_pools;
use dlmm_lp_domain::{PoolGroup, PoolRecord, RiskStyle, ShownPoolsState};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

/// Which fallback tier produced a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionTier {
    /// Unseen pool matching the style's preferred bin steps.
    FreshPreferred,
    /// Unseen pool outside the preferred bin steps.
    FreshAny,
    /// Every candidate was already shown.
    Exhausted,
}

impl SelectionTier {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FreshPreferred => "fresh_preferred",
            Self::FreshAny => "fresh_any",
            Self::Exhausted => "exhausted",
        }
    }
}

/// A selected pool and the tier that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub pool: PoolRecord,
    pub tier: SelectionTier,
}

/// Ranks `pools` for `style` and selects one, skipping `shown` addresses when possible.
///
/// Returns `None` only for an empty input.
#[must_use]
pub fn select_pool(
    pools: &[PoolRecord],
    style: Option<RiskStyle>,
    shown: &HashSet<String>,
) -> Option<Selection> {
    let ranked = rank_pools(pools, style);
    let preferred = |p: &PoolRecord| style.is_some_and(|s| s.prefers(p.bin_step));
    let unseen = |p: &PoolRecord| !shown.contains(&p.address);

    let pick = |tier: SelectionTier, pool: &PoolRecord| Selection {
        pool: pool.clone(),
        tier,
    };

    ranked
        .iter()
        .find(|p| preferred(*p) && unseen(*p))
        .map(|p| pick(SelectionTier::FreshPreferred, p))
        .or_else(|| {
            ranked
                .iter()
                .find(|p| unseen(*p))
                .map(|p| pick(SelectionTier::FreshAny, p))
        })
        .or_else(|| {
            ranked
                .iter()
                .find(|p| preferred(*p))
                .or_else(|| ranked.first())
                .map(|p| pick(SelectionTier::Exhausted, p))
        })
}

/// Selects the best pool for `style`, or `None` when `pools` is empty.
#[must_use]
pub fn select_best_pool(
    pools: &[PoolRecord],
    style: Option<RiskStyle>,
    shown: &HashSet<String>,
) -> Option<PoolRecord> {
    select_pool(pools, style, shown).map(|s| s.pool)
}

/// Quality filter plus selection over raw listing groups.
#[derive(Debug, Clone, Default)]
pub struct PoolSelector {
    filter: QualityFilter,
}

impl PoolSelector {
    #[must_use]
    pub fn new(config: QualityFilterConfig) -> Self {
        Self {
            filter: QualityFilter::new(config),
        }
    }

    #[must_use]
    pub fn filter(&self) -> &QualityFilter {
        &self.filter
    }

    /// Filters `groups` and selects a pool. Does not record the selection.
    #[must_use]
    pub fn select(
        &self,
        groups: &[PoolGroup],
        search: Option<&str>,
        style: Option<RiskStyle>,
        shown: &ShownPoolsState,
    ) -> Option<Selection> {
        let candidates = self.filter.apply(groups, search);
        debug!(
            groups = groups.len(),
            candidates = candidates.len(),
            style = ?style,
            "Selecting pool"
        );

        let selection = select_pool(&candidates, style, shown.addresses())?;
        info!(
            pool = %selection.pool.address,
            name = %selection.pool.name,
            bin_step = selection.pool.bin_step,
            tier = ?selection.tier,
            "Pool selected"
        );
        Some(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn pool(address: &str, bin_step: u16, liquidity: Decimal, apy: Decimal) -> PoolRecord {
        PoolRecord::new("SOL-USDC", address, bin_step)
            .with_liquidity(liquidity)
            .with_apy(apy)
            .with_fees_24h(dec!(100))
    }

    fn shown(addrs: &[&str]) -> HashSet<String> {
        addrs.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_conservative_example_selects_step_50() {
        let pools = vec![
            pool("A", 50, dec!(10000), dec!(1)),
            pool("B", 10, dec!(5000), dec!(2)),
        ];
        let selected =
            select_best_pool(&pools, Some(RiskStyle::Conservative), &HashSet::new()).unwrap();
        assert_eq!(selected.address, "A");
    }

    #[test]
    fn test_selection_is_deterministic() {
        let pools = vec![
            pool("A", 10, dec!(10000), dec!(3)),
            pool("B", 15, dec!(20000), dec!(2)),
            pool("C", 10, dec!(30000), dec!(1)),
        ];
        let seen = shown(&["A"]);
        let first = select_best_pool(&pools, Some(RiskStyle::Moderate), &seen);
        for _ in 0..10 {
            assert_eq!(select_best_pool(&pools, Some(RiskStyle::Moderate), &seen), first);
        }
    }

    #[test]
    fn test_prefers_fresh_preferred_pool() {
        let pools = vec![
            pool("A", 5, dec!(1000), dec!(90)),
            pool("B", 5, dec!(1000), dec!(50)),
            pool("C", 20, dec!(1000), dec!(999)),
        ];
        let selection = select_pool(&pools, Some(RiskStyle::Aggressive), &shown(&["A"])).unwrap();
        assert_eq!(selection.pool.address, "B");
        assert_eq!(selection.tier, SelectionTier::FreshPreferred);
    }

    #[test]
    fn test_falls_back_to_any_unseen_pool() {
        let pools = vec![
            pool("A", 5, dec!(1000), dec!(90)),
            pool("C", 20, dec!(1000), dec!(10)),
        ];
        let selection = select_pool(&pools, Some(RiskStyle::Aggressive), &shown(&["A"])).unwrap();
        assert_eq!(selection.pool.address, "C");
        assert_eq!(selection.tier, SelectionTier::FreshAny);
    }

    #[test]
    fn test_exhausted_returns_preferred_pool() {
        let pools = vec![
            pool("X", 20, dec!(99999), dec!(1)),
            pool("A", 50, dec!(1000), dec!(1)),
        ];
        let selection =
            select_pool(&pools, Some(RiskStyle::Conservative), &shown(&["A", "X"])).unwrap();
        assert_eq!(selection.pool.address, "A");
        assert_eq!(selection.tier, SelectionTier::Exhausted);
    }

    #[test]
    fn test_exhausted_without_preferred_returns_first() {
        let pools = vec![
            pool("X", 20, dec!(100), dec!(1)),
            pool("Y", 25, dec!(900), dec!(1)),
        ];
        let selection =
            select_pool(&pools, Some(RiskStyle::Conservative), &shown(&["X", "Y"])).unwrap();
        // Conservative ranks by liquidity outside step 50.
        assert_eq!(selection.pool.address, "Y");
        assert_eq!(selection.tier, SelectionTier::Exhausted);
    }

    #[test]
    fn test_empty_input_returns_none() {
        assert!(select_best_pool(&[], Some(RiskStyle::Moderate), &HashSet::new()).is_none());
    }

    #[test]
    fn test_no_style_takes_first_unseen() {
        let pools = vec![pool("A", 5, dec!(1), dec!(1)), pool("B", 50, dec!(9), dec!(9))];
        let selection = select_pool(&pools, None, &shown(&["A"])).unwrap();
        assert_eq!(selection.pool.address, "B");
        assert_eq!(selection.tier, SelectionTier::FreshAny);
    }

    #[test]
    fn test_pool_selector_filters_then_selects() {
        let mut dead = pool("dead", 50, dec!(99999), dec!(0.001));
        dead.fees_24h = dec!(0);
        let groups = vec![PoolGroup::new(
            "SOL-USDC",
            vec![dead, pool("live", 50, dec!(5000), dec!(4))],
        )];
        let selector = PoolSelector::default();
        let selection = selector
            .select(
                &groups,
                Some("SOL"),
                Some(RiskStyle::Conservative),
                &ShownPoolsState::new(),
            )
            .unwrap();
        assert_eq!(selection.pool.address, "live");
        assert!(
            selector
                .select(&groups, Some("JUP"), None, &ShownPoolsState::new())
                .is_none()
        );
    }
}
