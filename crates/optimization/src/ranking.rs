//! Per-style pool ranking comparators.

use dlmm_lp_domain::{PoolRecord, RiskStyle};
use rust_decimal::Decimal;
use std::cmp::Ordering;

/// Orders pools for a risk style. `Less` means "show `a` first".
pub trait PoolRanking {
    fn compare(&self, a: &PoolRecord, b: &PoolRecord) -> Ordering;
    fn name(&self) -> &'static str;
}

/// Bin step 50 first, then deepest liquidity.
pub struct ConservativeRanking;
impl PoolRanking for ConservativeRanking {
    fn compare(&self, a: &PoolRecord, b: &PoolRecord) -> Ordering {
        (b.bin_step == 50)
            .cmp(&(a.bin_step == 50))
            .then_with(|| b.liquidity.cmp(&a.liquidity))
    }

    fn name(&self) -> &'static str {
        "conservative"
    }
}

/// Bin step 10, then 15, then everything else by `0.6 * liquidity + 0.4 * apy`.
pub struct ModerateRanking;

impl ModerateRanking {
    fn tier(pool: &PoolRecord) -> u8 {
        match pool.bin_step {
            10 => 0,
            15 => 1,
            _ => 2,
        }
    }

    /// Blended score used outside the preferred bin steps.
    #[must_use]
    pub fn score(pool: &PoolRecord) -> Decimal {
        Decimal::new(6, 1) * pool.liquidity + Decimal::new(4, 1) * pool.apy
    }
}

impl PoolRanking for ModerateRanking {
    fn compare(&self, a: &PoolRecord, b: &PoolRecord) -> Ordering {
        let (ta, tb) = (Self::tier(a), Self::tier(b));
        match ta.cmp(&tb) {
            Ordering::Equal if ta == 2 => Self::score(b).cmp(&Self::score(a)),
            other => other,
        }
    }

    fn name(&self) -> &'static str {
        "moderate"
    }
}

/// Bin step 5 first, then highest APY.
pub struct AggressiveRanking;
impl PoolRanking for AggressiveRanking {
    fn compare(&self, a: &PoolRecord, b: &PoolRecord) -> Ordering {
        (b.bin_step == 5)
            .cmp(&(a.bin_step == 5))
            .then_with(|| b.apy.cmp(&a.apy))
    }

    fn name(&self) -> &'static str {
        "aggressive"
    }
}

/// Ranking for a style.
#[must_use]
pub fn ranking_for(style: RiskStyle) -> &'static dyn PoolRanking {
    match style {
        RiskStyle::Conservative => &ConservativeRanking,
        RiskStyle::Moderate => &ModerateRanking,
        RiskStyle::Aggressive => &AggressiveRanking,
    }
}

/// Stable-sorts pools best first. Without a style the listing order is kept.
#[must_use]
pub fn rank_pools(pools: &[PoolRecord], style: Option<RiskStyle>) -> Vec<PoolRecord> {
    let mut ranked = pools.to_vec();
    if let Some(style) = style {
        let ranking = ranking_for(style);
        ranked.sort_by(|a, b| ranking.compare(a, b));
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn pool(address: &str, bin_step: u16, liquidity: Decimal, apy: Decimal) -> PoolRecord {
        PoolRecord::new("SOL-USDC", address, bin_step)
            .with_liquidity(liquidity)
            .with_apy(apy)
    }

    fn addresses(pools: &[PoolRecord]) -> Vec<&str> {
        pools.iter().map(|p| p.address.as_str()).collect()
    }

    #[test]
    fn test_conservative_prefers_step_50_then_liquidity() {
        let pools = vec![
            pool("A", 10, dec!(90000), dec!(1)),
            pool("B", 50, dec!(1000), dec!(1)),
            pool("C", 50, dec!(8000), dec!(1)),
            pool("D", 20, dec!(95000), dec!(1)),
        ];
        let ranked = rank_pools(&pools, Some(RiskStyle::Conservative));
        assert_eq!(addresses(&ranked), vec!["C", "B", "D", "A"]);
    }

    #[test]
    fn test_moderate_prefers_10_over_15_then_score() {
        let pools = vec![
            pool("X", 25, dec!(1000), dec!(50)),
            pool("F", 15, dec!(100), dec!(1)),
            pool("T", 10, dec!(50), dec!(1)),
            pool("Y", 20, dec!(2000), dec!(1)),
        ];
        let ranked = rank_pools(&pools, Some(RiskStyle::Moderate));
        assert_eq!(addresses(&ranked), vec!["T", "F", "Y", "X"]);
    }

    #[test]
    fn test_moderate_score() {
        let p = pool("A", 20, dec!(1000), dec!(10));
        assert_eq!(ModerateRanking::score(&p), dec!(604));
    }

    #[test]
    fn test_moderate_same_tier_keeps_listing_order() {
        let pools = vec![
            pool("first", 10, dec!(10), dec!(1)),
            pool("second", 10, dec!(99999), dec!(99)),
        ];
        let ranked = rank_pools(&pools, Some(RiskStyle::Moderate));
        assert_eq!(addresses(&ranked), vec!["first", "second"]);
    }

    #[test]
    fn test_aggressive_prefers_step_5_then_apy() {
        let pools = vec![
            pool("A", 5, dec!(1), dec!(10)),
            pool("B", 25, dec!(1), dec!(500)),
            pool("C", 5, dec!(1), dec!(40)),
        ];
        let ranked = rank_pools(&pools, Some(RiskStyle::Aggressive));
        assert_eq!(addresses(&ranked), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_no_style_keeps_order() {
        let pools = vec![pool("B", 5, dec!(1), dec!(1)), pool("A", 50, dec!(9), dec!(9))];
        assert_eq!(addresses(&rank_pools(&pools, None)), vec!["B", "A"]);
    }

    #[test]
    fn test_ranking_names() {
        for style in RiskStyle::ALL {
            assert_eq!(ranking_for(style).name(), style.as_str());
        }
    }
}
