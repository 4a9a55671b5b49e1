//! Static range generation around the active bin.
//!
//! | label        | span      | base cost |
//! |--------------|-----------|-----------|
//! | inRange      | active ±5 | 0.057 SOL |
//! | aggressive   | active ±3 | 0.057 SOL |
//! | balanced     | active ±10| 0.070 SOL |
//! | conservative | active ±15| 0.082 SOL |

use dlmm_lp_domain::{BinRangeCandidate, DomainError, RangeLabel, RangeSet};

/// The four preset candidates around `active_bin_id`, with static costs.
pub fn preset_candidates(active_bin_id: i32) -> Result<Vec<BinRangeCandidate>, DomainError> {
    RangeLabel::PRESETS
        .iter()
        .filter_map(|label| label.half_width().map(|half| (*label, half)))
        .map(|(label, half)| BinRangeCandidate::around(label, active_bin_id, half))
        .collect()
}

/// Static range set for a pool.
pub fn candidate_ranges(pool_address: &str, active_bin_id: i32) -> Result<RangeSet, DomainError> {
    let candidates = preset_candidates(active_bin_id)?;
    Ok(RangeSet::from_candidates(
        pool_address,
        active_bin_id,
        candidates,
    ))
}

/// Default candidate set for an optional active-bin read.
///
/// Returns `None` when the active bin is unknown; no range is synthesized
/// around an arbitrary bin.
#[must_use]
pub fn default_ranges(pool_address: &str, active_bin_id: Option<i32>) -> Option<RangeSet> {
    active_bin_id.and_then(|active| candidate_ranges(pool_address, active).ok())
}

/// User-specified width around `active_bin_id`.
///
/// Odd widths put the extra bin above the active bin.
pub fn custom_range(active_bin_id: i32, width: u32) -> Result<BinRangeCandidate, DomainError> {
    if width == 0 {
        return Err(DomainError::ZeroWidth);
    }
    let invalid = || DomainError::InvalidBinRange {
        min: i32::MIN,
        center: active_bin_id,
        max: i32::MAX,
    };
    let below = i32::try_from(width / 2).map_err(|_| invalid())?;
    let above = i32::try_from(width - width / 2).map_err(|_| invalid())?;
    let min = active_bin_id.checked_sub(below).ok_or_else(invalid)?;
    let max = active_bin_id.checked_add(above).ok_or_else(invalid)?;
    BinRangeCandidate::new(RangeLabel::Custom, min, active_bin_id, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_example_active_100() {
        let set = candidate_ranges("pool", 100).unwrap();

        let in_range = set.in_range.as_ref().unwrap();
        assert_eq!((in_range.min_bin_id, in_range.max_bin_id), (95, 105));
        assert_eq!(in_range.estimated_cost_sol, dec!(0.057));

        let aggressive = set.aggressive.as_ref().unwrap();
        assert_eq!((aggressive.min_bin_id, aggressive.max_bin_id), (97, 103));
        assert_eq!(aggressive.estimated_cost_sol, dec!(0.057));

        assert_eq!(set.default_selection, Some(RangeLabel::InRange));
    }

    #[test]
    fn test_range_invariants_hold() {
        for active in [-1_000_000, -71, -1, 0, 69, 70, 8_388_608] {
            let set = candidate_ranges("pool", active).unwrap();
            assert_eq!(set.all.len(), 4);
            for c in &set.all {
                assert!(c.min_bin_id <= active && active <= c.max_bin_id);
                assert_eq!(c.center_bin_id, active);
                assert_eq!((c.max_bin_id - c.min_bin_id) as u32, c.width);
            }
        }
    }

    #[test]
    fn test_static_cost_monotonicity() {
        let set = candidate_ranges("pool", 42).unwrap();
        let cost = |c: &Option<BinRangeCandidate>| c.as_ref().unwrap().estimated_cost_sol;
        assert!(cost(&set.aggressive) <= cost(&set.in_range));
        assert!(cost(&set.in_range) <= cost(&set.balanced));
        assert!(cost(&set.balanced) <= cost(&set.conservative));
        assert_eq!(cost(&set.balanced), dec!(0.070));
        assert_eq!(cost(&set.conservative), dec!(0.082));
    }

    #[test]
    fn test_widths() {
        let set = candidate_ranges("pool", 0).unwrap();
        let width = |label| set.get(label).unwrap().width;
        assert_eq!(width(RangeLabel::InRange), 10);
        assert_eq!(width(RangeLabel::Aggressive), 6);
        assert_eq!(width(RangeLabel::Balanced), 20);
        assert_eq!(width(RangeLabel::Conservative), 30);
    }

    #[test]
    fn test_default_ranges_requires_active_bin() {
        assert!(default_ranges("pool", None).is_none());
        let set = default_ranges("pool", Some(7)).unwrap();
        assert_eq!(set.active_bin_id, 7);
    }

    #[test]
    fn test_custom_range() {
        let c = custom_range(100, 9).unwrap();
        assert_eq!((c.min_bin_id, c.max_bin_id), (96, 105));
        assert_eq!(c.width, 9);
        assert!(c.cost_is_variable);
        assert_eq!(custom_range(100, 0), Err(DomainError::ZeroWidth));
    }
}
