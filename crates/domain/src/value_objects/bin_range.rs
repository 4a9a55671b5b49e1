use crate::costs::span_cost;
use crate::enums::{RangeLabel, RiskLevel};
use crate::error::DomainError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A candidate liquidity range around the active bin.
///
/// Invariant: `min_bin_id <= center_bin_id <= max_bin_id` and
/// `width == max_bin_id - min_bin_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinRangeCandidate {
    pub label: RangeLabel,
    pub min_bin_id: i32,
    pub max_bin_id: i32,
    pub center_bin_id: i32,
    pub width: u32,
    /// Estimated total SOL cost (position rent plus any bin-array creation).
    pub estimated_cost_sol: Decimal,
    /// Set when the cost could not be pinned down ahead of time.
    pub cost_is_variable: bool,
    pub is_existing_bins_only: bool,
    pub risk: RiskLevel,
    pub description: String,
}

impl BinRangeCandidate {
    /// Creates a candidate spanning `[min_bin_id, max_bin_id]` around `center_bin_id`.
    ///
    /// Preset labels get their static cost; custom ranges get the span estimate
    /// and are flagged as variable.
    pub fn new(
        label: RangeLabel,
        min_bin_id: i32,
        center_bin_id: i32,
        max_bin_id: i32,
    ) -> Result<Self, DomainError> {
        if !(min_bin_id <= center_bin_id && center_bin_id <= max_bin_id) {
            return Err(DomainError::InvalidBinRange {
                min: min_bin_id,
                center: center_bin_id,
                max: max_bin_id,
            });
        }
        let width = max_bin_id.abs_diff(min_bin_id);
        let (estimated_cost_sol, cost_is_variable) = match label.base_cost_sol() {
            Some(cost) => (cost, false),
            None => (span_cost(width), true),
        };

        Ok(Self {
            label,
            min_bin_id,
            max_bin_id,
            center_bin_id,
            width,
            estimated_cost_sol,
            cost_is_variable,
            is_existing_bins_only: false,
            risk: label.risk(),
            description: default_description(label, width),
        })
    }

    /// Creates a symmetric candidate `half_width` bins on each side of `center`.
    pub fn around(label: RangeLabel, center: i32, half_width: u32) -> Result<Self, DomainError> {
        let offset = i32::try_from(half_width).map_err(|_| DomainError::InvalidBinRange {
            min: i32::MIN,
            center,
            max: i32::MAX,
        })?;
        let min = center.checked_sub(offset);
        let max = center.checked_add(offset);
        match (min, max) {
            (Some(min), Some(max)) => Self::new(label, min, center, max),
            _ => Err(DomainError::InvalidBinRange {
                min: min.unwrap_or(i32::MIN),
                center,
                max: max.unwrap_or(i32::MAX),
            }),
        }
    }

    /// Number of bins the position spans.
    #[must_use]
    pub fn bin_count(&self) -> u32 {
        self.width + 1
    }

    #[must_use]
    pub fn contains(&self, bin_id: i32) -> bool {
        bin_id >= self.min_bin_id && bin_id <= self.max_bin_id
    }

    #[must_use]
    pub fn with_cost(mut self, cost_sol: Decimal, variable: bool) -> Self {
        self.estimated_cost_sol = cost_sol;
        self.cost_is_variable = variable;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn existing_bins_only(mut self) -> Self {
        self.is_existing_bins_only = true;
        self
    }
}

fn default_description(label: RangeLabel, width: u32) -> String {
    match label {
        RangeLabel::InRange => format!("Default range of {} bins around the current price", width),
        RangeLabel::Aggressive => format!("Tight {}-bin range, highest fee capture and risk", width),
        RangeLabel::Balanced => format!("Balanced {}-bin range", width),
        RangeLabel::Conservative => format!("Wide {}-bin range, lowest rebalancing risk", width),
        RangeLabel::Custom => format!(
            "Custom {}-bin range, cost varies if new bin arrays are needed",
            width
        ),
    }
}

/// Range candidates computed for one pool against one active bin read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeSet {
    pub pool_address: String,
    pub active_bin_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_range: Option<BinRangeCandidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conservative: Option<BinRangeCandidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balanced: Option<BinRangeCandidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggressive: Option<BinRangeCandidate>,
    /// Every candidate, cheapest first.
    pub all: Vec<BinRangeCandidate>,
    /// Label pre-selected for the UI.
    pub default_selection: Option<RangeLabel>,
}

impl RangeSet {
    /// Builds a set from candidates. Later duplicates of a label replace earlier ones.
    pub fn from_candidates(
        pool_address: impl Into<String>,
        active_bin_id: i32,
        candidates: Vec<BinRangeCandidate>,
    ) -> Self {
        let mut by_label: BTreeMap<RangeLabel, BinRangeCandidate> = BTreeMap::new();
        let mut customs = Vec::new();
        for candidate in candidates {
            if candidate.label == RangeLabel::Custom {
                customs.push(candidate);
            } else {
                by_label.insert(candidate.label, candidate);
            }
        }

        // Preset generation order, then customs, stable-sorted by cost.
        let mut all: Vec<BinRangeCandidate> = RangeLabel::PRESETS
            .iter()
            .filter_map(|label| by_label.get(label).cloned())
            .chain(customs)
            .collect();
        all.sort_by(|a, b| a.estimated_cost_sol.cmp(&b.estimated_cost_sol));

        let default_selection = if by_label.contains_key(&RangeLabel::InRange) {
            Some(RangeLabel::InRange)
        } else {
            all.first().map(|c| c.label)
        };

        Self {
            pool_address: pool_address.into(),
            active_bin_id,
            in_range: by_label.remove(&RangeLabel::InRange),
            conservative: by_label.remove(&RangeLabel::Conservative),
            balanced: by_label.remove(&RangeLabel::Balanced),
            aggressive: by_label.remove(&RangeLabel::Aggressive),
            all,
            default_selection,
        }
    }

    /// Candidate for a preset label.
    #[must_use]
    pub fn get(&self, label: RangeLabel) -> Option<&BinRangeCandidate> {
        match label {
            RangeLabel::InRange => self.in_range.as_ref(),
            RangeLabel::Conservative => self.conservative.as_ref(),
            RangeLabel::Balanced => self.balanced.as_ref(),
            RangeLabel::Aggressive => self.aggressive.as_ref(),
            RangeLabel::Custom => self.all.iter().find(|c| c.label == RangeLabel::Custom),
        }
    }

    /// The pre-selected candidate, if any.
    #[must_use]
    pub fn default_candidate(&self) -> Option<&BinRangeCandidate> {
        self.default_selection.and_then(|label| self.get(label))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_around_builds_symmetric_range() {
        let c = BinRangeCandidate::around(RangeLabel::InRange, 100, 5).unwrap();
        assert_eq!((c.min_bin_id, c.max_bin_id, c.center_bin_id), (95, 105, 100));
        assert_eq!(c.width, 10);
        assert_eq!(c.bin_count(), 11);
        assert_eq!(c.estimated_cost_sol, dec!(0.057));
        assert!(!c.cost_is_variable);
    }

    #[test]
    fn test_new_rejects_center_outside() {
        let err = BinRangeCandidate::new(RangeLabel::Custom, 10, 5, 20).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidBinRange {
                min: 10,
                center: 5,
                max: 20
            }
        );
    }

    #[test]
    fn test_around_overflow_is_error() {
        assert!(BinRangeCandidate::around(RangeLabel::Conservative, i32::MAX - 3, 15).is_err());
    }

    #[test]
    fn test_custom_cost_is_variable() {
        let c = BinRangeCandidate::new(RangeLabel::Custom, -20, 0, 20).unwrap();
        assert!(c.cost_is_variable);
        assert_eq!(c.width, 40);
        assert_eq!(c.estimated_cost_sol, dec!(0.0945));
    }

    #[test]
    fn test_range_set_orders_by_cost_and_defaults_to_in_range() {
        let candidates = RangeLabel::PRESETS
            .iter()
            .map(|l| BinRangeCandidate::around(*l, 0, l.half_width().unwrap()).unwrap())
            .collect();
        let set = RangeSet::from_candidates("pool", 0, candidates);

        let labels: Vec<RangeLabel> = set.all.iter().map(|c| c.label).collect();
        assert_eq!(
            labels,
            vec![
                RangeLabel::InRange,
                RangeLabel::Aggressive,
                RangeLabel::Balanced,
                RangeLabel::Conservative
            ]
        );
        assert_eq!(set.default_selection, Some(RangeLabel::InRange));
        assert_eq!(set.default_candidate().unwrap().width, 10);
    }

    #[test]
    fn test_range_set_default_falls_back_to_cheapest() {
        let c = BinRangeCandidate::around(RangeLabel::Balanced, 0, 10).unwrap();
        let set = RangeSet::from_candidates("pool", 0, vec![c]);
        assert_eq!(set.default_selection, Some(RangeLabel::Balanced));
        assert!(set.in_range.is_none());
    }
}
