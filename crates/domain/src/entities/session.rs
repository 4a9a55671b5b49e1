use crate::entities::pool::PoolRecord;
use crate::enums::RiskStyle;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Pools and bin steps already recommended during one chat session.
///
/// Passed explicitly into the selector so selection stays a pure function of
/// its inputs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShownPoolsState {
    addresses: HashSet<String>,
    bin_steps: HashMap<RiskStyle, BTreeSet<u16>>,
}

impl ShownPoolsState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Addresses of every pool shown so far.
    #[must_use]
    pub fn addresses(&self) -> &HashSet<String> {
        &self.addresses
    }

    #[must_use]
    pub fn contains(&self, address: &str) -> bool {
        self.addresses.contains(address)
    }

    /// Records a pool selected for `style`.
    ///
    /// Once every preferred bin step of the style has been shown, the style's
    /// bin-step set resets so later rounds may repeat them.
    pub fn record(&mut self, style: Option<RiskStyle>, pool: &PoolRecord) {
        self.addresses.insert(pool.address.clone());

        let Some(style) = style else {
            return;
        };
        let steps = self.bin_steps.entry(style).or_default();
        steps.insert(pool.bin_step);

        if style
            .preferred_bin_steps()
            .iter()
            .all(|step| steps.contains(step))
        {
            steps.clear();
        }
    }

    /// Bin steps shown for `style` since the last reset, ascending.
    #[must_use]
    pub fn shown_bin_steps(&self, style: RiskStyle) -> Vec<u16> {
        self.bin_steps
            .get(&style)
            .map(|steps| steps.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Preferred bin steps of `style` not yet shown since the last reset.
    #[must_use]
    pub fn unseen_bin_steps(&self, style: RiskStyle) -> Vec<u16> {
        let shown = self.bin_steps.get(&style);
        style
            .preferred_bin_steps()
            .iter()
            .copied()
            .filter(|step| shown.is_none_or(|s| !s.contains(step)))
            .collect()
    }

    /// Forgets everything shown in this session.
    pub fn clear(&mut self) {
        self.addresses.clear();
        self.bin_steps.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_tracks_address_and_step() {
        let mut state = ShownPoolsState::new();
        let pool = PoolRecord::new("SOL-USDC", "A", 10);

        state.record(Some(RiskStyle::Moderate), &pool);

        assert!(state.contains("A"));
        assert_eq!(state.shown_bin_steps(RiskStyle::Moderate), vec![10]);
        assert_eq!(state.unseen_bin_steps(RiskStyle::Moderate), vec![15]);
    }

    #[test]
    fn test_bin_steps_reset_when_all_preferred_shown() {
        let mut state = ShownPoolsState::new();
        state.record(Some(RiskStyle::Moderate), &PoolRecord::new("a", "A", 10));
        state.record(Some(RiskStyle::Moderate), &PoolRecord::new("b", "B", 15));

        assert!(state.shown_bin_steps(RiskStyle::Moderate).is_empty());
        assert_eq!(state.unseen_bin_steps(RiskStyle::Moderate), vec![10, 15]);
        // Addresses are never reset by the bin-step policy.
        assert!(state.contains("A"));
        assert!(state.contains("B"));
    }

    #[test]
    fn test_single_step_style_resets_immediately() {
        let mut state = ShownPoolsState::new();
        state.record(Some(RiskStyle::Conservative), &PoolRecord::new("a", "A", 50));
        assert!(state.shown_bin_steps(RiskStyle::Conservative).is_empty());
    }

    #[test]
    fn test_non_preferred_step_does_not_reset() {
        let mut state = ShownPoolsState::new();
        state.record(Some(RiskStyle::Aggressive), &PoolRecord::new("a", "A", 20));
        assert_eq!(state.shown_bin_steps(RiskStyle::Aggressive), vec![20]);
        assert_eq!(state.unseen_bin_steps(RiskStyle::Aggressive), vec![5]);
    }

    #[test]
    fn test_record_without_style() {
        let mut state = ShownPoolsState::new();
        state.record(None, &PoolRecord::new("a", "A", 20));
        assert!(state.contains("A"));
        for style in RiskStyle::ALL {
            assert!(state.shown_bin_steps(style).is_empty());
        }
    }
}
