use crate::math::bin_array::{bin_array_bounds, bin_array_index, bin_array_indices};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Result of probing which bin arrays of a pool are already initialized.
///
/// Arrays that were never probed count as missing. This is a best-effort cost
/// estimate, not a guarantee for transaction submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinArrayCoverage {
    existing: BTreeSet<i64>,
    missing: BTreeSet<i64>,
}

impl BinArrayCoverage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_existing(&mut self, index: i64) {
        self.missing.remove(&index);
        self.existing.insert(index);
    }

    pub fn mark_missing(&mut self, index: i64) {
        if !self.existing.contains(&index) {
            self.missing.insert(index);
        }
    }

    #[must_use]
    pub fn is_existing(&self, index: i64) -> bool {
        self.existing.contains(&index)
    }

    /// Number of arrays confirmed to exist.
    #[must_use]
    pub fn existing_count(&self) -> usize {
        self.existing.len()
    }

    /// Number of arrays in `[min_bin_id, max_bin_id]` that would have to be created.
    #[must_use]
    pub fn missing_arrays(&self, min_bin_id: i32, max_bin_id: i32) -> u32 {
        let count = bin_array_indices(min_bin_id, max_bin_id)
            .filter(|idx| !self.existing.contains(idx))
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Whether every array under the range already exists.
    #[must_use]
    pub fn is_fully_existing(&self, min_bin_id: i32, max_bin_id: i32) -> bool {
        self.missing_arrays(min_bin_id, max_bin_id) == 0
    }

    /// Whether at least one array under the range already exists.
    #[must_use]
    pub fn overlaps(&self, min_bin_id: i32, max_bin_id: i32) -> bool {
        bin_array_indices(min_bin_id, max_bin_id).any(|idx| self.existing.contains(&idx))
    }

    /// Count of bins in `[min_bin_id, max_bin_id]` that sit in existing arrays.
    #[must_use]
    pub fn existing_bins(&self, min_bin_id: i32, max_bin_id: i32) -> u32 {
        let (min, max) = (i64::from(min_bin_id), i64::from(max_bin_id));
        let total: i64 = bin_array_indices(min_bin_id, max_bin_id)
            .filter(|idx| self.existing.contains(idx))
            .map(|idx| {
                let (lower, upper) = bin_array_bounds(idx);
                upper.min(max) - lower.max(min) + 1
            })
            .sum();
        u32::try_from(total).unwrap_or(u32::MAX)
    }

    /// Bin-id bounds of the contiguous run of existing arrays containing `bin_id`.
    #[must_use]
    pub fn existing_span_around(&self, bin_id: i32) -> Option<(i32, i32)> {
        let home = bin_array_index(bin_id);
        if !self.existing.contains(&home) {
            return None;
        }
        let mut low = home;
        while self.existing.contains(&(low - 1)) {
            low -= 1;
        }
        let mut high = home;
        while self.existing.contains(&(high + 1)) {
            high += 1;
        }
        let lower = bin_array_bounds(low).0.max(i64::from(i32::MIN));
        let upper = bin_array_bounds(high).1.min(i64::from(i32::MAX));
        Some((lower as i32, upper as i32))
    }
}
