//! Bin-array granularity of the DLMM program.
//!
//! Bins are batched into on-chain bin arrays of fixed size. A position whose
//! range touches an uninitialized array pays for creating it.

use std::ops::RangeInclusive;

/// Number of consecutive bins stored in one bin array.
pub const MAX_BIN_PER_ARRAY: i32 = 70;

/// Index of the bin array holding `bin_id`.
///
/// Uses floor division so negative bin ids map to negative arrays
/// (`-1` lives in array `-1`, not `0`).
#[must_use]
pub fn bin_array_index(bin_id: i32) -> i64 {
    i64::from(bin_id).div_euclid(i64::from(MAX_BIN_PER_ARRAY))
}

/// Inclusive bin-id bounds of the array at `index`.
#[must_use]
pub fn bin_array_bounds(index: i64) -> (i64, i64) {
    let lower = index * i64::from(MAX_BIN_PER_ARRAY);
    (lower, lower + i64::from(MAX_BIN_PER_ARRAY) - 1)
}

/// Indices of every bin array covering `[min_bin_id, max_bin_id]`.
#[must_use]
pub fn bin_array_indices(min_bin_id: i32, max_bin_id: i32) -> RangeInclusive<i64> {
    bin_array_index(min_bin_id)..=bin_array_index(max_bin_id)
}
