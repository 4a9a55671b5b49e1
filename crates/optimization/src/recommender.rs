//! Cost-aware bin-range recommendation.
//!
//! Candidates always come from the static table. Probe results, when
//! available, only adjust costs and descriptions; a failed or missing probe
//! leaves the static table untouched.

use crate::error::RecommendError;
use crate::ranges::{custom_range, preset_candidates};
use dlmm_lp_domain::costs::{BIN_ARRAY_CREATION_SOL, POSITION_RENT_SOL};
use dlmm_lp_domain::{BinArrayCoverage, BinRangeCandidate, RangeLabel, RangeSet};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// How strictly candidates must stay on initialized bin arrays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeMode {
    /// Static presets, costs refined by probing.
    #[default]
    Standard,
    /// Only ranges fully on existing bin arrays.
    ExistingBinsOnly,
}

/// Configuration for the range recommender.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommenderConfig {
    /// Surcharge per bin array that must be created, in SOL.
    pub bin_array_creation_sol: Decimal,
    /// Minimum bins on existing arrays for a candidate in existing-bins-only mode.
    pub min_existing_bins: u32,
    /// Half-width of the synthesized safe range.
    pub safety_half_width: u32,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            bin_array_creation_sol: BIN_ARRAY_CREATION_SOL,
            min_existing_bins: 3,
            safety_half_width: 3,
        }
    }
}

/// Derives candidate ranges for a pool.
#[derive(Debug, Clone, Default)]
pub struct RangeRecommender {
    config: RecommenderConfig,
}

impl RangeRecommender {
    #[must_use]
    pub fn new(config: RecommenderConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    /// Recommends preset ranges around the freshly read `active_bin_id`.
    ///
    /// # Errors
    /// Fails when the active bin is unknown.
    pub fn recommend(
        &self,
        pool_address: &str,
        active_bin_id: Option<i32>,
        coverage: Option<&BinArrayCoverage>,
    ) -> Result<RangeSet, RecommendError> {
        let active = active_bin_id.ok_or_else(|| RecommendError::ActiveBinUnavailable {
            pool: pool_address.to_string(),
        })?;

        let mut candidates = preset_candidates(active)?;
        match coverage {
            Some(coverage) => {
                candidates = candidates
                    .into_iter()
                    .map(|c| self.apply_coverage(c, coverage))
                    .collect();
            }
            None => debug!(pool = pool_address, "No bin-array coverage, keeping static costs"),
        }

        Ok(RangeSet::from_candidates(pool_address, active, candidates))
    }

    /// Recommends a custom-width range.
    ///
    /// # Errors
    /// Fails when the active bin is unknown or the width is zero.
    pub fn recommend_custom(
        &self,
        pool_address: &str,
        active_bin_id: Option<i32>,
        width: u32,
        coverage: Option<&BinArrayCoverage>,
    ) -> Result<BinRangeCandidate, RecommendError> {
        let active = active_bin_id.ok_or_else(|| RecommendError::ActiveBinUnavailable {
            pool: pool_address.to_string(),
        })?;
        let candidate = custom_range(active, width)?;
        Ok(match coverage {
            Some(coverage) => self.apply_coverage(candidate, coverage),
            None => candidate,
        })
    }

    /// Adjusts a candidate's cost to the probed bin-array coverage.
    ///
    /// Full reuse drops the cost to bare position rent. Each missing array adds
    /// the creation surcharge on top of the static cost.
    #[must_use]
    pub fn apply_coverage(
        &self,
        candidate: BinRangeCandidate,
        coverage: &BinArrayCoverage,
    ) -> BinRangeCandidate {
        let missing = coverage.missing_arrays(candidate.min_bin_id, candidate.max_bin_id);
        if missing == 0 {
            let description = format!(
                "{} (reuses existing bin arrays, no creation cost)",
                candidate.description
            );
            return candidate
                .with_cost(POSITION_RENT_SOL, false)
                .with_description(description);
        }

        let surcharge = self.config.bin_array_creation_sol * Decimal::from(missing);
        let cost = candidate.estimated_cost_sol + surcharge;
        let description = format!(
            "{} (needs {} new bin array{}, +{} SOL non-refundable)",
            candidate.description,
            missing,
            if missing == 1 { "" } else { "s" },
            surcharge.normalize()
        );
        candidate.with_cost(cost, false).with_description(description)
    }

    /// Recommends only ranges lying entirely on existing bin arrays.
    ///
    /// Presets are clipped to the run of existing arrays around the active bin
    /// and dropped when fewer than `min_existing_bins` remain. A small safe
    /// range around the active bin (or `fallback_bin_id`) is synthesized only
    /// when the active bin is unknown or no probe result is available.
    ///
    /// # Errors
    /// Fails when neither an active bin nor a fallback anchor is known, and
    /// with [`RecommendError::NoExistingRange`] when the probe shows no
    /// usable run of existing arrays around the active bin.
    pub fn recommend_existing_only(
        &self,
        pool_address: &str,
        active_bin_id: Option<i32>,
        fallback_bin_id: Option<i32>,
        coverage: Option<&BinArrayCoverage>,
    ) -> Result<RangeSet, RecommendError> {
        let anchor = active_bin_id.or(fallback_bin_id).ok_or_else(|| {
            RecommendError::ActiveBinUnavailable {
                pool: pool_address.to_string(),
            }
        })?;

        let candidates = match (active_bin_id, coverage) {
            (Some(active), Some(coverage)) => {
                let clipped = self.clip_to_existing(active, coverage)?;
                if clipped.is_empty() {
                    warn!(
                        pool = pool_address,
                        active_bin = active,
                        missing = coverage.missing_arrays(active, active),
                        "No range fits on existing bin arrays"
                    );
                    return Err(RecommendError::NoExistingRange {
                        pool: pool_address.to_string(),
                    });
                }
                clipped
            }
            _ => {
                warn!(
                    pool = pool_address,
                    anchor = anchor,
                    "Bin arrays unknown, using safe default"
                );
                vec![self.safe_default(anchor)?]
            }
        };

        info!(
            pool = pool_address,
            anchor = anchor,
            candidates = candidates.len(),
            "Existing-bins-only ranges computed"
        );
        Ok(RangeSet::from_candidates(pool_address, anchor, candidates))
    }

    fn safe_default(&self, anchor: i32) -> Result<BinRangeCandidate, RecommendError> {
        Ok(BinRangeCandidate::around(
            RangeLabel::InRange,
            anchor,
            self.config.safety_half_width,
        )?
        .with_cost(POSITION_RENT_SOL, false)
        .with_description(format!(
            "Safe default of ±{} bins around the current price",
            self.config.safety_half_width
        ))
        .existing_bins_only())
    }

    fn clip_to_existing(
        &self,
        active: i32,
        coverage: &BinArrayCoverage,
    ) -> Result<Vec<BinRangeCandidate>, RecommendError> {
        let Some((lower, upper)) = coverage.existing_span_around(active) else {
            return Ok(Vec::new());
        };

        let mut clipped = Vec::new();
        for preset in preset_candidates(active)? {
            let min = preset.min_bin_id.max(lower);
            let max = preset.max_bin_id.min(upper);
            if coverage.existing_bins(min, max) < self.config.min_existing_bins {
                debug!(label = %preset.label, "Dropping range with too few existing bins");
                continue;
            }
            let trimmed = min != preset.min_bin_id || max != preset.max_bin_id;
            let candidate = BinRangeCandidate::new(preset.label, min, active, max)?
                .with_cost(POSITION_RENT_SOL, false)
                .existing_bins_only();
            let description = if trimmed {
                format!(
                    "{} (trimmed to existing bin arrays, no creation cost)",
                    candidate.description
                )
            } else {
                format!("{} (existing bin arrays only)", candidate.description)
            };
            clipped.push(candidate.with_description(description));
        }
        Ok(clipped)
    }
}
