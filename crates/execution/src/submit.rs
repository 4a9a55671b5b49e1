//! Position submission with an authoritative pre-flight.
//!
//! Recommendation-time costs come from a best-effort probe. Before anything
//! is sent, the active bin is read again, the destination bin arrays are
//! re-checked on chain, the cost is recomputed and the balance is validated.
//! The balance check runs a second time right before handing the request to
//! the [`PositionCreator`].
//!
//! The pre-flight needs no wallet and is served over HTTP. Signing and
//! sending belong to the wallet layer, which passes its [`PositionCreator`]
//! to [`PositionSubmitter::submit`].

use crate::balance::{BalanceCheck, BalanceValidator};
use crate::error::{ExecutionError, Result};
use crate::tx_errors::TxFailure;
use async_trait::async_trait;
use dlmm_lp_domain::{BinRangeCandidate, RangeLabel};
use dlmm_lp_optimization::error::RecommendError;
use dlmm_lp_optimization::recommender::RangeRecommender;
use dlmm_lp_protocols::{ActiveBinReader, BinArrayProbe};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// A request to open a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRequest {
    pub pool_address: String,
    pub wallet: String,
    pub label: RangeLabel,
    pub min_bin_id: i32,
    pub max_bin_id: i32,
    /// Liquidity to deposit, in SOL.
    pub amount_sol: Decimal,
    /// Refuse submission when any destination bin array is missing.
    #[serde(default)]
    pub existing_bins_only: bool,
}

/// Pre-flight result, ready for submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedPosition {
    pub request: PositionRequest,
    pub active_bin_id: i32,
    /// Candidate with the cost recomputed from the authoritative probe.
    pub candidate: BinRangeCandidate,
    pub balance: BalanceCheck,
}

/// Outcome of a submitted position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmittedPosition {
    pub signature: String,
    pub prepared: PreparedPosition,
}

/// Builds, signs and sends the position transaction.
#[async_trait]
pub trait PositionCreator: Send + Sync {
    /// Returns the transaction signature. Errors carry the raw RPC or wallet message.
    async fn create_position(&self, position: &PreparedPosition) -> anyhow::Result<String>;
}

/// Runs the pre-flight and delegates submission.
pub struct PositionSubmitter {
    active_bins: Arc<dyn ActiveBinReader>,
    probe: Arc<dyn BinArrayProbe>,
    balance: Arc<BalanceValidator>,
    recommender: RangeRecommender,
}

impl PositionSubmitter {
    pub fn new(
        active_bins: Arc<dyn ActiveBinReader>,
        probe: Arc<dyn BinArrayProbe>,
        balance: Arc<BalanceValidator>,
        recommender: RangeRecommender,
    ) -> Self {
        Self {
            active_bins,
            probe,
            balance,
            recommender,
        }
    }

    /// Checks the request against fresh on-chain state.
    pub async fn prepare(&self, request: &PositionRequest) -> Result<PreparedPosition> {
        let pool = request.pool_address.as_str();
        let active_bin_id = self
            .active_bins
            .active_bin_id(pool)
            .await
            .map_err(|source| ExecutionError::ActiveBinUnavailable {
                pool: pool.to_string(),
                source,
            })?;

        if !(request.min_bin_id..=request.max_bin_id).contains(&active_bin_id) {
            warn!(
                pool,
                active_bin_id,
                min_bin_id = request.min_bin_id,
                max_bin_id = request.max_bin_id,
                "Active bin left the requested range"
            );
            return Err(ExecutionError::ActiveBinOutOfRange {
                active_bin_id,
                min_bin_id: request.min_bin_id,
                max_bin_id: request.max_bin_id,
            });
        }

        let coverage = self
            .probe
            .probe(pool, request.min_bin_id, request.max_bin_id)
            .await
            .map_err(ExecutionError::BinArrayCheck)?;
        let missing = coverage.missing_arrays(request.min_bin_id, request.max_bin_id);
        if request.existing_bins_only && missing > 0 {
            warn!(pool, missing, "Existing-bins-only request needs new bin arrays");
            return Err(ExecutionError::StaleBinArrays { missing });
        }

        let candidate = BinRangeCandidate::new(
            request.label,
            request.min_bin_id,
            active_bin_id,
            request.max_bin_id,
        )
        .map_err(RecommendError::from)?;
        let candidate = self.recommender.apply_coverage(candidate, &coverage);

        let required = self
            .balance
            .required_for(request.amount_sol, candidate.estimated_cost_sol);
        let balance = self.balance.ensure(&request.wallet, required).await?;

        info!(
            pool,
            active_bin_id,
            cost = %candidate.estimated_cost_sol,
            missing_arrays = missing,
            required = %required,
            "Position pre-flight passed"
        );
        Ok(PreparedPosition {
            request: request.clone(),
            active_bin_id,
            candidate,
            balance,
        })
    }

    /// Runs the pre-flight, re-checks the balance and submits through `creator`.
    pub async fn submit(
        &self,
        request: &PositionRequest,
        creator: &dyn PositionCreator,
    ) -> Result<SubmittedPosition> {
        let mut prepared = self.prepare(request).await?;
        prepared.balance = self
            .balance
            .ensure(&request.wallet, prepared.balance.required)
            .await?;

        let signature = creator
            .create_position(&prepared)
            .await
            .map_err(|e| {
                let failure = TxFailure::classify(&format!("{e:#}"));
                warn!(pool = %request.pool_address, failure = %failure, "Position submission failed");
                ExecutionError::Transaction(failure)
            })?;

        info!(pool = %request.pool_address, signature = %signature, "Position submitted");
        Ok(SubmittedPosition {
            signature,
            prepared,
        })
    }
}
