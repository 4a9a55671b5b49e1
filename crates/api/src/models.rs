//! API request and response models.

use chrono::{DateTime, Utc};
use dlmm_lp_domain::{BinRangeCandidate, PoolRecord, RangeSet};
use dlmm_lp_execution::advisor::{ChatReply, PoolRecommendation};
use dlmm_lp_execution::balance::BalanceCheck;
use dlmm_lp_execution::session::ChatSession;
use dlmm_lp_execution::submit::PreparedPosition;
use dlmm_lp_execution::stream::StreamSnapshot;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// Request to open a chat session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateSessionRequest {
    /// Portfolio style: conservative, moderate or aggressive.
    #[serde(default)]
    pub style: Option<String>,
}

/// Chat session summary.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub id: Uuid,
    pub style: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Number of pools recommended so far.
    pub pools_shown: usize,
}

impl From<&ChatSession> for SessionResponse {
    fn from(session: &ChatSession) -> Self {
        Self {
            id: session.id,
            style: session.style.map(|s| s.to_string()),
            created_at: session.created_at,
            pools_shown: session.shown.addresses().len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Pools
// ---------------------------------------------------------------------------

/// Request for the next pool recommendation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct RecommendRequest {
    /// Pair search term, e.g. "SOL-USDC".
    #[serde(default)]
    pub search: Option<String>,
    /// Overrides the session style.
    #[serde(default)]
    pub style: Option<String>,
}

/// Pool snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PoolResponse {
    pub name: String,
    pub address: String,
    pub bin_step: u16,
    /// TVL in USD.
    pub liquidity: Decimal,
    pub current_price: Decimal,
    /// APY in percent.
    pub apy: Decimal,
    pub fees_24h: Decimal,
    pub volume_24h: Decimal,
}

impl From<PoolRecord> for PoolResponse {
    fn from(pool: PoolRecord) -> Self {
        Self {
            name: pool.name,
            address: pool.address,
            bin_step: pool.bin_step,
            liquidity: pool.liquidity,
            current_price: pool.current_price,
            apy: pool.apy,
            fees_24h: pool.fees_24h,
            volume_24h: pool.volume_24h,
        }
    }
}

/// Outcome of a recommendation round. `pool` is null when nothing qualified.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecommendResponse {
    pub pool: Option<PoolResponse>,
    /// fresh_preferred, fresh_any or exhausted.
    pub tier: Option<String>,
    pub message: String,
}

impl From<PoolRecommendation> for RecommendResponse {
    fn from(r: PoolRecommendation) -> Self {
        Self {
            pool: r.pool.map(PoolResponse::from),
            tier: r.tier.map(|t| t.as_str().to_string()),
            message: r.message,
        }
    }
}

// ---------------------------------------------------------------------------
// Ranges
// ---------------------------------------------------------------------------

/// Query parameters for range candidates.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RangesQuery {
    /// `standard` (default) or `existing_bins_only`.
    pub mode: Option<String>,
    /// Anchor used by existing-bins-only mode when the active bin cannot be read.
    pub fallback_bin_id: Option<i32>,
    /// Also compute a custom range of this many bins.
    pub width: Option<u32>,
}

/// A candidate bin range.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RangeCandidateResponse {
    /// inRange, aggressive, balanced, conservative or custom.
    pub label: String,
    pub min_bin_id: i32,
    pub max_bin_id: i32,
    pub center_bin_id: i32,
    pub width: u32,
    pub estimated_cost_sol: Decimal,
    pub cost_is_variable: bool,
    pub is_existing_bins_only: bool,
    /// low, medium or high.
    pub risk: String,
    pub description: String,
}

impl From<BinRangeCandidate> for RangeCandidateResponse {
    fn from(c: BinRangeCandidate) -> Self {
        Self {
            label: c.label.to_string(),
            min_bin_id: c.min_bin_id,
            max_bin_id: c.max_bin_id,
            center_bin_id: c.center_bin_id,
            width: c.width,
            estimated_cost_sol: c.estimated_cost_sol,
            cost_is_variable: c.cost_is_variable,
            is_existing_bins_only: c.is_existing_bins_only,
            risk: c.risk.as_str().to_string(),
            description: c.description,
        }
    }
}

/// Candidate ranges for a pool.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RangesResponse {
    pub pool_address: String,
    pub active_bin_id: i32,
    pub in_range: Option<RangeCandidateResponse>,
    pub conservative: Option<RangeCandidateResponse>,
    pub balanced: Option<RangeCandidateResponse>,
    pub aggressive: Option<RangeCandidateResponse>,
    /// Every candidate, cheapest first.
    pub all: Vec<RangeCandidateResponse>,
    pub default_selection: Option<String>,
    /// Present when a custom width was requested.
    pub custom: Option<RangeCandidateResponse>,
}

impl From<RangeSet> for RangesResponse {
    fn from(set: RangeSet) -> Self {
        Self {
            pool_address: set.pool_address,
            active_bin_id: set.active_bin_id,
            in_range: set.in_range.map(Into::into),
            conservative: set.conservative.map(Into::into),
            balanced: set.balanced.map(Into::into),
            aggressive: set.aggressive.map(Into::into),
            all: set.all.into_iter().map(Into::into).collect(),
            default_selection: set.default_selection.map(|l| l.to_string()),
            custom: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Balance
// ---------------------------------------------------------------------------

/// Balance validation request.
///
/// Either `required_sol` is given directly, or it is derived as
/// `amount_sol + cost_sol + fee buffer`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidateBalanceRequest {
    /// Wallet public key.
    pub wallet: String,
    #[serde(default)]
    pub required_sol: Option<Decimal>,
    #[serde(default)]
    pub amount_sol: Option<Decimal>,
    #[serde(default)]
    pub cost_sol: Option<Decimal>,
}

/// Balance validation result.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BalanceResponse {
    pub ok: bool,
    pub available: Decimal,
    pub required: Decimal,
    /// `required - available` when short.
    pub shortfall: Option<Decimal>,
}

impl From<BalanceCheck> for BalanceResponse {
    fn from(check: BalanceCheck) -> Self {
        Self {
            ok: check.ok,
            available: check.available,
            required: check.required,
            shortfall: check.shortfall,
        }
    }
}

// ---------------------------------------------------------------------------
// Positions
// ---------------------------------------------------------------------------

/// A position the user is about to open.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PreparePositionRequest {
    pub pool_address: String,
    /// Wallet public key.
    pub wallet: String,
    /// Range label the bounds came from; defaults to custom.
    #[serde(default)]
    pub label: Option<String>,
    pub min_bin_id: i32,
    pub max_bin_id: i32,
    pub amount_sol: Decimal,
    /// Refuse when any destination bin array would have to be created.
    #[serde(default)]
    pub existing_bins_only: bool,
}

/// Pre-flight result against fresh on-chain state.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PreparedPositionResponse {
    pub pool_address: String,
    pub active_bin_id: i32,
    /// The range with its cost recomputed from the bin arrays on chain.
    pub candidate: RangeCandidateResponse,
    pub balance: BalanceResponse,
}

impl From<PreparedPosition> for PreparedPositionResponse {
    fn from(prepared: PreparedPosition) -> Self {
        Self {
            pool_address: prepared.request.pool_address,
            active_bin_id: prepared.active_bin_id,
            candidate: prepared.candidate.into(),
            balance: prepared.balance.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// Chat message from the user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatMessageRequest {
    pub message: String,
}

/// Completed chat answer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatResponse {
    pub answer: String,
    /// Sequence number of the request.
    pub ticket: u64,
    /// False when a newer message superseded this one.
    pub current: bool,
}

impl From<ChatReply> for ChatResponse {
    fn from(reply: ChatReply) -> Self {
        Self {
            answer: reply.answer,
            ticket: reply.ticket.0,
            current: reply.current,
        }
    }
}

/// In-flight or last streamed answer of a session.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StreamResponse {
    pub ticket: u64,
    pub text: String,
    pub done: bool,
}

impl From<StreamSnapshot> for StreamResponse {
    fn from(s: StreamSnapshot) -> Self {
        Self {
            ticket: s.ticket.0,
            text: s.text,
            done: s.done,
        }
    }
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub sessions: usize,
}
