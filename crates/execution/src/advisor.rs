//! Session-level orchestration of pool and range recommendations.
//!
//! The advisor owns the external collaborators and sequences the I/O around
//! the pure selector and recommender:
//! - pool rounds: fetch listing, filter, rank, select, record as shown
//! - ranges: read the active bin fresh, probe bin arrays, derive candidates
//! - chat: stream an answer through the session's sequence-guarded buffer

use crate::error::{ExecutionError, Result};
use crate::session::ChatSession;
use crate::stream::{ChatStream, StreamTicket};
use dlmm_lp_data::chat::{ChatClient, ChatRequest};
use dlmm_lp_data::providers::PoolListingProvider;
use dlmm_lp_domain::{
    BinArrayCoverage, BinRangeCandidate, PoolRecord, RangeLabel, RangeSet, RiskStyle,
    ShownPoolsState,
};
use dlmm_lp_optimization::error::RecommendError;
use dlmm_lp_optimization::filter::QualityFilterConfig;
use dlmm_lp_optimization::ranges::custom_range;
use dlmm_lp_optimization::recommender::{RangeMode, RangeRecommender, RecommenderConfig};
use dlmm_lp_optimization::selector::{PoolSelector, Selection, SelectionTier};
use dlmm_lp_protocols::{ActiveBinReader, BinArrayProbe};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Configuration for the advisor.
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    /// Search term used when the user gives none.
    pub default_search: String,
    /// Quality pre-filter thresholds.
    pub quality: QualityFilterConfig,
    /// Range recommender tunables.
    pub recommender: RecommenderConfig,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            default_search: "SOL".to_string(),
            quality: QualityFilterConfig::default(),
            recommender: RecommenderConfig::default(),
        }
    }
}

/// Result of one pool recommendation round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolRecommendation {
    /// Selected pool, `None` when nothing passed the filters.
    pub pool: Option<PoolRecord>,
    pub tier: Option<SelectionTier>,
    /// User-facing summary.
    pub message: String,
}

impl PoolRecommendation {
    fn none(search: &str) -> Self {
        Self {
            pool: None,
            tier: None,
            message: format!(
                "No pools available for \"{search}\" right now. Try another pair or check back later."
            ),
        }
    }

    fn selected(selection: Selection, style: Option<RiskStyle>) -> Self {
        let pool = &selection.pool;
        let style_note = style
            .map(|s| format!(" for a {s} portfolio"))
            .unwrap_or_default();
        let message = format!(
            "{} (bin step {}){}: TVL ${}, APY {}%, 24h fees ${}.",
            pool.name,
            pool.bin_step,
            style_note,
            pool.liquidity.round_dp(0),
            pool.apy.round_dp(2),
            pool.fees_24h.round_dp(2)
        );
        Self {
            tier: Some(selection.tier),
            pool: Some(selection.pool),
            message,
        }
    }
}

/// A finished chat exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub ticket: StreamTicket,
    pub answer: String,
    /// `false` when a newer request superseded this one while it streamed.
    pub current: bool,
}

/// Sequences external reads around pool selection and range recommendation.
pub struct Advisor {
    listings: Arc<dyn PoolListingProvider>,
    active_bins: Arc<dyn ActiveBinReader>,
    probe: Arc<dyn BinArrayProbe>,
    chat: Arc<dyn ChatClient>,
    selector: PoolSelector,
    recommender: RangeRecommender,
    config: AdvisorConfig,
}

impl Advisor {
    pub fn new(
        listings: Arc<dyn PoolListingProvider>,
        active_bins: Arc<dyn ActiveBinReader>,
        probe: Arc<dyn BinArrayProbe>,
        chat: Arc<dyn ChatClient>,
        config: AdvisorConfig,
    ) -> Self {
        Self {
            listings,
            active_bins,
            probe,
            chat,
            selector: PoolSelector::new(config.quality.clone()),
            recommender: RangeRecommender::new(config.recommender.clone()),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    #[must_use]
    pub fn recommender(&self) -> &RangeRecommender {
        &self.recommender
    }

    fn search_term<'a>(&'a self, search: Option<&'a str>) -> &'a str {
        search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(self.config.default_search.as_str())
    }

    /// Fetches the listing and selects one pool without recording it.
    ///
    /// Listing failures are returned as [`ExecutionError::Upstream`] and are
    /// not retried here.
    pub async fn select_pool(
        &self,
        search: Option<&str>,
        style: Option<RiskStyle>,
        shown: &ShownPoolsState,
    ) -> Result<PoolRecommendation> {
        let term = self.search_term(search);
        let groups = self.listings.fetch_groups(term).await.map_err(|e| {
            warn!(search = term, error = %e, "Pool listing unavailable");
            ExecutionError::Upstream(e)
        })?;

        Ok(match self.selector.select(&groups, Some(term), style, shown) {
            Some(selection) => PoolRecommendation::selected(selection, style),
            None => {
                info!(search = term, "No pools passed the filters");
                PoolRecommendation::none(term)
            }
        })
    }

    /// Runs one recommendation round and records the pick in `session`.
    ///
    /// `style` overrides and replaces the session's style when given.
    pub async fn recommend_pool(
        &self,
        session: &mut ChatSession,
        search: Option<&str>,
        style: Option<RiskStyle>,
    ) -> Result<PoolRecommendation> {
        if style.is_some() {
            session.style = style;
        }
        let style = session.style;
        let recommendation = self.select_pool(search, style, &session.shown).await?;
        if let Some(pool) = &recommendation.pool {
            session.record_pool(style, pool);
        }
        Ok(recommendation)
    }

    async fn read_active_bin(&self, pool_address: &str) -> Result<i32> {
        self.active_bins
            .active_bin_id(pool_address)
            .await
            .map_err(|source| {
                warn!(pool = pool_address, error = %source, "Active bin read failed");
                ExecutionError::ActiveBinUnavailable {
                    pool: pool_address.to_string(),
                    source,
                }
            })
    }

    /// Best-effort probe. Failures degrade to static costs.
    async fn probe_coverage(
        &self,
        pool_address: &str,
        min_bin_id: i32,
        max_bin_id: i32,
    ) -> Option<BinArrayCoverage> {
        match self.probe.probe(pool_address, min_bin_id, max_bin_id).await {
            Ok(coverage) => Some(coverage),
            Err(e) => {
                warn!(pool = pool_address, error = %e, "Bin array probe failed, using static costs");
                None
            }
        }
    }

    /// Bounds of the widest preset around `active`.
    fn preset_span(active: i32) -> (i32, i32) {
        let half = RangeLabel::PRESETS
            .iter()
            .filter_map(RangeLabel::half_width)
            .max()
            .unwrap_or_default();
        let half = i32::try_from(half).unwrap_or(i32::MAX);
        (active.saturating_sub(half), active.saturating_add(half))
    }

    async fn probe_presets(&self, pool_address: &str, active: i32) -> Option<BinArrayCoverage> {
        let (min, max) = Self::preset_span(active);
        self.probe_coverage(pool_address, min, max).await
    }

    /// Candidate ranges around the freshly read active bin.
    ///
    /// In [`RangeMode::Standard`] a failed active-bin read fails the call. In
    /// [`RangeMode::ExistingBinsOnly`] it falls back to a small range around
    /// `fallback_bin_id` when one is given.
    pub async fn ranges(
        &self,
        pool_address: &str,
        mode: RangeMode,
        fallback_bin_id: Option<i32>,
    ) -> Result<RangeSet> {
        let set = match mode {
            RangeMode::Standard => {
                let active = self.read_active_bin(pool_address).await?;
                let coverage = self.probe_presets(pool_address, active).await;
                self.recommender
                    .recommend(pool_address, Some(active), coverage.as_ref())?
            }
            RangeMode::ExistingBinsOnly => match self.read_active_bin(pool_address).await {
                Ok(active) => {
                    let coverage = self.probe_presets(pool_address, active).await;
                    self.recommender.recommend_existing_only(
                        pool_address,
                        Some(active),
                        fallback_bin_id,
                        coverage.as_ref(),
                    )?
                }
                Err(e) if fallback_bin_id.is_some() => {
                    warn!(
                        pool = pool_address,
                        fallback = ?fallback_bin_id,
                        error = %e,
                        "Using fallback anchor"
                    );
                    self.recommender.recommend_existing_only(
                        pool_address,
                        None,
                        fallback_bin_id,
                        None,
                    )?
                }
                Err(e) => return Err(e),
            },
        };

        info!(
            pool = pool_address,
            active_bin = set.active_bin_id,
            candidates = set.all.len(),
            mode = ?mode,
            "Ranges computed"
        );
        Ok(set)
    }

    /// Standard ranges plus a custom-width candidate.
    ///
    /// Both come from a single active-bin read and a single probe spanning
    /// the presets and the custom bounds, so the custom candidate is anchored
    /// on the same `active_bin_id` the set reports.
    pub async fn ranges_with_custom(
        &self,
        pool_address: &str,
        width: u32,
    ) -> Result<(RangeSet, BinRangeCandidate)> {
        let active = self.read_active_bin(pool_address).await?;
        let bounds = custom_range(active, width).map_err(RecommendError::from)?;
        let (preset_min, preset_max) = Self::preset_span(active);
        let coverage = self
            .probe_coverage(
                pool_address,
                preset_min.min(bounds.min_bin_id),
                preset_max.max(bounds.max_bin_id),
            )
            .await;

        let set = self
            .recommender
            .recommend(pool_address, Some(active), coverage.as_ref())?;
        let custom =
            self.recommender
                .recommend_custom(pool_address, Some(active), width, coverage.as_ref())?;
        info!(
            pool = pool_address,
            active_bin = active,
            width,
            "Ranges with custom width computed"
        );
        Ok((set, custom))
    }

    /// Streams an answer for `request` into `stream`.
    pub async fn chat(&self, request: &ChatRequest, stream: &ChatStream) -> Result<ChatReply> {
        let ticket = stream.begin();
        let mut sink = |chunk: &str| {
            stream.append(ticket, chunk);
        };
        let answer = self.chat.complete(request, &mut sink).await.map_err(|e| {
            warn!(ticket = ticket.0, error = %e, "Chat request failed");
            ExecutionError::Chat(e)
        })?;

        let current = stream.finish(ticket);
        if !current {
            info!(ticket = ticket.0, "Chat answer superseded by a newer request");
        }
        Ok(ChatReply {
            ticket,
            answer,
            current,
        })
    }

    /// Sends `message` in the context of `session`, keeping the history when
    /// the answer was not superseded.
    pub async fn chat_in_session(
        &self,
        session: &mut ChatSession,
        message: &str,
    ) -> Result<ChatReply> {
        let request = session.chat_request(message);
        let stream = Arc::clone(&session.stream);
        let reply = self.chat(&request, &stream).await?;
        if reply.current {
            session.push_exchange(message, &reply.answer);
        }
        Ok(reply)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use dlmm_lp_data::chat::ChunkSink;
    use dlmm_lp_data::error::DataError;
    use dlmm_lp_domain::PoolGroup;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    pub(crate) struct MockListings {
        pub(crate) groups: Vec<PoolGroup>,
        pub(crate) fail: bool,
    }

    #[async_trait]
    impl PoolListingProvider for MockListings {
        async fn fetch_groups(&self, _search: &str) -> dlmm_lp_data::error::Result<Vec<PoolGroup>> {
            if self.fail {
                return Err(DataError::Status {
                    status: 503,
                    body: "unavailable".into(),
                });
            }
            Ok(self.groups.clone())
        }
    }

    /// Returns queued active bins, repeating the last; empty means failure.
    pub(crate) struct MockActiveBins(pub(crate) Mutex<Vec<i32>>);

    impl MockActiveBins {
        pub(crate) fn new(bins: Vec<i32>) -> Self {
            Self(Mutex::new(bins))
        }
    }

    #[async_trait]
    impl ActiveBinReader for MockActiveBins {
        async fn active_bin_id(&self, _pool: &str) -> anyhow::Result<i32> {
            let mut bins = self.0.lock().unwrap();
            match bins.len() {
                0 => anyhow::bail!("rpc timeout"),
                1 => Ok(bins[0]),
                _ => Ok(bins.remove(0)),
            }
        }
    }

    /// Reports fixed existing arrays; `None` simulates a failed probe.
    pub(crate) struct MockProbe(pub(crate) Option<Vec<i64>>);

    #[async_trait]
    impl BinArrayProbe for MockProbe {
        async fn probe(&self, _pool: &str, _min: i32, _max: i32) -> anyhow::Result<BinArrayCoverage> {
            let Some(existing) = &self.0 else {
                anyhow::bail!("probe failed");
            };
            let mut coverage = BinArrayCoverage::new();
            for idx in existing {
                coverage.mark_existing(*idx);
            }
            Ok(coverage)
        }
    }

    pub(crate) struct MockChat {
        chunks: Vec<&'static str>,
    }

    #[async_trait]
    impl ChatClient for MockChat {
        async fn complete(
            &self,
            _request: &ChatRequest,
            on_chunk: &mut ChunkSink<'_>,
        ) -> dlmm_lp_data::error::Result<String> {
            for chunk in &self.chunks {
                on_chunk(*chunk);
            }
            Ok(self.chunks.concat())
        }
    }

    struct FailingChat;

    #[async_trait]
    impl ChatClient for FailingChat {
        async fn complete(
            &self,
            _request: &ChatRequest,
            _on_chunk: &mut ChunkSink<'_>,
        ) -> dlmm_lp_data::error::Result<String> {
            Err(DataError::Stream("connection reset".into()))
        }
    }

    fn pool(address: &str, bin_step: u16, liquidity: Decimal) -> PoolRecord {
        PoolRecord::new("SOL-USDC", address, bin_step)
            .with_liquidity(liquidity)
            .with_apy(dec!(10))
            .with_fees_24h(dec!(50))
    }

    fn advisor(listings: MockListings, bins: Vec<i32>, probe: MockProbe) -> Advisor {
        Advisor::new(
            Arc::new(listings),
            Arc::new(MockActiveBins::new(bins)),
            Arc::new(probe),
            Arc::new(MockChat {
                chunks: vec!["Try ", "SOL-USDC"],
            }),
            AdvisorConfig::default(),
        )
    }

    fn listings() -> MockListings {
        MockListings {
            groups: vec![PoolGroup::new(
                "SOL-USDC",
                vec![
                    pool("A", 50, dec!(10000)),
                    pool("B", 10, dec!(5000)),
                    pool("C", 50, dec!(4000)),
                ],
            )],
            fail: false,
        }
    }

    #[tokio::test]
    async fn test_recommend_pool_records_and_rotates() {
        let advisor = advisor(listings(), vec![0], MockProbe(None));
        let mut session = ChatSession::new();

        let first = advisor
            .recommend_pool(&mut session, None, Some(RiskStyle::Conservative))
            .await
            .unwrap();
        assert_eq!(first.pool.unwrap().address, "A");
        assert_eq!(first.tier, Some(SelectionTier::FreshPreferred));

        let second = advisor
            .recommend_pool(&mut session, Some("sol-usdc"), None)
            .await
            .unwrap();
        assert_eq!(second.pool.unwrap().address, "C");

        let third = advisor.recommend_pool(&mut session, None, None).await.unwrap();
        assert_eq!(third.pool.unwrap().address, "B");
        assert_eq!(third.tier, Some(SelectionTier::FreshAny));

        let fourth = advisor.recommend_pool(&mut session, None, None).await.unwrap();
        assert_eq!(fourth.tier, Some(SelectionTier::Exhausted));
        assert!(fourth.pool.is_some());
    }

    #[tokio::test]
    async fn test_no_pools_is_not_an_error() {
        let advisor = advisor(listings(), vec![0], MockProbe(None));
        let recommendation = advisor
            .select_pool(Some("JUP"), None, &ShownPoolsState::new())
            .await
            .unwrap();
        assert!(recommendation.pool.is_none());
        assert!(recommendation.message.contains("No pools available"));
    }

    #[tokio::test]
    async fn test_listing_failure_surfaces_retry_message() {
        let advisor = advisor(
            MockListings {
                groups: vec![],
                fail: true,
            },
            vec![0],
            MockProbe(None),
        );
        let err = advisor
            .select_pool(None, None, &ShownPoolsState::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutionError::Upstream(_)));
        assert!(err.user_message().contains("try again"));
    }

    #[tokio::test]
    async fn test_ranges_use_fresh_active_bin() {
        let advisor = advisor(listings(), vec![100, 140], MockProbe(None));
        let first = advisor.ranges("pool", RangeMode::Standard, None).await.unwrap();
        assert_eq!(first.active_bin_id, 100);
        let in_range = first.in_range.unwrap();
        assert_eq!((in_range.min_bin_id, in_range.max_bin_id), (95, 105));

        let second = advisor.ranges("pool", RangeMode::Standard, None).await.unwrap();
        assert_eq!(second.active_bin_id, 140);
    }

    #[tokio::test]
    async fn test_probe_failure_keeps_static_costs() {
        let advisor = advisor(listings(), vec![35], MockProbe(None));
        let set = advisor.ranges("pool", RangeMode::Standard, None).await.unwrap();
        assert_eq!(set.balanced.unwrap().estimated_cost_sol, dec!(0.070));
    }

    #[tokio::test]
    async fn test_probe_success_lowers_costs() {
        let advisor = advisor(listings(), vec![35], MockProbe(Some(vec![0])));
        let set = advisor.ranges("pool", RangeMode::Standard, None).await.unwrap();
        assert_eq!(set.conservative.unwrap().estimated_cost_sol, dec!(0.057));
    }

    #[tokio::test]
    async fn test_active_bin_failure_fails_standard_ranges() {
        let advisor = advisor(listings(), vec![], MockProbe(None));
        let err = advisor
            .ranges("pool", RangeMode::Standard, Some(7))
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutionError::ActiveBinUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_existing_only_uses_fallback_anchor() {
        let advisor = advisor(listings(), vec![], MockProbe(Some(vec![0])));
        let set = advisor
            .ranges("pool", RangeMode::ExistingBinsOnly, Some(20))
            .await
            .unwrap();
        let safe = set.default_candidate().unwrap();
        assert_eq!((safe.min_bin_id, safe.max_bin_id), (17, 23));
        assert!(safe.is_existing_bins_only);

        assert!(
            advisor
                .ranges("pool", RangeMode::ExistingBinsOnly, None)
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_custom_range_is_probed() {
        let advisor = advisor(listings(), vec![35], MockProbe(Some(vec![0])));
        let (_, candidate) = advisor.ranges_with_custom("pool", 40).await.unwrap();
        assert_eq!((candidate.min_bin_id, candidate.max_bin_id), (15, 55));
        assert_eq!(candidate.estimated_cost_sol, dec!(0.057));
    }

    #[tokio::test]
    async fn test_custom_range_shares_the_active_read() {
        // A second read would see 200.
        let advisor = advisor(listings(), vec![100, 200], MockProbe(None));
        let (set, custom) = advisor.ranges_with_custom("pool", 10).await.unwrap();
        assert_eq!(set.active_bin_id, 100);
        assert_eq!(custom.center_bin_id, 100);
        assert_eq!((custom.min_bin_id, custom.max_bin_id), (95, 105));
        assert!(custom.cost_is_variable);
    }

    #[tokio::test]
    async fn test_existing_only_rejects_missing_home_array() {
        // Active 100 sits in array 1; only array 0 exists.
        let advisor = advisor(listings(), vec![100], MockProbe(Some(vec![0])));
        let err = advisor
            .ranges("pool", RangeMode::ExistingBinsOnly, Some(100))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ExecutionError::Recommend(RecommendError::NoExistingRange { .. })
        ));
    }

    #[tokio::test]
    async fn test_existing_only_unknown_arrays_use_safe_default() {
        let advisor = advisor(listings(), vec![100], MockProbe(None));
        let set = advisor
            .ranges("pool", RangeMode::ExistingBinsOnly, None)
            .await
            .unwrap();
        assert_eq!(set.all.len(), 1);
        let safe = set.default_candidate().unwrap();
        assert_eq!((safe.min_bin_id, safe.max_bin_id), (97, 103));
    }

    #[tokio::test]
    async fn test_chat_failure_is_reported_as_chat_error() {
        let advisor = Advisor::new(
            Arc::new(listings()),
            Arc::new(MockActiveBins::new(vec![0])),
            Arc::new(MockProbe(None)),
            Arc::new(FailingChat),
            AdvisorConfig::default(),
        );
        let mut session = ChatSession::new();
        let err = advisor.chat_in_session(&mut session, "hi").await.unwrap_err();
        assert!(matches!(err, ExecutionError::Chat(_)));
        assert!(err.user_message().contains("assistant is unavailable"));
        assert!(session.history.is_empty());
    }

    #[tokio::test]
    async fn test_chat_streams_into_session_buffer() {
        let advisor = advisor(listings(), vec![0], MockProbe(None));
        let mut session = ChatSession::new();
        let reply = advisor.chat_in_session(&mut session, "best pool?").await.unwrap();
        assert!(reply.current);
        assert_eq!(reply.answer, "Try SOL-USDC");
        assert_eq!(session.stream.snapshot().text, "Try SOL-USDC");
        assert_eq!(session.history.len(), 2);
    }

    #[tokio::test]
    async fn test_superseded_chat_is_not_recorded() {
        let advisor = advisor(listings(), vec![0], MockProbe(None));
        let stream = ChatStream::new();
        let request = ChatSession::new().chat_request("hi");
        let reply = advisor.chat(&request, &stream).await.unwrap();
        assert!(reply.current);

        // A newer request takes over after the first one finished streaming.
        let newer = stream.begin();
        assert!(!stream.finish(reply.ticket));
        assert!(stream.is_current(newer));
    }
}
