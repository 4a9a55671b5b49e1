//! Server configuration, wiring and startup.

use crate::routes::create_router;
use crate::state::{AppState, DEFAULT_SESSION_TTL};
use anyhow::{Context, Result};
use dlmm_lp_data::chat::{ChatClientConfig, HttpChatClient};
use dlmm_lp_data::providers::meteora::{MeteoraApiConfig, MeteoraPoolApi};
use dlmm_lp_domain::costs::DEFAULT_FEE_BUFFER_SOL;
use dlmm_lp_execution::advisor::{Advisor, AdvisorConfig};
use dlmm_lp_execution::balance::{BalanceConfig, BalanceValidator};
use dlmm_lp_execution::submit::PositionSubmitter;
use dlmm_lp_protocols::meteora::bin_array::RpcBinArrayProbe;
use dlmm_lp_protocols::meteora::lb_pair::RpcActiveBinReader;
use dlmm_lp_protocols::rpc::{RpcConfig, RpcProvider};
use dlmm_lp_protocols::wallet::RpcBalanceReader;
use dlmm_lp_protocols::{ActiveBinReader, BinArrayProbe};
use rust_decimal::Decimal;
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Solana RPC endpoint.
    pub rpc_url: String,
    /// Pool listing API base URL.
    pub pool_api_url: String,
    /// Chat backend endpoint.
    pub chat_api_url: String,
    pub fee_buffer_sol: Decimal,
    pub default_search: String,
    /// Idle sessions older than this are dropped.
    pub session_ttl: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            rpc_url: RpcConfig::default().url,
            pool_api_url: MeteoraApiConfig::default().base_url,
            chat_api_url: ChatClientConfig::default().url,
            fee_buffer_sol: DEFAULT_FEE_BUFFER_SOL,
            default_search: AdvisorConfig::default().default_search,
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }
}

fn env_parsed<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "Ignoring unparsable environment value");
            default
        }),
        Err(_) => default,
    }
}

impl ServerConfig {
    /// Reads `DLMM_*` environment variables, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: env_parsed("DLMM_BIND_ADDR", defaults.bind_addr),
            rpc_url: env::var("DLMM_RPC_URL").unwrap_or(defaults.rpc_url),
            pool_api_url: env::var("DLMM_POOL_API_URL").unwrap_or(defaults.pool_api_url),
            chat_api_url: env::var("DLMM_CHAT_API_URL").unwrap_or(defaults.chat_api_url),
            fee_buffer_sol: env_parsed("DLMM_FEE_BUFFER_SOL", defaults.fee_buffer_sol),
            default_search: env::var("DLMM_DEFAULT_SEARCH").unwrap_or(defaults.default_search),
            session_ttl: Duration::from_secs(env_parsed(
                "DLMM_SESSION_TTL_SECS",
                defaults.session_ttl.as_secs(),
            )),
        }
    }
}

/// Builds the live collaborators and the shared state.
pub fn build_state(config: &ServerConfig) -> Result<AppState> {
    let provider = Arc::new(RpcProvider::new(RpcConfig {
        url: config.rpc_url.clone(),
        ..Default::default()
    }));

    let listings = MeteoraPoolApi::new(MeteoraApiConfig {
        base_url: config.pool_api_url.clone(),
        ..Default::default()
    })
    .context("Failed to build pool listing client")?;
    let chat = HttpChatClient::new(ChatClientConfig {
        url: config.chat_api_url.clone(),
        ..Default::default()
    })
    .context("Failed to build chat client")?;
    let probe: Arc<dyn BinArrayProbe> = Arc::new(RpcBinArrayProbe::new(Arc::clone(&provider))?);
    let active_bins: Arc<dyn ActiveBinReader> =
        Arc::new(RpcActiveBinReader::new(Arc::clone(&provider)));

    let advisor = Advisor::new(
        Arc::new(listings),
        Arc::clone(&active_bins),
        Arc::clone(&probe),
        Arc::new(chat),
        AdvisorConfig {
            default_search: config.default_search.clone(),
            ..Default::default()
        },
    );
    let balance = Arc::new(BalanceValidator::new(
        Arc::new(RpcBalanceReader::new(provider)),
        BalanceConfig {
            fee_buffer_sol: config.fee_buffer_sol,
        },
    ));
    let positions = PositionSubmitter::new(
        active_bins,
        probe,
        Arc::clone(&balance),
        advisor.recommender().clone(),
    );

    Ok(
        AppState::new(Arc::new(advisor), balance, Arc::new(positions))
            .with_session_ttl(config.session_ttl),
    )
}

/// The HTTP server.
pub struct ApiServer {
    config: ServerConfig,
    state: AppState,
}

impl ApiServer {
    /// Wires live collaborators from `config`.
    pub fn new(config: ServerConfig) -> Result<Self> {
        let state = build_state(&config)?;
        Ok(Self { config, state })
    }

    /// Uses an already built state.
    #[must_use]
    pub fn with_state(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Binds and serves until the process stops.
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr)
            .await
            .with_context(|| format!("Failed to bind to {}", self.config.bind_addr))?;
        info!(
            addr = %self.config.bind_addr,
            rpc = %self.config.rpc_url,
            pools = %self.config.pool_api_url,
            "DLMM advisor listening"
        );
        axum::serve(listener, create_router(self.state))
            .await
            .context("Server error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.fee_buffer_sol, dec!(0.015));
        assert_eq!(config.default_search, "SOL");
        assert_eq!(config.pool_api_url, "https://dlmm-api.meteora.ag");
        assert_eq!(config.session_ttl, Duration::from_secs(3600));
    }

    #[test]
    fn test_env_parsed_falls_back() {
        assert_eq!(env_parsed("DLMM_TEST_UNSET_VALUE", 7u32), 7);
    }

    #[test]
    fn test_build_state() {
        let state = build_state(&ServerConfig::default()).unwrap();
        assert_eq!(state.advisor.config().default_search, "SOL");
        assert_eq!(state.balance.config().fee_buffer_sol, dec!(0.015));

        let state = build_state(&ServerConfig {
            session_ttl: Duration::from_secs(90),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(state.session_ttl, Duration::from_secs(90));
    }
}
