//! Solana adapters for Meteora DLMM pools.
//!
//! Everything here talks to an RPC node: reading a pool's active bin, probing
//! which bin arrays already exist and reading wallet balances. The advisor
//! only depends on the traits below so it can be tested without a node.

/// Meteora DLMM account layouts and readers.
pub mod meteora;
/// Prelude re-exports.
pub mod prelude;
/// RPC client wrapper.
pub mod rpc;
/// Wallet balance reader.
pub mod wallet;

use async_trait::async_trait;
use anyhow::Result;
use dlmm_lp_domain::BinArrayCoverage;
use rust_decimal::Decimal;

/// Reads the live active bin of a pool.
#[async_trait]
pub trait ActiveBinReader: Send + Sync {
    async fn active_bin_id(&self, pool_address: &str) -> Result<i32>;
}

/// Probes which bin arrays under a bin range are already initialized.
#[async_trait]
pub trait BinArrayProbe: Send + Sync {
    async fn probe(
        &self,
        pool_address: &str,
        min_bin_id: i32,
        max_bin_id: i32,
    ) -> Result<BinArrayCoverage>;
}

/// Reads a wallet's native SOL balance.
#[async_trait]
pub trait BalanceReader: Send + Sync {
    async fn sol_balance(&self, wallet_address: &str) -> Result<Decimal>;
}
