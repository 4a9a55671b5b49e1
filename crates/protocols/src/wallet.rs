use crate::BalanceReader;
use crate::meteora::parse_pubkey;
use crate::rpc::RpcProvider;
use anyhow::Result;
use async_trait::async_trait;
use dlmm_lp_domain::costs::lamports_to_sol;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::debug;

/// Reads native SOL balances over RPC.
pub struct RpcBalanceReader {
    provider: Arc<RpcProvider>,
}

impl RpcBalanceReader {
    #[must_use]
    pub fn new(provider: Arc<RpcProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl BalanceReader for RpcBalanceReader {
    async fn sol_balance(&self, wallet_address: &str) -> Result<Decimal> {
        let pubkey = parse_pubkey(wallet_address)?;
        let lamports = self.provider.get_balance(&pubkey).await?;
        debug!(wallet = wallet_address, lamports, "Read wallet balance");
        Ok(lamports_to_sol(lamports))
    }
}
