use anyhow::{Context, Result};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Configuration for the RPC provider.
#[derive(Debug, Clone)]
pub struct RpcConfig {
    /// RPC endpoint URL.
    pub url: String,
    /// Retries after the first failed attempt.
    pub max_retries: u8,
    /// Delay between attempts.
    pub retry_delay: Duration,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: "https://api.mainnet-beta.solana.com".to_string(),
            max_retries: 2,
            retry_delay: Duration::from_millis(250),
        }
    }
}

/// Thin wrapper around the nonblocking RPC client with simple retries.
#[derive(Clone)]
pub struct RpcProvider {
    client: Arc<RpcClient>,
    config: RpcConfig,
}

impl RpcProvider {
    #[must_use]
    pub fn new(config: RpcConfig) -> Self {
        Self {
            client: Arc::new(RpcClient::new(config.url.clone())),
            config,
        }
    }

    /// Creates a provider with default retry settings.
    #[must_use]
    pub fn from_url(url: impl Into<String>) -> Self {
        Self::new(RpcConfig {
            url: url.into(),
            ..Default::default()
        })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Raw account data, or `None` when the account does not exist.
    pub async fn get_account_data(&self, pubkey: &Pubkey) -> Result<Option<Vec<u8>>> {
        let mut attempt = 0;
        loop {
            match self.client.get_multiple_accounts(&[*pubkey]).await {
                Ok(mut accounts) => {
                    return Ok(accounts.pop().flatten().map(|account| account.data));
                }
                Err(e) if attempt < self.config.max_retries => {
                    attempt += 1;
                    warn!(account = %pubkey, attempt, error = %e, "Account fetch failed, retrying");
                    sleep(self.config.retry_delay).await;
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("Failed to fetch account {pubkey}"));
                }
            }
        }
    }

    /// Existence flag for each of `pubkeys`, in order.
    pub async fn accounts_exist(&self, pubkeys: &[Pubkey]) -> Result<Vec<bool>> {
        debug!(count = pubkeys.len(), "Checking account existence");
        let mut attempt = 0;
        loop {
            match self.client.get_multiple_accounts(pubkeys).await {
                Ok(accounts) => return Ok(accounts.iter().map(Option::is_some).collect()),
                Err(e) if attempt < self.config.max_retries => {
                    attempt += 1;
                    warn!(attempt, error = %e, "Multiple-account fetch failed, retrying");
                    sleep(self.config.retry_delay).await;
                }
                Err(e) => return Err(e).context("Failed to fetch multiple accounts"),
            }
        }
    }

    /// Balance in lamports.
    pub async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64> {
        let mut attempt = 0;
        loop {
            match self.client.get_balance(pubkey).await {
                Ok(lamports) => return Ok(lamports),
                Err(e) if attempt < self.config.max_retries => {
                    attempt += 1;
                    warn!(account = %pubkey, attempt, error = %e, "Balance fetch failed, retrying");
                    sleep(self.config.retry_delay).await;
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("Failed to fetch balance of {pubkey}"));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_url_keeps_defaults() {
        let provider = RpcProvider::from_url("http://localhost:8899");
        assert_eq!(provider.url(), "http://localhost:8899");
        assert_eq!(provider.config.max_retries, 2);
    }
}
