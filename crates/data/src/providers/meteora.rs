//! Meteora DLMM pool listing API.
//!
//! The listing endpoint returns pairs grouped by token-pair name. Numeric
//! fields are not consistently typed upstream (TVL arrives as a decimal
//! string, yields as JSON numbers), so every numeric field is parsed
//! leniently and anything unparsable counts as zero.

use super::PoolListingProvider;
use crate::error::{DataError, Result};
use async_trait::async_trait;
use dlmm_lp_domain::{PoolGroup, PoolRecord};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Configuration for the listing API client.
#[derive(Debug, Clone)]
pub struct MeteoraApiConfig {
    /// Base URL of the DLMM API.
    pub base_url: String,
    /// Maximum groups requested per call.
    pub limit: u32,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for MeteoraApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://dlmm-api.meteora.ag".to_string(),
            limit: 50,
            timeout: Duration::from_secs(10),
        }
    }
}

/// A JSON number or a decimal string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum LenientNumber {
    Number(f64),
    Text(String),
}

impl LenientNumber {
    fn to_decimal(&self) -> Decimal {
        match self {
            Self::Number(n) => Decimal::try_from(*n).unwrap_or_default(),
            Self::Text(s) => Decimal::from_str(s.trim())
                .or_else(|_| Decimal::from_scientific(s.trim()))
                .unwrap_or_default(),
        }
    }
}

fn decimal(value: &Option<LenientNumber>) -> Decimal {
    value.as_ref().map(LenientNumber::to_decimal).unwrap_or_default()
}

#[derive(Debug, Deserialize)]
struct GroupsResponse {
    #[serde(default)]
    groups: Vec<GroupDto>,
}

#[derive(Debug, Deserialize)]
struct GroupDto {
    name: String,
    #[serde(default)]
    pairs: Vec<PairDto>,
}

#[derive(Debug, Deserialize)]
struct PairDto {
    address: String,
    name: String,
    bin_step: u16,
    #[serde(default)]
    liquidity: Option<LenientNumber>,
    #[serde(default)]
    current_price: Option<LenientNumber>,
    #[serde(default)]
    apy: Option<LenientNumber>,
    #[serde(default)]
    fees_24h: Option<LenientNumber>,
    #[serde(default)]
    trade_volume_24h: Option<LenientNumber>,
}

impl From<PairDto> for PoolRecord {
    fn from(dto: PairDto) -> Self {
        PoolRecord::new(dto.name, dto.address, dto.bin_step)
            .with_liquidity(decimal(&dto.liquidity))
            .with_current_price(decimal(&dto.current_price))
            .with_apy(decimal(&dto.apy))
            .with_fees_24h(decimal(&dto.fees_24h))
            .with_volume_24h(decimal(&dto.trade_volume_24h))
    }
}

/// Parses a raw listing response body.
pub fn parse_groups(body: &str) -> Result<Vec<PoolGroup>> {
    let response: GroupsResponse = serde_json::from_str(body)?;
    Ok(response
        .groups
        .into_iter()
        .map(|g| PoolGroup::new(g.name, g.pairs.into_iter().map(PoolRecord::from).collect()))
        .collect())
}

/// HTTP client for the Meteora listing API.
#[derive(Debug, Clone)]
pub struct MeteoraPoolApi {
    client: Client,
    config: MeteoraApiConfig,
}

impl MeteoraPoolApi {
    pub fn new(config: MeteoraApiConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &MeteoraApiConfig {
        &self.config
    }

    fn groups_url(&self) -> String {
        format!(
            "{}/pair/all_by_groups",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl PoolListingProvider for MeteoraPoolApi {
    async fn fetch_groups(&self, search: &str) -> Result<Vec<PoolGroup>> {
        let url = self.groups_url();
        debug!(url = %url, search, "Fetching pool groups");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("search_term", search.to_string()),
                ("limit", self.config.limit.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!(status = status.as_u16(), search, "Pool listing request failed");
            return Err(DataError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let groups = parse_groups(&body)?;
        info!(
            search,
            groups = groups.len(),
            pairs = groups.iter().map(|g| g.pairs.len()).sum::<usize>(),
            "Fetched pool groups"
        );
        Ok(groups)
    }
}
