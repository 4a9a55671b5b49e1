use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Snapshot of a DLMM pool as returned by the listing API.
///
/// The address is the unique key. Records are immutable per fetch and never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolRecord {
    pub name: String,
    pub address: String,
    /// Total value locked in USD.
    pub liquidity: Decimal,
    pub current_price: Decimal,
    /// Annualized yield, in percent.
    pub apy: Decimal,
    pub fees_24h: Decimal,
    pub volume_24h: Decimal,
    pub bin_step: u16,
}

impl PoolRecord {
    /// Creates a record with zeroed market figures.
    pub fn new(name: impl Into<String>, address: impl Into<String>, bin_step: u16) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            liquidity: Decimal::ZERO,
            current_price: Decimal::ZERO,
            apy: Decimal::ZERO,
            fees_24h: Decimal::ZERO,
            volume_24h: Decimal::ZERO,
            bin_step,
        }
    }

    #[must_use]
    pub fn with_liquidity(mut self, liquidity: Decimal) -> Self {
        self.liquidity = liquidity;
        self
    }

    #[must_use]
    pub fn with_apy(mut self, apy: Decimal) -> Self {
        self.apy = apy;
        self
    }

    #[must_use]
    pub fn with_fees_24h(mut self, fees: Decimal) -> Self {
        self.fees_24h = fees;
        self
    }

    #[must_use]
    pub fn with_volume_24h(mut self, volume: Decimal) -> Self {
        self.volume_24h = volume;
        self
    }

    #[must_use]
    pub fn with_current_price(mut self, price: Decimal) -> Self {
        self.current_price = price;
        self
    }
}

/// Pools sharing a pair name, as grouped by the listing API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolGroup {
    pub name: String,
    pub pairs: Vec<PoolRecord>,
}

impl PoolGroup {
    pub fn new(name: impl Into<String>, pairs: Vec<PoolRecord>) -> Self {
        Self {
            name: name.into(),
            pairs,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
