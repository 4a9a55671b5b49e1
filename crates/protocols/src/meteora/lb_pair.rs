use super::parse_pubkey;
use crate::ActiveBinReader;
use crate::rpc::RpcProvider;
use anyhow::{Result, bail};
use async_trait::async_trait;
use borsh::{BorshDeserialize, BorshSerialize};
use std::sync::Arc;
use tracing::debug;

/// Anchor discriminator of the `LbPair` account.
pub const LB_PAIR_DISCRIMINATOR: [u8; 8] = [33, 11, 49, 98, 181, 101, 177, 13];

/// Leading fields of the `LbPair` account, up to the bin step.
///
/// The fee parameter blocks are kept opaque; only `active_id` and `bin_step`
/// are read. Borsh reads the prefix and ignores the rest of the account.
#[derive(BorshDeserialize, BorshSerialize, Debug, Clone, PartialEq, Eq)]
pub struct LbPairHeader {
    pub discriminator: [u8; 8],
    pub static_parameters: [u8; 32],
    pub variable_parameters: [u8; 32],
    pub bump_seed: [u8; 1],
    pub bin_step_seed: [u8; 2],
    pub pair_type: u8,
    pub active_id: i32,
    pub bin_step: u16,
    pub status: u8,
}

impl LbPairHeader {
    /// Byte offset of `active_id` in the account data.
    pub const ACTIVE_ID_OFFSET: usize = 76;

    /// Decodes the header from raw account data.
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.get(..8) != Some(&LB_PAIR_DISCRIMINATOR[..]) {
            bail!("Invalid LbPair discriminator");
        }
        let header = Self::deserialize(&mut &data[..])?;
        Ok(header)
    }
}

/// Reads the active bin from the `LbPair` account over RPC.
pub struct RpcActiveBinReader {
    provider: Arc<RpcProvider>,
}

impl RpcActiveBinReader {
    #[must_use]
    pub fn new(provider: Arc<RpcProvider>) -> Self {
        Self { provider }
    }

    /// Decoded header of a pool.
    pub async fn read_header(&self, pool_address: &str) -> Result<LbPairHeader> {
        let pubkey = parse_pubkey(pool_address)?;
        let Some(data) = self.provider.get_account_data(&pubkey).await? else {
            bail!("Pool account {pool_address} not found");
        };
        LbPairHeader::decode(&data)
    }
}

#[async_trait]
impl ActiveBinReader for RpcActiveBinReader {
    async fn active_bin_id(&self, pool_address: &str) -> Result<i32> {
        let header = self.read_header(pool_address).await?;
        debug!(
            pool = pool_address,
            active_id = header.active_id,
            bin_step = header.bin_step,
            "Read active bin"
        );
        Ok(header.active_id)
    }
}
