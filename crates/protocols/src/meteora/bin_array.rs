use super::{parse_pubkey, program_id};
use crate::BinArrayProbe;
use crate::rpc::RpcProvider;
use anyhow::Result;
use async_trait::async_trait;
use dlmm_lp_domain::BinArrayCoverage;
use dlmm_lp_domain::math::bin_array::bin_array_indices;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use tracing::{debug, info};

/// PDA seed prefix for bin arrays.
pub const BIN_ARRAY_SEED: &[u8] = b"bin_array";

/// Address of the bin array `index` of `lb_pair`.
#[must_use]
pub fn bin_array_address(lb_pair: &Pubkey, index: i64, program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[BIN_ARRAY_SEED, lb_pair.as_ref(), &index.to_le_bytes()],
        program_id,
    )
    .0
}

/// Probes bin array existence with one multiple-account request.
pub struct RpcBinArrayProbe {
    provider: Arc<RpcProvider>,
    program_id: Pubkey,
}

impl RpcBinArrayProbe {
    pub fn new(provider: Arc<RpcProvider>) -> Result<Self> {
        Ok(Self {
            provider,
            program_id: program_id()?,
        })
    }
}

#[async_trait]
impl BinArrayProbe for RpcBinArrayProbe {
    async fn probe(
        &self,
        pool_address: &str,
        min_bin_id: i32,
        max_bin_id: i32,
    ) -> Result<BinArrayCoverage> {
        let lb_pair = parse_pubkey(pool_address)?;
        let indices: Vec<i64> = bin_array_indices(min_bin_id, max_bin_id).collect();
        let addresses: Vec<Pubkey> = indices
            .iter()
            .map(|idx| bin_array_address(&lb_pair, *idx, &self.program_id))
            .collect();

        debug!(
            pool = pool_address,
            min_bin_id,
            max_bin_id,
            arrays = indices.len(),
            "Probing bin arrays"
        );
        let exists = self.provider.accounts_exist(&addresses).await?;

        let mut coverage = BinArrayCoverage::new();
        for (idx, found) in indices.iter().zip(exists) {
            if found {
                coverage.mark_existing(*idx);
            } else {
                coverage.mark_missing(*idx);
            }
        }
        info!(
            pool = pool_address,
            existing = coverage.existing_count(),
            probed = indices.len(),
            "Bin array probe finished"
        );
        Ok(coverage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_array_address_is_deterministic() {
        let program = program_id().unwrap();
        let pair = Pubkey::new_unique();
        let a = bin_array_address(&pair, -1, &program);
        assert_eq!(a, bin_array_address(&pair, -1, &program));
        assert_ne!(a, bin_array_address(&pair, 0, &program));
        assert_ne!(a, bin_array_address(&Pubkey::new_unique(), -1, &program));
    }

    #[test]
    fn test_probe_requires_valid_pool_address() {
        let provider = Arc::new(RpcProvider::from_url("http://localhost:8899"));
        let probe = RpcBinArrayProbe::new(provider).unwrap();
        let rt = tokio::runtime::Runtime::new().unwrap();
        assert!(rt.block_on(probe.probe("bad address", 0, 10)).is_err());
    }
}
