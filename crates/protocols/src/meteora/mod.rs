//! Meteora DLMM program adapter.
//!
//! - decode the `LbPair` header for the active bin and bin step
//! - derive bin array addresses and probe their existence

/// Bin array address derivation and probing.
pub mod bin_array;
/// `LbPair` account header.
pub mod lb_pair;

use anyhow::{Context, Result};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

/// Meteora DLMM program ID (mainnet).
pub const DLMM_PROGRAM_ID: &str = "LBUZKhRxPF3XUpBCjp4YzTKgLccjZhTSDM9YuVaPwxo";

/// Parsed DLMM program ID.
pub fn program_id() -> Result<Pubkey> {
    parse_pubkey(DLMM_PROGRAM_ID)
}

/// Parses a base58 address with context on failure.
pub fn parse_pubkey(address: &str) -> Result<Pubkey> {
    Pubkey::from_str(address).with_context(|| format!("Invalid address: {address}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_id() {
        assert!(program_id().is_ok());
        assert!(parse_pubkey("not-a-key").is_err());
    }
}
