pub use crate::meteora::bin_array::{RpcBinArrayProbe, bin_array_address};
pub use crate::meteora::lb_pair::{LbPairHeader, RpcActiveBinReader};
pub use crate::meteora::{DLMM_PROGRAM_ID, parse_pubkey};
pub use crate::rpc::{RpcConfig, RpcProvider};
pub use crate::wallet::RpcBalanceReader;
pub use crate::{ActiveBinReader, BalanceReader, BinArrayProbe};
