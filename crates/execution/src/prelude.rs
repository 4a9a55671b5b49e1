//! Prelude module for convenient imports.
//!
//! ```rust
//! use dlmm_lp_execution::prelude::*;
//! ```

// Advisor
pub use crate::advisor::{Advisor, AdvisorConfig, ChatReply, PoolRecommendation};

// Balance
pub use crate::balance::{BalanceCheck, BalanceConfig, BalanceValidator, validate_balance};

// Errors
pub use crate::error::ExecutionError;

// Session
pub use crate::session::ChatSession;
pub use crate::stream::{ChatStream, StreamSnapshot, StreamTicket};

// Submission
pub use crate::submit::{
    PositionCreator, PositionRequest, PositionSubmitter, PreparedPosition, SubmittedPosition,
};
pub use crate::tx_errors::TxFailure;
