//! Wallet balance pre-flight.
//!
//! A position needs `amount + estimated cost + fee buffer` SOL. The check is a
//! hard stop: nothing is submitted when the wallet is short.

use crate::error::{ExecutionError, Result};
use dlmm_lp_domain::costs::DEFAULT_FEE_BUFFER_SOL;
use dlmm_lp_protocols::BalanceReader;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Configuration for balance validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceConfig {
    /// Network fee buffer added on top of amount and cost, in SOL.
    pub fee_buffer_sol: Decimal,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            fee_buffer_sol: DEFAULT_FEE_BUFFER_SOL,
        }
    }
}

/// Outcome of a balance check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceCheck {
    pub ok: bool,
    pub available: Decimal,
    pub required: Decimal,
    /// `required - available` when the wallet is short.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortfall: Option<Decimal>,
}

impl BalanceCheck {
    /// Converts a failed check into [`ExecutionError::InsufficientBalance`].
    pub fn into_result(self) -> Result<Self> {
        match self.shortfall {
            Some(shortfall) => Err(ExecutionError::InsufficientBalance {
                required: self.required,
                available: self.available,
                shortfall,
            }),
            None => Ok(self),
        }
    }
}

/// Compares `available` against `required`.
#[must_use]
pub fn validate_balance(available: Decimal, required: Decimal) -> BalanceCheck {
    let ok = available >= required;
    BalanceCheck {
        ok,
        available,
        required,
        shortfall: (!ok).then(|| required - available),
    }
}

/// Reads wallet balances and checks them against position requirements.
pub struct BalanceValidator {
    reader: Arc<dyn BalanceReader>,
    config: BalanceConfig,
}

impl BalanceValidator {
    pub fn new(reader: Arc<dyn BalanceReader>, config: BalanceConfig) -> Self {
        Self { reader, config }
    }

    #[must_use]
    pub fn config(&self) -> &BalanceConfig {
        &self.config
    }

    /// SOL needed for a deposit of `amount_sol` into a range costing `cost_sol`.
    #[must_use]
    pub fn required_for(&self, amount_sol: Decimal, cost_sol: Decimal) -> Decimal {
        amount_sol + cost_sol + self.config.fee_buffer_sol
    }

    /// Reads the wallet balance and compares it to `required_sol`.
    pub async fn validate(&self, wallet: &str, required_sol: Decimal) -> Result<BalanceCheck> {
        let available = self
            .reader
            .sol_balance(wallet)
            .await
            .map_err(ExecutionError::BalanceUnavailable)?;
        let check = validate_balance(available, required_sol);
        if check.ok {
            debug!(wallet, %available, required = %required_sol, "Balance sufficient");
        } else {
            warn!(
                wallet,
                %available,
                required = %required_sol,
                shortfall = ?check.shortfall,
                "Balance insufficient"
            );
        }
        Ok(check)
    }

    /// Like [`validate`](Self::validate) but fails when the wallet is short.
    pub async fn ensure(&self, wallet: &str, required_sol: Decimal) -> Result<BalanceCheck> {
        self.validate(wallet, required_sol).await?.into_result()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    /// Balance reader returning queued balances, repeating the last one.
    pub(crate) struct MockBalanceReader {
        balances: Mutex<Vec<Decimal>>,
    }

    impl MockBalanceReader {
        pub(crate) fn new(balances: Vec<Decimal>) -> Self {
            Self {
                balances: Mutex::new(balances),
            }
        }
    }

    #[async_trait]
    impl BalanceReader for MockBalanceReader {
        async fn sol_balance(&self, _wallet: &str) -> anyhow::Result<Decimal> {
            let mut balances = self.balances.lock().unwrap();
            match balances.len() {
                0 => anyhow::bail!("rpc down"),
                1 => Ok(balances[0]),
                _ => Ok(balances.remove(0)),
            }
        }
    }

    #[test]
    fn test_shortfall_is_exact() {
        let check = validate_balance(dec!(1.2), dec!(1.572));
        assert!(!check.ok);
        assert_eq!(check.shortfall, Some(dec!(0.372)));
        assert_eq!(check.shortfall.unwrap(), check.required - check.available);
    }

    #[test]
    fn test_exact_balance_is_enough() {
        let check = validate_balance(dec!(1.5), dec!(1.5));
        assert!(check.ok);
        assert!(check.shortfall.is_none());
    }

    #[test]
    fn test_required_for_adds_buffer() {
        let validator = BalanceValidator::new(
            Arc::new(MockBalanceReader::new(vec![dec!(0)])),
            BalanceConfig::default(),
        );
        assert_eq!(validator.required_for(dec!(1), dec!(0.057)), dec!(1.072));
    }

    #[tokio::test]
    async fn test_ensure_fails_when_short() {
        let validator = BalanceValidator::new(
            Arc::new(MockBalanceReader::new(vec![dec!(0.5)])),
            BalanceConfig::default(),
        );
        match validator.ensure("wallet", dec!(0.6)).await {
            Err(ExecutionError::InsufficientBalance { shortfall, .. }) => {
                assert_eq!(shortfall, dec!(0.1));
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(validator.ensure("wallet", dec!(0.5)).await.is_ok());
    }

    #[tokio::test]
    async fn test_read_failure_is_reported() {
        let validator = BalanceValidator::new(
            Arc::new(MockBalanceReader::new(vec![])),
            BalanceConfig::default(),
        );
        assert!(matches!(
            validator.validate("wallet", dec!(1)).await,
            Err(ExecutionError::BalanceUnavailable(_))
        ));
    }
}
