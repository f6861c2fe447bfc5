//! Demo-credit wallet ledger
//!
//! `balance_demo` holds a user's free credits; `locked_demo` tracks credits
//! staked against open positions. A trade moves the stake from balance to
//! locked, settlement releases it again: payout on a win, nothing on a loss,
//! the exact original stake on a void.

use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-user demo-credit wallet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    /// Owning user
    pub uid: String,
    /// Free credits
    pub balance_demo: Decimal,
    /// Credits staked against open positions
    pub locked_demo: Decimal,
    /// Last mutation
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    /// Provision a wallet with a starting demo-credit grant
    pub fn new(uid: impl Into<String>, starting_balance: Decimal) -> Wallet {
        Wallet {
            uid: uid.into(),
            balance_demo: starting_balance,
            locked_demo: Decimal::ZERO,
            updated_at: Utc::now(),
        }
    }

    /// Credits available for new trades
    pub fn available(&self) -> Decimal {
        self.balance_demo - self.locked_demo
    }

    /// Move `amount` from free balance into the locked stake.
    ///
    /// Fails with `InsufficientFunds` when the available balance does not
    /// cover the amount; the wallet is untouched on failure.
    pub fn debit_for_trade(&mut self, amount: Decimal) -> CoreResult<()> {
        if self.available() < amount {
            return Err(CoreError::InsufficientFunds {
                available: self.available(),
                requested: amount,
            });
        }
        self.balance_demo -= amount;
        self.locked_demo += amount;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Release a settled stake and credit the payout (zero for a loss).
    pub fn credit_settlement(&mut self, payout: Decimal, locked_release: Decimal) {
        self.balance_demo += payout;
        self.locked_demo -= locked_release;
        self.updated_at = Utc::now();
    }

    /// Refund a voided stake in full.
    pub fn refund(&mut self, locked_release: Decimal) {
        self.balance_demo += locked_release;
        self.locked_demo -= locked_release;
        self.updated_at = Utc::now();
    }
}
