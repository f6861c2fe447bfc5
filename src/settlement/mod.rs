//! Settlement engine
//!
//! Consumes every position of a terminal market exactly once. Winning
//! shares pay 1 credit each; a voided market refunds each position's
//! original stake. Positions carry a `settled_at` marker, so a re-invoked
//! settlement run skips work already done and a partial run can be retried
//! safely.

use crate::engine::EntityLocks;
use crate::error::{CoreError, CoreResult};
use crate::market::Outcome;
use crate::store::Store;
use crate::telemetry::metrics::record_settlement;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;

/// Audit summary of one settlement run
#[derive(Debug, Clone, Serialize)]
pub struct SettlementReport {
    /// Market settled
    pub market_id: String,
    /// Outcome applied
    pub outcome: Outcome,
    /// Positions consumed in this run
    pub positions_settled: usize,
    /// Credits credited to wallets in this run (payouts or refunds)
    pub total_paid_out: Decimal,
    /// Completion timestamp
    pub settled_at: DateTime<Utc>,
}

/// Pays out or refunds all positions of a terminal market
pub struct SettlementEngine {
    store: Arc<dyn Store>,
    locks: Arc<EntityLocks>,
}

impl SettlementEngine {
    /// Create a settlement engine over a store and shared lock domains
    pub fn new(store: Arc<dyn Store>, locks: Arc<EntityLocks>) -> Self {
        Self { store, locks }
    }

    /// Settle every open position of `market_id` under `outcome`.
    ///
    /// The market must already be in the terminal state matching the
    /// outcome, with that outcome recorded as its resolution; anything else
    /// is an `IllegalStateTransition`. Positions already bearing
    /// `settled_at` are skipped, so repeat invocations leave wallets
    /// unchanged.
    pub async fn settle(&self, market_id: &str, outcome: Outcome) -> CoreResult<SettlementReport> {
        let _market_guard = self.locks.markets.acquire(market_id).await;

        let market = self
            .store
            .get_market(market_id)
            .await?
            .ok_or_else(|| CoreError::MarketNotFound(market_id.to_string()))?;

        if market.state != outcome.terminal_state() || market.resolution != Some(outcome) {
            return Err(CoreError::IllegalStateTransition {
                from: market.state,
                to: outcome.terminal_state(),
            });
        }

        let mut positions_settled = 0usize;
        let mut total_paid_out = Decimal::ZERO;

        for mut position in self.store.list_positions(market_id).await? {
            if position.is_settled() {
                continue;
            }

            let _wallet_guard = self.locks.wallets.acquire(&position.uid).await;
            let mut wallet = self
                .store
                .get_wallet(&position.uid)
                .await?
                .ok_or_else(|| CoreError::WalletNotFound(position.uid.clone()))?;

            let locked_release = position.locked;
            let credited = match outcome.winning_side() {
                Some(winning) => {
                    let payout = position.settle_resolved(winning);
                    wallet.credit_settlement(payout, locked_release);
                    payout
                }
                None => {
                    let refund = position.settle_void();
                    wallet.refund(refund);
                    refund
                }
            };

            self.store.put_wallet(wallet).await?;
            self.store.put_position(position).await?;
            positions_settled += 1;
            total_paid_out += credited;
        }

        record_settlement(positions_settled, total_paid_out);
        tracing::info!(
            market_id,
            outcome = ?outcome,
            positions_settled,
            total_paid_out = %total_paid_out,
            "Market settled"
        );

        Ok(SettlementReport {
            market_id: market_id.to_string(),
            outcome,
            positions_settled,
            total_paid_out,
            settled_at: Utc::now(),
        })
    }
}
