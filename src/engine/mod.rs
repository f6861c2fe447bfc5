//! Trade engine
//!
//! Validates and executes buy orders against a market's pool. A trade is a
//! single atomic unit: with the market and wallet locks held, every
//! validation runs before any record is written, then the four affected
//! records (wallet, pool, position, trade) are committed together. A failed
//! validation leaves all prior state intact.

mod locks;
mod types;

pub use locks::{EntityLocks, LockMap};
pub use types::{Trade, TradeId};

use crate::error::{CoreError, CoreResult};
use crate::pool::{Quote, Side};
use crate::position::Position;
use crate::store::Store;
use crate::telemetry::metrics::{increment, CounterMetric};
use crate::wallet::Wallet;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Executes trades against pools on behalf of users
pub struct TradeEngine {
    store: Arc<dyn Store>,
    locks: Arc<EntityLocks>,
    starting_balance: Decimal,
}

impl TradeEngine {
    /// Create an engine over a store and shared lock domains
    pub fn new(store: Arc<dyn Store>, locks: Arc<EntityLocks>, starting_balance: Decimal) -> Self {
        Self {
            store,
            locks,
            starting_balance,
        }
    }

    /// Provision a demo wallet for `uid`, or return the existing one.
    pub async fn open_wallet(&self, uid: &str) -> CoreResult<Wallet> {
        let _wallet_guard = self.locks.wallets.acquire(uid).await;

        if let Some(wallet) = self.store.get_wallet(uid).await? {
            return Ok(wallet);
        }
        let wallet = Wallet::new(uid, self.starting_balance);
        self.store.put_wallet(wallet.clone()).await?;
        tracing::info!(uid, balance = %wallet.balance_demo, "Wallet provisioned");
        Ok(wallet)
    }

    /// Price a prospective trade without executing it.
    pub async fn quote(&self, market_id: &str, side: Side, amount: Decimal) -> CoreResult<Quote> {
        let market = self
            .store
            .get_market(market_id)
            .await?
            .ok_or_else(|| CoreError::MarketNotFound(market_id.to_string()))?;
        if !market.is_open() {
            return Err(CoreError::MarketNotOpen(market.state));
        }
        let pool = self
            .store
            .get_pool(market_id)
            .await?
            .ok_or_else(|| CoreError::PoolNotFound(market_id.to_string()))?;
        pool.quote(market.fee_bps, side, amount)
    }

    /// Execute a buy.
    ///
    /// Repeating a call with the same `client_txn_id` for the same
    /// (uid, market) returns the original trade without re-executing the
    /// swap, so client retries are safe.
    pub async fn place_trade(
        &self,
        uid: &str,
        market_id: &str,
        side: Side,
        amount: Decimal,
        client_txn_id: &str,
    ) -> CoreResult<Trade> {
        match self
            .execute_trade(uid, market_id, side, amount, client_txn_id)
            .await
        {
            Ok(trade) => Ok(trade),
            Err(err) => {
                increment(CounterMetric::TradesRejected);
                tracing::warn!(uid, market_id, %amount, error = %err, "Trade rejected");
                Err(err)
            }
        }
    }

    async fn execute_trade(
        &self,
        uid: &str,
        market_id: &str,
        side: Side,
        amount: Decimal,
        client_txn_id: &str,
    ) -> CoreResult<Trade> {
        let _market_guard = self.locks.markets.acquire(market_id).await;
        let _wallet_guard = self.locks.wallets.acquire(uid).await;

        if let Some(prior) = self
            .store
            .find_trade_by_client_txn(uid, market_id, client_txn_id)
            .await?
        {
            increment(CounterMetric::TradeReplays);
            tracing::info!(uid, market_id, client_txn_id, "Replaying recorded trade");
            return Ok(prior);
        }

        let market = self
            .store
            .get_market(market_id)
            .await?
            .ok_or_else(|| CoreError::MarketNotFound(market_id.to_string()))?;
        if !market.is_open() {
            return Err(CoreError::MarketNotOpen(market.state));
        }

        let mut wallet = self
            .store
            .get_wallet(uid)
            .await?
            .ok_or_else(|| CoreError::WalletNotFound(uid.to_string()))?;

        let mut pool = self
            .store
            .get_pool(market_id)
            .await?
            .ok_or_else(|| CoreError::PoolNotFound(market_id.to_string()))?;

        let quote = pool.quote(market.fee_bps, side, amount)?;

        let mut position = match self.store.get_position(uid, market_id).await? {
            Some(position) => position,
            None => Position::new(uid, market_id),
        };

        // Last two validations; both leave their operand untouched on error
        wallet.debit_for_trade(amount)?;
        position.apply_fill(side, quote.shares_out, quote.avg_price, amount)?;

        pool.apply(&quote);
        position.mark(pool.last_price_yes, pool.last_price_no);
        let trade = Trade::from_quote(uid, market_id, &quote, client_txn_id);

        // Commit all four records while both locks are held
        self.store.put_wallet(wallet).await?;
        self.store.put_pool(pool).await?;
        self.store.put_position(position).await?;
        self.store.put_trade(trade.clone()).await?;

        increment(CounterMetric::TradesExecuted);
        tracing::info!(
            trade_id = %trade.trade_id,
            uid,
            market_id,
            side = ?side,
            amount = %amount,
            shares = %trade.shares,
            avg_price = %trade.avg_price,
            "Trade executed"
        );
        Ok(trade)
    }

    /// A user's position in a market.
    pub async fn position(&self, uid: &str, market_id: &str) -> CoreResult<Position> {
        self.store
            .get_position(uid, market_id)
            .await?
            .ok_or_else(|| CoreError::PositionNotFound {
                uid: uid.to_string(),
                market_id: market_id.to_string(),
            })
    }

    /// A user's trade history.
    pub async fn trades(&self, uid: &str) -> CoreResult<Vec<Trade>> {
        Ok(self.store.list_trades(uid).await?)
    }

    /// A user's wallet.
    pub async fn wallet(&self, uid: &str) -> CoreResult<Wallet> {
        self.store
            .get_wallet(uid)
            .await?
            .ok_or_else(|| CoreError::WalletNotFound(uid.to_string()))
    }
}
