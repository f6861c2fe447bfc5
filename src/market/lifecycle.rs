//! Operator surface for the market lifecycle
//!
//! Publishing seeds the pool from the reference price feed so the opening
//! implied price matches the externally observed probability. Resolution
//! and voiding stamp the outcome first, commit it, and only then hand the
//! market to the settlement engine, so the terminal state is visible to
//! the trade engine before any payout moves.

use super::{Market, MarketState, Outcome};
use crate::engine::EntityLocks;
use crate::error::{CoreError, CoreResult};
use crate::feed::PriceFeed;
use crate::pool::Pool;
use crate::settlement::{SettlementEngine, SettlementReport};
use crate::store::Store;
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

/// Creates markets and drives their state transitions
pub struct LifecycleService {
    store: Arc<dyn Store>,
    locks: Arc<EntityLocks>,
    feed: Arc<dyn PriceFeed>,
    settlement: SettlementEngine,
    default_fee_bps: u32,
    liquidity_seed: Decimal,
}

impl LifecycleService {
    /// Create a lifecycle service; settlement shares the store and locks.
    pub fn new(
        store: Arc<dyn Store>,
        locks: Arc<EntityLocks>,
        feed: Arc<dyn PriceFeed>,
        default_fee_bps: u32,
        liquidity_seed: Decimal,
    ) -> Self {
        let settlement = SettlementEngine::new(Arc::clone(&store), Arc::clone(&locks));
        Self {
            store,
            locks,
            feed,
            settlement,
            default_fee_bps,
            liquidity_seed,
        }
    }

    /// Create a DRAFT match-winner market for a fixture.
    pub async fn create_market(&self, fixture_id: &str, created_by: &str) -> CoreResult<Market> {
        let market = Market::new(
            format!("mkt-{}", Uuid::new_v4()),
            fixture_id,
            self.default_fee_bps,
            created_by,
        );
        self.store.put_market(market.clone()).await?;
        tracing::info!(market_id = %market.id, fixture_id, created_by, "Market created");
        Ok(market)
    }

    /// DRAFT -> OPEN: seed the pool from the reference price feed (unless
    /// one is already seeded) and start accepting trades.
    pub async fn publish(&self, market_id: &str) -> CoreResult<Market> {
        let _market_guard = self.locks.markets.acquire(market_id).await;

        let mut market = self.get_market(market_id).await?;
        if !market.state.can_transition(MarketState::Open) {
            return Err(CoreError::IllegalStateTransition {
                from: market.state,
                to: MarketState::Open,
            });
        }

        let pool = match self.store.get_pool(market_id).await? {
            Some(pool) => pool,
            None => {
                let prices = self.feed.get_reference_prices(&market.fixture_id).await?;
                let (price_yes, price_no) = prices.normalized();
                let pool = Pool::seed(market_id, price_yes, price_no, self.liquidity_seed)?;
                self.store.put_pool(pool.clone()).await?;
                pool
            }
        };
        if pool.liquidity_seed <= Decimal::ZERO {
            return Err(CoreError::PoolNotFound(market_id.to_string()));
        }

        market.transition_to(MarketState::Open)?;
        market.published_at = Some(Utc::now());
        self.store.put_market(market.clone()).await?;

        tracing::info!(
            market_id,
            price_yes = %pool.last_price_yes,
            price_no = %pool.last_price_no,
            "Market published"
        );
        Ok(market)
    }

    /// OPEN -> LOCKED: block new trades, keep positions.
    pub async fn lock(&self, market_id: &str) -> CoreResult<Market> {
        let _market_guard = self.locks.markets.acquire(market_id).await;

        let mut market = self.get_market(market_id).await?;
        market.transition_to(MarketState::Locked)?;
        self.store.put_market(market.clone()).await?;

        tracing::info!(market_id, "Market locked");
        Ok(market)
    }

    /// LOCKED -> RESOLVED: record the fixture outcome and settle payouts.
    pub async fn resolve(
        &self,
        market_id: &str,
        outcome: Outcome,
    ) -> CoreResult<(Market, SettlementReport)> {
        if outcome == Outcome::Void {
            return self.void_market(market_id).await;
        }
        let market = self.finalize(market_id, outcome).await?;
        let report = self.settlement.settle(market_id, outcome).await?;
        Ok((market, report))
    }

    /// OPEN/LOCKED -> VOID: abandoned fixture, refund all stakes.
    pub async fn void_market(&self, market_id: &str) -> CoreResult<(Market, SettlementReport)> {
        let market = self.finalize(market_id, Outcome::Void).await?;
        let report = self.settlement.settle(market_id, Outcome::Void).await?;
        Ok((market, report))
    }

    /// Generic operator dispatch over the state machine.
    ///
    /// `outcome` is required for RESOLVED and ignored elsewhere. Returns
    /// the settlement report when the transition settles the market.
    pub async fn transition(
        &self,
        market_id: &str,
        new_state: MarketState,
        outcome: Option<Outcome>,
    ) -> CoreResult<(Market, Option<SettlementReport>)> {
        match new_state {
            MarketState::Open => Ok((self.publish(market_id).await?, None)),
            MarketState::Locked => Ok((self.lock(market_id).await?, None)),
            MarketState::Resolved => {
                let outcome = match outcome {
                    Some(outcome) if outcome != Outcome::Void => outcome,
                    _ => {
                        let market = self.get_market(market_id).await?;
                        return Err(CoreError::IllegalStateTransition {
                            from: market.state,
                            to: MarketState::Resolved,
                        });
                    }
                };
                let (market, report) = self.resolve(market_id, outcome).await?;
                Ok((market, Some(report)))
            }
            MarketState::Void => {
                let (market, report) = self.void_market(market_id).await?;
                Ok((market, Some(report)))
            }
            MarketState::Draft => {
                let market = self.get_market(market_id).await?;
                Err(CoreError::IllegalStateTransition {
                    from: market.state,
                    to: MarketState::Draft,
                })
            }
        }
    }

    /// Stamp the terminal state and resolution, commit, release the lock.
    async fn finalize(&self, market_id: &str, outcome: Outcome) -> CoreResult<Market> {
        let _market_guard = self.locks.markets.acquire(market_id).await;

        let mut market = self.get_market(market_id).await?;
        market.transition_to(outcome.terminal_state())?;
        market.resolution = Some(outcome);
        market.resolved_at = Some(Utc::now());
        self.store.put_market(market.clone()).await?;

        tracing::info!(market_id, outcome = ?outcome, "Market finalized");
        Ok(market)
    }

    async fn get_market(&self, market_id: &str) -> CoreResult<Market> {
        self.store
            .get_market(market_id)
            .await?
            .ok_or_else(|| CoreError::MarketNotFound(market_id.to_string()))
    }
}
