//! Persistence boundary
//!
//! The core's entities map 1:1 to records behind the `Store` trait. The
//! handle is constructed once at process start and passed into every
//! component; nothing in the core reaches for ambient state. `MemoryStore`
//! is the in-process reference implementation.

mod memory;

pub use memory::MemoryStore;

use crate::engine::Trade;
use crate::market::Market;
use crate::pool::Pool;
use crate::position::Position;
use crate::wallet::Wallet;
use async_trait::async_trait;

/// Durable storage for the core's entities
#[async_trait]
pub trait Store: Send + Sync {
    /// Fetch a market by id
    async fn get_market(&self, id: &str) -> anyhow::Result<Option<Market>>;
    /// Insert or replace a market
    async fn put_market(&self, market: Market) -> anyhow::Result<()>;
    /// All markets, unordered
    async fn list_markets(&self) -> anyhow::Result<Vec<Market>>;

    /// Fetch the pool for a market
    async fn get_pool(&self, market_id: &str) -> anyhow::Result<Option<Pool>>;
    /// Insert or replace a pool
    async fn put_pool(&self, pool: Pool) -> anyhow::Result<()>;

    /// Fetch a wallet by uid
    async fn get_wallet(&self, uid: &str) -> anyhow::Result<Option<Wallet>>;
    /// Insert or replace a wallet
    async fn put_wallet(&self, wallet: Wallet) -> anyhow::Result<()>;

    /// Fetch the position for a (uid, market) pair
    async fn get_position(&self, uid: &str, market_id: &str)
        -> anyhow::Result<Option<Position>>;
    /// Insert or replace a position
    async fn put_position(&self, position: Position) -> anyhow::Result<()>;
    /// All positions in a market
    async fn list_positions(&self, market_id: &str) -> anyhow::Result<Vec<Position>>;

    /// Append a trade record
    async fn put_trade(&self, trade: Trade) -> anyhow::Result<()>;
    /// Look up a prior trade by idempotency key
    async fn find_trade_by_client_txn(
        &self,
        uid: &str,
        market_id: &str,
        client_txn_id: &str,
    ) -> anyhow::Result<Option<Trade>>;
    /// A user's trade history, oldest first
    async fn list_trades(&self, uid: &str) -> anyhow::Result<Vec<Trade>>;
}
