//! In-memory store

use super::Store;
use crate::engine::Trade;
use crate::market::Market;
use crate::pool::Pool;
use crate::position::Position;
use crate::wallet::Wallet;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-process store over tokio-guarded maps
#[derive(Default)]
pub struct MemoryStore {
    markets: RwLock<HashMap<String, Market>>,
    pools: RwLock<HashMap<String, Pool>>,
    wallets: RwLock<HashMap<String, Wallet>>,
    positions: RwLock<HashMap<(String, String), Position>>,
    trades: RwLock<Vec<Trade>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_market(&self, id: &str) -> anyhow::Result<Option<Market>> {
        Ok(self.markets.read().await.get(id).cloned())
    }

    async fn put_market(&self, market: Market) -> anyhow::Result<()> {
        self.markets.write().await.insert(market.id.clone(), market);
        Ok(())
    }

    async fn list_markets(&self) -> anyhow::Result<Vec<Market>> {
        Ok(self.markets.read().await.values().cloned().collect())
    }

    async fn get_pool(&self, market_id: &str) -> anyhow::Result<Option<Pool>> {
        Ok(self.pools.read().await.get(market_id).cloned())
    }

    async fn put_pool(&self, pool: Pool) -> anyhow::Result<()> {
        self.pools.write().await.insert(pool.market_id.clone(), pool);
        Ok(())
    }

    async fn get_wallet(&self, uid: &str) -> anyhow::Result<Option<Wallet>> {
        Ok(self.wallets.read().await.get(uid).cloned())
    }

    async fn put_wallet(&self, wallet: Wallet) -> anyhow::Result<()> {
        self.wallets.write().await.insert(wallet.uid.clone(), wallet);
        Ok(())
    }

    async fn get_position(
        &self,
        uid: &str,
        market_id: &str,
    ) -> anyhow::Result<Option<Position>> {
        let key = (uid.to_string(), market_id.to_string());
        Ok(self.positions.read().await.get(&key).cloned())
    }

    async fn put_position(&self, position: Position) -> anyhow::Result<()> {
        let key = (position.uid.clone(), position.market_id.clone());
        self.positions.write().await.insert(key, position);
        Ok(())
    }

    async fn list_positions(&self, market_id: &str) -> anyhow::Result<Vec<Position>> {
        Ok(self
            .positions
            .read()
            .await
            .values()
            .filter(|p| p.market_id == market_id)
            .cloned()
            .collect())
    }

    async fn put_trade(&self, trade: Trade) -> anyhow::Result<()> {
        self.trades.write().await.push(trade);
        Ok(())
    }

    async fn find_trade_by_client_txn(
        &self,
        uid: &str,
        market_id: &str,
        client_txn_id: &str,
    ) -> anyhow::Result<Option<Trade>> {
        Ok(self
            .trades
            .read()
            .await
            .iter()
            .find(|t| t.uid == uid && t.market_id == market_id && t.client_txn_id == client_txn_id)
            .cloned())
    }

    async fn list_trades(&self, uid: &str) -> anyhow::Result<Vec<Trade>> {
        Ok(self
            .trades
            .read()
            .await
            .iter()
            .filter(|t| t.uid == uid)
            .cloned()
            .collect())
    }
}
